//! Synthetic ISF bulletins for command tests.

use std::ops::Range;
use std::path::{Path, PathBuf};

const ORIGIN_HEADER: &str = "   Date       Time        Err   RMS Latitude Longitude  Smaj  Smin  Az Depth   Err Ndef Nsta Gap  mdist  Mdist Qual   Author      OrigID";
const MEASURE_HEADER: &str = "Magnitude  Err Nsta Author      OrigID";

fn row(len: usize, fields: &[(usize, &str)]) -> String {
    let mut buf = vec![b' '; len];
    for &(at, text) in fields {
        buf[at..at + text.len()].copy_from_slice(text.as_bytes());
    }
    String::from_utf8(buf).unwrap()
}

/// A bulletin with one event per index: an ISC `mb` and a GCMT `Mw`
/// reading on one origin, with `Mw = 0.6 + 0.9 mb` give or take 0.05.
pub fn bulletin(events: Range<usize>) -> String {
    let mut lines = vec!["DATA_TYPE BULLETIN IMS1.0:short".to_string()];
    for i in events {
        let mb = 4.0 + 0.1 * i as f64;
        let wobble = if i % 2 == 0 { 0.05 } else { -0.05 };
        let mw = 0.6 + 0.9 * mb + wobble;
        let origin_id = format!("{:08}", 1000 + i);
        let day = 1 + i % 28;
        lines.push(format!("Event {} Synthetic region {i}", 500 + i));
        lines.push(ORIGIN_HEADER.to_string());
        lines.push(row(
            136,
            &[
                (0, &format!("2010/01/{day:02}")),
                (11, "10:00:00.00"),
                (36, " 10.0000"),
                (45, "  20.0000"),
                (71, " 10.0"),
                (118, "ISC"),
                (128, &origin_id),
            ],
        ));
        lines.push(MEASURE_HEADER.to_string());
        for (scale, value, author) in [("mb", mb, "ISC"), ("Mw", mw, "GCMT")] {
            lines.push(row(
                38,
                &[
                    (0, scale),
                    (6, &format!("{value:4.1}")),
                    (11, "0.1"),
                    (20, author),
                    (30, &origin_id),
                ],
            ));
        }
    }
    lines.push("STOP".to_string());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
