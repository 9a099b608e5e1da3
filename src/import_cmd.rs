//! Import command: parse ISF bulletins into an in-memory catalogue.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use emsr_catalogue::Catalogue;
use emsr_isf::{EntityKind, ImportConfig, ImportReport, import_events};

use crate::cli::ImportArgs;
use crate::config::{self, ImportToml};
use crate::convert;

/// Run the import pipeline and print a summary per bulletin.
pub fn run(args: ImportArgs) -> Result<()> {
    let _cmd = info_span!("import").entered();
    let mut import = match &args.config {
        Some(path) => config::load(path)?.import,
        None => ImportToml::default(),
    };
    if let Some(catalogue) = args.catalogue {
        import.catalogue = catalogue;
    }
    if args.strict {
        import.junk = "fatal".to_string();
    }
    let import_cfg = convert::build_import_config(&import)?;

    let mut catalogue = Catalogue::new();
    for path in &args.input {
        let report = import_file(path, &mut catalogue, &import_cfg)?;
        println!("{}", summary_line(path, &report));
    }
    println!(
        "total: {} events, {} agencies, {} origins, {} measures",
        catalogue.event_count(),
        catalogue.agency_count(),
        catalogue.origin_count(),
        catalogue.len()
    );
    Ok(())
}

/// Loads every bulletin listed in `[import].inputs`.
pub fn load_catalogue(import: &ImportToml) -> Result<Catalogue> {
    if import.inputs.is_empty() {
        bail!("no bulletin inputs: set [import].inputs in config");
    }
    let import_cfg = convert::build_import_config(import)?;
    let mut catalogue = Catalogue::new();
    for path in &import.inputs {
        import_file(path, &mut catalogue, &import_cfg)?;
    }
    info!(measures = catalogue.len(), events = catalogue.event_count(), "catalogue loaded");
    Ok(catalogue)
}

fn import_file(path: &Path, catalogue: &mut Catalogue, config: &ImportConfig) -> Result<ImportReport> {
    info!(path = %path.display(), "importing bulletin");
    let file = File::open(path)
        .with_context(|| format!("failed to open bulletin: {}", path.display()))?;
    let report = import_events(BufReader::new(file), catalogue, config)
        .with_context(|| format!("failed to import bulletin: {}", path.display()))?;
    if !report.errors().is_empty() {
        warn!(
            path = %path.display(),
            errors = report.errors().len(),
            "bulletin had unparsable lines"
        );
    }
    Ok(report)
}

fn summary_line(path: &Path, report: &ImportReport) -> String {
    format!(
        "{}: {} lines, {} events, {} agencies, {} origins, {} measures, {} errors",
        path.display(),
        report.lines(),
        report.created(EntityKind::Event),
        report.created(EntityKind::Agency),
        report.created(EntityKind::Origin),
        report.created(EntityKind::Measure),
        report.errors().len()
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::testutil::{bulletin, write_file};

    #[test]
    fn test_load_catalogue_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.isf", &bulletin(0..3));
        let b = write_file(dir.path(), "b.isf", &bulletin(3..5));
        let import = ImportToml {
            inputs: vec![a, b],
            ..ImportToml::default()
        };
        let catalogue = load_catalogue(&import).unwrap();
        assert_eq!(catalogue.event_count(), 5);
        assert_eq!(catalogue.len(), 10);
    }

    #[test]
    fn test_no_inputs() {
        let err = load_catalogue(&ImportToml::default()).unwrap_err();
        assert!(err.to_string().contains("no bulletin inputs"));
    }

    #[test]
    fn test_missing_file() {
        let import = ImportToml {
            inputs: vec![PathBuf::from("/nonexistent/bulletin.isf")],
            ..ImportToml::default()
        };
        let err = load_catalogue(&import).unwrap_err();
        assert!(format!("{err:#}").contains("failed to open bulletin"));
    }

    #[test]
    fn test_summary_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.isf", &bulletin(0..2));
        let mut catalogue = Catalogue::new();
        let report = import_file(&path, &mut catalogue, &ImportConfig::default()).unwrap();
        let line = summary_line(&path, &report);
        assert!(line.ends_with("2 events, 2 agencies, 2 origins, 4 measures, 0 errors"));
    }
}
