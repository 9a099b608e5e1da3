//! Harmonise command: convert measures to one target scale.

use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use emsr_catalogue::Catalogue;
use emsr_harmonise::{Harmoniser, HarmoniserResult};

use crate::cli::HarmoniseArgs;
use crate::config::{self, EmsrConfig};
use crate::convert;
use crate::import_cmd;

/// Run the harmonisation pipeline and export the converted measures.
pub fn run(args: HarmoniseArgs) -> Result<()> {
    let _cmd = info_span!("harmonise").entered();
    let config = config::load(&args.config)?;

    let target = args
        .target
        .or_else(|| config.harmonise.target.clone())
        .ok_or_else(|| anyhow!("no target scale: set [harmonise].target in config or use --target"))?;
    let format = convert::parse_export_format(
        args.format.as_deref().unwrap_or(&config.harmonise.format),
    )?;

    let catalogue = import_cmd::load_catalogue(&config.import)?;
    let result = harmonise(&config, &catalogue, &target)?;

    match args.output.or_else(|| config.harmonise.output.clone()) {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create output: {}", path.display()))?;
            result
                .export(format, BufWriter::new(file))
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "harmonised measures written");
        }
        None => result.export(format, io::stdout().lock())?,
    }
    Ok(())
}

/// Converts the filtered measures of `catalogue` to `target`.
pub fn harmonise(config: &EmsrConfig, catalogue: &Catalogue, target: &str) -> Result<HarmoniserResult> {
    let filter = convert::build_filter(&config.filter)?;
    let mut harmoniser = Harmoniser::new(convert::build_harmoniser_config(&config.harmonise)?)?;
    for formula in &config.harmonise.formulas {
        harmoniser.add_formula(convert::build_formula(formula)?)?;
    }
    info!(formulas = harmoniser.formulas().len(), "formula library loaded");

    let measures = catalogue.query(&filter);
    let result = harmoniser.harmonise(measures.into_vec(), target)?;
    info!(
        converted = result.converted_count(),
        unconverted = result.unconverted().len(),
        target,
        "harmonisation finished"
    );
    Ok(result)
}
