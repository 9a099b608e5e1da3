//! Regress command: fit scaling relationships between two scales.

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use emsr_catalogue::Catalogue;
use emsr_scaling::{Emsr, EmsrOutcome};

use crate::cli::RegressArgs;
use crate::config::{self, EmsrConfig};
use crate::convert;
use crate::import_cmd;

/// Run the regression pipeline and write the JSON report.
pub fn run(args: RegressArgs) -> Result<()> {
    let _cmd = info_span!("regress").entered();
    let config = config::load(&args.config)?;

    let native = args
        .native
        .or_else(|| config.regression.native.clone())
        .ok_or_else(|| anyhow!("no native scale: set [regression].native in config or use --native"))?;
    let target = args
        .target
        .or_else(|| config.regression.target.clone())
        .ok_or_else(|| anyhow!("no target scale: set [regression].target in config or use --target"))?;

    let catalogue = import_cmd::load_catalogue(&config.import)?;
    let outcome = regress(&config, &catalogue, &native, &target, args.seed)?;
    let json = outcome.to_json()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Filters, groups, selects and fits `native -> target` on `catalogue`.
pub fn regress(
    config: &EmsrConfig,
    catalogue: &Catalogue,
    native: &str,
    target: &str,
    seed: Option<u64>,
) -> Result<EmsrOutcome> {
    let filter = convert::build_filter(&config.filter)?;
    let grouping = convert::build_grouping(&config.grouping)?;
    let selection = convert::build_selection(&config.selection, seed)?;
    let missing = convert::build_missing_uncertainty(&config.selection)?;
    let models = convert::build_models(&config.regression)?;
    let odr = convert::build_odr_config(&config.regression)?;

    let measures = catalogue.query(&filter);
    info!(measures = measures.len(), "measures selected by filter");

    let emsr = Emsr::new(measures, grouping).context("grouping failed")?;
    let outcome = emsr
        .apply_regression_model(native, target, &selection, &missing, catalogue, &models, &odr)
        .with_context(|| format!("regression {native} -> {target} failed"))?;

    for failure in outcome.failures() {
        info!(model = %failure.model, reason = %failure.reason, "model skipped");
    }
    if let Some(best) = outcome.best() {
        info!(
            model = %best.name(),
            beta = ?best.fit().beta(),
            residual = best.fit().residual(),
            "best scaling relationship"
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{bulletin, write_file};

    fn config_with_inputs(text: &str) -> (tempfile::TempDir, EmsrConfig) {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(dir.path(), "bulletin.isf", &bulletin(0..20));
        let toml_text = format!("[import]\ninputs = [{:?}]\n{text}", input.display().to_string());
        let path = write_file(dir.path(), "emsr.toml", &toml_text);
        let config = config::load(&path).unwrap();
        (dir, config)
    }

    #[test]
    fn test_regress_linear() {
        let (_dir, config) = config_with_inputs("[regression]\nmodels = [\"linear\"]\n");
        let catalogue = import_cmd::load_catalogue(&config.import).unwrap();
        let outcome = regress(&config, &catalogue, "mb", "Mw", None).unwrap();
        assert_eq!(outcome.pairs().len(), 20);
        let best = outcome.best().unwrap();
        assert!((best.fit().beta()[1] - 0.9).abs() < 0.15);
    }

    #[test]
    fn test_regress_json_report() {
        let (dir, _) = config_with_inputs("");
        let output = dir.path().join("report.json");
        let args = RegressArgs {
            config: dir.path().join("emsr.toml"),
            native: Some("mb".to_string()),
            target: Some("Mw".to_string()),
            seed: None,
            output: Some(output.clone()),
        };
        run(args).unwrap();
        let json = std::fs::read_to_string(output).unwrap();
        assert!(json.contains("\"target\": \"Mw\""));
        assert!(json.contains("\"relationships\""));
    }

    #[test]
    fn test_filter_leaves_too_few_pairs() {
        let (_dir, config) =
            config_with_inputs("[filter]\nend = \"2010-01-02T23:59:59Z\"\n");
        let catalogue = import_cmd::load_catalogue(&config.import).unwrap();
        let err = regress(&config, &catalogue, "mb", "Mw", None).unwrap_err();
        assert!(format!("{err:#}").contains("not enough samples"));
    }

    #[test]
    fn test_missing_scale() {
        let (dir, _) = config_with_inputs("");
        let args = RegressArgs {
            config: dir.path().join("emsr.toml"),
            native: None,
            target: Some("Mw".to_string()),
            seed: None,
            output: None,
        };
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("no native scale"));
    }
}
