//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use crate::config::*;

use emsr_catalogue::Filter;
use emsr_grouping::{ClusterFeature, GroupingStrategy, SequentialWindows, TimeClustering};
use emsr_harmonise::{ConversionFormula, ExportFormat, HarmoniserConfig};
use emsr_isf::{ImportConfig, JunkPolicy};
use emsr_regression::{ModelKind, OdrConfig};
use emsr_selection::{AgencyRanking, MissingUncertainty, SelectionStrategy};

/// Parses a junk policy name into the corresponding enum variant.
pub fn parse_junk_policy(s: &str) -> Result<JunkPolicy> {
    match s.to_lowercase().as_str() {
        "skip" => Ok(JunkPolicy::Skip),
        "record" => Ok(JunkPolicy::Record),
        "fatal" => Ok(JunkPolicy::Fatal),
        other => bail!("unknown junk policy: {other:?}"),
    }
}

/// Parses a clustering feature name into the corresponding enum variant.
pub fn parse_cluster_feature(s: &str) -> Result<ClusterFeature> {
    match s.to_lowercase().as_str() {
        "origin_time" | "time" => Ok(ClusterFeature::OriginTime),
        "depth" => Ok(ClusterFeature::Depth),
        "magnitude" => Ok(ClusterFeature::Magnitude),
        other => bail!("unknown clustering feature: {other:?}"),
    }
}

/// Parses `linear` or `polynomial(N)`.
pub fn parse_model(s: &str) -> Result<ModelKind> {
    let s = s.trim().to_lowercase();
    if s == "linear" {
        return Ok(ModelKind::Linear);
    }
    let Some(order) = s
        .strip_prefix("polynomial(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        bail!("unknown model: {s:?} (expected \"linear\" or \"polynomial(N)\")");
    };
    let order: usize = order
        .trim()
        .parse()
        .with_context(|| format!("invalid polynomial order in {s:?}"))?;
    let kind = ModelKind::Polynomial { order };
    kind.validate()?;
    Ok(kind)
}

/// Parses an export format name into the corresponding enum variant.
pub fn parse_export_format(s: &str) -> Result<ExportFormat> {
    match s.to_lowercase().as_str() {
        "csv" => Ok(ExportFormat::Csv),
        "json" => Ok(ExportFormat::Json),
        other => bail!("unknown export format: {other:?}"),
    }
}

fn parse_time(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid RFC 3339 time: {s:?}"))?
        .with_timezone(&Utc))
}

/// Builds an [`ImportConfig`] from the TOML import configuration.
pub fn build_import_config(import: &ImportToml) -> Result<ImportConfig> {
    let junk = parse_junk_policy(&import.junk)?;
    let cfg = ImportConfig::new(&import.catalogue)
        .with_commit_every(import.commit_every)
        .with_junk_policy(junk);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the conjunction of every set filter field.
pub fn build_filter(filter: &FilterToml) -> Result<Filter> {
    let mut parts = Vec::new();
    if filter.start.is_some() || filter.end.is_some() {
        let start = match &filter.start {
            Some(s) => parse_time(s)?,
            None => DateTime::<Utc>::MIN_UTC,
        };
        let end = match &filter.end {
            Some(s) => parse_time(s)?,
            None => DateTime::<Utc>::MAX_UTC,
        };
        if start > end {
            bail!("filter start {start} is after end {end}");
        }
        parts.push(Filter::TimeBetween { start, end });
    }
    if let Some(agencies) = &filter.agencies {
        parts.push(Filter::agencies(agencies));
    }
    if let Some(scales) = &filter.scales {
        parts.push(Filter::scales(scales));
    }
    if let Some(min) = filter.min_magnitude {
        parts.push(Filter::MagnitudeAtLeast(min));
    }
    if let Some(max) = filter.max_magnitude {
        parts.push(Filter::MagnitudeAtMost(max));
    }
    if let Some(ring) = &filter.polygon {
        if ring.len() < 3 {
            bail!("filter polygon needs at least 3 vertices, got {}", ring.len());
        }
        parts.push(Filter::WithinPolygon(ring.clone()));
    }
    if let Some(r) = &filter.radius {
        parts.push(Filter::WithinRadius {
            longitude: r.longitude,
            latitude: r.latitude,
            km: r.km,
        });
    }
    if filter.require_uncertainty {
        parts.push(Filter::HasUncertainty);
    }
    Ok(match parts.len() {
        0 => Filter::All,
        1 => parts.remove(0),
        _ => Filter::And(parts),
    })
}

/// Builds a [`GroupingStrategy`] from the TOML grouping configuration.
pub fn build_grouping(grouping: &GroupingToml) -> Result<GroupingStrategy> {
    let strategy = match grouping.strategy.to_lowercase().as_str() {
        "event" => GroupingStrategy::ByEvent,
        "time_clustering" | "clustering" => GroupingStrategy::TimeClustering(
            TimeClustering::new()
                .with_feature(parse_cluster_feature(&grouping.feature)?)
                .with_threshold(grouping.threshold),
        ),
        "sequential" => {
            let mut windows = SequentialWindows::new(grouping.time_window, grouping.space_window);
            if let Some(m) = grouping.magnitude_window {
                windows = windows.with_magnitude_window(m);
            }
            GroupingStrategy::Sequential(windows)
        }
        other => bail!("unknown grouping strategy: {other:?}"),
    };
    strategy.validate()?;
    Ok(strategy)
}

/// Builds a [`SelectionStrategy`] from the TOML selection configuration.
///
/// A CLI seed overrides the configured one.
pub fn build_selection(selection: &SelectionToml, seed: Option<u64>) -> Result<SelectionStrategy> {
    match selection.strategy.to_lowercase().as_str() {
        "random" => Ok(SelectionStrategy::Random {
            seed: seed.or(selection.seed),
        }),
        "precise" => Ok(SelectionStrategy::Precise),
        "agency_ranking" | "ranking" => {
            if selection.ranking.is_empty() {
                bail!("agency_ranking selection needs at least one [[selection.ranking]] rule");
            }
            let rules = selection
                .ranking
                .iter()
                .map(|r| (r.scales.as_str(), r.agencies.iter().map(String::as_str)));
            Ok(SelectionStrategy::AgencyRanking(AgencyRanking::new(rules)?))
        }
        other => bail!("unknown selection strategy: {other:?}"),
    }
}

/// Builds a [`MissingUncertainty`] policy from the TOML selection configuration.
pub fn build_missing_uncertainty(selection: &SelectionToml) -> Result<MissingUncertainty> {
    let policy = match selection.missing_uncertainty.to_lowercase().as_str() {
        "discard" => MissingUncertainty::Discard,
        "event_maximum" | "maximum" => MissingUncertainty::EventMaximum,
        "fixed" | "default" => MissingUncertainty::FixedDefault(selection.default_uncertainty),
        other => bail!("unknown missing-uncertainty policy: {other:?}"),
    };
    policy.validate()?;
    Ok(policy)
}

/// Parses every configured model kind.
pub fn build_models(regression: &RegressionToml) -> Result<Vec<ModelKind>> {
    if regression.models.is_empty() {
        bail!("[regression].models is empty");
    }
    regression.models.iter().map(|m| parse_model(m)).collect()
}

/// Builds an [`OdrConfig`] from the TOML regression configuration.
pub fn build_odr_config(regression: &RegressionToml) -> Result<OdrConfig> {
    let mut cfg = OdrConfig::new()
        .with_max_iterations(regression.max_iterations)
        .with_sd_tolerance(regression.sd_tolerance);
    if let Some(beta) = &regression.initial_beta {
        cfg = cfg.with_initial_beta(beta.clone());
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`HarmoniserConfig`] from the TOML harmonise configuration.
pub fn build_harmoniser_config(harmonise: &HarmoniseToml) -> Result<HarmoniserConfig> {
    let cfg = HarmoniserConfig::new()
        .with_default_uncertainty(harmonise.default_uncertainty)
        .with_allow_trivial_conversion(harmonise.allow_trivial_conversion);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a polynomial [`ConversionFormula`] from its TOML description.
pub fn build_formula(formula: &FormulaToml) -> Result<ConversionFormula> {
    if formula.coefficients.is_empty() {
        bail!("formula {:?} has no coefficients", formula.name);
    }
    if formula.scales.is_empty() {
        bail!("formula {:?} applies to no scale", formula.name);
    }
    let mut domain = Filter::scales(&formula.scales);
    if let Some(agencies) = &formula.agencies {
        domain = domain.and(Filter::agencies(agencies));
    }
    Ok(ConversionFormula::polynomial(
        &formula.name,
        formula.coefficients.clone(),
        formula.model_error,
        domain,
        &formula.target_scale,
    ))
}
