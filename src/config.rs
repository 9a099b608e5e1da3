use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level EMSR configuration (`emsr.toml`).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmsrConfig {
    /// Bulletin import settings.
    #[serde(default)]
    pub import: ImportToml,

    /// Measure filter applied before grouping or harmonisation.
    #[serde(default)]
    pub filter: FilterToml,

    /// Grouping strategy.
    #[serde(default)]
    pub grouping: GroupingToml,

    /// Pair selection settings.
    #[serde(default)]
    pub selection: SelectionToml,

    /// Regression settings.
    #[serde(default)]
    pub regression: RegressionToml,

    /// Harmonisation settings and formula library.
    #[serde(default)]
    pub harmonise: HarmoniseToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportToml {
    /// Bulletin files loaded by `regress` and `harmonise`.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    #[serde(default = "default_catalogue")]
    pub catalogue: String,
    #[serde(default = "default_commit_every")]
    pub commit_every: usize,
    /// `skip`, `record` or `fatal`.
    #[serde(default = "default_junk")]
    pub junk: String,
}

impl Default for ImportToml {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            catalogue: default_catalogue(),
            commit_every: default_commit_every(),
            junk: default_junk(),
        }
    }
}

fn default_catalogue() -> String {
    "ISC".to_string()
}
fn default_commit_every() -> usize {
    1000
}
fn default_junk() -> String {
    "skip".to_string()
}

/// Every set field narrows the selection; unset fields match everything.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterToml {
    /// RFC 3339 origin time lower bound.
    pub start: Option<String>,
    /// RFC 3339 origin time upper bound.
    pub end: Option<String>,
    pub agencies: Option<Vec<String>>,
    pub scales: Option<Vec<String>>,
    pub min_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    /// `[longitude, latitude]` ring.
    pub polygon: Option<Vec<[f64; 2]>>,
    pub radius: Option<RadiusToml>,
    #[serde(default)]
    pub require_uncertainty: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RadiusToml {
    pub longitude: f64,
    pub latitude: f64,
    pub km: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupingToml {
    /// `event`, `time_clustering` or `sequential`.
    #[serde(default = "default_grouping")]
    pub strategy: String,
    /// `origin_time`, `depth` or `magnitude`.
    #[serde(default = "default_feature")]
    pub feature: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Seconds.
    #[serde(default = "default_time_window")]
    pub time_window: f64,
    /// Kilometres.
    #[serde(default = "default_space_window")]
    pub space_window: f64,
    #[serde(default)]
    pub magnitude_window: Option<f64>,
}

impl Default for GroupingToml {
    fn default() -> Self {
        Self {
            strategy: default_grouping(),
            feature: default_feature(),
            threshold: default_threshold(),
            time_window: default_time_window(),
            space_window: default_space_window(),
            magnitude_window: None,
        }
    }
}

fn default_grouping() -> String {
    "event".to_string()
}
fn default_feature() -> String {
    "origin_time".to_string()
}
fn default_threshold() -> f64 {
    200.0
}
fn default_time_window() -> f64 {
    16.0
}
fn default_space_window() -> f64 {
    100.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionToml {
    /// `random`, `precise` or `agency_ranking`.
    #[serde(default = "default_selection")]
    pub strategy: String,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Ordered rules for `agency_ranking`, best first.
    #[serde(default)]
    pub ranking: Vec<RankingRuleToml>,
    /// `discard`, `event_maximum` or `fixed`.
    #[serde(default = "default_missing")]
    pub missing_uncertainty: String,
    #[serde(default = "default_uncertainty")]
    pub default_uncertainty: f64,
}

impl Default for SelectionToml {
    fn default() -> Self {
        Self {
            strategy: default_selection(),
            seed: None,
            ranking: Vec::new(),
            missing_uncertainty: default_missing(),
            default_uncertainty: default_uncertainty(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankingRuleToml {
    /// Regex matched against the whole scale code.
    pub scales: String,
    pub agencies: Vec<String>,
}

fn default_selection() -> String {
    "precise".to_string()
}
fn default_missing() -> String {
    "discard".to_string()
}
fn default_uncertainty() -> f64 {
    0.2
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegressionToml {
    pub native: Option<String>,
    pub target: Option<String>,
    /// `linear` or `polynomial(N)`.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
    #[serde(default)]
    pub initial_beta: Option<Vec<f64>>,
}

impl Default for RegressionToml {
    fn default() -> Self {
        Self {
            native: None,
            target: None,
            models: default_models(),
            max_iterations: default_max_iterations(),
            sd_tolerance: default_sd_tolerance(),
            initial_beta: None,
        }
    }
}

fn default_models() -> Vec<String> {
    vec!["linear".to_string()]
}
fn default_max_iterations() -> u64 {
    3000
}
fn default_sd_tolerance() -> f64 {
    1e-10
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarmoniseToml {
    pub target: Option<String>,
    #[serde(default = "default_uncertainty")]
    pub default_uncertainty: f64,
    #[serde(default = "default_true")]
    pub allow_trivial_conversion: bool,
    /// `csv` or `json`.
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub formulas: Vec<FormulaToml>,
}

impl Default for HarmoniseToml {
    fn default() -> Self {
        Self {
            target: None,
            default_uncertainty: default_uncertainty(),
            allow_trivial_conversion: true,
            format: default_format(),
            output: None,
            formulas: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_format() -> String {
    "csv".to_string()
}

/// A polynomial conversion formula.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormulaToml {
    pub name: String,
    /// Ascending powers.
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub model_error: f64,
    pub target_scale: String,
    /// Domain: scales the formula applies to.
    pub scales: Vec<String>,
    /// Domain: reporting agencies; unset means any.
    #[serde(default)]
    pub agencies: Option<Vec<String>>,
}

/// Reads and parses a TOML configuration file.
pub fn load(path: &Path) -> Result<EmsrConfig> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}
