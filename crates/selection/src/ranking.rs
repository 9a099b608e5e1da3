//! Agency preference tables.

use regex::Regex;

use crate::error::SelectionError;

/// Score of an agency missing from the applicable ranking.
pub const UNRANKED: i64 = -1;

#[derive(Debug, Clone)]
struct Rule {
    pattern: Regex,
    agencies: Vec<String>,
}

/// Preferred agencies per scale.
///
/// Each rule pairs a scale pattern with agencies in decreasing order of
/// preference. The first rule whose pattern matches the whole scale code
/// applies.
///
/// # Example
///
/// ```
/// use emsr_selection::AgencyRanking;
///
/// let ranking = AgencyRanking::new([
///     ("Mw", vec!["GCMT", "NEIC"]),
///     ("m[bB]", vec!["ISC", "NEIC"]),
/// ])
/// .unwrap();
/// assert_eq!(ranking.score("Mw", "GCMT"), 2);
/// assert_eq!(ranking.score("mb", "NEIC"), 1);
/// assert_eq!(ranking.score("mb", "BJI"), -1);
/// ```
#[derive(Debug, Clone)]
pub struct AgencyRanking {
    rules: Vec<Rule>,
}

impl AgencyRanking {
    /// Compiles a ranking from `(scale pattern, agencies)` rules.
    ///
    /// # Errors
    ///
    /// [`SelectionError::InvalidPattern`] if a pattern does not compile.
    pub fn new<I, P, A, S>(rules: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = (P, A)>,
        P: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|(pattern, agencies)| {
                let pattern = pattern.as_ref();
                let compiled = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
                    SelectionError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Rule {
                    pattern: compiled,
                    agencies: agencies.into_iter().map(Into::into).collect(),
                })
            })
            .collect::<Result<Vec<_>, SelectionError>>()?;
        Ok(Self { rules })
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Scores `agency` for a measure on `scale`.
    ///
    /// With `L` agencies in the applicable rule, position `i` scores `L - i`.
    /// Agencies absent from the rule, or scales without a rule, score
    /// [`UNRANKED`].
    pub fn score(&self, scale: &str, agency: &str) -> i64 {
        let Some(rule) = self.rules.iter().find(|r| r.pattern.is_match(scale)) else {
            return UNRANKED;
        };
        rule.agencies
            .iter()
            .position(|a| a == agency)
            .map_or(UNRANKED, |i| (rule.agencies.len() - i) as i64)
    }
}

impl PartialEq for AgencyRanking {
    fn eq(&self, other: &Self) -> bool {
        self.rules.len() == other.rules.len()
            && self.rules.iter().zip(&other.rules).all(|(a, b)| {
                a.pattern.as_str() == b.pattern.as_str() && a.agencies == b.agencies
            })
    }
}
