// src/repos/filter.rs

//! Include / exclude prefix filtering of candidate repositories.

use serde::{Deserialize, Serialize};

/// Two static prefix sets applied to repository names.
///
/// - `include`: a name must start with at least one of these (an empty list
///   lets everything through).
/// - `exclude`: a name must start with none of these.
///
/// Matching is a literal, case-sensitive `starts_with`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixFilter {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl PrefixFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn matches(&self, name: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| name.starts_with(p.as_str()));
        included && !self.exclude.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Keep the names that pass the filter, in their original order.
    pub fn apply<I, S>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(Into::into)
            .filter(|name| self.matches(name))
            .collect()
    }
}
