//! Emotion label normalization
//!
//! Classifier outputs and catalog tags come from an open vocabulary. The alias
//! table collapses synonyms ("angry", "mad") onto one canonical label
//! ("anger") so catalog lookups compare like with like.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};

/// Alias table shipped with the application, used when the config file does
/// not provide an `[aliases]` section
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("angry", "anger"),
    ("mad", "anger"),
    ("joy", "happy"),
    ("super", "happy"),
    ("fearful", "fear"),
    ("scared", "fear"),
    ("sadness", "sad"),
    ("disgust", "disgust"),
    ("surprise", "surprise"),
    ("neutral", "neutral"),
];

static DEFAULT_TABLE: Lazy<AliasTable> = Lazy::new(AliasTable::default);

/// Normalize a label with the default alias table
pub fn normalize(raw: &str) -> String {
    DEFAULT_TABLE.normalize(raw)
}

fn clean(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Alias → canonical label mapping
///
/// Every entry is stored fully resolved: if the configured target of an alias
/// is itself an alias, the entry points at the end of the chain. This keeps
/// [`AliasTable::normalize`] idempotent for any accepted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(alias, target)| (alias.to_string(), target.to_string()))
            .collect();
        Self { aliases }
    }
}

impl AliasTable {
    /// Build a table from `(alias, target)` pairs
    ///
    /// Keys and targets are trimmed and lowercased. Empty entries and alias
    /// cycles are rejected.
    pub fn new<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = BTreeMap::new();
        for (alias, target) in pairs {
            let alias = clean(alias.as_ref());
            let target = clean(target.as_ref());
            if alias.is_empty() || target.is_empty() {
                return Err(Error::Config(format!(
                    "Empty alias entry: '{}' -> '{}'",
                    alias, target
                )));
            }
            raw.insert(alias, target);
        }

        let mut aliases = BTreeMap::new();
        for (alias, target) in &raw {
            aliases.insert(alias.clone(), resolve_chain(&raw, alias, target)?);
        }

        Ok(Self { aliases })
    }

    /// Trim, lowercase, then map through the alias table
    ///
    /// Unmapped labels pass through in their trimmed/lowercased form.
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned = clean(raw);
        match self.aliases.get(&cleaned) {
            Some(target) => target.clone(),
            None => cleaned,
        }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterate over `(alias, canonical)` pairs in alias order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Distinct canonical labels the table maps onto
    pub fn canonical_labels(&self) -> BTreeSet<&str> {
        self.aliases.values().map(String::as_str).collect()
    }

    /// Cross-check the table against the classifier's label set and the
    /// catalog's emotion tags
    pub fn validate_against(
        &self,
        classifier_labels: &[String],
        catalog_emotions: &BTreeSet<String>,
    ) -> AliasReport {
        let produced: BTreeSet<String> = classifier_labels
            .iter()
            .map(|label| self.normalize(label))
            .collect();

        // Without a label set (no model loaded) every target would look unreachable
        let unreachable_targets = if classifier_labels.is_empty() {
            Vec::new()
        } else {
            self.aliases
                .iter()
                .filter(|(_, target)| !produced.contains(*target))
                .map(|(alias, target)| (alias.clone(), target.clone()))
                .collect()
        };

        let unmatched_labels = classifier_labels
            .iter()
            .map(|label| (label.clone(), self.normalize(label)))
            .filter(|(_, normalized)| !catalog_emotions.contains(normalized))
            .collect();

        AliasReport {
            unreachable_targets,
            unmatched_labels,
        }
    }
}

fn resolve_chain(raw: &BTreeMap<String, String>, alias: &str, target: &str) -> Result<String> {
    let mut seen = BTreeSet::new();
    seen.insert(alias.to_string());
    let mut current = target.to_string();
    while let Some(next) = raw.get(&current) {
        if *next == current {
            break;
        }
        if !seen.insert(current.clone()) {
            return Err(Error::Config(format!(
                "Alias cycle detected starting at '{}'",
                alias
            )));
        }
        current = next.clone();
    }
    Ok(current)
}

/// Findings of [`AliasTable::validate_against`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasReport {
    /// `(alias, target)` pairs whose target the classifier never produces
    pub unreachable_targets: Vec<(String, String)>,
    /// `(label, normalized)` classifier labels no catalog song is tagged with
    pub unmatched_labels: Vec<(String, String)>,
}

impl AliasReport {
    pub fn is_clean(&self) -> bool {
        self.unreachable_targets.is_empty() && self.unmatched_labels.is_empty()
    }
}
