//! TF-IDF + logistic regression inference
//!
//! Evaluates a text classification pipeline exported from scikit-learn
//! (`TfidfVectorizer` followed by `LogisticRegression`) as JSON. Only
//! inference is implemented; the artifact is produced by an offline training
//! job.

use super::EmotionClassifier;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_lowercase() -> bool {
    true
}

/// Serialized vectorizer vocabulary + classifier weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfLogisticModel {
    /// Class labels, indexed like the rows of `coef`
    classes: Vec<String>,
    /// Term → feature column
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature column
    idf: Vec<f64>,
    /// One row per class (a single row for binary models)
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    stop_words: HashSet<String>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default)]
    sublinear_tf: bool,
}

/// Split text into word tokens of two or more word characters
///
/// Matches the default `TfidfVectorizer` token pattern: word characters are
/// alphanumerics and `_`.
pub fn tokenize(text: &str, lowercase: bool) -> Vec<String> {
    let text = if lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

impl TfidfLogisticModel {
    /// Read and validate a JSON artifact
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        let features = self.idf.len();

        if self.classes.len() < 2 {
            return Err(Error::Classifier(format!(
                "expected at least 2 classes, found {}",
                self.classes.len()
            )));
        }
        if self.vocabulary.len() != features {
            return Err(Error::Classifier(format!(
                "vocabulary has {} terms but idf has {} entries",
                self.vocabulary.len(),
                features
            )));
        }
        if let Some((term, index)) = self.vocabulary.iter().find(|(_, i)| **i >= features) {
            return Err(Error::Classifier(format!(
                "term '{}' maps to feature {} outside 0..{}",
                term, index, features
            )));
        }

        let expected_rows = if self.classes.len() == 2 && self.coef.len() == 1 {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != expected_rows {
            return Err(Error::Classifier(format!(
                "coef has {} rows for {} classes",
                self.coef.len(),
                self.classes.len()
            )));
        }
        if let Some(row) = self.coef.iter().position(|r| r.len() != features) {
            return Err(Error::Classifier(format!(
                "coef row {} has {} columns, expected {}",
                row,
                self.coef[row].len(),
                features
            )));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(Error::Classifier(format!(
                "intercept has {} entries for {} coef rows",
                self.intercept.len(),
                self.coef.len()
            )));
        }

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::Classifier(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        Ok(())
    }

    pub fn feature_count(&self) -> usize {
        self.idf.len()
    }

    /// Word n-grams after stop word removal
    fn terms(&self, text: &str) -> Vec<String> {
        let tokens: Vec<String> = tokenize(text, self.lowercase)
            .into_iter()
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Sparse, L2-normalized TF-IDF vector as `(feature, weight)` pairs
    pub fn vectorize(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.terms(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
                (index, tf * self.idf[index])
            })
            .collect();
        weights.sort_by_key(|(index, _)| *index);

        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in weights.iter_mut() {
                *w /= norm;
            }
        }
        weights
    }

    /// Raw per-row scores (`coef · x + intercept`)
    pub fn decision_function(&self, text: &str) -> Vec<f64> {
        let x = self.vectorize(text);
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| bias + x.iter().map(|(i, w)| row[*i] * w).sum::<f64>())
            .collect()
    }

    /// Class probabilities, in `classes` order
    pub fn probabilities(&self, text: &str) -> Vec<(String, f64)> {
        let scores = self.decision_function(text);
        let probs = if scores.len() == 1 {
            let positive = 1.0 / (1.0 + (-scores[0]).exp());
            vec![1.0 - positive, positive]
        } else {
            let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
            let total: f64 = exps.iter().sum();
            exps.into_iter().map(|e| e / total).collect()
        };
        self.classes.iter().cloned().zip(probs).collect()
    }

    /// Most likely class label
    pub fn predict(&self, text: &str) -> Result<String> {
        let scores = self.decision_function(text);
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(Error::Classifier("non-finite decision score".to_string()));
        }

        let best = if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            // First maximum wins ties
            let mut best = 0;
            for (i, score) in scores.iter().enumerate() {
                if *score > scores[best] {
                    best = i;
                }
            }
            best
        };

        self.classes
            .get(best)
            .cloned()
            .ok_or_else(|| Error::Classifier(format!("no class at index {}", best)))
    }
}

impl EmotionClassifier for TfidfLogisticModel {
    fn classify(&self, text: &str) -> Result<String> {
        self.predict(text)
    }

    fn labels(&self) -> &[String] {
        &self.classes
    }
}
