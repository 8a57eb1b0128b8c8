//! Text emotion classification
//!
//! The classifier is loaded once at startup. Request handlers never see a
//! classifier failure: [`Classification`] turns it into the `"unknown"`
//! sentinel label.

mod tfidf;

pub use tfidf::{tokenize, TfidfLogisticModel};

use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Label reported when no prediction could be made
pub const UNKNOWN_EMOTION: &str = "unknown";

/// Predicts an emotion label for a piece of text
pub trait EmotionClassifier: Send + Sync {
    /// Predict the raw (not yet normalized) label for `text`
    fn classify(&self, text: &str) -> Result<String>;

    /// Every label this classifier can produce
    fn labels(&self) -> &[String];
}

/// Outcome of a classification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Predicted(String),
    /// Classifier unavailable or failed; the request continues with the
    /// sentinel label
    Degraded,
}

impl Classification {
    /// Run the classifier, absorbing any failure
    pub fn of(classifier: &dyn EmotionClassifier, text: &str) -> Self {
        Self::from_result(classifier.classify(text))
    }

    pub fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(label) => Classification::Predicted(label),
            Err(e) => {
                error!("Emotion prediction failed: {}", e);
                Classification::Degraded
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Classification::Predicted(label) => label,
            Classification::Degraded => UNKNOWN_EMOTION,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Classification::Degraded)
    }
}

/// Stand-in used when no model artifact could be loaded
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClassifier;

impl EmotionClassifier for UnavailableClassifier {
    fn classify(&self, _text: &str) -> Result<String> {
        Err(Error::Classifier("model not loaded".to_string()))
    }

    fn labels(&self) -> &[String] {
        &[]
    }
}

/// Load the model artifact at `path`
///
/// Returns `None` (after logging why) when the artifact is missing or
/// invalid; callers substitute [`UnavailableClassifier`].
pub fn load_classifier(path: &Path) -> Option<Arc<dyn EmotionClassifier>> {
    if !path.exists() {
        warn!(
            "Model artifact {} not found, predictions will fall back to '{}'",
            path.display(),
            UNKNOWN_EMOTION
        );
        return None;
    }

    match TfidfLogisticModel::load(path) {
        Ok(model) => {
            info!(
                "Loaded emotion model from {} ({} labels, {} features)",
                path.display(),
                model.labels().len(),
                model.feature_count()
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            error!("Could not load model artifact {}: {}", path.display(), e);
            None
        }
    }
}

/// [`load_classifier`] with the fallback applied
pub fn load_classifier_or_unavailable(path: &Path) -> Arc<dyn EmotionClassifier> {
    load_classifier(path).unwrap_or_else(|| Arc::new(UnavailableClassifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_classifier_degrades() {
        let classification = Classification::of(&UnavailableClassifier, "I am so happy today!");
        assert!(classification.is_degraded());
        assert_eq!(classification.label(), "unknown");
    }

    #[test]
    fn test_predicted_label_passes_through() {
        let classification = Classification::from_result(Ok("joy".to_string()));
        assert_eq!(classification, Classification::Predicted("joy".to_string()));
        assert_eq!(classification.label(), "joy");
    }

    #[test]
    fn test_missing_artifact_falls_back() {
        let path = Path::new("/nonexistent/moodtunes/model.json");
        assert!(load_classifier(path).is_none());

        let classifier = load_classifier_or_unavailable(path);
        assert!(classifier.labels().is_empty());
        assert!(classifier.classify("anything").is_err());
    }

    #[test]
    fn test_invalid_artifact_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(load_classifier(&path).is_none());
    }
}
