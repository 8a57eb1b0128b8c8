//! # MoodTunes Common Library
//!
//! Shared code for the MoodTunes service and tools including:
//! - Emotion label normalization (alias table)
//! - Song catalog loading and random selection
//! - Text emotion classifier (TF-IDF + logistic regression inference)
//! - Prediction log storage
//! - Configuration loading

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod db;
pub mod emotion;
pub mod error;

pub use catalog::{Song, SongCatalog, SongSelector};
pub use classifier::{Classification, EmotionClassifier, UNKNOWN_EMOTION};
pub use emotion::AliasTable;
pub use error::{Error, Result};
