//! HTTP API handlers for moodtunes-server

pub mod catalog;
pub mod health;
pub mod predict;
pub mod stats;
pub mod ui;

pub use catalog::get_catalog_emotions;
pub use health::health_routes;
pub use predict::predict;
pub use stats::get_emotion_data;
pub use ui::{
    serve_chart, serve_chart_js, serve_feeling, serve_index, serve_script_js, serve_style_css,
};
