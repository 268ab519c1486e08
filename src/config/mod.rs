//! Configuration module

mod build;

pub use build::{BuildConfig, CollectionPatterns, HighlightConfig, OutputConfig};
