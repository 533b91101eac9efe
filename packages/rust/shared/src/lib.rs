//! Shared types, error model, and configuration for pathfinder.
//!
//! This crate is the foundation depended on by all other pathfinder crates.
//! It provides:
//! - [`PathfinderError`]: the unified error type
//! - Domain types ([`RoadmapDocument`], [`Step`], [`ExtractionResult`], [`Provider`])
//! - Configuration ([`AppConfig`], the resolved runtime configs, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CodeHostProviderConfig, ExtractionConfig, GeneratorConfig, GeneratorSection,
    GithubSection, PipelineSection, SearchConfig, SearchSection, VideoProviderConfig,
    YoutubeSection, config_dir, config_file_path, init_config, load_config, load_config_from,
    validate_generator_key,
};
pub use error::{PathfinderError, Result};
pub use types::{
    ExtractedLink, ExtractionResult, LearningPath, LinkCard, Provider, ResourceBag, RoadmapDocument,
    Step,
};
