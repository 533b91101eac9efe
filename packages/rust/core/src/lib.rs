//! Orchestration for pathfinder.
//!
//! - [`pipeline`]: scan a roadmap for links and validate them against their providers
//! - [`generator`]: draft a roadmap for a topic with an LLM
//! - [`learning_path`]: generate, enrich with search results, then extract

pub mod generator;
pub mod learning_path;
pub mod pipeline;

pub use generator::{GeminiGenerator, RoadmapGenerator, parse_roadmap_response};
pub use learning_path::{LearningPathBuilder, validate_topic};
pub use pipeline::{Extractor, Rejection, Verdict};
