pub mod columns;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod pipeline;

// Engine surface consumed by the transport layer
pub use config::{default_config, Dimension, DimensionConfig, EngineConfig};
pub use error::{EngineError, Result, RowError, RowErrorKind};
pub use pipeline::{process, validate_and_enrich, BatchOutcome, StatisticsBundle};
