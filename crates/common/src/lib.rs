//! Shared configuration for the pyramid viewer.
//!
//! # Invariants
//! - A config that passed `validate` never yields a degenerate projection.

pub mod config;

pub use config::{
    CameraConfig, ConfigError, ProjectionConfig, SceneConfig, ViewerConfig, WindowConfig,
};
