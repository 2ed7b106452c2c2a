//! # Toolbench Core
//!
//! Core types for Toolbench: the tool and shape model, the tool
//! database, storage serializers, feeds and speeds, and the error types
//! shared by every other crate.

pub mod data;
pub mod error;
pub mod serializer;
pub mod types;
pub mod units;

pub use data::{
    FeedsCalculator, FeedsResult, ParamValue, ShapeKind, SpindleLimits, Tool, ToolDb, ToolId,
    ToolLibrary, ToolMaterial, ToolShape, WorkMaterial,
};

pub use error::{Error, LibraryError, Result, SerializerError, ToolError};

pub use serializer::{FcSerializer, ToolSerializer};

// Re-export type aliases for convenience
pub use types::{shared, Shared, UiHandler};

pub use units::MeasurementSystem;
