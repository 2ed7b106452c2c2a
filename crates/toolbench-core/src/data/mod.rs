//! Data models for tools and tool libraries
//!
//! This module provides:
//! - Tool shapes and their geometric parameters
//! - Tool definitions with cutting properties and supplier metadata
//! - The tool database with numbered libraries
//! - Work-piece materials and the feeds and speeds calculator

pub mod db;
pub mod feeds;
pub mod materials;
pub mod shape;
pub mod tool;

pub use db::{ToolDb, ToolLibrary};
pub use feeds::{FeedsCalculator, FeedsResult, SpindleLimits};
pub use materials::{standard_materials, MaterialCategory, MaterialId, WorkMaterial};
pub use shape::{param_label, ParamValue, ShapeKind, ShapeParam, ToolShape};
pub use tool::{Tool, ToolId, ToolMaterial};
