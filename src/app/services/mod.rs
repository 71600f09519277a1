//! Services layer - business operations and utilities.
//!
//! - Persistence: load/save dispatch by file extension
//! - RTF codec
//! - Text operations
//! - File dialog filters

pub mod file_filters;
pub mod persistence;
pub mod rtf;
pub mod text_ops;
