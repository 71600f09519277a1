//! Controllers layer - orchestration and coordination.
//!
//! - Document session: path, dirty tracking, new/open/save guards
//! - Formatting: style, size, colour and bullet changes over a selection

pub mod formatting;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
