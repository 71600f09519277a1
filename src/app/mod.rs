//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (styles, styled text, surface, settings, messages)
//! - `controllers/` - Orchestration (document session, formatting)
//! - `services/` - Business operations (persistence, RTF codec, text_ops)
//! - `infrastructure/` - External integrations (error, logging)
//! - `state.rs` - Main application coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::session::DocumentSession;
pub use domain::{AppSettings, Message, RichDocument, TextSurface};
pub use infrastructure::error::{AppError, Result};
