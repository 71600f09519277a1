//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Character styles and the uniform/mixed selection result
//! - The styled text model and the in-memory text surface
//! - Dialog and settings types
//! - Message types for the event system

pub mod document;
pub mod messages;
pub mod prompts;
pub mod rich_text;
pub mod settings;
pub mod style;
pub mod surface;

pub use document::RichDocument;
pub use messages::Message;
pub use prompts::{Prompter, UnsavedChoice};
pub use rich_text::{Run, StyledText};
pub use settings::AppSettings;
pub use style::{CharStyle, Effective, FontSize, FontSpec, Rgb, StyleBit, StyleFlags};
pub use surface::{ModifyEvent, Selection, TextSurface};
