//! # Services
//!
//! Outbound collaborators of the controller.

pub mod description;

pub use description::{DescriptionGenerator, DisabledGenerator, GeminiGenerator, FALLBACK_DESCRIPTION};
