//! Questions and their runtime state
//!
//! This module contains the question bank configuration, the media a
//! question can reference, the per-activation question state and the staged
//! reveal that paces it.

pub mod config;
pub mod media;
pub mod question;
pub mod reveal;
