//! Password utilities.
//!
//! This module provides:
//! - Random password generation with per-class coverage (`generate`)
//! - Advisory strength scoring (`strength`)

pub mod generate;
pub mod strength;

pub use generate::{generate, GenerateOptions, MAX_LENGTH, MIN_LENGTH};
pub use strength::{check_strength, StrengthLevel, StrengthReport};
