//! Shared utility modules used across Lexipath components.

pub mod levenshtein;
