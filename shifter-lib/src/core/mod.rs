//! Core algorithms and data structures.

pub mod config;
pub mod credentials;
pub mod effects;
pub mod export;
pub mod formatting;
pub mod scratch;
pub mod session;
