//! Storage demo: a fixed walk through the object storage operations

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// The fixed demo sequence
pub mod demo;

/// Environment configuration
pub mod types;
