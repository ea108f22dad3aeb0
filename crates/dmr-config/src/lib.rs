//! DMR decoder configuration management
//!
//! This crate provides configuration loading and parsing for the decoder:
//! - TOML configuration file parsing
//! - Decoder configuration structures and validation

pub mod decoder_config;
pub mod toml_config;

pub use decoder_config::*;
pub use toml_config::*;
