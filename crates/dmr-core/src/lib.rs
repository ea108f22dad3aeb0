//! Core utilities for the DMR burst decoder
//!
//! This crate provides fundamental types and utilities used across the decoder:
//! - BitBuffer for bit-level burst and PDU manipulation
//! - Dibit symbols, burst geometry and the sync pattern table
//! - Error detection and correction (CRC-CCITT, BPTC(196,96))
//! - Common macros and debug utilities

pub mod bitbuffer;
pub mod burst_consts;
pub mod debug;
pub mod dibit;
pub mod edac;
pub mod pdu_parse_error;
pub mod sync_pattern;

// Re-export commonly used items
pub use bitbuffer::BitBuffer;
pub use dibit::Dibit;
pub use pdu_parse_error::PduParseErr;
pub use sync_pattern::{DataSource, PhaseHypothesis, SyncCategory, SyncPattern, SYNC_PATTERNS};

/// DMR timeslot as reported with decoded messages. 0 when it could not be determined.
pub type Timeslot = u8;
