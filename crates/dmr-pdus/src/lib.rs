//! DMR protocol data units
//!
//! Typed views over BPTC-decoded burst content:
//! - Slot type and CACH fields
//! - Control signalling blocks, data headers and data blocks
//! - `DmrMessage` and the factory turning a framed burst into one
//! - Application header decoders for packets reassembled from data blocks

pub mod application;
pub mod enums;
pub mod fields;
pub mod message;
pub mod message_factory;
pub mod pdus;

pub use message::{BurstInfo, DmrMessage};
