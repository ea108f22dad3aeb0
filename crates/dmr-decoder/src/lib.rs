//! Stateful DMR stream processing
//!
//! - `sync`: sync correlator and burst delay line
//! - `detector`: symbol-by-symbol burst detection feeding a listener
//! - `packet`: reassembly of data headers and blocks into packets

pub mod detector;
pub mod error;
pub mod listener;
pub mod packet;
pub mod sync;

pub use detector::DataUnitDetector;
pub use error::DecoderError;
pub use listener::{ChannelListener, DataUnitListener, DetectorEvent};
pub use packet::assembler::PacketSequenceAssembler;
pub use packet::sequence::{DmrPacket, PacketSequence};
