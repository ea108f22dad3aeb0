use core::fmt;

use dmr_core::{SyncPattern, Timeslot};

use crate::enums::data_type::DataType;
use crate::fields::slot_type::SlotType;
use crate::pdus::csbk::Csbk;
use crate::pdus::data_block::DataBlock;
use crate::pdus::data_header::DataHeader;

/// Where and when a burst was received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstInfo {
    pub pattern: SyncPattern,
    /// 1 or 2, 0 when unknown
    pub timeslot: Timeslot,
    /// Stream time in milliseconds
    pub timestamp: u64,
    pub slot_type: SlotType,
}

/// Decoded content of one data-sync burst
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DmrMessage {
    Csbk(BurstInfo, Csbk),
    DataHeader(BurstInfo, DataHeader),
    DataBlock(BurstInfo, DataBlock),
    Idle(BurstInfo),
    Unsupported(BurstInfo, DataType),
}

impl DmrMessage {
    pub fn info(&self) -> &BurstInfo {
        match self {
            DmrMessage::Csbk(info, _)
            | DmrMessage::DataHeader(info, _)
            | DmrMessage::DataBlock(info, _)
            | DmrMessage::Idle(info)
            | DmrMessage::Unsupported(info, _) => info,
        }
    }

    pub fn timeslot(&self) -> Timeslot {
        self.info().timeslot
    }

    pub fn timestamp(&self) -> u64 {
        self.info().timestamp
    }

    /// False only for CRC-protected content whose checksum could not be repaired
    pub fn is_valid(&self) -> bool {
        match self {
            DmrMessage::Csbk(_, csbk) => csbk.is_valid(),
            DmrMessage::DataHeader(_, hdr) => hdr.is_valid(),
            _ => true,
        }
    }
}

impl fmt::Display for DmrMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.info();
        write!(f, "TS{} {} ", info.timeslot, info.slot_type)?;
        match self {
            DmrMessage::Csbk(_, csbk) => write!(f, "{}", csbk),
            DmrMessage::DataHeader(_, hdr) => write!(f, "{}", hdr),
            DmrMessage::DataBlock(_, block) => write!(f, "{}", block),
            DmrMessage::Idle(_) => write!(f, "Idle"),
            DmrMessage::Unsupported(_, data_type) => write!(f, "Unsupported {{ {} }}", data_type),
        }
    }
}
