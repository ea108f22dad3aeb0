use core::fmt;

use dmr_core::{BitBuffer, Timeslot};
use dmr_pdus::application::ApplicationPayload;
use dmr_pdus::enums::application_type::ApplicationType;
use dmr_pdus::pdus::data_block::DataBlock;
use dmr_pdus::pdus::data_header::{PacketSequenceHeader, ProprietaryDataHeader};

/// Header and data blocks of one packet transfer on one timeslot, in arrival order
#[derive(Debug, Clone)]
pub struct PacketSequence {
    timeslot: Timeslot,
    /// Stream time of the primary header in ms
    timestamp: u64,
    header: PacketSequenceHeader,
    proprietary: Option<ProprietaryDataHeader>,
    blocks: Vec<DataBlock>,
}

impl PacketSequence {
    pub fn new(timeslot: Timeslot, timestamp: u64, header: PacketSequenceHeader) -> Self {
        Self {
            timeslot,
            timestamp,
            header,
            proprietary: None,
            blocks: Vec::new(),
        }
    }

    pub fn timeslot(&self) -> Timeslot {
        self.timeslot
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn header(&self) -> &PacketSequenceHeader {
        &self.header
    }

    pub fn proprietary_header(&self) -> Option<&ProprietaryDataHeader> {
        self.proprietary.as_ref()
    }

    pub fn blocks(&self) -> &[DataBlock] {
        &self.blocks
    }

    pub fn is_confirmed(&self) -> bool {
        self.header.confirmed
    }

    /// Returns false, keeping the first one, if a proprietary header was already attached
    pub fn set_proprietary_header(&mut self, header: ProprietaryDataHeader) -> bool {
        if self.proprietary.is_some() {
            return false;
        }
        self.proprietary = Some(header);
        true
    }

    pub fn add_data_block(&mut self, block: DataBlock) {
        self.blocks.push(block);
    }

    /// Data blocks still to come. A proprietary header counts as one of the announced blocks.
    pub fn expected_blocks(&self) -> usize {
        let announced = self.header.blocks_to_follow as usize;
        if self.proprietary.is_some() {
            announced.saturating_sub(1)
        } else {
            announced
        }
    }

    pub fn is_complete(&self) -> bool {
        self.blocks.len() >= self.expected_blocks()
    }

    /// Bits the assembled packet will have
    pub fn payload_len(&self) -> usize {
        let prefix = self.packet_prefix().map_or(0, |p| p.get_len());
        let confirmed = self.is_confirmed();
        prefix + self.blocks.iter().map(|b| b.payload_len(confirmed)).sum::<usize>()
    }

    pub fn packet_prefix(&self) -> Option<&BitBuffer> {
        self.proprietary.as_ref()?.packet_prefix()
    }

    pub fn application_type(&self) -> Option<ApplicationType> {
        self.proprietary.as_ref()?.application_type()
    }
}

/// Reassembled packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmrPacket {
    pub payload: BitBuffer,
    pub header: PacketSequenceHeader,
    pub timeslot: Timeslot,
    pub timestamp: u64,
    pub application_type: Option<ApplicationType>,
    /// Decoded application header for known MNIS application types
    pub application: Option<ApplicationPayload>,
}

impl fmt::Display for DmrPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TS{} PACKET {} [{} bits]", self.timeslot, self.header, self.payload.get_len())?;
        if let Some(app) = &self.application {
            write!(f, " {}", app)?;
        } else if let Some(t) = self.application_type {
            write!(f, " {}", t)?;
        }
        write!(f, " {}", self.payload.dump_hex())
    }
}
