use std::collections::HashMap;

use dmr_core::{BitBuffer, Timeslot, assert_warn};
use dmr_pdus::DmrMessage;
use dmr_pdus::application::ApplicationPayload;
use dmr_pdus::application::ars::ArsPacket;
use dmr_pdus::application::lrrp::LrrpPacket;
use dmr_pdus::enums::application_type::ApplicationType;
use dmr_pdus::pdus::data_header::DataHeaderContent;

use super::sequence::{DmrPacket, PacketSequence};

/// Collects data headers and blocks into packet sequences, one open sequence per timeslot.
/// Completion is by block count only, data blocks carry no end marker.
pub struct PacketSequenceAssembler {
    sequences: HashMap<Timeslot, PacketSequence>,
    evicted: usize,
}

impl Default for PacketSequenceAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketSequenceAssembler {
    pub fn new() -> Self {
        Self {
            sequences: HashMap::new(),
            evicted: 0,
        }
    }

    /// Incomplete sequences dropped because a new header arrived first
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    pub fn open_sequences(&self) -> usize {
        self.sequences.len()
    }

    pub fn reset(&mut self) {
        self.sequences.clear();
    }

    /// Feeds one decoded message. Returns a packet when it completes a sequence.
    pub fn receive(&mut self, message: DmrMessage) -> Option<DmrPacket> {
        let ts = message.timeslot();
        match message {
            DmrMessage::DataHeader(info, header) => {
                if !header.is_valid() {
                    tracing::debug!(t = info.timestamp, "ts {} ignoring data header with failed crc", ts);
                    return None;
                }
                match header.content {
                    DataHeaderContent::PacketSequence(h) => {
                        if let Some(old) = self.sequences.remove(&ts) {
                            self.evicted += 1;
                            tracing::warn!(
                                t = info.timestamp,
                                "ts {} sequence from {} with {}/{} blocks superseded by new header",
                                ts, old.header().source_llid, old.blocks().len(), old.expected_blocks()
                            );
                        }
                        tracing::debug!(t = info.timestamp, "ts {} new sequence {}", ts, h);
                        self.sequences.insert(ts, PacketSequence::new(ts, info.timestamp, h));
                    }
                    DataHeaderContent::Proprietary(p) => {
                        let Some(seq) = self.sequences.get_mut(&ts) else {
                            tracing::debug!(t = info.timestamp, "ts {} proprietary header without sequence", ts);
                            return None;
                        };
                        if !seq.set_proprietary_header(p) {
                            tracing::warn!(t = info.timestamp, "ts {} second proprietary header ignored", ts);
                        }
                    }
                    DataHeaderContent::Other { format, .. } => {
                        tracing::debug!(t = info.timestamp, "ts {} {} header does not start a sequence", ts, format);
                        return None;
                    }
                }
            }
            DmrMessage::DataBlock(info, block) => {
                let Some(seq) = self.sequences.get_mut(&ts) else {
                    tracing::debug!(t = info.timestamp, "ts {} orphan data block dropped", ts);
                    return None;
                };
                seq.add_data_block(block);
            }
            _ => return None,
        }
        self.take_if_complete(ts)
    }

    fn take_if_complete(&mut self, ts: Timeslot) -> Option<DmrPacket> {
        if !self.sequences.get(&ts)?.is_complete() {
            return None;
        }
        let seq = self.sequences.remove(&ts)?;
        let packet = Self::create(&seq);
        match &packet {
            Some(p) => tracing::info!(t = p.timestamp, "{}", p),
            None => tracing::debug!(t = seq.timestamp(), "ts {} sequence complete without payload", ts),
        }
        packet
    }

    /// Concatenates prefix and block payloads of a complete sequence.
    /// None if the sequence is incomplete or carries no payload bits.
    pub fn create(seq: &PacketSequence) -> Option<DmrPacket> {
        if !seq.is_complete() {
            return None;
        }
        let total = seq.payload_len();
        if total == 0 {
            return None;
        }

        let payload = Self::concatenate(seq, total);
        let application_type = seq.application_type();
        let application = match application_type {
            Some(ApplicationType::Ars) => Some(ApplicationPayload::Ars(ArsPacket::new(payload.clone()))),
            Some(ApplicationType::Lrrp) => Some(ApplicationPayload::Lrrp(LrrpPacket::new(payload.clone()))),
            _ => None,
        };

        Some(DmrPacket {
            payload,
            header: seq.header().clone(),
            timeslot: seq.timeslot(),
            timestamp: seq.timestamp(),
            application_type,
            application,
        })
    }

    fn concatenate(seq: &PacketSequence, total: usize) -> BitBuffer {
        let confirmed = seq.is_confirmed();
        let mut fragments: Vec<BitBuffer> = Vec::with_capacity(seq.blocks().len() + 1);
        if let Some(prefix) = seq.packet_prefix() {
            fragments.push(prefix.clone());
        }
        for block in seq.blocks() {
            fragments.push(if confirmed { block.confirmed_payload() } else { block.unconfirmed_payload() });
        }

        let mut packet = BitBuffer::new(total);
        for mut fragment in fragments {
            fragment.seek(0);
            let len = fragment.get_len();
            let room = packet.get_len_remaining();
            if len > room {
                tracing::error!("packet buffer full, dropping {} of {} fragment bits", len - room, len);
                packet.copy_bits(&mut fragment, room);
                break;
            }
            packet.copy_bits(&mut fragment, len);
        }
        assert_warn!(packet.get_len_remaining() == 0, "{} packet bits left unfilled", packet.get_len_remaining());
        packet.seek(0);
        packet
    }
}
