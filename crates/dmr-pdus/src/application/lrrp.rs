use core::fmt;

use dmr_core::{BitBuffer, PduParseErr};

/// LRRP packet types
/// Bits: 8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LrrpPacketType {
    ImmediateLocationRequest,
    ImmediateLocationResponse,
    TriggeredLocationStartRequest,
    TriggeredLocationStartResponse,
    TriggeredLocationData,
    TriggeredLocationStopRequest,
    TriggeredLocationStopResponse,
    Other(u8),
}

impl LrrpPacketType {
    pub fn from_raw(x: u8) -> Self {
        match x {
            0x04 => LrrpPacketType::ImmediateLocationRequest,
            0x05 => LrrpPacketType::ImmediateLocationResponse,
            0x09 => LrrpPacketType::TriggeredLocationStartRequest,
            0x0A => LrrpPacketType::TriggeredLocationStartResponse,
            0x0B => LrrpPacketType::TriggeredLocationData,
            0x0F => LrrpPacketType::TriggeredLocationStopRequest,
            0x10 => LrrpPacketType::TriggeredLocationStopResponse,
            _ => LrrpPacketType::Other(x),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LrrpHeader {
    pub packet_type: LrrpPacketType,
    /// Octets of token data following the header
    pub message_length: u8,
}

impl LrrpHeader {
    pub fn from_bitbuf(buf: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let packet_type = LrrpPacketType::from_raw(buf.read_field(8, "packet_type")? as u8);
        let message_length = buf.read_field(8, "message_length")? as u8;
        Ok(LrrpHeader { packet_type, message_length })
    }
}

/// Reassembled location request/response packet. Tokens are not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrrpPacket {
    pub header: Option<LrrpHeader>,
    pub bits: BitBuffer,
}

impl LrrpPacket {
    pub fn new(mut bits: BitBuffer) -> Self {
        bits.seek(0);
        let header = LrrpHeader::from_bitbuf(&mut bits).ok();
        bits.seek(0);
        LrrpPacket { header, bits }
    }

    /// Token octets following the header, as far as present
    pub fn token_bits(&self) -> Option<BitBuffer> {
        let h = self.header?;
        let available = self.bits.get_len().saturating_sub(16);
        let len = usize::min(h.message_length as usize * 8, available);
        self.bits.slice(16, len)
    }
}

impl fmt::Display for LrrpPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.header {
            Some(h) => write!(f, "LRRP {:?} len: {}", h.packet_type, h.message_length),
            None => write!(f, "LRRP [truncated] {}", self.bits.dump_hex()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lrrp_header_and_tokens() {
        let pkt = LrrpPacket::new(BitBuffer::from_bytes(&[0x0B, 0x03, 0x22, 0x03, 0x01, 0xFF]));
        let h = pkt.header.unwrap();
        assert_eq!(h.packet_type, LrrpPacketType::TriggeredLocationData);
        assert_eq!(h.message_length, 3);
        assert_eq!(pkt.token_bits().unwrap().dump_hex(), "220301");
    }
}
