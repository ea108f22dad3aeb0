use core::fmt;

use dmr_core::{BitBuffer, PduParseErr};

/// ARS PDU types
/// Bits: 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArsPduType {
    DeviceRegistration,
    DeviceDeregistration,
    QueryRequest,
    UserRegistration,
    UserDeregistration,
    UserRegistrationAcknowledge,
    RegistrationAcknowledge,
    Other(u8),
}

impl ArsPduType {
    pub fn from_raw(x: u8) -> Self {
        match x {
            0x0 => ArsPduType::DeviceRegistration,
            0x1 => ArsPduType::DeviceDeregistration,
            0x4 => ArsPduType::QueryRequest,
            0x5 => ArsPduType::UserRegistration,
            0x6 => ArsPduType::UserDeregistration,
            0x7 => ArsPduType::UserRegistrationAcknowledge,
            0xF => ArsPduType::RegistrationAcknowledge,
            _ => ArsPduType::Other(x),
        }
    }
}

/// Automatic registration service header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArsHeader {
    /// Octets following the length field
    pub message_length: u16,
    pub extension: bool,
    pub acknowledge: bool,
    pub priority: bool,
    pub pdu_type: ArsPduType,
}

impl ArsHeader {
    pub fn from_bitbuf(buf: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let message_length = buf.read_field(16, "message_length")? as u16;
        let extension = buf.read_flag("extension")?;
        let acknowledge = buf.read_flag("acknowledge")?;
        let priority = buf.read_flag("priority")?;
        let _reserved = buf.read_field(1, "reserved")?;
        let pdu_type = ArsPduType::from_raw(buf.read_field(4, "pdu_type")? as u8);
        Ok(ArsHeader { message_length, extension, acknowledge, priority, pdu_type })
    }
}

/// Reassembled ARS packet. Only the header is decoded; the body stays raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArsPacket {
    pub header: Option<ArsHeader>,
    pub bits: BitBuffer,
}

impl ArsPacket {
    pub fn new(mut bits: BitBuffer) -> Self {
        bits.seek(0);
        let header = match ArsHeader::from_bitbuf(&mut bits) {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::debug!("ARS packet of {} bits too short for header: {:?}", bits.get_len(), e);
                None
            }
        };
        bits.seek(0);
        ArsPacket { header, bits }
    }
}

impl fmt::Display for ArsPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.header {
            Some(h) => write!(f, "ARS {:?} len: {}{}", h.pdu_type, h.message_length, if h.acknowledge { " ACK" } else { "" }),
            None => write!(f, "ARS [truncated] {}", self.bits.dump_hex()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ars_header() {
        // length 0x000B, ext=1 ack=1 prio=0, device registration
        let pkt = ArsPacket::new(BitBuffer::from_bytes(&[0x00, 0x0B, 0xC0, 0x01, 0x02]));
        let h = pkt.header.unwrap();
        assert_eq!(h.message_length, 11);
        assert!(h.extension);
        assert!(h.acknowledge);
        assert!(!h.priority);
        assert_eq!(h.pdu_type, ArsPduType::DeviceRegistration);
        assert_eq!(pkt.bits.get_pos(), 0);
    }

    #[test]
    fn test_short_ars_packet() {
        let pkt = ArsPacket::new(BitBuffer::from_bytes(&[0x00, 0x0B]));
        assert!(pkt.header.is_none());
    }
}
