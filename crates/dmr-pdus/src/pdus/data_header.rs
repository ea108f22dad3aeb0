use core::fmt;

use dmr_core::edac::bptc::BPTC_196_96_DATA_BITS;
use dmr_core::edac::crc16::{self, CRC_MASK_DATA_HEADER, CRC_UNCORRECTABLE};
use dmr_core::{BitBuffer, PduParseErr, expect_len, let_field};

use crate::enums::application_type::ApplicationType;
use crate::enums::data_packet_format::DataPacketFormat;
use crate::enums::feature_set_id::FeatureSetId;

pub const DATA_HEADER_CRC_OFFSET: usize = 80;

/// Largest packet prefix an MNIS header can carry, in octets
pub const MNIS_MAX_PREFIX_OCTETS: usize = 6;

const DPF_OFFSET: usize = 4;

/// Header opening a confirmed or unconfirmed packet sequence, ETSI TS 102 361-1 clause 9.2.6.
/// Bit layout (96 bits): G/I(1) A(1) HC(1) POC msb(1) DPF(4) SAP(4) POC(4) DST(24) SRC(24)
/// F(1) BF(7) then S(1) N(S)(3) for confirmed data, FSN(4), CRC(16).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketSequenceHeader {
    pub confirmed: bool,
    /// Destination is a group
    pub group: bool,
    pub response_requested: bool,
    pub header_compression: bool,
    // 5, split over two fields
    pub pad_octet_count: u8,
    // 4
    pub sap_id: u8,
    // 24
    pub destination_llid: u32,
    // 24
    pub source_llid: u32,
    pub full_message: bool,
    // 7, includes any proprietary header that follows
    pub blocks_to_follow: u8,
    /// Confirmed only
    pub resynchronize: Option<bool>,
    /// Confirmed only, 3 bits
    pub send_sequence_number: Option<u8>,
    // 4
    pub fragment_sequence_number: u8,
}

/// Motorola network interface service header, the manufacturer content of a
/// proprietary header sent by Motorola equipment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MnisHeader {
    // 8
    pub application_type: ApplicationType,
    /// Declared prefix length in octets
    pub prefix_octets: u8,
    /// Packet prefix, None when the declared length exceeds the header
    pub prefix: Option<BitBuffer>,
}

/// Second header of a sequence, announced by DPF 15 (Proprietary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProprietaryDataHeader {
    // 4
    pub sap_id: u8,
    // 8
    pub manufacturer: FeatureSetId,
    /// Manufacturer specific bits 16..80
    pub content: u64,
    pub mnis: Option<MnisHeader>,
}

impl ProprietaryDataHeader {
    /// Bits that precede the data block payloads in the reassembled packet
    pub fn packet_prefix(&self) -> Option<&BitBuffer> {
        self.mnis.as_ref()?.prefix.as_ref()
    }

    pub fn application_type(&self) -> Option<ApplicationType> {
        self.mnis.as_ref().map(|m| m.application_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataHeaderContent {
    PacketSequence(PacketSequenceHeader),
    Proprietary(ProprietaryDataHeader),
    /// Response, short data, UDT and reserved formats; recognised but never start a sequence
    Other {
        format: DataPacketFormat,
        group: bool,
        response_requested: bool,
    },
}

/// Data header burst after BPTC decoding and CRC correction (mask 0xCCCC)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataHeader {
    pub content: DataHeaderContent,
    pub crc: u16,
    pub corrected_bits: usize,
}

impl DataHeader {
    pub fn from_block(mut block: BitBuffer) -> Result<Self, PduParseErr> {
        expect_len!(block, BPTC_196_96_DATA_BITS)?;
        let corrected_bits = crc16::correct_ccitt(&mut block, 0, DATA_HEADER_CRC_OFFSET, CRC_MASK_DATA_HEADER);
        block.seek(0);
        Self::from_bitbuf(&mut block, corrected_bits)
    }

    pub fn from_bitbuf(buf: &mut BitBuffer, corrected_bits: usize) -> Result<Self, PduParseErr> {
        let start = buf.get_pos();
        let dpf_raw = buf
            .peek_bits_startoffset(start + DPF_OFFSET, 4)
            .ok_or(PduParseErr::BufferEnded { field: Some("dpf") })?;
        let format = DataPacketFormat::try_from(dpf_raw)
            .map_err(|_| PduParseErr::InvalidValue { field: "dpf", value: dpf_raw })?;

        let content = match format {
            DataPacketFormat::Unconfirmed | DataPacketFormat::Confirmed => {
                DataHeaderContent::PacketSequence(parse_packet_sequence(buf, format == DataPacketFormat::Confirmed)?)
            }
            DataPacketFormat::Proprietary => DataHeaderContent::Proprietary(parse_proprietary(buf)?),
            _ => {
                let group = buf.read_flag("group")?;
                let response_requested = buf.read_flag("response_requested")?;
                buf.seek(start + DATA_HEADER_CRC_OFFSET);
                DataHeaderContent::Other { format, group, response_requested }
            }
        };

        let crc = buf.read_field(16, "crc")? as u16;
        Ok(DataHeader { content, crc, corrected_bits })
    }

    /// Serializes the header and appends a fresh checksum
    pub fn to_bitbuf(&self, buf: &mut BitBuffer) {
        let start = buf.get_pos();
        match &self.content {
            DataHeaderContent::PacketSequence(h) => write_packet_sequence(h, buf),
            DataHeaderContent::Proprietary(h) => write_proprietary(h, buf),
            DataHeaderContent::Other { format, group, response_requested } => {
                buf.write_bits(*group as u64, 1);
                buf.write_bits(*response_requested as u64, 1);
                buf.write_bits(0, 2);
                buf.write_bits(format.into_raw(), 4);
                buf.write_bits(0, 8);
                buf.write_bits(0, 64);
            }
        }
        crc16::write_ccitt(buf, start, start + DATA_HEADER_CRC_OFFSET, CRC_MASK_DATA_HEADER);
        buf.seek(start + BPTC_196_96_DATA_BITS);
    }

    pub fn is_valid(&self) -> bool {
        self.corrected_bits < CRC_UNCORRECTABLE
    }

    pub fn packet_sequence_header(&self) -> Option<&PacketSequenceHeader> {
        match &self.content {
            DataHeaderContent::PacketSequence(h) => Some(h),
            _ => None,
        }
    }

    pub fn proprietary_header(&self) -> Option<&ProprietaryDataHeader> {
        match &self.content {
            DataHeaderContent::Proprietary(h) => Some(h),
            _ => None,
        }
    }
}

fn parse_packet_sequence(buf: &mut BitBuffer, confirmed: bool) -> Result<PacketSequenceHeader, PduParseErr> {
    let group = buf.read_flag("group")?;
    let response_requested = buf.read_flag("response_requested")?;
    let header_compression = buf.read_flag("header_compression")?;
    let poc_msb = buf.read_field(1, "pad_octet_count_msb")? as u8;
    let _dpf = buf.read_field(4, "dpf")?;
    let sap_id = buf.read_field(4, "sap_id")? as u8;
    let poc = buf.read_field(4, "pad_octet_count")? as u8;
    let destination_llid = buf.read_field(24, "destination_llid")? as u32;
    let source_llid = buf.read_field(24, "source_llid")? as u32;
    let full_message = buf.read_flag("full_message")?;
    let blocks_to_follow = buf.read_field(7, "blocks_to_follow")? as u8;

    let (resynchronize, send_sequence_number) = if confirmed {
        let s = buf.read_flag("resynchronize")?;
        let ns = buf.read_field(3, "send_sequence_number")? as u8;
        (Some(s), Some(ns))
    } else {
        let _reserved = buf.read_field(4, "reserved")?;
        (None, None)
    };
    let fragment_sequence_number = buf.read_field(4, "fragment_sequence_number")? as u8;

    Ok(PacketSequenceHeader {
        confirmed,
        group,
        response_requested,
        header_compression,
        pad_octet_count: (poc_msb << 4) | poc,
        sap_id,
        destination_llid,
        source_llid,
        full_message,
        blocks_to_follow,
        resynchronize,
        send_sequence_number,
        fragment_sequence_number,
    })
}

fn write_packet_sequence(h: &PacketSequenceHeader, buf: &mut BitBuffer) {
    let dpf = if h.confirmed { DataPacketFormat::Confirmed } else { DataPacketFormat::Unconfirmed };
    buf.write_bits(h.group as u64, 1);
    buf.write_bits(h.response_requested as u64, 1);
    buf.write_bits(h.header_compression as u64, 1);
    buf.write_bits(((h.pad_octet_count >> 4) & 0x1) as u64, 1);
    buf.write_bits(dpf.into_raw(), 4);
    buf.write_bits(h.sap_id as u64, 4);
    buf.write_bits((h.pad_octet_count & 0xF) as u64, 4);
    buf.write_bits(h.destination_llid as u64, 24);
    buf.write_bits(h.source_llid as u64, 24);
    buf.write_bits(h.full_message as u64, 1);
    buf.write_bits(h.blocks_to_follow as u64, 7);
    buf.write_bits(h.resynchronize.unwrap_or(false) as u64, 1);
    buf.write_bits(h.send_sequence_number.unwrap_or(0) as u64, 3);
    buf.write_bits(h.fragment_sequence_number as u64, 4);
}

fn parse_proprietary(buf: &mut BitBuffer) -> Result<ProprietaryDataHeader, PduParseErr> {
    let sap_id = buf.read_field(4, "sap_id")? as u8;
    let _dpf = buf.read_field(4, "dpf")?;
    let manufacturer = FeatureSetId::from_raw(buf.read_field(8, "manufacturer")? as u8);
    let_field!(buf, content, 64);

    let mnis = if manufacturer == FeatureSetId::Motorola {
        let application_type = ApplicationType::from_raw((content >> 56) as u8);
        let prefix_octets = (content >> 48) as u8;
        let prefix = if prefix_octets as usize <= MNIS_MAX_PREFIX_OCTETS {
            let mut p = BitBuffer::new(prefix_octets as usize * 8);
            if prefix_octets > 0 {
                p.write_bits((content & 0xFFFF_FFFF_FFFF) >> (8 * (MNIS_MAX_PREFIX_OCTETS - prefix_octets as usize)), prefix_octets as usize * 8);
                p.seek(0);
            }
            Some(p)
        } else {
            tracing::warn!("MNIS header declares {} prefix octets, at most {} fit", prefix_octets, MNIS_MAX_PREFIX_OCTETS);
            None
        };
        Some(MnisHeader { application_type, prefix_octets, prefix })
    } else {
        None
    };

    Ok(ProprietaryDataHeader { sap_id, manufacturer, content, mnis })
}

fn write_proprietary(h: &ProprietaryDataHeader, buf: &mut BitBuffer) {
    buf.write_bits(h.sap_id as u64, 4);
    buf.write_bits(DataPacketFormat::Proprietary.into_raw(), 4);
    buf.write_bits(h.manufacturer.into_raw() as u64, 8);
    buf.write_bits(h.content, 64);
}

impl fmt::Display for PacketSequenceHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {}{} BF:{} FSN:{}",
            if self.confirmed { "CONFIRMED" } else { "UNCONFIRMED" },
            self.sap_id,
            self.source_llid,
            if self.group { "TG:" } else { "" },
            self.destination_llid,
            self.blocks_to_follow,
            self.fragment_sequence_number
        )?;
        if let Some(ns) = self.send_sequence_number {
            write!(f, " N(S):{}", ns)?;
        }
        Ok(())
    }
}

impl fmt::Display for DataHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            DataHeaderContent::PacketSequence(h) => write!(f, "DataHeader {{ {} }}", h)?,
            DataHeaderContent::Proprietary(h) => match &h.mnis {
                Some(m) => write!(f, "DataHeader {{ MNIS {} prefix: {} octets }}", m.application_type, m.prefix_octets)?,
                None => write!(f, "DataHeader {{ PROPRIETARY {} content: {:016X} }}", h.manufacturer, h.content)?,
            },
            DataHeaderContent::Other { format, .. } => write!(f, "DataHeader {{ {} }}", format)?,
        }
        if !self.is_valid() {
            write!(f, " [CRC FAIL]")?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use dmr_core::debug;

    use super::*;

    fn unconfirmed() -> PacketSequenceHeader {
        PacketSequenceHeader {
            confirmed: false,
            group: false,
            response_requested: false,
            header_compression: false,
            pad_octet_count: 0x11,
            sap_id: 4,
            destination_llid: 0x00_30_39,
            source_llid: 0x12_34_56,
            full_message: true,
            blocks_to_follow: 3,
            resynchronize: None,
            send_sequence_number: None,
            fragment_sequence_number: 8,
        }
    }

    fn encode(content: DataHeaderContent) -> BitBuffer {
        let mut buf = BitBuffer::new(96);
        DataHeader { content, crc: 0, corrected_bits: 0 }.to_bitbuf(&mut buf);
        buf.seek(0);
        buf
    }

    #[test]
    fn test_unconfirmed_header() {
        debug::setup_logging_verbose();
        let buf = encode(DataHeaderContent::PacketSequence(unconfirmed()));
        tracing::info!("Serialized: {}", buf.dump_bin());
        assert_eq!(buf.peek_bits_startoffset(4, 4), Some(2));

        let hdr = DataHeader::from_block(buf).expect("Failed parsing");
        tracing::info!("Parsed: {}", hdr);
        assert!(hdr.is_valid());
        assert_eq!(hdr.packet_sequence_header(), Some(&unconfirmed()));
    }

    #[test]
    fn test_confirmed_header() {
        let mut h = unconfirmed();
        h.confirmed = true;
        h.resynchronize = Some(true);
        h.send_sequence_number = Some(5);
        let mut buf = encode(DataHeaderContent::PacketSequence(h.clone()));
        buf.flip_bit(50);

        let hdr = DataHeader::from_block(buf).unwrap();
        assert_eq!(hdr.corrected_bits, 1);
        let parsed = hdr.packet_sequence_header().unwrap();
        assert_eq!(parsed, &h);
    }

    #[test]
    fn test_mnis_header_prefix() {
        // LRRP, 2 prefix octets 0xBEEF, rest of content zero
        let content = (0x02u64 << 56) | (0x02 << 48) | (0xBEEF << 32);
        let buf = encode(DataHeaderContent::Proprietary(ProprietaryDataHeader {
            sap_id: 9,
            manufacturer: FeatureSetId::Motorola,
            content,
            mnis: None,
        }));

        let hdr = DataHeader::from_block(buf).unwrap();
        let prop = hdr.proprietary_header().unwrap();
        assert_eq!(prop.sap_id, 9);
        assert_eq!(prop.application_type(), Some(ApplicationType::Lrrp));
        assert_eq!(prop.packet_prefix().unwrap().to_bitstr(), "1011111011101111");
        assert!(hdr.packet_sequence_header().is_none());
    }

    #[test]
    fn test_mnis_prefix_too_long() {
        let content = (0x01u64 << 56) | (0x07 << 48);
        let buf = encode(DataHeaderContent::Proprietary(ProprietaryDataHeader {
            sap_id: 9,
            manufacturer: FeatureSetId::Motorola,
            content,
            mnis: None,
        }));
        let hdr = DataHeader::from_block(buf).unwrap();
        let prop = hdr.proprietary_header().unwrap();
        assert_eq!(prop.application_type(), Some(ApplicationType::Ars));
        assert!(prop.packet_prefix().is_none());
    }

    #[test]
    fn test_other_format_is_carried() {
        let buf = encode(DataHeaderContent::Other {
            format: DataPacketFormat::Response,
            group: true,
            response_requested: false,
        });
        let hdr = DataHeader::from_block(buf).unwrap();
        assert!(hdr.is_valid());
        assert!(matches!(hdr.content, DataHeaderContent::Other { format: DataPacketFormat::Response, group: true, .. }));
    }
}
