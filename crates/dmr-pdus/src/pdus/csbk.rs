use core::fmt;

use dmr_core::edac::bptc::BPTC_196_96_DATA_BITS;
use dmr_core::edac::crc16::{self, CRC_UNCORRECTABLE};
use dmr_core::{BitBuffer, PduParseErr, expect_len};

use crate::enums::csbk_opcode::CsbkOpcode;
use crate::enums::feature_set_id::FeatureSetId;
use crate::enums::reason::Reason;

/// Offset of the CRC-CCITT checksum within the 96 block bits
pub const CSBK_CRC_OFFSET: usize = 80;

/// Control Signalling Block, ETSI TS 102 361-2 clause 7.1.
/// Built from the 96 BPTC-decoded bits after CRC correction; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Csbk {
    // 1
    pub last_block: bool,
    // 1
    pub protect: bool,
    // 6, scoped by feature_set
    pub opcode: CsbkOpcode,
    // 8
    pub feature_set: FeatureSetId,
    // 64, opcode-specific
    pub payload: u64,
    // 16
    pub crc: u16,
    /// Bits flipped by CRC correction, CRC_UNCORRECTABLE if the checksum failed
    pub corrected_bits: usize,
}

impl Csbk {
    /// Corrects `block` against its checksum under `mask`, then parses it.
    /// A checksum failure does not fail parsing; it shows in `is_valid`.
    pub fn from_block(mut block: BitBuffer, mask: u16) -> Result<Self, PduParseErr> {
        expect_len!(block, BPTC_196_96_DATA_BITS)?;
        let corrected_bits = crc16::correct_ccitt(&mut block, 0, CSBK_CRC_OFFSET, mask);
        block.seek(0);
        Self::from_bitbuf(&mut block, corrected_bits)
    }

    pub fn from_bitbuf(buf: &mut BitBuffer, corrected_bits: usize) -> Result<Self, PduParseErr> {
        let last_block = buf.read_flag("last_block")?;
        let protect = buf.read_flag("protect")?;
        let opcode_raw = buf.read_field(6, "opcode")? as u8;
        let feature_set = FeatureSetId::from_raw(buf.read_field(8, "feature_set")? as u8);
        let payload = buf.read_field(64, "payload")?;
        let crc = buf.read_field(16, "crc")? as u16;

        Ok(Csbk {
            last_block,
            protect,
            opcode: CsbkOpcode::from_raw(opcode_raw, feature_set),
            feature_set,
            payload,
            crc,
            corrected_bits,
        })
    }

    /// Serializes the block and appends a fresh checksum under `mask`
    pub fn to_bitbuf(&self, buf: &mut BitBuffer, mask: u16) {
        let start = buf.get_pos();
        buf.write_bits(self.last_block as u64, 1);
        buf.write_bits(self.protect as u64, 1);
        buf.write_bits(self.opcode.into_raw() as u64, 6);
        buf.write_bits(self.feature_set.into_raw() as u64, 8);
        buf.write_bits(self.payload, 64);
        crc16::write_ccitt(buf, start, start + CSBK_CRC_OFFSET, mask);
        buf.seek(start + BPTC_196_96_DATA_BITS);
    }

    pub fn is_valid(&self) -> bool {
        self.corrected_bits < CRC_UNCORRECTABLE
    }

    /// Reason code of a C_NACK_RSP. The payload starts with additional info (1),
    /// source type (1) and service type (6), followed by the 8-bit reason.
    pub fn nack_reason(&self) -> Option<Reason> {
        match self.opcode {
            CsbkOpcode::NegativeAcknowledge => Some(Reason::from_raw((self.payload >> 48) as u8)),
            _ => None,
        }
    }
}

impl fmt::Display for Csbk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Csbk {{ {}", self.opcode)?;
        if self.last_block {
            write!(f, " LB")?;
        }
        if self.protect {
            write!(f, " PF")?;
        }
        write!(f, " payload: {:016X}", self.payload)?;
        if !self.is_valid() {
            write!(f, " [CRC FAIL]")?;
        } else if self.corrected_bits > 0 {
            write!(f, " [CORRECTED {}]", self.corrected_bits)?;
        }
        write!(f, " }}")
    }
}


#[cfg(test)]
mod tests {
    use dmr_core::debug;
    use dmr_core::edac::crc16::{CRC_MASK_CSBK, CRC_MASK_MBC_HEADER};

    use super::*;

    fn preamble() -> Csbk {
        Csbk {
            last_block: true,
            protect: false,
            opcode: CsbkOpcode::Preamble,
            feature_set: FeatureSetId::Standard,
            payload: 0x8003_0000_2A00_1234,
            crc: 0,
            corrected_bits: 0,
        }
    }

    #[test]
    fn test_csbk_fields_survive_serialization() {
        debug::setup_logging_verbose();
        let mut buf = BitBuffer::new(96);
        preamble().to_bitbuf(&mut buf, CRC_MASK_CSBK);
        tracing::info!("Serialized: {}", buf.dump_bin());

        let csbk = Csbk::from_block(buf, CRC_MASK_CSBK).expect("Failed parsing");
        tracing::info!("Parsed: {}", csbk);
        assert!(csbk.is_valid());
        assert_eq!(csbk.corrected_bits, 0);
        assert_eq!(csbk.opcode, CsbkOpcode::Preamble);
        assert!(csbk.last_block);
        assert_eq!(csbk.payload, 0x8003_0000_2A00_1234);
        assert!(csbk.nack_reason().is_none());
    }

    #[test]
    fn test_single_bit_error_is_repaired() {
        let mut buf = BitBuffer::new(96);
        preamble().to_bitbuf(&mut buf, CRC_MASK_CSBK);
        buf.flip_bit(20);

        let csbk = Csbk::from_block(buf, CRC_MASK_CSBK).unwrap();
        assert!(csbk.is_valid());
        assert_eq!(csbk.corrected_bits, 1);
        assert_eq!(csbk.payload, 0x8003_0000_2A00_1234);
    }

    #[test]
    fn test_wrong_mask_is_invalid_but_parsed() {
        let mut buf = BitBuffer::new(96);
        preamble().to_bitbuf(&mut buf, CRC_MASK_CSBK);

        let csbk = Csbk::from_block(buf, CRC_MASK_MBC_HEADER).unwrap();
        assert!(!csbk.is_valid());
        assert_eq!(csbk.opcode, CsbkOpcode::Preamble);
    }

    #[test]
    fn test_nack_reason() {
        let mut nack = preamble();
        nack.opcode = CsbkOpcode::NegativeAcknowledge;
        nack.payload = 0x0027_0000_0000_0000;
        assert_eq!(nack.nack_reason(), Some(Reason::TsRefusedNetworkCongestion));
    }
}
