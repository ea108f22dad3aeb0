use core::fmt;

use dmr_core::burst_consts::{SLOT_TYPE1_OFFSET, SLOT_TYPE2_OFFSET, SLOT_TYPE_HALF_BITS};
use dmr_core::{BitBuffer, PduParseErr, expect_len};

use crate::enums::data_type::DataType;

pub const SLOT_TYPE_BITS: usize = 2 * SLOT_TYPE_HALF_BITS;

/// Clause 9.1.3 SLOT TYPE PDU, split around the sync field.
/// Golay(20,8) parity is carried but not corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotType {
    // 4
    pub colour_code: u8,
    // 4
    pub data_type: DataType,
    // 12
    pub parity: u16,
}

impl SlotType {
    /// Reads the 20-bit field, MSB first
    pub fn from_bitbuf(buf: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let colour_code = buf.read_field(4, "colour_code")? as u8;
        let raw = buf.read_field(4, "data_type")?;
        let data_type = DataType::try_from(raw).map_err(|_| PduParseErr::InvalidValue { field: "data_type", value: raw })?;
        let parity = buf.read_field(12, "parity")? as u16;
        Ok(SlotType { colour_code, data_type, parity })
    }

    /// Joins the two halves either side of the sync field of a 288-bit burst
    pub fn from_burst(burst: &BitBuffer) -> Result<Self, PduParseErr> {
        expect_len!(burst, dmr_core::burst_consts::BURST_BITS)?;
        let first = burst
            .peek_bits_startoffset(SLOT_TYPE1_OFFSET, SLOT_TYPE_HALF_BITS)
            .ok_or(PduParseErr::BufferEnded { field: Some("slot_type_1") })?;
        let second = burst
            .peek_bits_startoffset(SLOT_TYPE2_OFFSET, SLOT_TYPE_HALF_BITS)
            .ok_or(PduParseErr::BufferEnded { field: Some("slot_type_2") })?;

        let mut joined = BitBuffer::new(SLOT_TYPE_BITS);
        joined.write_bits(first, SLOT_TYPE_HALF_BITS);
        joined.write_bits(second, SLOT_TYPE_HALF_BITS);
        joined.seek(0);
        Self::from_bitbuf(&mut joined)
    }

    pub fn to_bitbuf(&self, buf: &mut BitBuffer) {
        buf.write_bits(self.colour_code as u64, 4);
        buf.write_bits(self.data_type.into_raw(), 4);
        buf.write_bits(self.parity as u64, 12);
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CC:{} {}", self.colour_code, self.data_type)
    }
}
