use core::fmt;

use dmr_core::BitBuffer;

/// Leading block serial number (7 bits) and CRC-9 (9 bits) of a confirmed data block
pub const CONFIRMED_BLOCK_HEADER_BITS: usize = 16;

pub const RATE_12_BLOCK_BITS: usize = 96;
pub const RATE_1_BLOCK_BITS: usize = 192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRate {
    /// Rate 1/2, BPTC(196,96) protected
    Half,
    /// Rate 1, unprotected
    Full,
}

/// One data block of a packet sequence. Whether it is confirmed or unconfirmed
/// is only known from the header that opened the sequence, so both payload views are offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    pub rate: DataRate,
    bits: BitBuffer,
}

impl DataBlock {
    pub fn new(rate: DataRate, mut bits: BitBuffer) -> Self {
        bits.seek(0);
        DataBlock { rate, bits }
    }

    pub fn bits(&self) -> &BitBuffer {
        &self.bits
    }

    /// Payload of a block sent as unconfirmed data: the whole block
    pub fn unconfirmed_payload(&self) -> BitBuffer {
        self.bits.clone()
    }

    /// Payload of a block sent as confirmed data: everything after serial number and CRC-9
    pub fn confirmed_payload(&self) -> BitBuffer {
        let len = self.bits.get_len().saturating_sub(CONFIRMED_BLOCK_HEADER_BITS);
        self.bits
            .slice(CONFIRMED_BLOCK_HEADER_BITS, len)
            .unwrap_or_else(|| BitBuffer::new(0))
    }

    /// Block serial number, meaningful for confirmed data only
    pub fn serial_number(&self) -> Option<u8> {
        self.bits.peek_bits_startoffset(0, 7).map(|v| v as u8)
    }

    /// Received CRC-9, meaningful for confirmed data only. Not verified.
    pub fn crc9(&self) -> Option<u16> {
        self.bits.peek_bits_startoffset(7, 9).map(|v| v as u16)
    }

    pub fn payload_len(&self, confirmed: bool) -> usize {
        if confirmed {
            self.bits.get_len().saturating_sub(CONFIRMED_BLOCK_HEADER_BITS)
        } else {
            self.bits.get_len()
        }
    }
}

impl fmt::Display for DataBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rate = match self.rate {
            DataRate::Half => "1/2",
            DataRate::Full => "1",
        };
        write!(f, "DataBlock {{ rate {} {} }}", rate, self.bits.dump_hex())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_views() {
        let mut bits = BitBuffer::new(RATE_12_BLOCK_BITS);
        bits.write_bits(0b0000101, 7);
        bits.write_bits(0x1FF, 9);
        bits.write_bits(0xDEAD_BEEF, 32);
        let block = DataBlock::new(DataRate::Half, bits);

        assert_eq!(block.serial_number(), Some(5));
        assert_eq!(block.crc9(), Some(0x1FF));
        assert_eq!(block.unconfirmed_payload().get_len(), 96);

        let confirmed = block.confirmed_payload();
        assert_eq!(confirmed.get_len(), 80);
        assert_eq!(confirmed.peek_bits_startoffset(0, 32), Some(0xDEAD_BEEF));
        assert_eq!(block.payload_len(true), 80);
        assert_eq!(block.payload_len(false), 96);
    }
}
