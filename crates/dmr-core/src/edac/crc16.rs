//! CRC-CCITT checksums as used by DMR control blocks and data headers (Annex B.3.7),
//! with single-bit error correction driven by the residual syndrome.

use crate::BitBuffer;

/// CRC-16 ITU-T generator x^16 + x^12 + x^5 + 1
pub const GEN_POLY: u16 = 0x1021;

/// Mask applied to the checksum of a CSBK
pub const CRC_MASK_CSBK: u16 = 0xA5A5;
/// Mask applied to the checksum of a data header
pub const CRC_MASK_DATA_HEADER: u16 = 0xCCCC;
/// Mask applied to the checksum of an MBC header
pub const CRC_MASK_MBC_HEADER: u16 = 0xAAAA;

pub const CRC_BITS: usize = 16;

/// Returned by `correct_ccitt` when no single-bit flip gives a zero residual.
/// Anything at or above this value marks the protected block invalid.
pub const CRC_UNCORRECTABLE: usize = 2;

#[inline]
fn crc16_itut_step(mut crc: u16, bit: u8) -> u16 {
    crc ^= (bit as u16) << 15;
    if (crc & 0x8000) != 0 {
        (crc << 1) ^ GEN_POLY
    } else {
        crc << 1
    }
}

/// CRC-16 ITU-T over `len` bits of a BitBuffer starting at `start` (MSB first).
/// `crc` is the initial register value. Returns the updated register.
pub fn crc16_itut_bits(mut crc: u16, bitbuf: &BitBuffer, start: usize, len: usize) -> u16 {
    for i in 0..len {
        let bit = bitbuf.peek_bit(start + i).unwrap_or(0);
        crc = crc16_itut_step(crc, bit);
    }
    crc
}

/// Checksum as transmitted: inverted CRC-CCITT over `[start, start+len)`, xored with `mask`.
pub fn compute_ccitt(bitbuf: &BitBuffer, start: usize, len: usize, mask: u16) -> u16 {
    !crc16_itut_bits(0x0000, bitbuf, start, len) ^ mask
}

/// Validates the checksum stored at `[crc_start, crc_start+16)` protecting `[msg_start, crc_start)`,
/// repairing a single bit error in either the message or the checksum.
/// Returns the number of bits flipped (0 or 1), or CRC_UNCORRECTABLE, in which case the
/// buffer is left untouched.
pub fn correct_ccitt(bitbuf: &mut BitBuffer, msg_start: usize, crc_start: usize, mask: u16) -> usize {
    assert!(msg_start <= crc_start);
    let Some(received) = bitbuf.peek_bits_startoffset(crc_start, CRC_BITS) else {
        tracing::warn!("correct_ccitt: buffer of {} bits too short for checksum at {}", bitbuf.get_len(), crc_start);
        return CRC_UNCORRECTABLE;
    };

    let msg_len = crc_start - msg_start;
    let residual = compute_ccitt(bitbuf, msg_start, msg_len, mask) ^ received as u16;
    if residual == 0 {
        return 0;
    }

    // A single flipped checksum bit shows up as a single residual bit
    if residual.count_ones() == 1 {
        let crc_bit = residual.leading_zeros() as usize;
        bitbuf.flip_bit(crc_start + crc_bit);
        tracing::trace!("correct_ccitt: corrected checksum bit {}", crc_bit);
        return 1;
    }

    // A single flipped message bit changes the register by that bit's syndrome.
    // Walk backwards from the last message bit, whose syndrome is one register step on a lone 1.
    let mut syndrome = crc16_itut_step(0, 1);
    for offset in (0..msg_len).rev() {
        if syndrome == residual {
            bitbuf.flip_bit(msg_start + offset);
            tracing::trace!("correct_ccitt: corrected message bit {}", offset);
            return 1;
        }
        syndrome = crc16_itut_step(syndrome, 0);
    }

    CRC_UNCORRECTABLE
}

/// Writes the checksum for `[msg_start, crc_start)` into `[crc_start, crc_start+16)`.
pub fn write_ccitt(bitbuf: &mut BitBuffer, msg_start: usize, crc_start: usize, mask: u16) {
    let crc = compute_ccitt(bitbuf, msg_start, crc_start - msg_start, mask);
    let saved_pos = bitbuf.get_pos();
    bitbuf.seek(crc_start);
    bitbuf.write_bits(crc as u64, CRC_BITS);
    bitbuf.seek(saved_pos);
}


#[cfg(test)]
mod tests {
    use super::*;

    fn csbk_fixture() -> BitBuffer {
        // LB=1, PF=0, opcode 0x3D, FID 0x00, 64 payload bits, room for the checksum
        let mut buf = BitBuffer::new(96);
        buf.write_bits(0b10_111101, 8);
        buf.write_bits(0x00, 8);
        buf.write_bits(0x8000_1234_0056_789A, 64);
        write_ccitt(&mut buf, 0, 80, CRC_MASK_CSBK);
        buf
    }

    #[test]
    fn test_check_value() {
        // Standard CRC-16/XMODEM check value for "123456789" is 0x31C3
        let buf = BitBuffer::from_bytes(b"123456789");
        assert_eq!(crc16_itut_bits(0, &buf, 0, 72), 0x31C3);
    }

    #[test]
    fn test_clean_block_needs_no_correction() {
        let mut buf = csbk_fixture();
        assert_eq!(correct_ccitt(&mut buf, 0, 80, CRC_MASK_CSBK), 0);
        // Wrong mask must not validate
        assert_eq!(correct_ccitt(&mut buf.clone(), 0, 80, CRC_MASK_DATA_HEADER), CRC_UNCORRECTABLE);
    }

    #[test]
    fn test_every_single_bit_error_is_corrected() {
        let clean = csbk_fixture();
        for bit in 0..96 {
            let mut buf = clean.clone();
            buf.flip_bit(bit);
            assert_eq!(correct_ccitt(&mut buf, 0, 80, CRC_MASK_CSBK), 1, "bit {}", bit);
            assert_eq!(buf, clean, "bit {}", bit);
        }
    }

    #[test]
    fn test_correction_is_idempotent() {
        let clean = csbk_fixture();
        let mut buf = clean.clone();
        buf.flip_bit(17);
        assert_eq!(correct_ccitt(&mut buf, 0, 80, CRC_MASK_CSBK), 1);
        assert_eq!(correct_ccitt(&mut buf, 0, 80, CRC_MASK_CSBK), 0);
    }

    #[test]
    fn test_double_error_leaves_buffer_untouched() {
        let mut buf = csbk_fixture();
        buf.flip_bit(3);
        buf.flip_bit(40);
        let damaged = buf.clone();
        assert_eq!(correct_ccitt(&mut buf, 0, 80, CRC_MASK_CSBK), CRC_UNCORRECTABLE);
        assert_eq!(buf, damaged);
    }
}
