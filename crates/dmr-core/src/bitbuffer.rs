use std::fmt;

use crate::pdu_parse_error::PduParseErr;

/// Fixed-length, MSB-first bit container used for bursts, blocks and assembled packets.
/// Reads and writes happen at `pos`; the buffer never grows beyond `end`.
#[derive(Clone, PartialEq, Eq)]
pub struct BitBuffer {
    buffer: Vec<u8>,
    pos: usize,         // next bit offset for read/write
    end: usize,         // bits at or after this are out of window
}

impl BitBuffer {
    /// Create a zeroed buffer capable of holding exactly `len_bits` bits.
    pub fn new(len_bits: usize) -> Self {
        BitBuffer {
            buffer: vec![0; len_bits.div_ceil(8)],
            pos: 0,
            end: len_bits,
        }
    }

    /// Wrap a byte slice, all bits readable.
    pub fn from_bytes(data: &[u8]) -> Self {
        BitBuffer {
            buffer: data.to_vec(),
            pos: 0,
            end: data.len() * 8,
        }
    }

    /// Construct a BitBuffer from a string of '0'/'1' characters.
    /// Panics if any other character is encountered.
    pub fn from_bitstr(bitstr: &str) -> Self {
        let mut buf = BitBuffer::new(bitstr.len());
        for c in bitstr.chars() {
            match c {
                '0' => buf.write_bit(0),
                '1' => buf.write_bit(1),
                other => panic!("from_bitstr: invalid character `{}`; only '0' or '1' allowed", other),
            }
        }
        buf.pos = 0;
        buf
    }

    /// Construct a BitBuffer from a slice holding one bit (0 or 1) per byte.
    pub fn from_bitarr(data: &[u8]) -> Self {
        let mut buf = BitBuffer::new(data.len());
        for &bit in data {
            assert!(bit <= 1, "from_bitarr: invalid byte `{}`; only 0 or 1 allowed", bit);
            buf.write_bit(bit);
        }
        buf.pos = 0;
        buf
    }

    /// Copies `len` bits starting at `start` into a new buffer, positioned at 0.
    /// Returns None when the range exceeds the window.
    pub fn slice(&self, start: usize, len: usize) -> Option<BitBuffer> {
        if start + len > self.end {
            return None;
        }
        let mut out = BitBuffer::new(len);
        let mut offset = 0;
        while offset < len {
            let chunk = usize::min(len - offset, 64);
            out.write_bits(self.read_bits_at_unchecked(start + offset, chunk), chunk);
            offset += chunk;
        }
        out.pos = 0;
        Some(out)
    }

    /// Peek `num_bits` at the current pos, without advancing.
    pub fn peek_bits(&self, num_bits: usize) -> Option<u64> {
        self.peek_bits_startoffset(self.pos, num_bits)
    }

    /// Peek `num_bits` at an absolute offset, without advancing.
    /// Returns None on overflow or if `num_bits > 64`.
    pub fn peek_bits_startoffset(&self, offset: usize, num_bits: usize) -> Option<u64> {
        if num_bits > 64 || offset + num_bits > self.end {
            return None;
        }
        Some(self.read_bits_at_unchecked(offset, num_bits))
    }

    /// Peek a single bit at an absolute offset.
    pub fn peek_bit(&self, offset: usize) -> Option<u8> {
        if offset >= self.end {
            return None;
        }
        Some(self.read_bit_at_unchecked(offset))
    }

    /// Read `num_bits` at the current pos, advancing on success.
    pub fn read_bits(&mut self, num_bits: usize) -> Option<u64> {
        let v = self.peek_bits_startoffset(self.pos, num_bits)?;
        self.pos += num_bits;
        Some(v)
    }

    /// Similar to read_bits, but returns PduParseErr::BufferEnded naming the field if the buffer is exhausted.
    pub fn read_field(&mut self, num_bits: usize, field: &'static str) -> Result<u64, PduParseErr> {
        self.read_bits(num_bits).ok_or(PduParseErr::BufferEnded { field: Some(field) })
    }

    /// Reads a 1-bit flag field.
    pub fn read_flag(&mut self, field: &'static str) -> Result<bool, PduParseErr> {
        Ok(self.read_field(1, field)? == 1)
    }

    pub fn read_bit(&mut self) -> Option<u8> {
        let v = self.peek_bit(self.pos)?;
        self.pos += 1;
        Some(v)
    }

    /// Write a single bit to pos.
    /// Panics when the buffer is full; use `get_len_remaining` to check beforehand.
    pub fn write_bit(&mut self, value: u8) {
        assert!(value <= 1, "write_bit: value must be 0 or 1");
        assert!(self.pos < self.end, "write would exceed buffer end");

        let index = self.pos / 8;
        let shift = 7 - (self.pos % 8);
        self.buffer[index] = (self.buffer[index] & !(1 << shift)) | (value << shift);
        self.pos += 1;
    }

    /// Write up to 64 bits, advancing pos. Panics if the write exceeds end.
    pub fn write_bits(&mut self, value: u64, num_bits: usize) {
        assert!(num_bits <= 64, "can only write up to 64 bits");
        assert!(num_bits == 64 || value >> num_bits == 0, "value exceeds num_bits {} {}", value, num_bits);
        assert!(self.pos + num_bits <= self.end, "write would exceed buffer end");

        let mut remaining = num_bits;
        let mut cur = self.pos;

        // Head bits, up to the next byte boundary
        let head_offset = cur % 8;
        if head_offset != 0 && remaining > 0 {
            let h = usize::min(remaining, 8 - head_offset);
            let bits_to_write = ((value >> (remaining - h)) as u8) & ((1u16 << h) - 1) as u8;
            let shift = 8 - (head_offset + h);
            let mask = (((1u16 << h) - 1) << shift) as u8;
            let byte = &mut self.buffer[cur / 8];
            *byte = (*byte & !mask) | (bits_to_write << shift);
            cur += h;
            remaining -= h;
        }

        // Full bytes
        while remaining >= 8 {
            self.buffer[cur / 8] = ((value >> (remaining - 8)) & 0xFF) as u8;
            cur += 8;
            remaining -= 8;
        }

        // Tail bits
        if remaining > 0 {
            let bits_to_write = (value as u8) & ((1u16 << remaining) - 1) as u8;
            let shift = 8 - remaining;
            let mask = (((1u16 << remaining) - 1) << shift) as u8;
            let byte = &mut self.buffer[cur / 8];
            *byte = (*byte & !mask) | (bits_to_write << shift);
        }

        self.pos += num_bits;
    }

    /// Read `num_bits` from the source buffer at its pos and write them at our pos.
    /// Panics if either buffer is too short; callers check lengths first.
    pub fn copy_bits(&mut self, src: &mut BitBuffer, num_bits: usize) {
        let mut bits_remaining = num_bits;
        while bits_remaining > 0 {
            let chunk = usize::min(bits_remaining, 64);
            let v = src.read_bits(chunk).expect("copy_bits: source exhausted");
            self.write_bits(v, chunk);
            bits_remaining -= chunk;
        }
    }

    /// Invert the bit at an absolute offset. Returns false if the offset is out of window.
    pub fn flip_bit(&mut self, offset: usize) -> bool {
        if offset >= self.end {
            return false;
        }
        self.buffer[offset / 8] ^= 1 << (7 - (offset % 8));
        true
    }

    /// Window length in bits
    pub fn get_len(&self) -> usize {
        self.end
    }

    /// Number of bits from pos to end
    pub fn get_len_remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn get_pos(&self) -> usize {
        self.pos
    }

    /// Seek `pos` to an absolute offset.
    pub fn seek(&mut self, offset: usize) {
        assert!(offset <= self.end, "seek out of window: got {}, allowed [0,{}]", offset, self.end);
        self.pos = offset;
    }

    /// Window as a String of '0'/'1' characters.
    pub fn to_bitstr(&self) -> String {
        (0..self.end)
            .map(|i| if self.read_bit_at_unchecked(i) == 1 { '1' } else { '0' })
            .collect()
    }

    /// Window content as uppercase hex. A trailing partial nibble is padded with zeroes.
    pub fn dump_hex(&self) -> String {
        let n_nibbles = self.end.div_ceil(4);
        let mut s = String::with_capacity(n_nibbles);
        for i in 0..n_nibbles {
            let take = usize::min(4, self.end - i * 4);
            let v = self.read_bits_at_unchecked(i * 4, take) as u8;
            s.push_str(&format!("{:X}", v << (4 - take)));
        }
        s
    }

    /// Binary dump with a '^' marker before the current pos.
    pub fn dump_bin(&self) -> String {
        let mut s = String::with_capacity(self.end + 1);
        for i in 0..self.end {
            if i == self.pos {
                s.push('^');
            }
            s.push(if self.read_bit_at_unchecked(i) == 1 { '1' } else { '0' });
        }
        if self.pos == self.end {
            s.push('^');
        }
        s
    }

    /// Reads `num_bits` (at most 64) starting at `bit_pos` without bounds checks against `end`.
    fn read_bits_at_unchecked(&self, mut bit_pos: usize, num_bits: usize) -> u64 {
        let mut result = 0u64;
        let mut bits_remaining = num_bits;

        // Head bits to align to the next byte
        let head = bit_pos % 8;
        if head != 0 && bits_remaining > 0 {
            let take = usize::min(8 - head, bits_remaining);
            let byte = self.buffer[bit_pos / 8];
            let mask = ((1u16 << take) - 1) as u8;
            result = ((byte >> (8 - head - take)) & mask) as u64;
            bit_pos += take;
            bits_remaining -= take;
        }

        while bits_remaining >= 8 {
            result = (result << 8) | self.buffer[bit_pos / 8] as u64;
            bit_pos += 8;
            bits_remaining -= 8;
        }

        for _ in 0..bits_remaining {
            result = (result << 1) | self.read_bit_at_unchecked(bit_pos) as u64;
            bit_pos += 1;
        }

        result
    }

    fn read_bit_at_unchecked(&self, bit_pos: usize) -> u8 {
        (self.buffer[bit_pos / 8] >> (7 - (bit_pos % 8))) & 1
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer {{ ^{} >{} {} }}", self.pos, self.end, self.dump_hex())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_boundary_read_write() {
        let mut bb = BitBuffer::new(16);
        bb.write_bits(0xA, 4);
        bb.write_bits(0x5, 4);
        bb.write_bits(0xFF, 8);
        bb.seek(0);
        assert_eq!(bb.read_bits(4).unwrap(), 0xA);
        assert_eq!(bb.read_bits(4).unwrap(), 0x5);
        assert_eq!(bb.read_bits(8).unwrap(), 0xFF);
    }

    #[test]
    fn test_unaligned_read_write_across_bytes() {
        let mut bb = BitBuffer::new(48);
        bb.seek(5);
        let pattern: u64 = 0b10_1010_1111_0001_0010;
        bb.write_bits(pattern, 20);
        assert_eq!(bb.peek_bits_startoffset(5, 20).unwrap(), pattern);
        assert_eq!(bb.peek_bits_startoffset(0, 5).unwrap(), 0);
    }

    #[test]
    fn test_read_overflow() {
        let mut bb = BitBuffer::new(10);
        assert!(bb.read_bits(11).is_none());
        assert_eq!(bb.read_field(11, "too_long"), Err(PduParseErr::BufferEnded { field: Some("too_long") }));
        assert_eq!(bb.read_bits(0).unwrap(), 0);
    }

    #[test]
    #[should_panic(expected = "write would exceed buffer end")]
    fn test_write_overflow() {
        let mut bb = BitBuffer::new(10);
        bb.write_bits(1, 11);
    }

    #[test]
    fn test_slice_and_flip() {
        let mut bb = BitBuffer::from_bitstr("1010110011110000");
        let sub = bb.slice(4, 8).unwrap();
        assert_eq!(sub.to_bitstr(), "11001111");
        assert!(bb.slice(10, 7).is_none());

        assert!(bb.flip_bit(0));
        assert!(!bb.flip_bit(16));
        assert_eq!(bb.to_bitstr(), "0010110011110000");
    }

    #[test]
    fn test_copy_bits() {
        let mut src = BitBuffer::from_bitstr("111000111");
        let mut dst = BitBuffer::new(12);
        dst.write_bits(0b101, 3);
        dst.copy_bits(&mut src, 9);
        assert_eq!(dst.to_bitstr(), "101111000111");
        assert_eq!(dst.get_len_remaining(), 0);
    }

    #[test]
    fn test_dump_funcs() {
        let mut bb = BitBuffer::from_bytes(&[0xAB, 0xC0]);
        assert_eq!(bb.dump_hex(), "ABC0");
        bb.seek(3);
        let short = bb.slice(0, 6).unwrap();
        assert_eq!(short.dump_hex(), "A8");
        assert_eq!(short.dump_bin(), "^101010");
    }
}
