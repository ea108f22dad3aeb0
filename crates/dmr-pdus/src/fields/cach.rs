use core::fmt;

use dmr_core::burst_consts::{CACH_BITS, CACH_OFFSET};
use dmr_core::{BitBuffer, PduParseErr, Timeslot};

/// Positions of the 7 TACT bits within the 24-bit CACH (Clause 9.1.4 interleaving).
/// The remaining 17 bits carry a short LC fragment.
const TACT_POSITIONS: [usize; 7] = [0, 4, 8, 12, 14, 18, 22];

/// Clause 9.1.4 Common Announcement Channel, TACT part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cach {
    /// AT: outbound channel for the next slot is busy
    pub access_type: bool,
    /// TC: 0 for timeslot 1, 1 for timeslot 2
    pub timeslot_channel: u8,
    // 2
    pub lcss: u8,
    /// Hamming(7,4) parity, not corrected
    pub parity: u8,
    /// Short LC fragment in transmit order, 17 bits
    pub payload: u32,
}

impl Cach {
    /// Deinterleaves the CACH at the start of a burst
    pub fn from_burst(burst: &BitBuffer) -> Result<Self, PduParseErr> {
        if burst.get_len() < CACH_OFFSET + CACH_BITS {
            return Err(PduParseErr::BufferEnded { field: Some("cach") });
        }

        let mut tact = 0u8;
        let mut payload = 0u32;
        for i in 0..CACH_BITS {
            let bit = burst.peek_bit(CACH_OFFSET + i).unwrap_or(0);
            if TACT_POSITIONS.contains(&i) {
                tact = (tact << 1) | bit;
            } else {
                payload = (payload << 1) | bit as u32;
            }
        }

        Ok(Cach {
            access_type: tact & 0x40 != 0,
            timeslot_channel: (tact >> 5) & 0x1,
            lcss: (tact >> 3) & 0x3,
            parity: tact & 0x7,
            payload,
        })
    }

    /// Timeslot of the burst this CACH precedes
    pub fn timeslot(&self) -> Timeslot {
        if self.timeslot_channel == 0 { 1 } else { 2 }
    }
}

impl fmt::Display for Cach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cach {{ at: {} ts: {} lcss: {} }}", self.access_type, self.timeslot(), self.lcss)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tact_deinterleave() {
        // AT=1 TC=1 LCSS=10 parity=011, all short LC bits set
        let mut burst = BitBuffer::new(288);
        let tact = [1u8, 1, 1, 0, 0, 1, 1];
        for i in 0..CACH_BITS {
            let bit = match TACT_POSITIONS.iter().position(|&p| p == i) {
                Some(k) => tact[k],
                None => 1,
            };
            burst.write_bit(bit);
        }

        let cach = Cach::from_burst(&burst).unwrap();
        assert!(cach.access_type);
        assert_eq!(cach.timeslot_channel, 1);
        assert_eq!(cach.timeslot(), 2);
        assert_eq!(cach.lcss, 0b10);
        assert_eq!(cach.parity, 0b011);
        assert_eq!(cach.payload, 0x1FFFF);
    }

    #[test]
    fn test_zero_tc_is_timeslot_one() {
        let cach = Cach::from_burst(&BitBuffer::new(288)).unwrap();
        assert_eq!(cach.timeslot(), 1);
    }
}
