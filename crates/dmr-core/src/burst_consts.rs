//! DMR burst geometry, ETSI TS 102 361-1 clause 4.2.
//! A burst as seen by a receiver on the outbound channel:
//!
//! ```text
//!  CACH(12) | PAYLOAD I(54) | SYNC(24) | PAYLOAD II(54)     dibits
//!  CACH(24) | INFO(98) SLOT(10) | SYNC(48) | SLOT(10) INFO(98)  bits
//! ```

pub const BITS_PER_DIBIT: usize = 2;

pub const CACH_DIBITS: usize = 12;
pub const PAYLOAD_HALF_DIBITS: usize = 54;
pub const SYNC_DIBITS: usize = 24;

pub const BURST_DIBITS: usize = CACH_DIBITS + PAYLOAD_HALF_DIBITS + SYNC_DIBITS + PAYLOAD_HALF_DIBITS;
pub const BURST_BITS: usize = BURST_DIBITS * BITS_PER_DIBIT;

/// Dibit offset of the sync field within a burst
pub const SYNC_DIBIT_OFFSET: usize = CACH_DIBITS + PAYLOAD_HALF_DIBITS;

/// Number of burst dibits still to come after the last sync dibit.
/// A sync is only recognised this many symbols after it arrived.
pub const POST_SYNC_DIBITS: usize = BURST_DIBITS - (SYNC_DIBIT_OFFSET + SYNC_DIBITS);

pub const CACH_OFFSET: usize = 0;
pub const CACH_BITS: usize = CACH_DIBITS * BITS_PER_DIBIT;

pub const INFO_HALF_BITS: usize = 98;
pub const SLOT_TYPE_HALF_BITS: usize = 10;
pub const SYNC_BITS: usize = SYNC_DIBITS * BITS_PER_DIBIT;

pub const INFO1_OFFSET: usize = CACH_BITS;
pub const SLOT_TYPE1_OFFSET: usize = INFO1_OFFSET + INFO_HALF_BITS;
pub const SYNC_OFFSET: usize = SLOT_TYPE1_OFFSET + SLOT_TYPE_HALF_BITS;
pub const SLOT_TYPE2_OFFSET: usize = SYNC_OFFSET + SYNC_BITS;
pub const INFO2_OFFSET: usize = SLOT_TYPE2_OFFSET + SLOT_TYPE_HALF_BITS;

/// Both info halves together, the input of the BPTC(196,96) decoder
pub const INFO_BITS: usize = 2 * INFO_HALF_BITS;

/// Symbol rate of the channel, both timeslots combined
pub const SYMBOLS_PER_SECOND: usize = 4800;
