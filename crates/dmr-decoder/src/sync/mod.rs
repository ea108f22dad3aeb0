pub mod correlator;
pub mod delay_buffer;

pub use correlator::{SyncCorrelator, SyncMatch};
pub use delay_buffer::DelayBuffer;
