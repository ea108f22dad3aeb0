use dmr_core::Dibit;
use dmr_core::burst_consts::{BURST_DIBITS, POST_SYNC_DIBITS};

use crate::error::{DecoderError, Result};

/// Circular delay line over the last `N` dibits.
/// Feeding the correlator from the delayed output means that, when a sync is recognised,
/// the buffer already holds the whole burst around it.
pub struct DelayBuffer<const N: usize = BURST_DIBITS> {
    buffer: [Dibit; N],
    /// Index where the next dibit is written; also the oldest entry
    cursor: usize,
    lag: usize,
}

impl DelayBuffer<BURST_DIBITS> {
    /// One burst of history, delayed by the part of the burst that follows the sync
    pub fn new() -> Self {
        Self {
            buffer: [Dibit::default(); BURST_DIBITS],
            cursor: 0,
            lag: POST_SYNC_DIBITS,
        }
    }
}

impl Default for DelayBuffer<BURST_DIBITS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DelayBuffer<N> {
    pub fn with_lag(lag: usize) -> Result<Self> {
        if lag >= N {
            return Err(DecoderError::InvalidDelay { lag, capacity: N });
        }
        Ok(Self {
            buffer: [Dibit::default(); N],
            cursor: 0,
            lag,
        })
    }

    pub fn lag(&self) -> usize {
        self.lag
    }

    /// Stores `dibit` and returns the one pushed `lag` calls earlier,
    /// or the pre-fill value while fewer dibits have been seen.
    pub fn push_and_pop(&mut self, dibit: Dibit) -> Dibit {
        self.buffer[self.cursor] = dibit;
        let delayed = self.buffer[(self.cursor + N - self.lag) % N];
        self.cursor = (self.cursor + 1) % N;
        delayed
    }

    /// Full contents, oldest first
    pub fn snapshot(&self) -> [Dibit; N] {
        let mut out = [Dibit::default(); N];
        for (i, d) in out.iter_mut().enumerate() {
            *d = self.buffer[(self.cursor + i) % N];
        }
        out
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_lag() {
        let buf = DelayBuffer::new();
        assert_eq!(buf.lag(), 54);
        assert!(DelayBuffer::<8>::with_lag(8).is_err());
        assert!(DelayBuffer::<8>::with_lag(7).is_ok());
    }

    #[test]
    fn test_delayed_output() {
        let mut buf = DelayBuffer::<8>::with_lag(3).unwrap();
        let input: Vec<Dibit> = (0..20u8).map(Dibit::from_value).collect();
        for (i, &d) in input.iter().enumerate() {
            let out = buf.push_and_pop(d);
            if i < 3 {
                assert_eq!(out, Dibit::D00Plus1);
            } else {
                assert_eq!(out, input[i - 3]);
            }
        }
    }

    #[test]
    fn test_snapshot_after_wrap() {
        let mut buf = DelayBuffer::<4>::with_lag(1).unwrap();
        for v in [1u8, 2, 3, 0, 1, 3] {
            buf.push_and_pop(Dibit::from_value(v));
        }
        let snap: Vec<u8> = buf.snapshot().iter().map(|d| d.value()).collect();
        assert_eq!(snap, vec![3, 0, 1, 3]);
    }

    #[test]
    fn test_snapshot_holds_burst_when_sync_emerges() {
        let mut buf = DelayBuffer::new();
        // Mark every dibit with its position in the burst modulo 4
        let burst: Vec<Dibit> = (0..BURST_DIBITS).map(|i| Dibit::from_value(i as u8)).collect();
        let mut emerged_at = None;
        for (i, &d) in burst.iter().enumerate() {
            let out = buf.push_and_pop(d);
            if i >= POST_SYNC_DIBITS && i - POST_SYNC_DIBITS == 89 {
                assert_eq!(out, burst[89]);
                emerged_at = Some(i);
            }
        }
        // Last sync dibit (offset 89) leaves the delay line with the final burst dibit
        assert_eq!(emerged_at, Some(BURST_DIBITS - 1));
        assert_eq!(buf.snapshot().to_vec(), burst);
    }
}
