use dmr_core::sync_pattern::SYNC_MASK;
use dmr_core::{Dibit, PhaseHypothesis, SYNC_PATTERNS, SyncPattern};

use crate::error::{DecoderError, Result};

/// Tolerance beyond which every window would match some pattern
pub const MAX_CORRELATOR_BIT_ERRORS: usize = 24;

/// Tolerance of a correlator built with `Default`
pub const DEFAULT_CORRELATOR_BIT_ERRORS: usize = 9;

const ROTATED_HYPOTHESES: [PhaseHypothesis; 3] =
    [PhaseHypothesis::Plus90, PhaseHypothesis::Minus90, PhaseHypothesis::Inverted];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMatch {
    pub pattern: SyncPattern,
    /// Hamming distance to the pattern, always 0 for rotated hypotheses
    pub bit_errors: usize,
    pub phase: PhaseHypothesis,
}

/// Sliding 48-bit window over the symbol stream, compared against all sync patterns
/// after every dibit.
pub struct SyncCorrelator {
    window: u64,
    max_bit_errors: usize,
}

impl SyncCorrelator {
    pub fn new(max_bit_errors: usize) -> Result<Self> {
        if max_bit_errors > MAX_CORRELATOR_BIT_ERRORS {
            return Err(DecoderError::InvalidMaxBitErrors(max_bit_errors));
        }
        Ok(Self { window: 0, max_bit_errors })
    }

    pub fn max_bit_errors(&self) -> usize {
        self.max_bit_errors
    }

    pub fn window(&self) -> u64 {
        self.window
    }

    /// Overwrites the window, for resuming or testing
    pub fn load_window(&mut self, value: u64) {
        self.window = value & SYNC_MASK;
    }

    /// Shifts a dibit into the window and evaluates it.
    pub fn observe(&mut self, dibit: Dibit) -> Option<SyncMatch> {
        self.window = ((self.window << 2) & SYNC_MASK) | dibit.value() as u64;
        self.evaluate()
    }

    /// Normal phase first across all patterns, with tolerance. Data sync is the
    /// inverse of voice sync, so a rotated hypothesis is only tried once no pattern
    /// matched as received, and only exactly.
    pub fn evaluate(&self) -> Option<SyncMatch> {
        self.match_window(self.window)
    }

    /// Same rules as `evaluate` against an arbitrary 48-bit window
    pub fn match_window(&self, window: u64) -> Option<SyncMatch> {
        let window = window & SYNC_MASK;
        for pattern in SYNC_PATTERNS {
            let distance = (window ^ pattern.pattern()).count_ones() as usize;
            if distance <= self.max_bit_errors {
                return Some(SyncMatch { pattern, bit_errors: distance, phase: PhaseHypothesis::Normal });
            }
        }

        for pattern in SYNC_PATTERNS {
            for phase in ROTATED_HYPOTHESES {
                if window == pattern.rotated(phase) {
                    return Some(SyncMatch { pattern, bit_errors: 0, phase });
                }
            }
        }
        None
    }
}

impl Default for SyncCorrelator {
    fn default() -> Self {
        Self { window: 0, max_bit_errors: DEFAULT_CORRELATOR_BIT_ERRORS }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn feed(correlator: &mut SyncCorrelator, value: u64) -> Option<SyncMatch> {
        let mut last = None;
        for i in (0..24).rev() {
            last = correlator.observe(Dibit::from_value(((value >> (2 * i)) & 0x3) as u8));
        }
        last
    }

    #[test]
    fn test_rejects_excessive_tolerance() {
        assert!(SyncCorrelator::new(24).is_ok());
        assert_eq!(SyncCorrelator::new(25).err(), Some(DecoderError::InvalidMaxBitErrors(25)));
    }

    #[test]
    fn test_exact_match_every_pattern() {
        let mut c = SyncCorrelator::new(4).unwrap();
        for pattern in SYNC_PATTERNS {
            let m = feed(&mut c, pattern.pattern()).expect("no match");
            assert_eq!(m, SyncMatch { pattern, bit_errors: 0, phase: PhaseHypothesis::Normal });
            assert_eq!(c.window(), pattern.pattern());
        }
    }

    #[test]
    fn test_single_bit_errors_within_tolerance() {
        let mut c = SyncCorrelator::new(1).unwrap();
        for bit in 0..48 {
            c.load_window(SyncPattern::BaseStationData.pattern() ^ (1 << bit));
            let m = c.evaluate().expect("no match");
            assert_eq!(m.pattern, SyncPattern::BaseStationData);
            assert_eq!(m.bit_errors, 1);
            assert_eq!(m.phase, PhaseHypothesis::Normal);
        }
    }

    #[test]
    fn test_over_tolerance_does_not_match() {
        let mut c = SyncCorrelator::new(2).unwrap();
        c.load_window(SyncPattern::DirectModeDataTs1.pattern() ^ 0b111);
        assert_eq!(c.evaluate(), None);
    }

    #[test]
    fn test_voice_sync_is_never_inverted_data() {
        let mut c = SyncCorrelator::new(0).unwrap();
        c.load_window(SyncPattern::BaseStationVoice.pattern());
        let m = c.evaluate().unwrap();
        assert_eq!(m.pattern, SyncPattern::BaseStationVoice);
        assert_eq!(m.phase, PhaseHypothesis::Normal);
    }

    #[test]
    fn test_rotated_variants_match_exactly() {
        let mut c = SyncCorrelator::new(0).unwrap();
        for phase in [PhaseHypothesis::Plus90, PhaseHypothesis::Minus90] {
            let m = feed(&mut c, SyncPattern::MobileStationData.rotated(phase)).expect("no match");
            assert_eq!(m.pattern, SyncPattern::MobileStationData);
            assert_eq!(m.phase, phase);
            assert_eq!(m.bit_errors, 0);

            // No tolerance on rotated hypotheses
            c.load_window(SyncPattern::MobileStationData.rotated(phase) ^ 1);
            assert_eq!(c.evaluate(), None);
        }

        c.load_window(SyncPattern::MobileStationReverseChannel.inverted_pattern());
        let m = c.evaluate().unwrap();
        assert_eq!(m.pattern, SyncPattern::MobileStationReverseChannel);
        assert_eq!(m.phase, PhaseHypothesis::Inverted);
    }

    #[test]
    fn test_match_window_leaves_state_alone() {
        let c = SyncCorrelator::new(3).unwrap();
        let m = c.match_window(SyncPattern::MobileStationData.pattern() ^ 0b101).unwrap();
        assert_eq!(m.pattern, SyncPattern::MobileStationData);
        assert_eq!(m.bit_errors, 2);
        // Bits above the 48-bit window are ignored
        assert_eq!(c.match_window(SyncPattern::MobileStationData.pattern() | (0xFF << 48)).unwrap().bit_errors, 0);
        assert_eq!(c.window(), 0);
    }

    #[test]
    fn test_silence_does_not_match() {
        let mut c = SyncCorrelator::new(9).unwrap();
        for _ in 0..100 {
            assert_eq!(c.observe(Dibit::D00Plus1), None);
        }
    }
}
