use dmr_core::burst_consts::{
    BITS_PER_DIBIT, BURST_BITS, BURST_DIBITS, SYMBOLS_PER_SECOND, SYNC_DIBIT_OFFSET, SYNC_DIBITS,
};
use dmr_core::{BitBuffer, DataSource, Dibit, PhaseHypothesis, SyncCategory, SyncPattern, Timeslot};
use dmr_pdus::fields::cach::Cach;
use dmr_pdus::fields::slot_type::SlotType;
use dmr_pdus::message_factory;

use crate::error::{DecoderError, Result};
use crate::listener::DataUnitListener;
use crate::sync::{DelayBuffer, SyncCorrelator, SyncMatch};

/// Matches with more bit errors than this never produce a message
pub const MAX_SYNC_BIT_ERRORS: usize = 9;

/// Symbols without sync after which a loss is reported
pub const SYNC_LOSS_SYMBOL_THRESHOLD: usize = 4864;
/// Symbols accounted for per reported loss
pub const SYNC_LOSS_SYMBOL_STEP: usize = 4800;
/// Bits reported skipped per loss
pub const SYNC_LOSS_BIT_COUNT: usize = 2 * SYNC_LOSS_SYMBOL_STEP;

/// Symbols after an accepted sync during which further correlator hits are
/// windows overlapping that same sync field
pub const SYNC_HOLDOFF_SYMBOLS: usize = SYNC_DIBITS - 1;

/// Frames bursts out of a dibit stream and hands decoded data bursts to a listener.
pub struct DataUnitDetector<L: DataUnitListener> {
    correlator: SyncCorrelator,
    delay: DelayBuffer,
    listener: L,
    /// Symbols since the last sync, drained by the loss heartbeat
    dibits_processed: usize,
    /// Symbols since construction, drives timestamps
    symbol_clock: u64,
    sync_acquired: bool,
    /// Remaining framed symbols in which hits are ignored
    holdoff: usize,
}

impl<L: DataUnitListener> DataUnitDetector<L> {
    /// Detector with the correlator tolerance at MAX_SYNC_BIT_ERRORS
    pub fn new(listener: L) -> Self {
        Self {
            correlator: SyncCorrelator::default(),
            delay: DelayBuffer::new(),
            listener,
            dibits_processed: 0,
            symbol_clock: 0,
            sync_acquired: false,
            holdoff: 0,
        }
    }

    /// Detector with a custom correlator tolerance. Matches above MAX_SYNC_BIT_ERRORS are still dropped.
    pub fn with_max_bit_errors(listener: L, max_bit_errors: usize) -> Result<Self> {
        Ok(Self {
            correlator: SyncCorrelator::new(max_bit_errors)?,
            delay: DelayBuffer::new(),
            listener,
            dibits_processed: 0,
            symbol_clock: 0,
            sync_acquired: false,
            holdoff: 0,
        })
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    pub fn dibits_processed(&self) -> usize {
        self.dibits_processed
    }

    pub fn is_sync_acquired(&self) -> bool {
        self.sync_acquired
    }

    /// True while the sync field of the last accepted burst is still passing the correlator
    pub fn is_framed(&self) -> bool {
        self.holdoff > 0
    }

    /// Stream time of the most recent symbol in milliseconds
    pub fn timestamp(&self) -> u64 {
        self.symbol_clock * 1000 / SYMBOLS_PER_SECOND as u64
    }

    /// Process one symbol
    pub fn receive(&mut self, dibit: Dibit) -> Result<()> {
        self.dibits_processed += 1;
        self.symbol_clock += 1;

        if self.dibits_processed >= SYNC_LOSS_SYMBOL_THRESHOLD {
            tracing::debug!(t = self.timestamp(), "no sync for {} symbols", self.dibits_processed);
            self.listener.sync_lost(SYNC_LOSS_BIT_COUNT);
            self.dibits_processed -= SYNC_LOSS_SYMBOL_STEP;
            self.sync_acquired = false;
        }

        let delayed = self.delay.push_and_pop(dibit);
        let hit = self.correlator.observe(delayed);
        if hit.is_some() {
            self.dibits_processed = 0;
            self.sync_acquired = true;
        }

        if self.holdoff > 0 {
            self.holdoff -= 1;
            if let Some(m) = hit {
                tracing::trace!(t = self.timestamp(), "{} errors:{} overlaps framed sync", m.pattern, m.bit_errors);
            }
            return Ok(());
        }
        let Some(m) = hit else {
            return Ok(());
        };
        if let Some(ahead) = self.better_match_ahead(&m) {
            tracing::trace!(
                t = self.timestamp(),
                "{} errors:{} deferred, {} errors:{} follows",
                m.pattern, m.bit_errors, ahead.pattern, ahead.bit_errors
            );
            return Ok(());
        }

        self.holdoff = SYNC_HOLDOFF_SYMBOLS;
        self.handle_match(m)
    }

    /// Looks at the windows the correlator will see over the next symbols. They
    /// are already in the delay line. A hit there with fewer bit errors is the
    /// real sync and this one a shifted view of it.
    fn better_match_ahead(&self, m: &SyncMatch) -> Option<SyncMatch> {
        let snapshot = self.delay.snapshot();
        (1..=SYNC_HOLDOFF_SYMBOLS)
            .filter_map(|shift| {
                let start = SYNC_DIBIT_OFFSET + shift;
                let window = snapshot[start..start + SYNC_DIBITS]
                    .iter()
                    .fold(0u64, |w, d| (w << BITS_PER_DIBIT) | d.value() as u64);
                self.correlator.match_window(window)
            })
            .find(|ahead| ahead.bit_errors < m.bit_errors)
    }

    fn handle_match(&mut self, m: SyncMatch) -> Result<()> {
        if m.bit_errors > MAX_SYNC_BIT_ERRORS {
            tracing::trace!(t = self.timestamp(), "{} with {} bit errors ignored", m.pattern, m.bit_errors);
            return Ok(());
        }

        let source = match m.pattern.category() {
            SyncCategory::Data(source) => source,
            other => {
                tracing::debug!(t = self.timestamp(), "{:?} sync {} ({:?}), no data", other, m.pattern, m.phase);
                return Ok(());
            }
        };
        if source == DataSource::DirectTs2 {
            tracing::debug!(t = self.timestamp(), "{} not decoded", m.pattern);
            return Ok(());
        }

        let frame = self.frame(m.phase)?;
        let slot_type = match SlotType::from_burst(&frame) {
            Ok(st) => st,
            Err(e) => {
                tracing::warn!(t = self.timestamp(), "slot type: {:?}", e);
                return Ok(());
            }
        };
        let timeslot = timeslot_for(m.pattern, source, &frame);

        match message_factory::create_data_message(slot_type, m.pattern, timeslot, self.timestamp(), &frame) {
            Ok(message) => {
                tracing::debug!(t = self.timestamp(), "{} errors:{} {}", m.pattern, m.bit_errors, message);
                self.listener.data_unit_detected(message, m.bit_errors);
            }
            Err(e) => tracing::warn!(t = self.timestamp(), "{} {}: {:?}", m.pattern, slot_type, e),
        }
        Ok(())
    }

    /// Burst-aligned bits of the delay line, oldest first, with the phase error of the sync undone
    fn frame(&self, phase: PhaseHypothesis) -> Result<BitBuffer> {
        let correction = phase.inverse();
        let snapshot = self.delay.snapshot();
        let needed = snapshot.len() * BITS_PER_DIBIT;
        if needed > BURST_BITS {
            return Err(DecoderError::FrameOverflow { needed, capacity: BURST_BITS });
        }

        let mut frame = BitBuffer::new(BURST_BITS);
        for dibit in snapshot.iter() {
            frame.write_bits(correction.apply(*dibit).value() as u64, BITS_PER_DIBIT);
        }
        frame.seek(0);
        debug_assert_eq!(snapshot.len(), BURST_DIBITS);
        tracing::trace!("frame {}", frame.dump_hex());
        Ok(frame)
    }

    /// Sync was lost upstream, e.g. the PLL dropped lock
    pub fn external_sync_lost(&mut self) {
        self.sync_acquired = false;
        self.holdoff = 0;
        self.listener.sync_lost(0);
    }

    /// Clears the loss counter and the framing state. The delay line and the
    /// correlator window keep their contents.
    pub fn reset(&mut self) {
        self.dibits_processed = 0;
        self.sync_acquired = false;
        self.holdoff = 0;
    }
}

/// Timeslot of a data burst: from the CACH on base station bursts,
/// fixed for direct mode, unknown otherwise
fn timeslot_for(pattern: SyncPattern, source: DataSource, frame: &BitBuffer) -> Timeslot {
    match source {
        DataSource::BaseStation => match Cach::from_burst(frame) {
            Ok(cach) => cach.timeslot(),
            Err(e) => {
                tracing::warn!("{} cach: {:?}", pattern, e);
                0
            }
        },
        DataSource::DirectTs1 => 1,
        DataSource::DirectTs2 => 2,
        DataSource::MobileStation => 0,
    }
}
