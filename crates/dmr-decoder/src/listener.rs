use crossbeam_channel::Sender;
use dmr_pdus::DmrMessage;

/// Receives everything the detector finds. Called synchronously from `DataUnitDetector::receive`.
pub trait DataUnitListener {
    /// A data burst was framed and decoded; `bit_errors` is the sync distance
    fn data_unit_detected(&mut self, message: DmrMessage, bit_errors: usize);

    /// No sync for a while (`bit_errors` is the number of bits skipped), or lost upstream (0)
    fn sync_lost(&mut self, bit_errors: usize);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorEvent {
    DataUnit { message: DmrMessage, bit_errors: usize },
    SyncLost { bit_errors: usize },
}

/// Forwards detector callbacks onto a channel, for hosts running the consumer on another thread
pub struct ChannelListener {
    tx: Sender<DetectorEvent>,
}

impl ChannelListener {
    pub fn new(tx: Sender<DetectorEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: DetectorEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("detector event dropped, receiver disconnected");
        }
    }
}

impl DataUnitListener for ChannelListener {
    fn data_unit_detected(&mut self, message: DmrMessage, bit_errors: usize) {
        self.send(DetectorEvent::DataUnit { message, bit_errors });
    }

    fn sync_lost(&mut self, bit_errors: usize) {
        self.send(DetectorEvent::SyncLost { bit_errors });
    }
}
