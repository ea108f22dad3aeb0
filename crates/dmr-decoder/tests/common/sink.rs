use dmr_decoder::DataUnitListener;
use dmr_pdus::DmrMessage;

/// Collects every detector callback for later inspection
#[derive(Default)]
pub struct Sink {
    messages: Vec<(DmrMessage, usize)>,
    losses: Vec<usize>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_messages(&mut self) -> Vec<(DmrMessage, usize)> {
        std::mem::take(&mut self.messages)
    }

    pub fn take_losses(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.losses)
    }
}

impl DataUnitListener for Sink {
    fn data_unit_detected(&mut self, message: DmrMessage, bit_errors: usize) {
        tracing::debug!("data_unit_detected: {} errors {}", message, bit_errors);
        self.messages.push((message, bit_errors));
    }

    fn sync_lost(&mut self, bit_errors: usize) {
        tracing::debug!("sync_lost: {}", bit_errors);
        self.losses.push(bit_errors);
    }
}
