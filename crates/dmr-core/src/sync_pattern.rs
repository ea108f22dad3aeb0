use core::fmt;

use crate::Dibit;

/// Significant bits of a sync pattern window
pub const SYNC_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// Who transmitted a data burst, as told by its sync pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    BaseStation,
    MobileStation,
    DirectTs1,
    DirectTs2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCategory {
    Voice,
    Data(DataSource),
    ReverseChannel,
}

/// Carrier phase hypothesis under which a sync was recognised.
/// Anything other than Normal means the PLL locked onto a rotated constellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseHypothesis {
    Normal,
    Plus90,
    Minus90,
    Inverted,
}

impl PhaseHypothesis {
    /// Hypothesis undoing this one
    pub const fn inverse(self) -> Self {
        match self {
            PhaseHypothesis::Plus90 => PhaseHypothesis::Minus90,
            PhaseHypothesis::Minus90 => PhaseHypothesis::Plus90,
            other => other,
        }
    }

    /// Dibit as seen under this phase error
    pub const fn apply(self, dibit: Dibit) -> Dibit {
        Dibit::from_value(rotate_dibit(dibit.value() as u64, self) as u8)
    }
}

/// Clause 9.1.1 Table 9.2: SYNC patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPattern {
    BaseStationVoice,
    BaseStationData,
    MobileStationVoice,
    MobileStationData,
    MobileStationReverseChannel,
    DirectModeVoiceTs1,
    DirectModeDataTs1,
    DirectModeVoiceTs2,
    DirectModeDataTs2,
}

/// All patterns in the order they are tested
pub const SYNC_PATTERNS: [SyncPattern; 9] = [
    SyncPattern::BaseStationVoice,
    SyncPattern::BaseStationData,
    SyncPattern::MobileStationVoice,
    SyncPattern::MobileStationData,
    SyncPattern::MobileStationReverseChannel,
    SyncPattern::DirectModeVoiceTs1,
    SyncPattern::DirectModeDataTs1,
    SyncPattern::DirectModeVoiceTs2,
    SyncPattern::DirectModeDataTs2,
];

impl SyncPattern {
    /// 48-bit pattern value, first transmitted dibit in the most significant position
    pub const fn pattern(self) -> u64 {
        match self {
            SyncPattern::BaseStationVoice => 0x755F_D7DF_75F7,
            SyncPattern::BaseStationData => 0xDFF5_7D75_DF5D,
            SyncPattern::MobileStationVoice => 0x7F7D_5DD5_7DFD,
            SyncPattern::MobileStationData => 0xD5D7_F77F_D757,
            SyncPattern::MobileStationReverseChannel => 0x77D5_5F7D_FD77,
            SyncPattern::DirectModeVoiceTs1 => 0x5D57_7F77_57FF,
            SyncPattern::DirectModeDataTs1 => 0xF7FD_D5DD_FD55,
            SyncPattern::DirectModeVoiceTs2 => 0x7DFF_D5F5_5D5F,
            SyncPattern::DirectModeDataTs2 => 0xD755_7F5F_F7F5,
        }
    }

    pub const fn category(self) -> SyncCategory {
        match self {
            SyncPattern::BaseStationVoice
            | SyncPattern::MobileStationVoice
            | SyncPattern::DirectModeVoiceTs1
            | SyncPattern::DirectModeVoiceTs2 => SyncCategory::Voice,
            SyncPattern::BaseStationData => SyncCategory::Data(DataSource::BaseStation),
            SyncPattern::MobileStationData => SyncCategory::Data(DataSource::MobileStation),
            SyncPattern::DirectModeDataTs1 => SyncCategory::Data(DataSource::DirectTs1),
            SyncPattern::DirectModeDataTs2 => SyncCategory::Data(DataSource::DirectTs2),
            SyncPattern::MobileStationReverseChannel => SyncCategory::ReverseChannel,
        }
    }

    /// Pattern as received with the given carrier phase error
    pub const fn rotated(self, phase: PhaseHypothesis) -> u64 {
        rotate_pattern(self.pattern(), phase)
    }

    pub const fn plus90_pattern(self) -> u64 {
        self.rotated(PhaseHypothesis::Plus90)
    }

    pub const fn minus90_pattern(self) -> u64 {
        self.rotated(PhaseHypothesis::Minus90)
    }

    pub const fn inverted_pattern(self) -> u64 {
        self.rotated(PhaseHypothesis::Inverted)
    }
}

impl fmt::Display for SyncPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPattern::BaseStationVoice => write!(f, "BS VOICE"),
            SyncPattern::BaseStationData => write!(f, "BS DATA"),
            SyncPattern::MobileStationVoice => write!(f, "MS VOICE"),
            SyncPattern::MobileStationData => write!(f, "MS DATA"),
            SyncPattern::MobileStationReverseChannel => write!(f, "MS RC"),
            SyncPattern::DirectModeVoiceTs1 => write!(f, "DM TS1 VOICE"),
            SyncPattern::DirectModeDataTs1 => write!(f, "DM TS1 DATA"),
            SyncPattern::DirectModeVoiceTs2 => write!(f, "DM TS2 VOICE"),
            SyncPattern::DirectModeDataTs2 => write!(f, "DM TS2 DATA"),
        }
    }
}

/// Maps one dibit onto the dibit seen with the given phase error.
/// Symbols: +1 = 00, +3 = 01, -1 = 10, -3 = 11. A +90 step moves
/// +3 -> +1 -> -1 -> -3 -> +3, Minus90 is its inverse.
/// Inverted is a polarity swap (+3 <-> -3, +1 <-> -1) as produced by a reversed discriminator.
const fn rotate_dibit(dibit: u64, phase: PhaseHypothesis) -> u64 {
    match phase {
        PhaseHypothesis::Normal => dibit,
        PhaseHypothesis::Plus90 => match dibit {
            0b01 => 0b00,
            0b00 => 0b10,
            0b10 => 0b11,
            _ => 0b01,
        },
        PhaseHypothesis::Minus90 => match dibit {
            0b00 => 0b01,
            0b10 => 0b00,
            0b11 => 0b10,
            _ => 0b11,
        },
        PhaseHypothesis::Inverted => dibit ^ 0b10,
    }
}

const fn rotate_pattern(pattern: u64, phase: PhaseHypothesis) -> u64 {
    let mut out = 0u64;
    let mut i = 0;
    while i < 24 {
        let shift = 2 * i;
        out |= rotate_dibit((pattern >> shift) & 0x3, phase) << shift;
        i += 1;
    }
    out
}
