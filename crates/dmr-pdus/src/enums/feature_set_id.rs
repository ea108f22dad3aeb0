/// Feature set ID (FID), the vendor owning an opcode space.
/// ETSI TS 102 361-2 clause 7.2.4, values assigned by the DMR Association.
/// Bits: 8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSetId {
    Standard,
    Motorola,
    Hytera,
    Other(u8),
}

impl FeatureSetId {
    pub fn from_raw(x: u8) -> Self {
        match x {
            0x00 => FeatureSetId::Standard,
            0x10 => FeatureSetId::Motorola,
            0x68 => FeatureSetId::Hytera,
            _ => FeatureSetId::Other(x),
        }
    }

    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u8 {
        match self {
            FeatureSetId::Standard => 0x00,
            FeatureSetId::Motorola => 0x10,
            FeatureSetId::Hytera => 0x68,
            FeatureSetId::Other(x) => x,
        }
    }
}

impl core::fmt::Display for FeatureSetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FeatureSetId::Standard => write!(f, "STANDARD"),
            FeatureSetId::Motorola => write!(f, "MOTOROLA"),
            FeatureSetId::Hytera => write!(f, "HYTERA"),
            FeatureSetId::Other(x) => write!(f, "FID {:02X}", x),
        }
    }
}
