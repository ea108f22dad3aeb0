use super::feature_set_id::FeatureSetId;

/// CSBK opcodes from ETSI TS 102 361-2 clause 7.2 and TS 102 361-4 clause 7.1.
/// Opcodes are only meaningful together with the feature set they belong to;
/// anything outside the standard feature set is kept as a raw proprietary opcode.
/// Bits: 6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsbkOpcode {
    UnitToUnitVoiceRequest,
    UnitToUnitAnswerResponse,
    ChannelTiming,
    Aloha,
    Ahoy,
    NegativeAcknowledge,
    Broadcast,
    BsOutboundActivation,
    Preamble,
    /// Standard feature set, opcode not modelled here
    Other(u8),
    Proprietary { vendor: FeatureSetId, opcode: u8 },
}

impl CsbkOpcode {
    pub fn from_raw(opcode: u8, vendor: FeatureSetId) -> Self {
        if vendor != FeatureSetId::Standard {
            return CsbkOpcode::Proprietary { vendor, opcode };
        }
        match opcode {
            0x04 => CsbkOpcode::UnitToUnitVoiceRequest,
            0x05 => CsbkOpcode::UnitToUnitAnswerResponse,
            0x07 => CsbkOpcode::ChannelTiming,
            0x19 => CsbkOpcode::Aloha,
            0x1C => CsbkOpcode::Ahoy,
            0x26 => CsbkOpcode::NegativeAcknowledge,
            0x28 => CsbkOpcode::Broadcast,
            0x38 => CsbkOpcode::BsOutboundActivation,
            0x3D => CsbkOpcode::Preamble,
            _ => CsbkOpcode::Other(opcode),
        }
    }

    /// Raw 6-bit opcode value
    pub fn into_raw(self) -> u8 {
        match self {
            CsbkOpcode::UnitToUnitVoiceRequest => 0x04,
            CsbkOpcode::UnitToUnitAnswerResponse => 0x05,
            CsbkOpcode::ChannelTiming => 0x07,
            CsbkOpcode::Aloha => 0x19,
            CsbkOpcode::Ahoy => 0x1C,
            CsbkOpcode::NegativeAcknowledge => 0x26,
            CsbkOpcode::Broadcast => 0x28,
            CsbkOpcode::BsOutboundActivation => 0x38,
            CsbkOpcode::Preamble => 0x3D,
            CsbkOpcode::Other(x) => x,
            CsbkOpcode::Proprietary { opcode, .. } => opcode,
        }
    }

    pub fn vendor(self) -> FeatureSetId {
        match self {
            CsbkOpcode::Proprietary { vendor, .. } => vendor,
            _ => FeatureSetId::Standard,
        }
    }
}

impl core::fmt::Display for CsbkOpcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CsbkOpcode::UnitToUnitVoiceRequest => write!(f, "UU_V_REQ"),
            CsbkOpcode::UnitToUnitAnswerResponse => write!(f, "UU_ANS_RSP"),
            CsbkOpcode::ChannelTiming => write!(f, "CT_CSBK"),
            CsbkOpcode::Aloha => write!(f, "C_ALOHA"),
            CsbkOpcode::Ahoy => write!(f, "C_AHOY"),
            CsbkOpcode::NegativeAcknowledge => write!(f, "C_NACK_RSP"),
            CsbkOpcode::Broadcast => write!(f, "C_BCAST"),
            CsbkOpcode::BsOutboundActivation => write!(f, "BS_DWN_ACT"),
            CsbkOpcode::Preamble => write!(f, "PRE_CSBK"),
            CsbkOpcode::Other(x) => write!(f, "OPCODE {:02X}", x),
            CsbkOpcode::Proprietary { vendor, opcode } => write!(f, "{} OPCODE {:02X}", vendor, opcode),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_scopes_opcode() {
        assert_eq!(CsbkOpcode::from_raw(0x3D, FeatureSetId::Standard), CsbkOpcode::Preamble);
        let prop = CsbkOpcode::from_raw(0x3D, FeatureSetId::Motorola);
        assert_eq!(prop, CsbkOpcode::Proprietary { vendor: FeatureSetId::Motorola, opcode: 0x3D });
        assert_eq!(prop.into_raw(), 0x3D);
        assert_eq!(prop.vendor(), FeatureSetId::Motorola);
        assert_eq!(CsbkOpcode::from_raw(0x3F, FeatureSetId::Standard), CsbkOpcode::Other(0x3F));
    }
}
