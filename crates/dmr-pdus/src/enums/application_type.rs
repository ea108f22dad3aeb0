/// Application carried by a packet announced with a Motorola MNIS proprietary header
/// Bits: 8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationType {
    /// Automatic registration service
    Ars,
    /// Location request/response protocol
    Lrrp,
    /// Text messaging service
    Tms,
    Unknown(u8),
}

impl ApplicationType {
    pub fn from_raw(x: u8) -> Self {
        match x {
            0x01 => ApplicationType::Ars,
            0x02 => ApplicationType::Lrrp,
            0x03 => ApplicationType::Tms,
            _ => ApplicationType::Unknown(x),
        }
    }

    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u8 {
        match self {
            ApplicationType::Ars => 0x01,
            ApplicationType::Lrrp => 0x02,
            ApplicationType::Tms => 0x03,
            ApplicationType::Unknown(x) => x,
        }
    }
}

impl core::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApplicationType::Ars => write!(f, "ARS"),
            ApplicationType::Lrrp => write!(f, "LRRP"),
            ApplicationType::Tms => write!(f, "TMS"),
            ApplicationType::Unknown(x) => write!(f, "UNKNOWN({:02X})", x),
        }
    }
}
