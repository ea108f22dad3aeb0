/// Clause 9.3.17 Table 9.45: Data Packet Format (DPF)
/// Bits: 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataPacketFormat {
    UnifiedDataTransport,
    Response,
    Unconfirmed,
    Confirmed,
    ShortDataDefined,
    ShortDataRaw,
    Proprietary,
    Reserved(u8),
}

impl std::convert::TryFrom<u64> for DataPacketFormat {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(DataPacketFormat::UnifiedDataTransport),
            1 => Ok(DataPacketFormat::Response),
            2 => Ok(DataPacketFormat::Unconfirmed),
            3 => Ok(DataPacketFormat::Confirmed),
            13 => Ok(DataPacketFormat::ShortDataDefined),
            14 => Ok(DataPacketFormat::ShortDataRaw),
            15 => Ok(DataPacketFormat::Proprietary),
            4..=12 => Ok(DataPacketFormat::Reserved(x as u8)),
            _ => Err(()),
        }
    }
}

impl DataPacketFormat {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            DataPacketFormat::UnifiedDataTransport => 0,
            DataPacketFormat::Response => 1,
            DataPacketFormat::Unconfirmed => 2,
            DataPacketFormat::Confirmed => 3,
            DataPacketFormat::ShortDataDefined => 13,
            DataPacketFormat::ShortDataRaw => 14,
            DataPacketFormat::Proprietary => 15,
            DataPacketFormat::Reserved(x) => x as u64,
        }
    }
}

impl From<DataPacketFormat> for u64 {
    fn from(e: DataPacketFormat) -> Self { e.into_raw() }
}

impl core::fmt::Display for DataPacketFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataPacketFormat::UnifiedDataTransport => write!(f, "UDT"),
            DataPacketFormat::Response => write!(f, "RESPONSE"),
            DataPacketFormat::Unconfirmed => write!(f, "UNCONFIRMED"),
            DataPacketFormat::Confirmed => write!(f, "CONFIRMED"),
            DataPacketFormat::ShortDataDefined => write!(f, "SHORT DATA DEFINED"),
            DataPacketFormat::ShortDataRaw => write!(f, "SHORT DATA RAW"),
            DataPacketFormat::Proprietary => write!(f, "PROPRIETARY"),
            DataPacketFormat::Reserved(x) => write!(f, "RESERVED({})", x),
        }
    }
}
