/// Clause 9.3.6 Table 9.15: Data Type information element definitions
/// Bits: 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    PiHeader,
    VoiceLcHeader,
    TerminatorWithLc,
    Csbk,
    MbcHeader,
    MbcContinuation,
    DataHeader,
    Rate12Data,
    Rate34Data,
    Idle,
    Rate1Data,
    UnifiedSingleBlockData,
    Reserved(u8),
}

impl std::convert::TryFrom<u64> for DataType {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(DataType::PiHeader),
            1 => Ok(DataType::VoiceLcHeader),
            2 => Ok(DataType::TerminatorWithLc),
            3 => Ok(DataType::Csbk),
            4 => Ok(DataType::MbcHeader),
            5 => Ok(DataType::MbcContinuation),
            6 => Ok(DataType::DataHeader),
            7 => Ok(DataType::Rate12Data),
            8 => Ok(DataType::Rate34Data),
            9 => Ok(DataType::Idle),
            10 => Ok(DataType::Rate1Data),
            11 => Ok(DataType::UnifiedSingleBlockData),
            12..=15 => Ok(DataType::Reserved(x as u8)),
            _ => Err(()),
        }
    }
}

impl DataType {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        match self {
            DataType::PiHeader => 0,
            DataType::VoiceLcHeader => 1,
            DataType::TerminatorWithLc => 2,
            DataType::Csbk => 3,
            DataType::MbcHeader => 4,
            DataType::MbcContinuation => 5,
            DataType::DataHeader => 6,
            DataType::Rate12Data => 7,
            DataType::Rate34Data => 8,
            DataType::Idle => 9,
            DataType::Rate1Data => 10,
            DataType::UnifiedSingleBlockData => 11,
            DataType::Reserved(x) => x as u64,
        }
    }
}

impl From<DataType> for u64 {
    fn from(e: DataType) -> Self { e.into_raw() }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataType::PiHeader => write!(f, "PI HEADER"),
            DataType::VoiceLcHeader => write!(f, "VOICE LC HEADER"),
            DataType::TerminatorWithLc => write!(f, "TERMINATOR WITH LC"),
            DataType::Csbk => write!(f, "CSBK"),
            DataType::MbcHeader => write!(f, "MBC HEADER"),
            DataType::MbcContinuation => write!(f, "MBC CONTINUATION"),
            DataType::DataHeader => write!(f, "DATA HEADER"),
            DataType::Rate12Data => write!(f, "RATE 1/2 DATA"),
            DataType::Rate34Data => write!(f, "RATE 3/4 DATA"),
            DataType::Idle => write!(f, "IDLE"),
            DataType::Rate1Data => write!(f, "RATE 1 DATA"),
            DataType::UnifiedSingleBlockData => write!(f, "USBD"),
            DataType::Reserved(x) => write!(f, "RESERVED({})", x),
        }
    }
}
