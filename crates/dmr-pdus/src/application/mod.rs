pub mod ars;
pub mod lrrp;

use core::fmt;

use ars::ArsPacket;
use lrrp::LrrpPacket;

/// Application layer view of a reassembled packet, selected by its MNIS header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationPayload {
    Ars(ArsPacket),
    Lrrp(LrrpPacket),
}

impl fmt::Display for ApplicationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationPayload::Ars(p) => write!(f, "{}", p),
            ApplicationPayload::Lrrp(p) => write!(f, "{}", p),
        }
    }
}
