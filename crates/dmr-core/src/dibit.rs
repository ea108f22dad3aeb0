use core::fmt;

/// One 4FSK channel symbol carrying two bits.
/// Named after the bit pair and the deviation it is transmitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Dibit {
    #[default]
    D00Plus1 = 0,
    D01Plus3 = 1,
    D10Minus1 = 2,
    D11Minus3 = 3,
}

impl Dibit {
    /// Maps the two low bits of `value` onto a dibit. Higher bits are ignored.
    pub const fn from_value(value: u8) -> Dibit {
        match value & 0x3 {
            0 => Dibit::D00Plus1,
            1 => Dibit::D01Plus3,
            2 => Dibit::D10Minus1,
            _ => Dibit::D11Minus3,
        }
    }

    pub fn from_bits(bit1: bool, bit2: bool) -> Dibit {
        Dibit::from_value(((bit1 as u8) << 1) | bit2 as u8)
    }

    /// 2-bit value, bit1 in the high position
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// First transmitted (most significant) bit
    #[inline]
    pub const fn bit1(self) -> bool {
        (self as u8) & 0x2 != 0
    }

    /// Second transmitted (least significant) bit
    #[inline]
    pub const fn bit2(self) -> bool {
        (self as u8) & 0x1 != 0
    }
}

impl TryFrom<u64> for Dibit {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        if x > 3 {
            return Err(());
        }
        Ok(Dibit::from_value(x as u8))
    }
}

impl fmt::Display for Dibit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dibit::D00Plus1 => write!(f, "+1"),
            Dibit::D01Plus3 => write!(f, "+3"),
            Dibit::D10Minus1 => write!(f, "-1"),
            Dibit::D11Minus3 => write!(f, "-3"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_roundtrip_all_symbols() {
        for v in 0..4u8 {
            let d = Dibit::from_value(v);
            assert_eq!(d.value(), v);
            assert_eq!(Dibit::from_bits(d.bit1(), d.bit2()), d);
        }
        assert!(Dibit::D10Minus1.bit1());
        assert!(!Dibit::D10Minus1.bit2());
        assert_eq!(Dibit::try_from(4u64), Err(()));
    }
}
