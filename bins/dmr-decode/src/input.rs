use std::io::Read;

use dmr_config::InputFormat;
use dmr_core::Dibit;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid character {found:?} at offset {offset}, expected 0-3")]
    InvalidSymbol { offset: usize, found: char },
}

/// One dibit per byte, value in the two low bits
pub fn parse_bytes(data: &[u8]) -> Vec<Dibit> {
    data.iter().map(|b| Dibit::from_value(*b)).collect()
}

/// ASCII digits 0..3, whitespace skipped
pub fn parse_ascii(data: &[u8]) -> Result<Vec<Dibit>, InputError> {
    let mut dibits = Vec::with_capacity(data.len());
    for (offset, b) in data.iter().enumerate() {
        match b {
            b'0'..=b'3' => dibits.push(Dibit::from_value(b - b'0')),
            b if b.is_ascii_whitespace() => {}
            other => return Err(InputError::InvalidSymbol { offset, found: *other as char }),
        }
    }
    Ok(dibits)
}

pub fn read_dibits<R: Read>(mut reader: R, format: InputFormat) -> Result<Vec<Dibit>, InputError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    match format {
        InputFormat::Bytes => Ok(parse_bytes(&data)),
        InputFormat::Ascii => parse_ascii(&data),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_use_low_bits() {
        assert_eq!(parse_bytes(&[0x00, 0x07, 0xFE]), vec![Dibit::D00Plus1, Dibit::D11Minus3, Dibit::D10Minus1]);
    }

    #[test]
    fn test_ascii_skips_whitespace() {
        let dibits = read_dibits("01 2\n3".as_bytes(), InputFormat::Ascii).unwrap();
        assert_eq!(dibits, vec![Dibit::D00Plus1, Dibit::D01Plus3, Dibit::D10Minus1, Dibit::D11Minus3]);
    }

    #[test]
    fn test_ascii_rejects_other_digits() {
        match parse_ascii(b"0124") {
            Err(InputError::InvalidSymbol { offset, found }) => {
                assert_eq!(offset, 3);
                assert_eq!(found, '4');
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
