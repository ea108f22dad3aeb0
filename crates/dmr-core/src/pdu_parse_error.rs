/// Errors raised while reading typed fields out of an already framed burst.
#[derive(Debug, PartialEq, Eq)]
pub enum PduParseErr {
    /// A field read ran past the end of the buffer
    BufferEnded { field: Option<&'static str> },
    /// A field holds a value with no meaning for the message being parsed
    InvalidValue { field: &'static str, value: u64 },
    /// Buffer length differs from the fixed length of the message type
    InconsistentLength { expected: usize, found: usize },
}

/// Checks whether a buffer has the exact fixed length of a message type.
/// If not, returns PduParseErr::InconsistentLength
#[macro_export]
macro_rules! expect_len {
    ($buf:expr, $expected:expr) => {{
        let found = $buf.get_len();
        if found == $expected {
            Ok(())
        } else {
            Err($crate::pdu_parse_error::PduParseErr::InconsistentLength {
                expected: $expected,
                found,
            })
        }
    }};
}

#[macro_export]
macro_rules! let_field {
    ($buf:expr, $ident:ident, $bits:expr) => {
        let $ident = $buf.read_field($bits, stringify!($ident))?;
    };
}
