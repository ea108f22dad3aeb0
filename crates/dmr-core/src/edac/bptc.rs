//! BPTC(196,96) block product turbo code, ETSI TS 102 361-1 Annex B.1.1.
//! 196 interleaved bits form a 13x15 matrix behind one leading reserved bit.
//! Rows 0..9 carry 11 data columns plus Hamming(15,11,3) parity, rows 9..13 carry
//! Hamming(13,9,3) column parity. Only data extraction is done on receive.

use crate::{BitBuffer, PduParseErr, expect_len};

pub const BPTC_196_96_CODED_BITS: usize = 196;
pub const BPTC_196_96_DATA_BITS: usize = 96;

const ROWS: usize = 13;
const COLS: usize = 15;
const DATA_ROWS: usize = 9;
const DATA_COLS: usize = 11;

/// Matrix index of (row, col), skipping the leading reserved bit
#[inline]
const fn matrix_index(row: usize, col: usize) -> usize {
    1 + row * COLS + col
}

/// Interleaver: matrix position `i` travels at air position `(i * 181) % 196`
#[inline]
const fn air_index(i: usize) -> usize {
    (i * 181) % BPTC_196_96_CODED_BITS
}

/// Data bit positions in the matrix, in transmit order.
/// Row 0 starts with three reserved bits, all other data rows hold 11 data bits.
fn data_positions() -> impl Iterator<Item = usize> {
    (0..DATA_ROWS).flat_map(|row| {
        let first_col = if row == 0 { 3 } else { 0 };
        (first_col..DATA_COLS).map(move |col| matrix_index(row, col))
    })
}

/// Deinterleaves 196 received bits and returns the 96 data bits.
/// Hamming parity is not checked; blocks carrying a CRC are validated further up.
pub fn decode_196_96(coded: &BitBuffer) -> Result<BitBuffer, PduParseErr> {
    expect_len!(coded, BPTC_196_96_CODED_BITS)?;

    let mut matrix = [0u8; BPTC_196_96_CODED_BITS];
    for (i, m) in matrix.iter_mut().enumerate() {
        *m = coded.peek_bit(air_index(i)).unwrap_or(0);
    }

    let mut data = BitBuffer::new(BPTC_196_96_DATA_BITS);
    for pos in data_positions() {
        data.write_bit(matrix[pos]);
    }
    data.seek(0);
    Ok(data)
}

/// Hamming(15,11,3) parity over one row of data bits
fn hamming_15_11_parity(d: &[u8; DATA_COLS]) -> [u8; 4] {
    [
        d[0] ^ d[1] ^ d[2] ^ d[3] ^ d[5] ^ d[7] ^ d[8],
        d[1] ^ d[2] ^ d[3] ^ d[4] ^ d[6] ^ d[8] ^ d[9],
        d[2] ^ d[3] ^ d[4] ^ d[5] ^ d[7] ^ d[9] ^ d[10],
        d[0] ^ d[1] ^ d[2] ^ d[4] ^ d[6] ^ d[7] ^ d[10],
    ]
}

/// Hamming(13,9,3) parity over one column of data bits
fn hamming_13_9_parity(d: &[u8; DATA_ROWS]) -> [u8; 4] {
    [
        d[0] ^ d[1] ^ d[3] ^ d[5] ^ d[6],
        d[0] ^ d[1] ^ d[2] ^ d[4] ^ d[6] ^ d[7],
        d[0] ^ d[1] ^ d[2] ^ d[3] ^ d[5] ^ d[7] ^ d[8],
        d[0] ^ d[2] ^ d[4] ^ d[5] ^ d[8],
    ]
}

/// Encodes 96 data bits into 196 interleaved air bits, reserved bits zero.
pub fn encode_196_96(data: &BitBuffer) -> Result<BitBuffer, PduParseErr> {
    expect_len!(data, BPTC_196_96_DATA_BITS)?;

    let mut matrix = [0u8; BPTC_196_96_CODED_BITS];
    for (i, pos) in data_positions().enumerate() {
        matrix[pos] = data.peek_bit(i).unwrap_or(0);
    }

    for row in 0..DATA_ROWS {
        let mut d = [0u8; DATA_COLS];
        for (col, bit) in d.iter_mut().enumerate() {
            *bit = matrix[matrix_index(row, col)];
        }
        for (k, p) in hamming_15_11_parity(&d).into_iter().enumerate() {
            matrix[matrix_index(row, DATA_COLS + k)] = p;
        }
    }

    for col in 0..COLS {
        let mut d = [0u8; DATA_ROWS];
        for (row, bit) in d.iter_mut().enumerate() {
            *bit = matrix[matrix_index(row, col)];
        }
        for (k, p) in hamming_13_9_parity(&d).into_iter().enumerate() {
            matrix[matrix_index(DATA_ROWS + k, col)] = p;
        }
    }
    debug_assert_eq!(matrix_index(ROWS - 1, COLS - 1), BPTC_196_96_CODED_BITS - 1);

    let mut air = [0u8; BPTC_196_96_CODED_BITS];
    for (i, &bit) in matrix.iter().enumerate() {
        air[air_index(i)] = bit;
    }
    Ok(BitBuffer::from_bitarr(&air))
}
