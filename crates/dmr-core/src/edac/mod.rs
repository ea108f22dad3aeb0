pub mod bptc;
pub mod crc16;
