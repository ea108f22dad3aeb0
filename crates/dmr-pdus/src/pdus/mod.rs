pub mod csbk;
pub mod data_block;
pub mod data_header;
