pub mod application_type;
pub mod csbk_opcode;
pub mod data_packet_format;
pub mod data_type;
pub mod feature_set_id;
pub mod reason;
