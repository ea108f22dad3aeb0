pub mod cach;
pub mod slot_type;
