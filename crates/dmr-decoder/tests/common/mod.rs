#![allow(dead_code)]

pub mod burst;
pub mod sink;

pub use burst::*;
pub use sink::Sink;
