//! Byte-level helpers shared by the volume and extension layers

pub mod datetime;
pub mod string;
