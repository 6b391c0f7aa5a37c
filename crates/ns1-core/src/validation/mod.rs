//! Reusable attribute validators

pub mod string_enum;

pub use string_enum::StringEnum;
