//! Cell values and their decoding.
//!
//! This module provides the [`Value`] type stored in every row cell and the
//! [`CellValue`] trait used to read cells as typed Rust values.
mod codec;
pub use codec::CellValue;

mod value;
pub use value::Value;
