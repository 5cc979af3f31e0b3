// src/process/mod.rs
pub mod convert;
pub mod rows;
pub mod utils;

pub use rows::{parse_range, parse_rows, ParsedRow, PriceRange, RawRow};
