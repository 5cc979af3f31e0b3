use crate::process::utils;
use arrow::array::{ArrayRef, Float64Builder, StringArray};
use std::sync::Arc;

/// Coerce a column of optional value texts into Float64; text that does not
/// parse as a finite number becomes null.
pub fn coerce_to_f64<'a, I>(cells: I) -> ArrayRef
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut b = Float64Builder::new();
    for opt in cells {
        let v = opt.and_then(|s| utils::parse_price(&utils::clean_str(s)));
        b.append_option(v);
    }
    Arc::new(b.finish()) as ArrayRef
}

/// Build a Float64 column from values that are already numeric.
pub fn f64_column<I>(cells: I) -> ArrayRef
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut b = Float64Builder::new();
    for v in cells {
        b.append_option(v);
    }
    Arc::new(b.finish()) as ArrayRef
}

/// Build a non-null Utf8 column.
pub fn utf8_column<'a, I>(cells: I) -> ArrayRef
where
    I: IntoIterator<Item = &'a str>,
{
    Arc::new(cells.into_iter().map(Some).collect::<StringArray>()) as ArrayRef
}
