pub mod arrow;
pub mod identity;
pub mod sequence;
pub mod types;

pub use self::arrow::{build_arrow_schema, layout_columns, OutputColumn};
pub use identity::ColumnResolver;
pub use sequence::ColumnSequence;
pub use types::{ColumnKey, AVERAGE_CITY, CITY_COLUMN, COUNTRY_COLUMN};
