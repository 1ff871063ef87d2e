pub mod currency;
pub mod error;
pub mod field_map;

pub use currency::Currency;
pub use error::{PosError, Result};
pub use field_map::{field_map, FieldMap, FieldMapExt};
