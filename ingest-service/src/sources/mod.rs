pub mod hourly_csv;

pub use hourly_csv::{HourlyCsvSource, RawRow};
