pub mod generation;
pub mod hierarchy;
pub mod meter;

pub use generation::{GenerationDataPoint, GenerationSource};
pub use hierarchy::{Building, Customer, Facility};
pub use meter::{LoadDataPoint, Meter};
