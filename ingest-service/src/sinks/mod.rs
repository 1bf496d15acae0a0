pub mod generation_data;
pub mod load_data;

pub use generation_data::GenerationDataSink;
pub use load_data::LoadDataSink;

use crate::pipeline::IngestError;

/// A `(timestamp, target)` uniqueness violation means the upload collides
/// with existing readings (or repeats itself); everything else stays a plain
/// database error.
pub(crate) fn map_insert_error(e: sqlx::Error) -> IngestError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => IngestError::DuplicateData,
        _ => IngestError::Db(e),
    }
}
