use time::{macros::format_description, PrimitiveDateTime};

use crate::pipeline::{HourlyReading, IngestError};
use crate::sources::RawRow;

/// Pure validation of one raw CSV row.
///
/// Rules:
/// - exactly two columns;
/// - column 0 is a `YYYY-MM-DD HH:MM:SS` timestamp on an exact hour boundary;
/// - column 1 is a decimal megawatt value.
pub fn validate_row(row: &RawRow) -> Result<HourlyReading, IngestError> {
    if row.fields.len() != 2 {
        return Err(IngestError::MalformedRow {
            row: row.number,
            found: row.fields.len(),
        });
    }

    let ts_text = &row.fields[0];
    let value_text = &row.fields[1];

    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let timestamp = PrimitiveDateTime::parse(ts_text, &format).map_err(|e| {
        IngestError::InvalidValue {
            row: row.number,
            reason: format!("invalid timestamp '{ts_text}': {e}"),
        }
    })?;

    if timestamp.minute() != 0 || timestamp.second() != 0 {
        return Err(IngestError::InvalidValue {
            row: row.number,
            reason: "not hourly".to_string(),
        });
    }

    let value_mw: f64 = value_text.parse().map_err(|e| IngestError::InvalidValue {
        row: row.number,
        reason: format!("invalid value '{value_text}': {e}"),
    })?;

    Ok(HourlyReading {
        timestamp,
        value_mw,
    })
}

/// Validate a whole upload, fail-fast: the first bad row aborts before any
/// database interaction.
pub fn validate_batch(rows: &[RawRow]) -> Result<Vec<HourlyReading>, IngestError> {
    let mut readings = Vec::with_capacity(rows.len());
    for row in rows {
        match validate_row(row) {
            Ok(reading) => readings.push(reading),
            Err(e) => {
                metrics::counter!("ingest_rows_rejected_total").increment(1);
                return Err(e);
            }
        }
    }
    Ok(readings)
}
