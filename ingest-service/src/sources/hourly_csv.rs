use std::io::Read;

use csv::StringRecord;

use crate::pipeline::IngestError;

/// One unvalidated CSV data row. `number` is 1-based over data rows; the
/// mandatory header row is not counted.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub number: usize,
    pub fields: StringRecord,
}

/// CSV source for hourly upload files.
///
/// Expected layout: a header row (ignored), then two columns per row:
/// - timestamp, `YYYY-MM-DD HH:MM:SS`
/// - value in megawatts
///
/// The reader is flexible about column counts so that a wrong count reaches
/// the validator as `MalformedRow` instead of a generic csv error. Fields are
/// whitespace-trimmed.
pub struct HourlyCsvSource<R: Read> {
    rdr: csv::Reader<R>,
}

impl<R: Read> HourlyCsvSource<R> {
    pub fn new(reader: R) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self { rdr }
    }

    /// Read every data row into memory, in file order. Uploads are bounded
    /// (one file per request), so there is no need to stream.
    pub fn rows(mut self) -> Result<Vec<RawRow>, IngestError> {
        let mut rows = Vec::new();
        for (idx, result) in self.rdr.records().enumerate() {
            let fields = result?;
            rows.push(RawRow {
                number: idx + 1,
                fields,
            });
        }
        Ok(rows)
    }
}
