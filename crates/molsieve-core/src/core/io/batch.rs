use crate::core::models::record::{Record, RecordError};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Field separator used when a line carries no tab characters.
const SPACE_SEPARATOR: &str = "    ";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord { line: u64, source: RecordError },
}

/// Reader and writer for tab-separated batch files.
///
/// One record per line; fields are separated by a tab, or by exactly four
/// spaces on lines that contain no tab at all. Fields are kept verbatim, so a
/// run of eight spaces yields an empty field and surrounding whitespace stays
/// part of the field. Lines holding only whitespace are skipped. Written files
/// always use tabs and no quoting, so structure notations survive unchanged.
pub struct BatchFile;

impl BatchFile {
    /// Reads every record from `reader`, keeping file order.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::MalformedRecord`] for the first line with fewer
    /// than two fields.
    pub fn read_from(reader: impl Read) -> Result<Vec<Record>, BatchError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            let line = row.position().map_or(0, |p| p.line());

            let fields: Vec<String> = if row.len() == 1 {
                split_on_spaces(&row[0])
            } else {
                row.iter().map(str::to_string).collect()
            };
            if fields.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let record =
                Record::new(fields).map_err(|source| BatchError::MalformedRecord { line, source })?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, BatchError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    /// Writes records as tab-joined lines.
    pub fn write_to<'a>(
        records: impl IntoIterator<Item = &'a Record>,
        writer: impl Write,
    ) -> Result<(), BatchError> {
        let mut csv_writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(writer);

        for record in records {
            csv_writer.write_record(record.fields())?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_to_path<'a, P: AsRef<Path>>(
        records: impl IntoIterator<Item = &'a Record>,
        path: P,
    ) -> Result<(), BatchError> {
        let file = File::create(path)?;
        Self::write_to(records, BufWriter::new(file))
    }
}

fn split_on_spaces(line: &str) -> Vec<String> {
    line.split(SPACE_SEPARATOR).map(str::to_string).collect()
}
