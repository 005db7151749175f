//! Placement history interchange as `x,y,scale,rotation` CSV
//!
//! The first record is the header; each following record is one placement
//! in commit order. Blank lines and whitespace around fields are ignored.
//! Floats are written in shortest round-trip form so a saved history
//! replays bit-identically.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::algorithm::history::{Placement, PlacementHistory};
use crate::io::error::{Result, StencilError};
use crate::io::image::create_parent_dir;

/// Column names of the interchange format, in order
pub const HISTORY_FIELDS: [&str; 4] = ["x", "y", "scale", "rotation"];

/// Header line of the interchange format
pub const HISTORY_HEADER: &str = "x,y,scale,rotation";

/// Write a history as header plus one row per placement
///
/// # Errors
///
/// Returns an error if writing to `writer` fails
pub fn write_history_csv<W: Write>(history: &PlacementHistory, writer: W) -> Result<()> {
    // Empty histories still carry a header
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(HISTORY_FIELDS).map_err(csv_error)?;
    for placement in history {
        csv_writer.serialize(placement).map_err(csv_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Parse a history written by [`write_history_csv`]
///
/// # Errors
///
/// Returns an error if:
/// - Reading fails
/// - The header is missing or different
/// - A row does not have four numeric fields
/// - A row carries a non-positive scale
pub fn read_history_csv<R: Read>(reader: R) -> Result<PlacementHistory> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let header = csv_reader.headers().map_err(csv_error)?.clone();
    check_header(&header)?;

    let mut history = PlacementHistory::new();
    for record in csv_reader.deserialize::<Placement>() {
        let row = record.map_err(csv_error)?;
        // Deserialization bypasses the constructor's scale check
        history.push(Placement::new(row.x, row.y, row.scale, row.rotation)?);
    }

    Ok(history)
}

fn check_header(header: &StringRecord) -> Result<()> {
    if header.iter().eq(HISTORY_FIELDS) {
        return Ok(());
    }

    let reason = if header.is_empty() {
        "missing header".to_string()
    } else {
        let found: Vec<&str> = header.iter().collect();
        format!("expected header '{HISTORY_HEADER}', found '{}'", found.join(","))
    };
    Err(StencilError::HistoryParse { line: 1, reason })
}

/// Map a csv failure onto the crate error, keeping the record's line number
fn csv_error(error: csv::Error) -> StencilError {
    let line = error
        .position()
        .map_or(0, |position| position.line() as usize);

    match error.into_kind() {
        ErrorKind::Io(source) => source.into(),
        ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => StencilError::HistoryParse {
            line,
            reason: format!("expected {expected_len} fields, found {len}"),
        },
        ErrorKind::Deserialize { err, .. } => StencilError::HistoryParse {
            line,
            reason: err.to_string(),
        },
        other => StencilError::HistoryParse {
            line,
            reason: format!("{other:?}"),
        },
    }
}

/// Save a history to a file, creating parent directories
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn save_history(history: &PlacementHistory, output_path: &Path) -> Result<()> {
    create_parent_dir(output_path)?;
    let file = File::create(output_path).map_err(|e| StencilError::FileSystem {
        path: output_path.to_path_buf(),
        operation: "create file",
        source: e,
    })?;
    write_history_csv(history, BufWriter::new(file))
}

/// Load a history from a file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed
pub fn load_history(input_path: &Path) -> Result<PlacementHistory> {
    let file = File::open(input_path).map_err(|e| StencilError::FileSystem {
        path: input_path.to_path_buf(),
        operation: "open file",
        source: e,
    })?;
    read_history_csv(file)
}
