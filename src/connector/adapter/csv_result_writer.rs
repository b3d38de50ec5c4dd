use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::ResultWriter;
use crate::domain::{DomainError, RankedResult, RESULT_HEADER};

/// Writes a run as comma-separated values with a header row.
///
/// Rows go to a sibling temporary file which replaces the target only once
/// every row has been written.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvResultWriter;

impl CsvResultWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_to<W: Write>(&self, out: W, results: &[RankedResult]) -> Result<(), DomainError> {
        let mut out = BufWriter::new(out);

        write_row(&mut out, RESULT_HEADER.iter().copied())?;
        for result in results {
            let fields = result.fields();
            write_row(&mut out, fields.iter().map(String::as_str))?;
        }

        out.flush()?;
        Ok(())
    }
}

impl ResultWriter for CsvResultWriter {
    fn write(&self, path: &Path, results: &[RankedResult]) -> Result<(), DomainError> {
        let partial = partial_path(path)?;
        debug!("Writing {} rows via {}", results.len(), partial.display());

        let written = File::create(&partial)
            .map_err(DomainError::from)
            .and_then(|file| self.write_to(file, results))
            .and_then(|()| fs::rename(&partial, path).map_err(DomainError::from));

        if written.is_err() {
            let _ = fs::remove_file(&partial);
        }
        written
    }
}

fn partial_path(path: &Path) -> Result<PathBuf, DomainError> {
    let name = path
        .file_name()
        .ok_or_else(|| DomainError::invalid_input(format!("Not a file path: {}", path.display())))?;

    let mut partial = OsString::from(".");
    partial.push(name);
    partial.push(".partial");
    Ok(path.with_file_name(partial))
}

fn write_row<'a, W: Write>(
    out: &mut W,
    fields: impl Iterator<Item = &'a str>,
) -> Result<(), DomainError> {
    let line = fields.map(escape_field).collect::<Vec<_>>().join(",");
    writeln!(out, "{}", line)?;
    Ok(())
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
