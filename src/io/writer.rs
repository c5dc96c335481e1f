//! CSV output writing.
//!
//! The engine hands back headerless comma-joined records; this module
//! prepends the format-appropriate header and writes the newline-terminated
//! result file in one buffered pass.

use crate::error::Result;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write header and match records to any writer, one record per line.
pub fn write_csv<W: Write>(mut writer: W, header: &str, matches: &[String]) -> Result<()> {
    writeln!(writer, "{}", header)?;
    for record in matches {
        writeln!(writer, "{}", record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write header and match records to a file path.
///
/// An existing file is truncated. The parent directory must exist.
pub fn write_csv_file<P: AsRef<Path>>(path: P, header: &str, matches: &[String]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), header, matches)?;

    info!("{} matches written to '{}'", matches.len(), path.display());
    Ok(())
}
