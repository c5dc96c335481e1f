//! Accession extraction from a best-BLAST-hit CSV.
//!
//! The upstream pipeline emits a CSV of best BLAST hits whose third column
//! holds UniProtKB accessions. This reader pulls that column, skipping the
//! header line and de-duplicating while preserving first-seen order.

use crate::error::{IdseekError, Result};
use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Zero-based CSV column holding the UniProt accession.
const ACCESSION_COLUMN: usize = 2;

/// Read the distinct UniProt accessions from a best-hit CSV.
///
/// Rows without an accession column are skipped with a warning.
///
/// # Errors
///
/// Fails if the file cannot be read or contains no usable accessions.
///
/// # Examples
///
/// ```no_run
/// use idseek::io::read_accessions;
///
/// # fn main() -> idseek::Result<()> {
/// let accessions = read_accessions("best_hits.csv")?;
/// # Ok(())
/// # }
/// ```
pub fn read_accessions<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut seen = std::collections::HashSet::new();
    let mut accessions = Vec::new();

    // First line is the CSV header.
    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        match line.split(',').nth(ACCESSION_COLUMN) {
            Some(raw) => {
                let accession = raw.trim();
                if accession.is_empty() {
                    warn!("no accession in column 3 at line {} of '{}'", idx + 1, path.display());
                    continue;
                }
                if seen.insert(accession.to_string()) {
                    accessions.push(accession.to_string());
                }
            }
            None => {
                warn!("no accession in column 3 at line {} of '{}'", idx + 1, path.display());
            }
        }
    }

    if accessions.is_empty() {
        return Err(IdseekError::EmptyAccessions(path.display().to_string()));
    }

    info!(
        "extracted {} distinct UniProt accessions from '{}'",
        accessions.len(),
        path.display()
    );

    Ok(accessions)
}
