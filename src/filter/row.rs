//! Per-row filtering and projection for the two mapping layouts.
//!
//! The [`RowFilter`] trait is the seam between the concurrent engine and the
//! format-specific row logic: the engine moves batches of lines around, a
//! `RowFilter` decides which lines survive and what each match looks like.
//!
//! Membership tests run on whitespace-trimmed column values; projected output
//! keeps the raw field text.

use crate::error::{IdseekError, Result};
use crate::filter::membership::MembershipSet;
use crate::formats::MappingFormat;
use log::warn;

/// Decides whether a mapping-file row matches and projects it into a CSV record.
///
/// Implementations must be shareable across worker threads.
pub trait RowFilter: Send + Sync {
    /// Filter one row. Returns the serialized match record, or `None` when
    /// the row does not match. Malformed rows (too few columns) are skipped
    /// with a warning, never an error.
    fn filter_row(&self, line: &str, line_number: usize) -> Option<String>;

    /// Expected number of matching rows per accession, used by the
    /// early-stop heuristic. This is an assumption about the input, not a
    /// guarantee: the free-form file tends to carry two entries per
    /// accession for a typical id-type request, the fixed-column file
    /// exactly one row.
    fn match_multiplicity(&self) -> usize;

    /// Size of the accession set being filtered for.
    fn accession_count(&self) -> usize;
}

/// Filter for the free-form `idmapping.dat` layout.
///
/// A line `accession<TAB>idtype<TAB>id` matches when its id-type is one of
/// the requested labels AND its accession is in the accession set. The match
/// record is the input line with the two tabs replaced by commas.
pub struct DatFilter {
    id_types: MembershipSet,
    accessions: MembershipSet,
}

impl DatFilter {
    /// Create a filter over the requested id-type labels and accession set.
    pub fn new(id_types: MembershipSet, accessions: MembershipSet) -> Self {
        DatFilter {
            id_types,
            accessions,
        }
    }
}

impl RowFilter for DatFilter {
    fn filter_row(&self, line: &str, line_number: usize) -> Option<String> {
        let mut fields = line.split('\t');
        let (accession, id_type) = match (fields.next(), fields.next()) {
            (Some(acc), Some(idt)) => (acc, idt),
            _ => {
                warn!(
                    "skipping malformed row at line {}: expected 3 tab-separated fields",
                    line_number
                );
                return None;
            }
        };

        if !self.id_types.contains(id_type.trim()) {
            return None;
        }
        if !self.accessions.contains(accession.trim()) {
            return None;
        }

        Some(line.replacen('\t', ",", 2))
    }

    fn match_multiplicity(&self) -> usize {
        2
    }

    fn accession_count(&self) -> usize {
        self.accessions.len()
    }
}

/// Filter for the fixed-column `idmapping_selected.tab` layout.
///
/// A row matches when its accession column is in the accession set; the match
/// record is the accession followed by the value of each requested column, in
/// request order, comma-joined.
#[derive(Debug)]
pub struct SelectedFilter {
    accessions: MembershipSet,
    /// Zero-based column index per requested field, in request order.
    columns: Vec<usize>,
}

impl SelectedFilter {
    /// Create a filter projecting the given fields.
    ///
    /// # Errors
    ///
    /// Returns [`IdseekError::InvalidIdType`] for a field name outside the
    /// fixed-column vocabulary.
    pub fn new(fields: &[String], accessions: MembershipSet) -> Result<Self> {
        let columns = fields
            .iter()
            .map(|f| {
                MappingFormat::Selected.column(f).ok_or_else(|| {
                    IdseekError::InvalidIdType {
                        id_type: f.clone(),
                        valid: MappingFormat::Selected.known_id_types().join(" "),
                    }
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(SelectedFilter {
            accessions,
            columns,
        })
    }
}

impl RowFilter for SelectedFilter {
    fn filter_row(&self, line: &str, line_number: usize) -> Option<String> {
        let fields: Vec<&str> = line.split('\t').collect();

        let accession = fields[0];
        if !self.accessions.contains(accession.trim()) {
            return None;
        }

        // Only matching rows pay for the column-range check.
        let mut record = Vec::with_capacity(self.columns.len() + 1);
        record.push(accession);
        for &col in &self.columns {
            match fields.get(col) {
                Some(&value) => record.push(value),
                None => {
                    warn!(
                        "skipping malformed row at line {}: wanted column {} but row has {} fields",
                        line_number,
                        col,
                        fields.len()
                    );
                    return None;
                }
            }
        }

        Some(record.join(","))
    }

    fn match_multiplicity(&self) -> usize {
        1
    }

    fn accession_count(&self) -> usize {
        self.accessions.len()
    }
}
