//! idseek: concurrent extractor for UniProtKB ID-mapping files
//!
//! # Overview
//!
//! The UniProtKB `idmapping.dat.gz` (multi-gigabyte, free-form) and
//! `idmapping_selected.tab.gz` (fixed-column) files are cumbersome to query
//! for a handful of accessions. idseek streams either file once,
//! decompressing on the fly and fanning the filtering work out across a
//! bounded pool of worker threads, then writes the matching rows as a small
//! CSV.
//!
//! ## Quick Start
//!
//! ```no_run
//! use idseek::filter::{run_filter, FilterConfig, MembershipSet, SelectedFilter};
//! use idseek::formats::MappingFormat;
//! use idseek::io::{read_accessions, write_csv_file};
//!
//! # fn main() -> idseek::Result<()> {
//! let accessions = read_accessions("best_hits.csv")?;
//! let fields = vec!["RefSeq".to_string(), "GO".to_string()];
//!
//! let format = MappingFormat::try_from_path("idmapping_selected.tab.gz")?;
//! format.validate_id_types(&fields)?;
//!
//! let filter = SelectedFilter::new(&fields, MembershipSet::new(accessions))?;
//! let matches = run_filter("idmapping_selected.tab.gz", filter, &FilterConfig::default())?;
//!
//! write_csv_file("out.csv", &format.csv_header(&fields), &matches)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`filter`]: the concurrent streaming filter engine (dispatcher, worker
//!   pool, buffer pools, result aggregation, early stop)
//! - [`formats`]: the two UniProt mapping layouts and their field tables
//! - [`io`]: decompressing line source, accession CSV reader, CSV writer
//!
//! ## Early stop
//!
//! The engine stops reading once it has recorded one match per accession
//! (fixed-column) or two per accession (free-form). That multiplicity is a
//! heuristic about typical UniProt data, documented on
//! [`filter::EarlyStop`]; runs where some accessions never match scan the
//! whole file.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod filter;
pub mod formats;
pub mod io;

// Re-export commonly used types
pub use error::{IdseekError, Result};
pub use filter::{run_filter, DatFilter, FilterConfig, MembershipSet, SelectedFilter};
pub use formats::MappingFormat;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
