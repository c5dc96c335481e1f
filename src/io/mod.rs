//! I/O module: decompressing line source and sequential CSV collaborators

pub mod accessions;
pub mod lines;
pub mod writer;

pub use accessions::read_accessions;
pub use lines::{LineSource, DEFAULT_MAX_LINE_LEN};
pub use writer::{write_csv, write_csv_file};
