//! Concurrent streaming filter engine.
//!
//! # Architecture
//!
//! One dispatcher, a fixed pool of filter workers, one bounded channel:
//!
//! 1. The dispatcher reads decompressed lines from a [`LineSource`] and packs
//!    them into pooled batches of `chunk_len` lines.
//! 2. Each completed batch goes to the worker pool through a bounded channel;
//!    the channel bound is the backpressure that keeps a huge file from
//!    outrunning the workers.
//! 3. Workers filter each batch into a pooled keep-list, merge it into the
//!    shared [`ResultAggregator`], and recycle both buffers.
//! 4. After every submission the dispatcher consults the early-stop
//!    predicate; once enough matches are recorded (or the stream ends) it
//!    closes the channel and joins the workers.
//!
//! Batches already submitted when the predicate fires still run to
//! completion, so the result can overshoot the early-stop threshold. Record
//! order depends on worker scheduling; record *content*, taken as a set, does
//! not.

use crate::error::Result;
use crate::filter::aggregate::{EarlyStop, ResultAggregator};
use crate::filter::pool::BufferPool;
use crate::filter::row::RowFilter;
use crate::io::lines::{LineSource, DEFAULT_MAX_LINE_LEN};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Default number of lines per dispatched batch.
pub const DEFAULT_CHUNK_LEN: usize = 1024;

/// Tuning knobs for a filter run.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Lines per batch handed to a worker.
    pub chunk_len: usize,
    /// Worker thread count.
    pub workers: usize,
    /// Maximum accepted line length in bytes.
    pub max_line_len: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            chunk_len: DEFAULT_CHUNK_LEN,
            workers: num_cpus::get(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

/// A batch of consecutive input lines plus the stream line number of its
/// first line (for per-row warnings).
struct Batch {
    lines: Vec<String>,
    first_line: usize,
}

/// Filter a gzip-compressed mapping file against `filter`.
///
/// Returns the serialized match records. Their order is
/// scheduling-dependent; their contents as a set are deterministic for fixed
/// inputs.
///
/// # Errors
///
/// Propagates line-source failures (missing file, invalid gzip stream,
/// oversized line). Worker-side row problems are warn-and-skip, never errors.
///
/// # Example
///
/// ```no_run
/// use idseek::filter::{run_filter, DatFilter, FilterConfig, MembershipSet};
///
/// # fn main() -> idseek::Result<()> {
/// let id_types: MembershipSet = ["RefSeq"].into_iter().collect();
/// let accessions: MembershipSet = ["P12345"].into_iter().collect();
/// let matches = run_filter(
///     "idmapping.dat.gz",
///     DatFilter::new(id_types, accessions),
///     &FilterConfig::default(),
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn run_filter<P, F>(path: P, filter: F, config: &FilterConfig) -> Result<Vec<String>>
where
    P: AsRef<Path>,
    F: RowFilter + 'static,
{
    let start = Instant::now();
    let path = path.as_ref();
    let chunk_len = config.chunk_len.max(1);
    let workers = config.workers.max(1);

    let mut source = LineSource::with_max_line_len(path, config.max_line_len)?;

    let early_stop = EarlyStop::new(filter.match_multiplicity(), filter.accession_count());
    let filter = Arc::new(filter);
    let aggregator = Arc::new(ResultAggregator::new());
    let batch_pool = BufferPool::new(chunk_len);
    let keep_pool = BufferPool::new(chunk_len);

    // Two in-flight batches per worker keeps everyone busy without letting
    // the dispatcher run arbitrarily far ahead of the pool.
    let (batch_tx, batch_rx) = bounded::<Batch>(workers * 2);

    info!(
        "filtering '{}' with {} workers, chunk length {}",
        path.display(),
        workers,
        chunk_len
    );

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let batch_rx = batch_rx.clone();
        let filter = Arc::clone(&filter);
        let aggregator = Arc::clone(&aggregator);
        let batch_pool = batch_pool.clone();
        let keep_pool = keep_pool.clone();
        handles.push(thread::spawn(move || {
            worker_loop(batch_rx, filter, aggregator, batch_pool, keep_pool)
        }));
    }
    drop(batch_rx);

    let dispatched = dispatch(
        &mut source,
        batch_tx,
        &batch_pool,
        chunk_len,
        early_stop,
        &aggregator,
    );

    // Completion barrier: the sender is gone, so each worker drains the
    // channel and exits.
    for handle in handles {
        handle.join().expect("filter worker panicked");
    }

    dispatched?;

    info!(
        "matched {} records from '{}' in {:.2?}",
        aggregator.len(),
        path.display(),
        start.elapsed()
    );

    let aggregator =
        Arc::try_unwrap(aggregator).expect("workers exited but still hold the aggregator");
    Ok(aggregator.into_matches())
}

/// Dispatcher: pack lines into batches, submit, and poll for early stop.
///
/// Owns the sender; returning (on any path) closes the channel.
fn dispatch(
    source: &mut LineSource,
    batch_tx: Sender<Batch>,
    batch_pool: &BufferPool,
    chunk_len: usize,
    early_stop: EarlyStop,
    aggregator: &ResultAggregator,
) -> Result<()> {
    let mut batch = batch_pool.acquire();
    let mut first_line = 0;
    let mut submitted = 0usize;

    while let Some(line) = source.next() {
        let line = line?;
        if batch.is_empty() {
            // line_number() points at the line just read.
            first_line = source.line_number();
        }
        batch.push(line);

        if batch.len() == chunk_len {
            let full = std::mem::replace(&mut batch, batch_pool.acquire());
            if batch_tx
                .send(Batch {
                    lines: full,
                    first_line,
                })
                .is_err()
            {
                // All receivers gone: a worker died. The join below surfaces it.
                return Ok(());
            }
            submitted += 1;

            if early_stop.is_satisfied(aggregator.len()) {
                debug!(
                    "early stop after {} batches ({} matches, threshold {})",
                    submitted,
                    aggregator.len(),
                    early_stop.threshold()
                );
                return Ok(());
            }
        }
    }

    // Stream exhausted: flush the partial batch.
    if !batch.is_empty() {
        let _ = batch_tx.send(Batch {
            lines: batch,
            first_line,
        });
    }

    Ok(())
}

/// Worker: drain the channel, filter each batch, merge and recycle.
fn worker_loop<F: RowFilter>(
    batch_rx: Receiver<Batch>,
    filter: Arc<F>,
    aggregator: Arc<ResultAggregator>,
    batch_pool: BufferPool,
    keep_pool: BufferPool,
) {
    while let Ok(batch) = batch_rx.recv() {
        let mut keep = keep_pool.acquire();

        for (offset, line) in batch.lines.iter().enumerate() {
            if let Some(record) = filter.filter_row(line, batch.first_line + offset) {
                keep.push(record);
            }
        }

        aggregator.append(&mut keep);
        keep_pool.release(keep);
        batch_pool.release(batch.lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::membership::MembershipSet;
    use crate::filter::row::DatFilter;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dat_gz(rows: &[String]) -> NamedTempFile {
        let file = NamedTempFile::with_suffix(".gz").unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        writeln!(encoder, "UniProtKB-AC\tID_type\tID").unwrap();
        for row in rows {
            writeln!(encoder, "{}", row).unwrap();
        }
        encoder.finish().unwrap();
        file
    }

    fn dat_filter(accessions: &[&str]) -> DatFilter {
        DatFilter::new(
            ["RefSeq"].into_iter().collect(),
            accessions.iter().copied().collect::<MembershipSet>(),
        )
    }

    #[test]
    fn test_single_worker_single_batch() {
        let rows = vec![
            "P12345\tRefSeq\tNP_001.1".to_string(),
            "O00000\tRefSeq\tNP_002.2".to_string(),
        ];
        let file = write_dat_gz(&rows);

        let config = FilterConfig {
            chunk_len: 16,
            workers: 1,
            ..FilterConfig::default()
        };
        let matches = run_filter(file.path(), dat_filter(&["P12345"]), &config).unwrap();
        assert_eq!(matches, vec!["P12345,RefSeq,NP_001.1"]);
    }

    #[test]
    fn test_empty_accession_set_matches_nothing() {
        let rows = vec!["P12345\tRefSeq\tNP_001.1".to_string()];
        let file = write_dat_gz(&rows);

        let matches =
            run_filter(file.path(), dat_filter(&[]), &FilterConfig::default()).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_missing_file_propagates() {
        let err = run_filter(
            "/no/such/file.gz",
            dat_filter(&["P12345"]),
            &FilterConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::IdseekError::Io(_)));
    }
}
