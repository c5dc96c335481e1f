//! Concurrent streaming filter engine and its parts.
//!
//! - [`membership`]: hash-backed containment tests
//! - [`row`]: per-row filtering/projection for the two mapping layouts
//! - [`pool`]: recycled buffer storage for batches and keep-lists
//! - [`aggregate`]: the shared result collection and early-stop predicate
//! - [`engine`]: dispatcher, bounded worker pool, completion barrier

pub mod aggregate;
pub mod engine;
pub mod membership;
pub mod pool;
pub mod row;

pub use aggregate::{EarlyStop, ResultAggregator};
pub use engine::{run_filter, FilterConfig, DEFAULT_CHUNK_LEN};
pub use membership::MembershipSet;
pub use pool::BufferPool;
pub use row::{DatFilter, RowFilter, SelectedFilter};
