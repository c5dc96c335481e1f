//! Reusable buffer storage for high-frequency batch turnover.
//!
//! The dispatcher cycles through one `Vec<String>` per batch and each worker
//! through one keep-list per batch; at the default chunk length that is
//! thousands of allocations per gigabyte of input. A small free list lets the
//! same backing storage circulate instead.
//!
//! Ownership rule: a buffer handed out by [`BufferPool::acquire`] belongs to
//! exactly one task until it is passed back through [`BufferPool::release`].

use std::sync::{Arc, Mutex};

/// Shared free list of `Vec<String>` buffers.
///
/// Cloning the pool clones the handle, not the buffers; all clones drain and
/// refill the same free list.
#[derive(Debug, Clone)]
pub struct BufferPool {
    free: Arc<Mutex<Vec<Vec<String>>>>,
    capacity: usize,
}

impl BufferPool {
    /// Create a pool whose buffers are pre-allocated to `capacity` elements.
    pub fn new(capacity: usize) -> Self {
        BufferPool {
            free: Arc::new(Mutex::new(Vec::new())),
            capacity,
        }
    }

    /// Hand out an empty buffer, reusing backing storage when available.
    pub fn acquire(&self) -> Vec<String> {
        let recycled = self.free.lock().expect("buffer pool lock poisoned").pop();
        match recycled {
            Some(buf) => buf,
            None => Vec::with_capacity(self.capacity),
        }
    }

    /// Return a buffer for reuse. Its contents are cleared here so the next
    /// `acquire` starts from length zero with capacity intact.
    pub fn release(&self, mut buf: Vec<String>) {
        buf.clear();
        self.free
            .lock()
            .expect("buffer pool lock poisoned")
            .push(buf);
    }

    #[cfg(test)]
    fn idle_buffers(&self) -> usize {
        self.free.lock().unwrap().len()
    }
}
