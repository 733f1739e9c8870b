//! Fixed-capacity FIFO buffer shared between writers and a single reader
//!
//! The buffer keeps its items behind a short-lived mutex (never held across an
//! await point) and uses two `Notify` handles to park readers waiting for items
//! and writers waiting for space. Closing the buffer stops intake but keeps the
//! resident items readable until they are drained.

use crate::buffer::error::{BufferError, BufferResult};
use crate::buffer::policy::{BufferOptions, FullPolicy};
use crate::core::sync::handle_mutex_poison;
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug)]
struct BufferState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Bounded FIFO buffer with a configurable full-queue policy
///
/// # Thread Safety
///
/// Any number of writers may call [`try_write`](Self::try_write) or
/// [`write`](Self::write) concurrently; enqueue and dequeue are linearised
/// by the internal lock so accepted values keep their acceptance order.
///
/// # Example
///
/// ```rust
/// use keystream::buffer::api::{BoundedBuffer, BufferOptions};
///
/// let buffer = BoundedBuffer::new(BufferOptions::new(1)).unwrap();
/// assert!(buffer.try_write('f').unwrap());
/// assert!(!buffer.try_write('r').unwrap()); // full: 'r' is dropped
///
/// buffer.close().unwrap();
/// let remaining: Vec<char> = buffer.drain_all().unwrap().collect();
/// assert_eq!(remaining, vec!['f']);
/// ```
#[derive(Debug)]
pub struct BoundedBuffer<T> {
    state: Mutex<BufferState<T>>,
    item_available: Notify,
    space_available: Notify,
    options: BufferOptions,
}

impl<T> BoundedBuffer<T> {
    /// Create a buffer; a capacity of zero is rejected
    pub fn new(options: BufferOptions) -> BufferResult<Self> {
        if options.capacity == 0 {
            return Err(BufferError::InvalidCapacity {
                capacity: options.capacity,
            });
        }

        Ok(Self {
            state: Mutex::new(BufferState {
                items: VecDeque::with_capacity(options.capacity),
                closed: false,
            }),
            item_available: Notify::new(),
            space_available: Notify::new(),
            options,
        })
    }

    /// Create a buffer with default options and the given capacity
    pub fn with_capacity(capacity: usize) -> BufferResult<Self> {
        Self::new(BufferOptions::new(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.options.capacity
    }

    pub fn full_policy(&self) -> FullPolicy {
        self.options.full_policy
    }

    pub fn options(&self) -> &BufferOptions {
        &self.options
    }

    /// Number of resident items
    pub fn len(&self) -> usize {
        self.observe().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.observe().closed
    }

    fn lock(&self) -> BufferResult<MutexGuard<'_, BufferState<T>>> {
        handle_mutex_poison(self.state.lock(), |message| BufferError::Poisoned {
            message,
        })
    }

    // Read-only observers tolerate poisoning: the state itself is never left
    // half-updated by a panicking holder.
    fn observe(&self) -> MutexGuard<'_, BufferState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue without suspending
    ///
    /// Returns `Ok(true)` when the value was accepted, `Ok(false)` when the
    /// buffer is full (the value is discarded), and `Err(BufferError::Closed)`
    /// once the buffer has been closed.
    pub fn try_write(&self, value: T) -> BufferResult<bool> {
        {
            let mut state = self.lock()?;
            if state.closed {
                return Err(BufferError::Closed);
            }
            if state.items.len() >= self.options.capacity {
                return Ok(false);
            }
            state.items.push_back(value);
        }

        self.item_available.notify_one();
        Ok(true)
    }

    /// Enqueue according to the configured full-queue policy
    ///
    /// Under [`FullPolicy::Drop`] this never suspends and behaves exactly like
    /// [`try_write`](Self::try_write). Under [`FullPolicy::Wait`] the caller is
    /// suspended until a slot frees up or the buffer is closed.
    pub async fn write(&self, value: T) -> BufferResult<bool> {
        if !self.options.sync_fast_path {
            tokio::task::yield_now().await;
        }

        match self.options.full_policy {
            FullPolicy::Drop => self.try_write(value),
            FullPolicy::Wait => self.write_when_space(value).await,
        }
    }

    async fn write_when_space(&self, value: T) -> BufferResult<bool> {
        loop {
            // Register interest before inspecting the state so a read or close
            // that happens in between still wakes us.
            let notified = self.space_available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock()?;
                if state.closed {
                    return Err(BufferError::Closed);
                }
                if state.items.len() < self.options.capacity {
                    state.items.push_back(value);
                    drop(state);
                    self.item_available.notify_one();
                    return Ok(true);
                }
            }

            notified.await;
        }
    }

    /// Remove the head item without suspending
    pub fn try_read(&self) -> BufferResult<Option<T>> {
        let value = self.lock()?.items.pop_front();
        if value.is_some() {
            self.space_available.notify_one();
        }
        Ok(value)
    }

    /// Remove the head item, suspending while the buffer is empty and open
    ///
    /// Returns `Ok(None)` once the buffer is closed and fully drained. The
    /// future is cancel safe: dropping it never loses an item.
    pub async fn read(&self) -> BufferResult<Option<T>> {
        if !self.options.sync_fast_path {
            tokio::task::yield_now().await;
        }

        loop {
            let notified = self.item_available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock()?;
                if let Some(value) = state.items.pop_front() {
                    drop(state);
                    self.space_available.notify_one();
                    return Ok(Some(value));
                }
                if state.closed {
                    return Ok(None);
                }
            }

            notified.await;
        }
    }

    /// Stop accepting writes; resident items stay readable
    ///
    /// Idempotent. Returns `true` only for the call that actually closed the
    /// buffer. Suspended readers and writers are woken so they can observe
    /// the closed state.
    pub fn close(&self) -> BufferResult<bool> {
        let newly_closed = {
            let mut state = self.lock()?;
            !std::mem::replace(&mut state.closed, true)
        };

        if newly_closed {
            self.item_available.notify_waiters();
            self.space_available.notify_waiters();
        }

        Ok(newly_closed)
    }

    /// Yield every remaining item of a closed buffer in FIFO order
    ///
    /// Each item is yielded exactly once; the iterator ends when the buffer is
    /// empty and a later call finds nothing left to yield.
    pub fn drain_all(&self) -> BufferResult<Drain<'_, T>> {
        if !self.lock()?.closed {
            return Err(BufferError::StillOpen);
        }
        Ok(Drain { buffer: self })
    }

    /// Read items as a stream until the buffer is closed and drained
    pub fn stream(&self) -> impl Stream<Item = T> + '_ {
        stream::unfold(self, |buffer| async move {
            match buffer.read().await {
                Ok(Some(value)) => Some((value, buffer)),
                Ok(None) => None,
                Err(e) => {
                    log::error!("Buffer stream terminated: {}", e);
                    None
                }
            }
        })
    }
}

/// Iterator returned by [`BoundedBuffer::drain_all`]
pub struct Drain<'a, T> {
    buffer: &'a BoundedBuffer<T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self.buffer.try_read() {
            Ok(value) => value,
            Err(e) => {
                log::error!("Buffer drain terminated: {}", e);
                None
            }
        }
    }
}
