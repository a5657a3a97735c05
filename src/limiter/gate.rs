use std::collections::VecDeque;
use std::sync::Arc;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::error::LimiterError;
use crate::limiter::acquire::Acquire;

/// Bounds how many tasks may hold a slot at once.
///
/// Requests beyond `capacity` are queued and granted strictly in the order
/// `acquire` was called. Cloning is cheap; all clones share the same slots.
#[derive(Debug, Clone)]
pub struct Limiter {
    pub(crate) shared: Arc<Shared>,
}

#[derive(Debug)]
pub(crate) struct Shared {
    capacity: usize,
    state: Mutex<State>,
}

// Invariant: `waiters` is non-empty only while `occupied == capacity`.
#[derive(Debug)]
struct State {
    occupied: usize,
    waiters: VecDeque<oneshot::Sender<()>>,
}

/// Point-in-time view of a limiter, taken under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterSnapshot {
    pub capacity: usize,
    pub occupied: usize,
    pub waiting: usize,
}

impl Limiter {
    pub fn new(capacity: i64) -> Result<Self, LimiterError> {
        if capacity < 1 {
            return Err(LimiterError::InvalidCapacity(capacity));
        }
        let capacity = usize::try_from(capacity)
            .map_err(|_| LimiterError::InvalidCapacity(capacity))?;

        Ok(Self {
            shared: Arc::new(Shared {
                capacity,
                state: Mutex::new(State {
                    occupied: 0,
                    waiters: VecDeque::new(),
                }),
            }),
        })
    }

    /// Requests one slot.
    ///
    /// The decision is made now, not when the returned future is first
    /// polled: either a slot is taken immediately, or the request joins the
    /// back of the queue. The future never fails.
    pub fn acquire(&self) -> Acquire {
        let mut state = self.shared.state.lock();

        if state.occupied < self.shared.capacity {
            state.occupied += 1;
            trace!(occupied = state.occupied, capacity = self.shared.capacity, "Slot granted immediately");
            return Acquire::granted(self.shared.clone());
        }

        let (tx, rx) = oneshot::channel();
        state.waiters.push_back(tx);
        debug!(waiting = state.waiters.len(), capacity = self.shared.capacity, "Limiter saturated, request queued");

        Acquire::queued(self.shared.clone(), rx)
    }

    /// Frees one slot, handing it straight to the oldest queued request if
    /// there is one.
    pub fn release(&self) -> Result<(), LimiterError> {
        self.shared.release()
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    pub fn occupied(&self) -> usize {
        self.shared.state.lock().occupied
    }

    pub fn waiting(&self) -> usize {
        self.shared.state.lock().waiters.len()
    }

    pub fn is_saturated(&self) -> bool {
        self.shared.state.lock().occupied == self.shared.capacity
    }

    pub fn snapshot(&self) -> LimiterSnapshot {
        let state = self.shared.state.lock();
        LimiterSnapshot {
            capacity: self.shared.capacity,
            occupied: state.occupied,
            waiting: state.waiters.len(),
        }
    }
}

impl Shared {
    pub(crate) fn release(&self) -> Result<(), LimiterError> {
        let mut state = self.state.lock();

        if state.occupied == 0 {
            warn!(capacity = self.capacity, "Release without a matching acquire");
            return Err(LimiterError::OverRelease);
        }

        // Transfer the slot: `occupied` is left untouched so it is never
        // observable as free while a live waiter exists.
        while let Some(waiter) = state.waiters.pop_front() {
            if waiter.send(()).is_ok() {
                trace!(waiting = state.waiters.len(), "Slot handed off to queued request");
                return Ok(());
            }
            debug!("Skipping abandoned request");
        }

        state.occupied -= 1;
        trace!(occupied = state.occupied, capacity = self.capacity, "Slot freed");
        Ok(())
    }
}
