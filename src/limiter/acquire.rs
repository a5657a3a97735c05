use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::limiter::gate::Shared;

/// Future returned by [`Limiter::acquire`](crate::limiter::Limiter::acquire).
///
/// Resolves once the request owns a slot. After that the caller is
/// responsible for calling `release`. Dropping it before it resolves gives
/// up the request: a slot it was already handed goes to the next waiter.
#[must_use = "an acquired slot must be awaited and later released"]
#[derive(Debug)]
pub struct Acquire {
    shared: Arc<Shared>,
    state: AcquireState,
}

#[derive(Debug)]
enum AcquireState {
    Granted,
    Queued(oneshot::Receiver<()>),
    Done,
}

impl Acquire {
    pub(crate) fn granted(shared: Arc<Shared>) -> Self {
        Self { shared, state: AcquireState::Granted }
    }

    pub(crate) fn queued(shared: Arc<Shared>, rx: oneshot::Receiver<()>) -> Self {
        Self { shared, state: AcquireState::Queued(rx) }
    }
}

impl Future for Acquire {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match &mut self.state {
            AcquireState::Granted | AcquireState::Done => {}
            AcquireState::Queued(rx) => {
                // Senders live in the limiter's queue and are only consumed by
                // a send, so the channel cannot close under us.
                if Pin::new(rx).poll(cx).is_pending() {
                    return Poll::Pending;
                }
            }
        }
        self.state = AcquireState::Done;
        Poll::Ready(())
    }
}

impl Drop for Acquire {
    fn drop(&mut self) {
        let handed_off = match &mut self.state {
            AcquireState::Done => return,
            AcquireState::Granted => true,
            AcquireState::Queued(rx) => {
                // After close() a pending send fails, so either the slot
                // reached us already or it never will.
                rx.close();
                rx.try_recv().is_ok()
            }
        };

        if handed_off {
            debug!("Unobserved slot returned by dropped request");
            if let Err(e) = self.shared.release() {
                error!("Failed to return slot of dropped request: {}", e);
            }
        }
    }
}
