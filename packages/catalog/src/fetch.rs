//! # Fetch Slots
//!
//! Every element that loads catalog data owns one [`FetchSlot`]. The slot
//! decides whether a new request is needed and which response is allowed to
//! land.
//!
//! ## Policy
//!
//! ```text
//! begin(k1) ──▶ ticket g1 ─────────────────────┐
//! begin(k2) ──▶ ticket g2   (g1 cancelled)     │
//!                 │                            ▼
//!                 └──▶ complete(g2) applied    complete(g1) discarded
//! ```
//!
//! - Each `begin` with a new key bumps the generation; only the latest
//!   generation may complete. The last issued request wins regardless of
//!   arrival order.
//! - Starting a newer request or unmounting the element cancels the in-flight
//!   ticket; [`FetchTicket::run`] notices and stops awaiting.
//! - Failures become a per-element error string and never leave the slot.

use crate::errors::CatalogError;
use std::future::Future;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Handle for one issued request
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    cancelled: watch::Receiver<bool>,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Drive `future` unless this ticket is cancelled first
    ///
    /// Dropping the owning slot counts as cancellation.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, CatalogError>
    where
        F: Future,
    {
        if self.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }

        tokio::select! {
            output = future => Ok(output),
            _ = cancellation(self.cancelled.clone()) => Err(CatalogError::Cancelled),
        }
    }
}

/// Resolves once the flag flips or its sender is dropped
async fn cancellation(mut receiver: watch::Receiver<bool>) {
    while !*receiver.borrow_and_update() {
        if receiver.changed().await.is_err() {
            return;
        }
    }
}

/// Per-element request state keyed by `K`
#[derive(Debug)]
pub struct FetchSlot<K, T> {
    key: Option<K>,
    generation: u64,
    state: FetchState<T>,
    in_flight: Option<watch::Sender<bool>>,
}

impl<K, T> Default for FetchSlot<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            state: FetchState::Idle,
            in_flight: None,
        }
    }
}

impl<K: PartialEq, T> FetchSlot<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Start a request for `key`
    ///
    /// Returns `None` when `key` is what the slot already holds or is loading;
    /// a failed key is retried.
    pub fn begin(&mut self, key: K) -> Option<FetchTicket> {
        if self.key.as_ref() == Some(&key) && !matches!(self.state, FetchState::Failed(_)) {
            return None;
        }

        self.cancel_in_flight();
        self.generation += 1;
        self.key = Some(key);
        self.state = FetchState::Loading;

        let (sender, receiver) = watch::channel(false);
        self.in_flight = Some(sender);

        tracing::debug!(generation = self.generation, "fetch started");
        Some(FetchTicket {
            generation: self.generation,
            cancelled: receiver,
        })
    }

    /// Land a response; returns whether it was applied
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<T, CatalogError>) -> bool {
        if ticket.generation != self.generation {
            tracing::warn!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }

        self.in_flight = None;
        self.state = match result {
            Ok(value) => FetchState::Ready(value),
            Err(CatalogError::Cancelled) => FetchState::Idle,
            Err(e) => {
                tracing::warn!(error = %e, "fetch failed");
                FetchState::Failed(e.to_string())
            }
        };
        true
    }

    /// The element went away: cancel work and forget the key
    pub fn unmount(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        self.key = None;
        self.state = FetchState::Idle;
    }

    fn cancel_in_flight(&mut self) {
        if let Some(sender) = self.in_flight.take() {
            // Receivers may already be gone
            let _ = sender.send(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn test_same_key_does_not_refetch() {
        let mut slot: FetchSlot<&str, u32> = FetchSlot::new();
        let ticket = slot.begin("red").unwrap();
        assert!(slot.begin("red").is_none());

        slot.complete(&ticket, Ok(3));
        assert!(slot.begin("red").is_none());
        assert_eq!(slot.state().value(), Some(&3));
    }

    #[test]
    fn test_failed_key_is_retried() {
        let mut slot: FetchSlot<&str, u32> = FetchSlot::new();
        let ticket = slot.begin("red").unwrap();
        slot.complete(&ticket, Err(CatalogError::Request("timeout".to_string())));

        assert_eq!(slot.state().error(), Some("Catalog request failed: timeout"));
        assert!(slot.begin("red").is_some());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut slot: FetchSlot<&str, &str> = FetchSlot::new();
        let first = slot.begin("red").unwrap();
        let second = slot.begin("blue").unwrap();
        assert!(first.is_cancelled());

        assert!(slot.complete(&second, Ok("blue products")));
        assert!(!slot.complete(&first, Ok("red products")));
        assert_eq!(slot.state(), &FetchState::Ready("blue products"));
    }

    #[tokio::test]
    async fn test_newer_request_cancels_running_one() {
        let mut slot: FetchSlot<&str, u32> = FetchSlot::new();
        let first = slot.begin("red").unwrap();

        let (_never_tx, never) = oneshot::channel::<u32>();
        let running = tokio::spawn(async move { first.run(never).await });

        let second = slot.begin("blue").unwrap();
        let outcome = running.await.unwrap();
        assert_eq!(outcome, Err(CatalogError::Cancelled));

        let value = second.run(async { 7 }).await.unwrap();
        assert!(slot.complete(&second, Ok(value)));
        assert_eq!(slot.state().value(), Some(&7));
    }

    #[tokio::test]
    async fn test_unmount_cancels_and_rejects_late_result() {
        let mut slot: FetchSlot<&str, u32> = FetchSlot::new();
        let ticket = slot.begin("red").unwrap();

        slot.unmount();

        assert_eq!(ticket.run(async { 1 }).await, Err(CatalogError::Cancelled));
        assert!(!slot.complete(&ticket, Ok(1)));
        assert_eq!(slot.state(), &FetchState::Idle);
    }
}
