//! Cancellation signal for in-flight requests
//!
//! Every data-access call takes a [`CancelToken`]. Closing a form while its
//! submission is in flight should call [`CancelToken::cancel`]; the transport
//! then drops the request and the call returns [`FoodError::Cancelled`].

use crate::core::error::{FoodError, FoodResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable, one-shot cancellation signal
///
/// All clones observe the same signal. Once cancelled a token stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Fire the signal
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once the signal fires
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // the sender lives as long as `self`, so this only returns once cancelled
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }

    /// Run a future unless the signal fires first
    ///
    /// A token that is already cancelled never polls `fut`.
    pub async fn run<T, F>(&self, fut: F) -> FoodResult<T>
    where
        F: Future<Output = FoodResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(FoodError::Cancelled),
            result = fut => result,
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
