use std::sync::Arc;

use tracing::{error, warn};

use crate::ports::ViewCounter;

#[derive(Clone)]
pub struct ViewCountGateway {
    counter: Arc<dyn ViewCounter>,
}

impl ViewCountGateway {
    pub fn new(counter: Arc<dyn ViewCounter>) -> Self {
        Self { counter }
    }

    /// Records one page view and returns the new total.
    ///
    /// If the increment fails the stored total is returned unchanged, and 0
    /// if even that cannot be read.
    pub async fn increment_and_get(&self) -> i64 {
        match self.counter.increment().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to increment view count: {}", e);
                self.current().await
            }
        }
    }

    pub async fn current(&self) -> i64 {
        self.counter.current().await.unwrap_or_else(|e| {
            error!("Failed to read view count: {}", e);
            0
        })
    }
}
