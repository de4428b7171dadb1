//! Debounced uniqueness check for form fields (feature `async`).
//!
//! Each keystroke starts a new check. A check waits out the debounce delay
//! and then runs its probe; if newer input arrives first, the older check
//! resolves as [`CheckOutcome::Superseded`] without probing.
//!
//! ```ignore
//! let check = DebouncedCheck::new(Duration::from_millis(300));
//! let outcome = check
//!     .run(|| async { Ok::<_, StoreError>(gateway.is_taken("email", &input, None)) })
//!     .await;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::store::StoreError;

/// Result of one debounced check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Available,
    Taken,
    /// Newer input started another check before this one finished.
    Superseded,
    Failed(StoreError),
}

pub struct DebouncedCheck {
    delay: Duration,
    latest: watch::Sender<u64>,
}

impl DebouncedCheck {
    pub fn new(delay: Duration) -> Self {
        let (latest, _) = watch::channel(0);
        Self { delay, latest }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start a check, superseding any check still waiting or probing.
    ///
    /// `probe` resolves to `Ok(true)` when the value is already taken.
    pub async fn run<F, Fut>(&self, probe: F) -> CheckOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, StoreError>>,
    {
        let mut generation = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            generation = *latest;
        });
        let mut updates = self.latest.subscribe();

        let superseded = async move {
            loop {
                if *updates.borrow_and_update() != generation {
                    return;
                }
                if updates.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        };

        let checked = async {
            tokio::time::sleep(self.delay).await;
            match probe().await {
                Ok(true) => CheckOutcome::Taken,
                Ok(false) => CheckOutcome::Available,
                Err(err) => CheckOutcome::Failed(err),
            }
        };

        tokio::select! {
            () = superseded => {
                debug!(generation, "uniqueness check superseded");
                CheckOutcome::Superseded
            }
            outcome = checked => outcome,
        }
    }
}
