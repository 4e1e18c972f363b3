use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};

/// Verdict of a single booking attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The attempt finished; stop retrying.
    Complete(T),
    /// The attempt failed for a reason worth retrying (stale element,
    /// slots not released yet), with a human-readable reason.
    Retry(String),
}

/// Why the retry loop gave up.
#[derive(Error, Debug)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts in {elapsed:?}: {last}")]
    Exhausted {
        attempts: u32,
        elapsed: Duration,
        last: String,
    },
    #[error(transparent)]
    Fatal(E),
}

/// Bounded retry loop: at most `max_attempts` attempts, never past `budget`
/// of wall clock, `delay` between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub budget: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration, budget: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            budget,
        }
    }

    /// Drive `attempt` until it completes, fails fatally, or the budget runs
    /// out. The closure receives the 1-based attempt number.
    ///
    /// The first attempt always runs. After a transient failure the loop
    /// stops without sleeping if either the attempt cap is reached or the
    /// next attempt could not start inside the budget.
    pub async fn run<T, E, F, Fut>(&self, mut attempt: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Attempt<T>, E>>,
    {
        let started = Instant::now();
        let deadline = started + self.budget;
        let mut attempts = 0;
        let mut last = String::from("no attempts made");

        loop {
            attempts += 1;
            match attempt(attempts).await {
                Ok(Attempt::Complete(value)) => {
                    tracing::info!("attempt {} succeeded", attempts);
                    return Ok(value);
                }
                Ok(Attempt::Retry(reason)) => {
                    tracing::debug!(
                        "attempt {}/{} failed: {}",
                        attempts,
                        self.max_attempts,
                        reason
                    );
                    last = reason;
                }
                Err(fatal) => return Err(RetryError::Fatal(fatal)),
            }

            if attempts >= self.max_attempts {
                tracing::warn!("attempt cap reached after {} attempts", attempts);
                break;
            }
            if Instant::now() + self.delay >= deadline {
                tracing::warn!("retry budget exhausted after {} attempts", attempts);
                break;
            }
            sleep(self.delay).await;
        }

        Err(RetryError::Exhausted {
            attempts,
            elapsed: started.elapsed(),
            last,
        })
    }
}
