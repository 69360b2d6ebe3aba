use std::{future::Future, time::Duration};

use sd_error::{Error, Result};

/// What a retried operation resolves to once every attempt has failed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OnExhaustion {
    Fail,
    SwallowAndLog,
}

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    retries: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: &u32, delay: &Duration) -> Self {
        Self {
            retries: *retries,
            delay: *delay,
        }
    }

    pub fn retries(&self) -> &u32 {
        &self.retries
    }

    pub fn delay(&self) -> &Duration {
        &self.delay
    }

    /// Wait before the retry that follows failed attempt number `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.delay * attempt
    }
}

/// Runs `op` up to `retries + 1` times with linear backoff.
///
/// Returns `Ok(None)` only when every attempt failed under
/// [`OnExhaustion::SwallowAndLog`].
pub async fn retry<T, F, Fut>(
    label: &str,
    policy: &RetryPolicy,
    on_exhaustion: OnExhaustion,
    mut op: F,
) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(Some(value)),
            Err(err) => {
                sd_log::warn(
                    None,
                    format!("[Retry] {label} attempt {attempt} failed: {err}"),
                );
                if attempt > policy.retries {
                    break;
                }
                tokio::time::sleep(policy.backoff(attempt)).await;
            }
        }
    }

    let message = format!(
        "{label} failed after {} retries. Please try again later.",
        policy.retries
    );
    match on_exhaustion {
        OnExhaustion::Fail => Err(Error::ExternalService(message)),
        OnExhaustion::SwallowAndLog => {
            sd_log::warn(None, format!("[Retry] {message} Ignoring."));
            Ok(None)
        }
    }
}
