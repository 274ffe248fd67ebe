use std::future::Future;
use std::time::Duration;
use anyhow::{Result, anyhow};
use solana_client::client_error::{ClientError, ClientErrorKind};

use crate::consts::*;

fn is_transient(err: &ClientError) -> bool {
    matches!(err.kind(), ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_))
}

/// Runs an RPC call, retrying transport failures up to `MAX_RETRIES` times.
pub async fn with_retries<T, F, Fut>(label: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_RETRIES && is_transient(&err) => {
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
            }
            Err(err) => {
                return Err(anyhow!("{} failed after {} attempt(s): {}", label, attempt, err));
            }
        }
    }
}
