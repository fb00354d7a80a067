//! Cooperative cancellation.
//!
//! Every blocking step in a walk (fetching links, sending an identifier to a
//! consumer, receiving one) goes through [`or_cancel`], so a cancelled token
//! unblocks all of them the same way.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// The token was cancelled before the operation finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Drive `fut` to completion unless `cancel` fires first.
///
/// Cancellation wins ties: if the token is already cancelled, `fut` is never
/// polled.
pub async fn or_cancel<F>(cancel: &CancellationToken, fut: F) -> Result<F::Output, Cancelled>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Cancelled),
        out = fut => Ok(out),
    }
}

/// Fails fast when `cancel` has already fired.
pub fn check(cancel: &CancellationToken) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        Err(Cancelled)
    } else {
        Ok(())
    }
}
