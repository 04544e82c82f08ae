// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cooperative cancellation for in-flight client calls.

use super::ClientError;
use std::future::Future;
pub use tokio_util::sync::CancellationToken;

/// Run `fut` unless `token` is cancelled first.
///
/// A cancelled call resolves to `ClientError::Cancelled` and its result, if
/// any, is dropped.
pub async fn run_cancellable<T, F>(token: &CancellationToken, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    if token.is_cancelled() {
        return Err(ClientError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ClientError::Cancelled),
        result = fut => result,
    }
}
