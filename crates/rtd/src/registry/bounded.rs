//! Call boundary for provider futures.
//!
//! Every provider call goes through [`call_bounded`], which enforces the
//! time bound and converts errors and panics into a [`CallOutcome`]. Nothing
//! a provider does can escape as an error or a panic.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

use crate::errors::ProviderError;

/// How a bounded provider call ended.
#[derive(Debug)]
pub(crate) enum CallOutcome<T> {
    Done(T),
    Failed(String),
    TimedOut,
}

/// Run `call` for at most `bound`.
///
/// On timeout the future is dropped, which cancels it at its current await
/// point. Only this call is affected.
pub(crate) async fn call_bounded<T, F>(bound: Duration, call: F) -> CallOutcome<T>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(bound, AssertUnwindSafe(call).catch_unwind()).await {
        Err(_) => CallOutcome::TimedOut,
        Ok(Err(panic)) => CallOutcome::Failed(panic_message(panic.as_ref())),
        Ok(Ok(Err(e))) => CallOutcome::Failed(e.to_string()),
        Ok(Ok(Ok(value))) => CallOutcome::Done(value),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}
