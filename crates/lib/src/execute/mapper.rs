//! Bounded-concurrency mapping.
//!
//! [`for_each`] spawns one task per item on a `JoinSet`; each task waits for a
//! semaphore permit before running its worker, so at most `concurrency`
//! workers are in flight. The first failing worker cancels a shared token:
//! items still waiting for a permit are skipped, workers already running are
//! allowed to finish and their outcomes are ignored.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::types::BuildError;

/// Apply `worker` to every item with at most `concurrency` workers in flight.
///
/// Resolves once every started worker has settled. Results are returned in
/// input order. On failure the first error observed is returned. A
/// concurrency of zero is treated as one.
pub async fn for_each<T, R, F, Fut>(items: Vec<T>, concurrency: usize, worker: F) -> Result<Vec<R>, BuildError>
where
  T: Send + 'static,
  R: Send + 'static,
  F: Fn(usize, T) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<R, BuildError>> + Send + 'static,
{
  let total = items.len();
  if total == 0 {
    return Ok(Vec::new());
  }

  let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
  let cancel = CancellationToken::new();
  let worker = Arc::new(worker);
  let mut join_set = JoinSet::new();

  for (index, item) in items.into_iter().enumerate() {
    let semaphore = semaphore.clone();
    let cancel = cancel.clone();
    let worker = worker.clone();

    join_set.spawn(async move {
      let permit = tokio::select! {
        biased;
        () = cancel.cancelled() => return (index, None),
        permit = semaphore.acquire_owned() => permit,
      };
      let Ok(_permit) = permit else {
        return (index, None);
      };

      // A sibling may have failed while this task held no permit.
      if cancel.is_cancelled() {
        return (index, None);
      }

      let result = worker(index, item).await;
      if result.is_err() {
        cancel.cancel();
      }
      (index, Some(result))
    });
  }

  let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
  let mut first_error: Option<BuildError> = None;

  while let Some(joined) = join_set.join_next().await {
    match joined {
      Ok((index, Some(Ok(value)))) => {
        slots[index] = Some(value);
      }
      Ok((index, Some(Err(e)))) => {
        if first_error.is_none() {
          first_error = Some(e);
        } else {
          debug!(index, error = %e, "ignoring failure after an earlier one");
        }
      }
      Ok((index, None)) => {
        debug!(index, "skipped after an earlier failure");
      }
      Err(e) => {
        error!(error = %e, "worker task panicked");
        cancel.cancel();
        if first_error.is_none() {
          first_error = Some(BuildError::TaskPanicked { message: e.to_string() });
        }
      }
    }
  }

  if let Some(e) = first_error {
    return Err(e);
  }

  Ok(slots.into_iter().flatten().collect())
}
