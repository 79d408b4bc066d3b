//! Parallel prefetching of git sources.
//!
//! Every source is handed to the prefetch helper on its own task. A semaphore
//! bounds how many helpers run at once. Results are joined in submission
//! order, so the output lines up with the lockfile no matter which helper
//! finishes first.
//!
//! # Failure Handling
//!
//! All tasks are joined before a result is returned. The first failure in
//! submission order wins; later results, successful or not, are discarded.
//! Helpers that are still running when a failure is seen are left alone.

mod helper;
mod types;

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::lockfile::PackageSource;

pub use helper::{helper_args, prefetch_one};
pub use types::{PrefetchConfig, PrefetchError, PrefetchOutput, ResolvedSource};

/// Outcome of prefetching one source.
pub type FetchResult = Result<ResolvedSource, PrefetchError>;

/// Prefetch all sources in parallel.
///
/// # Returns
///
/// The resolved sources in the same order as `sources`, or the first error
/// in that order.
pub async fn prefetch_all(
  sources: &[PackageSource],
  config: &PrefetchConfig,
) -> Result<Vec<ResolvedSource>, PrefetchError> {
  info!(
    count = sources.len(),
    parallelism = config.parallelism,
    "prefetching git sources"
  );

  let results = join_in_order(spawn_all(sources, config)).await;
  let resolved = results.into_iter().collect::<Result<Vec<_>, _>>()?;

  info!(count = resolved.len(), "prefetch complete");
  Ok(resolved)
}

/// Spawn one task per source, gated by the worker pool semaphore.
fn spawn_all(sources: &[PackageSource], config: &PrefetchConfig) -> Vec<JoinHandle<FetchResult>> {
  let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));

  sources
    .iter()
    .map(|source| {
      let source = source.clone();
      let helper = config.helper.clone();
      let semaphore = semaphore.clone();

      tokio::spawn(async move {
        let _permit = semaphore.acquire().await?;
        prefetch_one(&source, &helper).await
      })
    })
    .collect()
}

/// Await every handle in submission order.
async fn join_in_order(handles: Vec<JoinHandle<FetchResult>>) -> Vec<FetchResult> {
  let mut results = Vec::with_capacity(handles.len());

  for (idx, handle) in handles.into_iter().enumerate() {
    let result = match handle.await {
      Ok(result) => result,
      Err(e) => Err(PrefetchError::Join(e)),
    };
    if let Err(e) = &result {
      debug!(task = idx, error = %e, "prefetch task failed");
    }
    results.push(result);
  }

  results
}
