use std::{future::Future, sync::Arc};
use tokio::sync::Semaphore;

use crate::{
    modules::{
        common::signal::CancelToken,
        error::{code::ErrorCode, BulkMailerResult},
    },
    raise_error,
};

/// Runs `f` over `iter` on a bounded worker pool.
///
/// Results come back in submission order regardless of completion order. A
/// cancelled token stops further submissions; items already spawned run to
/// completion and their results are still returned.
pub async fn run_with_limit<I, Item, Fut, F, O>(
    concurrency: usize,
    iter: I,
    cancel: &CancelToken,
    f: F,
) -> BulkMailerResult<Vec<O>>
where
    I: IntoIterator<Item = Item>,
    Item: Send + 'static,
    Fut: Future<Output = BulkMailerResult<O>> + Send + 'static,
    F: Fn(Item) -> Fut + Send + Sync + 'static,
    O: Send + 'static,
{
    let sem = Arc::new(Semaphore::new(concurrency));
    let f = Arc::new(f);
    let mut handles = Vec::new();

    for item in iter {
        let permit = sem.clone().acquire_owned().await.map_err(|e| {
            raise_error!(
                format!("Failed to acquire semaphore: {e}"),
                ErrorCode::InternalError
            )
        })?;
        // Checked after the acquire: a cancellation set during any running
        // task stops every later submission.
        if cancel.is_cancelled() {
            break;
        }
        let f = f.clone();

        handles.push(tokio::spawn(async move {
            let res = f(item).await;
            drop(permit);
            res
        }));
    }

    let joined = futures::future::join_all(handles).await;
    let mut results = Vec::with_capacity(joined.len());
    for res in joined {
        let res = res.map_err(|e| {
            raise_error!(
                format!("Task panicked or was cancelled: {e}"),
                ErrorCode::InternalError
            )
        })?;
        results.push(res?);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn preserves_submission_order() {
        let cancel = CancelToken::new();
        let results = run_with_limit(3, 0..16u64, &cancel, |n| async move {
            // Later items finish first
            tokio::time::sleep(std::time::Duration::from_millis(16 - n)).await;
            Ok(n * 2)
        })
        .await
        .unwrap();
        assert_eq!(results, (0..16).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn cancelled_token_stops_new_submissions() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let results = run_with_limit(2, 0..8u32, &cancel, |n| async move { Ok(n) })
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
