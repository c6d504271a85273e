//! Periodic refresh of the expiration alerts.
//!
//! The alert view is re-queried on a fixed interval until the shutdown
//! future resolves. Everything runs on the caller's task; there is no
//! background thread.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::model::ReceivedEntry;
use crate::storage::Storage;

/// Re-run [`Storage::expiring_within`] every `period` and hand the rows to
/// `on_refresh`.
///
/// The first refresh happens immediately. A failed query is logged and
/// retried on the next tick; an error from `on_refresh` stops the loop.
/// Returns the number of completed refreshes.
///
/// # Errors
///
/// Returns the first error produced by `on_refresh`.
pub async fn watch_alerts<F, S>(
    storage: &Storage,
    days: u32,
    period: Duration,
    mut on_refresh: F,
    shutdown: S,
) -> Result<usize>
where
    F: FnMut(&[ReceivedEntry]) -> Result<()>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut refreshes = 0;

    debug!(days, ?period, "Watching expiration alerts");

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => break,

            _ = ticker.tick() => {
                match storage.expiring_within(days) {
                    Ok(entries) => {
                        trace!(count = entries.len(), "Alert refresh");
                        on_refresh(&entries)?;
                        refreshes += 1;
                    }
                    Err(e) => {
                        warn!(error = %e, "Error refreshing expiration alerts");
                    }
                }
            }
        }
    }

    debug!(refreshes, "Stopped watching expiration alerts");
    Ok(refreshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Contact, ItemKey, Receipt};
    use crate::storage::today;

    fn storage_with_expiring_batch() -> Storage {
        crate::logging::init_test_logging();
        let storage = Storage::open_in_memory().unwrap();
        let donor = storage.insert_donor(&Contact::new("A")).unwrap();
        let item = storage
            .insert_item(&ItemKey::new("Leite", None, "1L"))
            .unwrap();
        let soon = today().succ_opt().unwrap();
        storage
            .insert_received(&Receipt {
                donor_id: donor,
                item_id: item,
                quantity: 1.0,
                received_date: today(),
                expiration_date: soon,
            })
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_watch_refreshes_until_shutdown() {
        let storage = storage_with_expiring_batch();
        let mut seen = Vec::new();

        let refreshes = watch_alerts(
            &storage,
            7,
            Duration::from_millis(10),
            |entries| {
                seen.push(entries.len());
                Ok(())
            },
            tokio::time::sleep(Duration::from_millis(55)),
        )
        .await
        .unwrap();

        assert!(refreshes >= 2);
        assert_eq!(seen.len(), refreshes);
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[tokio::test]
    async fn test_watch_ready_shutdown_skips_refresh() {
        let storage = storage_with_expiring_batch();

        let refreshes = watch_alerts(
            &storage,
            7,
            Duration::from_secs(60),
            |_| Ok(()),
            std::future::ready(()),
        )
        .await
        .unwrap();

        assert_eq!(refreshes, 0);
    }

    #[tokio::test]
    async fn test_watch_stops_on_callback_error() {
        let storage = storage_with_expiring_batch();

        let result = watch_alerts(
            &storage,
            7,
            Duration::from_millis(10),
            |_| Err(Error::internal("render failed")),
            std::future::pending(),
        )
        .await;

        assert!(matches!(result, Err(Error::Internal(_))));
    }
}
