pub mod handlers;

use tracing::warn;

use crate::models::notification::Notification;
use crate::store::RecruitingStore;

/// Best-effort delivery: a failed insert is logged and swallowed so the
/// action that triggered it still succeeds.
pub async fn deliver(store: &dyn RecruitingStore, notification: Notification) {
    if let Err(e) = store.insert_notification(&notification).await {
        warn!(
            "Failed to deliver notification to user {}: {e}",
            notification.user_id
        );
    }
}
