//! Axum route handlers for in-app notifications.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::load_requester;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::notification::Notification;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    pub user_id: Uuid,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub user_id: Uuid,
    pub notification_id: Option<Uuid>,
    #[serde(default)]
    pub mark_all: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

/// GET /api/v1/notifications
pub async fn handle_list_notifications(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<NotificationListQuery>,
) -> Result<Json<NotificationPage>, AppError> {
    load_requester(state.store.as_ref(), params.user_id).await?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = i64::from(page - 1) * i64::from(limit);

    let (notifications, total) = state
        .store
        .list_notifications(params.user_id, params.unread_only, i64::from(limit), offset)
        .await?;

    Ok(Json(NotificationPage {
        notifications,
        pagination: paginate(total, page, limit),
    }))
}

/// PATCH /api/v1/notifications
///
/// Marks one notification, or all of the user's notifications, as read.
pub async fn handle_mark_read(
    State(state): State<AppState>,
    AppJson(request): AppJson<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>, AppError> {
    load_requester(state.store.as_ref(), request.user_id).await?;

    let updated = match (request.mark_all, request.notification_id) {
        (true, _) => {
            state
                .store
                .mark_all_notifications_read(request.user_id)
                .await?
        }
        (false, Some(id)) => {
            if !state
                .store
                .mark_notification_read(request.user_id, id)
                .await?
            {
                return Err(AppError::NotFound(format!("Notification {id} not found")));
            }
            1
        }
        (false, None) => {
            return Err(AppError::Validation(
                "Either notification_id or mark_all is required".to_string(),
            ))
        }
    };

    Ok(Json(MarkReadResponse { updated }))
}

/// DELETE /api/v1/notifications/:id
pub async fn handle_delete_notification(
    State(state): State<AppState>,
    AppPath(notification_id): AppPath<Uuid>,
    AppQuery(params): AppQuery<DeleteQuery>,
) -> Result<StatusCode, AppError> {
    load_requester(state.store.as_ref(), params.user_id).await?;

    if state
        .store
        .delete_notification(params.user_id, notification_id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Notification {notification_id} not found"
        )))
    }
}

fn paginate(total: i64, page: u32, limit: u32) -> Pagination {
    let limit_i = i64::from(limit);
    Pagination {
        total,
        page,
        limit,
        pages: (total + limit_i - 1) / limit_i,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::notification::NotificationType;
    use crate::models::user::UserRole;
    use crate::state::test_support::test_state;
    use crate::store::memory::MemoryStore;
    use crate::store::RecruitingStore;

    async fn seeded(count: usize) -> (Arc<MemoryStore>, Uuid) {
        let store = Arc::new(MemoryStore::default());
        let user = store.add_user(UserRole::Talent);
        for i in 0..count {
            let n = Notification::new(user, NotificationType::System, "Hi", format!("#{i}"));
            store.insert_notification(&n).await.unwrap();
        }
        (store, user)
    }

    #[test]
    fn test_paginate_rounds_pages_up() {
        assert_eq!(paginate(0, 1, 20).pages, 0);
        assert_eq!(paginate(20, 1, 20).pages, 1);
        assert_eq!(paginate(21, 2, 20).pages, 2);
    }

    #[tokio::test]
    async fn test_list_returns_requested_page() {
        let (store, user) = seeded(5).await;
        let Json(page) = handle_list_notifications(
            State(test_state(store)),
            AppQuery(NotificationListQuery {
                user_id: user,
                page: Some(2),
                limit: Some(2),
                unread_only: false,
            }),
        )
        .await
        .unwrap();

        assert_eq!(page.notifications.len(), 2);
        assert_eq!(
            page.pagination,
            Pagination {
                total: 5,
                page: 2,
                limit: 2,
                pages: 3
            }
        );
    }

    #[tokio::test]
    async fn test_mark_read_requires_a_target() {
        let (store, user) = seeded(1).await;
        let err = handle_mark_read(
            State(test_state(store)),
            AppJson(MarkReadRequest {
                user_id: user,
                notification_id: None,
                mark_all: false,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_mark_all_then_unread_only_is_empty() {
        let (store, user) = seeded(3).await;
        let state = test_state(store);
        let Json(marked) = handle_mark_read(
            State(state.clone()),
            AppJson(MarkReadRequest {
                user_id: user,
                notification_id: None,
                mark_all: true,
            }),
        )
        .await
        .unwrap();
        assert_eq!(marked.updated, 3);

        let Json(page) = handle_list_notifications(
            State(state),
            AppQuery(NotificationListQuery {
                user_id: user,
                page: None,
                limit: None,
                unread_only: true,
            }),
        )
        .await
        .unwrap();
        assert!(page.notifications.is_empty());
        assert_eq!(page.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_cannot_delete_someone_elses_notification() {
        let (store, owner) = seeded(1).await;
        let other = store.add_user(UserRole::Talent);
        let id = store.notifications()[0].id;
        let state = test_state(store.clone());

        let err = handle_delete_notification(
            State(state.clone()),
            AppPath(id),
            AppQuery(DeleteQuery { user_id: other }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let status = handle_delete_notification(
            State(state),
            AppPath(id),
            AppQuery(DeleteQuery { user_id: owner }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(store.notifications().is_empty());
    }
}
