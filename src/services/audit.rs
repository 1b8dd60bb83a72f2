use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::db::DbConn;
use crate::error::Result;
use crate::models::audit_log::{self, AuditAction, ResourceType};
use crate::models::user;

/// Audit service for logging privileged operations
#[derive(Clone)]
pub struct AuditService {
    db: DbConn,
}

impl AuditService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Log an audit event
    #[allow(clippy::too_many_arguments)]
    pub async fn log(
        &self,
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: Option<String>,
        actor: Option<&user::Model>,
        details: Option<serde_json::Value>,
        success: bool,
        error_message: Option<String>,
    ) -> Result<()> {
        let now = chrono::Utc::now();
        let details_str = details.map(|d| d.to_string());

        let log_entry = audit_log::ActiveModel {
            timestamp: Set(now),
            user_id: Set(actor.map(|u| u.id)),
            username: Set(actor.map(|u| u.email.clone())),
            action: Set(action.to_string()),
            resource_type: Set(resource_type.to_string()),
            resource_id: Set(resource_id),
            details: Set(details_str),
            success: Set(success),
            error_message: Set(error_message),
            ..Default::default()
        };

        log_entry.insert(&self.db).await?;
        Ok(())
    }

    /// Log a successful action
    pub async fn log_success(
        &self,
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: Option<String>,
        actor: Option<&user::Model>,
        details: Option<serde_json::Value>,
    ) -> Result<()> {
        self.log(action, resource_type, resource_id, actor, details, true, None)
            .await
    }

    /// Log a failed action
    #[allow(clippy::too_many_arguments)]
    pub async fn log_failure(
        &self,
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: Option<String>,
        actor: Option<&user::Model>,
        details: Option<serde_json::Value>,
        error: &str,
    ) -> Result<()> {
        self.log(
            action,
            resource_type,
            resource_id,
            actor,
            details,
            false,
            Some(error.to_string()),
        )
        .await
    }
}

/// Query parameters for fetching audit logs
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub user_id: Option<i64>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub success: Option<bool>,
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

/// Paginated audit log response
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogResponse {
    pub logs: Vec<audit_log::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Get audit logs with filtering and pagination
pub async fn get_audit_logs(db: &DbConn, query: AuditLogQuery) -> Result<AuditLogResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(50).min(100);
    let offset = (page - 1) * per_page;

    let mut select = audit_log::Entity::find();

    if let Some(user_id) = query.user_id {
        select = select.filter(audit_log::Column::UserId.eq(user_id));
    }

    if let Some(action) = &query.action {
        select = select.filter(audit_log::Column::Action.eq(action.clone()));
    }

    if let Some(resource_type) = &query.resource_type {
        select = select.filter(audit_log::Column::ResourceType.eq(resource_type.clone()));
    }

    if let Some(success) = query.success {
        select = select.filter(audit_log::Column::Success.eq(success));
    }

    if let Some(from) = query.from {
        select = select.filter(audit_log::Column::Timestamp.gte(from));
    }

    if let Some(to) = query.to {
        select = select.filter(audit_log::Column::Timestamp.lte(to));
    }

    let total = select.clone().count(db).await?;

    let logs = select
        .order_by_desc(audit_log::Column::Timestamp)
        .offset(offset)
        .limit(per_page)
        .all(db)
        .await?;

    let total_pages = (total as f64 / per_page as f64).ceil() as u64;

    Ok(AuditLogResponse {
        logs,
        total,
        page,
        per_page,
        total_pages,
    })
}
