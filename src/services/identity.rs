use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::user;
use crate::services::security::hash_password;

/// Create the login identity for an email, or rotate the password of an
/// existing one.
///
/// On return the identity's password is always the supplied temporary value,
/// whether the account was just created or already existed; re-approval of
/// a registration silently rotates the previous password. Returns the
/// identity id. Every failure maps to `IdentityProvisionFailed`; callers
/// treat this step as an external dependency.
pub async fn ensure_identity(
    db: &DbConn,
    email: &str,
    display_name: &str,
    temp_password: &str,
) -> Result<i64> {
    let hashed = hash_password(temp_password)
        .map_err(|e| AppError::IdentityProvisionFailed(format!("password hashing failed: {}", e)))?;

    let txn = db
        .begin()
        .await
        .map_err(|e| AppError::IdentityProvisionFailed(format!("transaction begin failed: {}", e)))?;

    let existing = User::find()
        .filter(user::Column::Email.eq(email))
        .one(&txn)
        .await
        .map_err(|e| AppError::IdentityProvisionFailed(format!("identity lookup failed: {}", e)))?;

    let now = Utc::now();
    let user_id = match existing {
        Some(found) => {
            tracing::info!(user_id = found.id, email, "identity exists, rotating password");
            let id = found.id;
            let mut active: user::ActiveModel = found.into();
            active.hashed_password = Set(hashed);
            active.updated_at = Set(now);
            active
                .update(&txn)
                .await
                .map_err(|e| {
                    AppError::IdentityProvisionFailed(format!("password reset failed: {}", e))
                })?;
            id
        }
        None => {
            let new_user = user::ActiveModel {
                email: Set(email.to_string()),
                hashed_password: Set(hashed),
                display_name: Set(display_name.to_string()),
                role: Set(user::ROLE_STUDENT.to_string()),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            let inserted = new_user.insert(&txn).await.map_err(|e| {
                AppError::IdentityProvisionFailed(format!("identity creation failed: {}", e))
            })?;
            tracing::info!(user_id = inserted.id, email, "identity created");
            inserted.id
        }
    };

    txn.commit()
        .await
        .map_err(|e| AppError::IdentityProvisionFailed(format!("commit failed: {}", e)))?;

    Ok(user_id)
}
