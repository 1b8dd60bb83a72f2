use sea_orm::DatabaseConnection;

use crate::services::audit::AuditService;
use crate::services::fees::FeeCalculator;
use crate::services::notification::NotificationService;
use crate::services::storage::StorageService;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub fees: FeeCalculator,
    pub audit: AuditService,
    pub notification: NotificationService,
    pub storage: StorageService,
}

impl AppState {
    pub fn new(
        db: DbConn,
        fees: FeeCalculator,
        audit: AuditService,
        notification: NotificationService,
        storage: StorageService,
    ) -> Self {
        Self {
            db,
            fees,
            audit,
            notification,
            storage,
        }
    }
}
