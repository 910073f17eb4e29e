use database::SeaOrmUnitOfWork;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    /// A fresh unit of work over the shared connection pool, one per request
    pub fn unit_of_work(&self) -> SeaOrmUnitOfWork {
        SeaOrmUnitOfWork::new(Arc::clone(&self.db))
    }
}
