//! The subscriber store seam.

use async_trait::async_trait;
use chrono::NaiveDate;
use jobalert_core::Subscriber;
use sqlx::PgPool;

use crate::error::StoreError;

/// Read access to subscribers plus the one write the pipeline performs.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, StoreError>;

    async fn update_last_sent(&self, email: &str, date: NaiveDate) -> Result<(), StoreError>;
}

/// [`SubscriberStore`] over the Postgres `users` table.
pub struct PgSubscriberStore {
    pool: PgPool,
}

impl PgSubscriberStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        let rows = jobalert_db::list_subscribers(&self.pool).await?;
        Ok(rows.into_iter().map(Subscriber::from).collect())
    }

    async fn update_last_sent(&self, email: &str, date: NaiveDate) -> Result<(), StoreError> {
        jobalert_db::update_last_email_sent(&self.pool, email, date).await?;
        Ok(())
    }
}
