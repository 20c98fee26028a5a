//! Subscriber intake.

use jobalert_core::NewSubscriber;
use jobalert_db::DbError;
use sqlx::PgPool;

pub(crate) async fn subscribe(
    pool: &PgPool,
    email: &str,
    keywords: &str,
    location: &str,
) -> anyhow::Result<()> {
    let subscriber = NewSubscriber::new(email, keywords, location)?;

    match jobalert_db::insert_subscriber(pool, &subscriber).await {
        Ok(row) => {
            tracing::info!(id = row.id, email = %row.email, "subscriber created");
            println!("subscribed {} to \"{}\" in {}", row.email, row.keywords, row.location);
            Ok(())
        }
        Err(DbError::DuplicateSubscriber(email)) => {
            anyhow::bail!("{email} is already subscribed")
        }
        Err(e) => Err(e.into()),
    }
}
