//! Database operations for the `users` (subscriber) table.

use chrono::{DateTime, NaiveDate, Utc};
use jobalert_core::{NewSubscriber, Subscriber};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubscriberRow {
    pub id: i64,
    pub email: String,
    pub keywords: String,
    pub location: String,
    pub last_email_sent: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriberRow> for Subscriber {
    fn from(row: SubscriberRow) -> Self {
        Self {
            email: row.email,
            keywords: row.keywords,
            location: row.location,
            last_email_sent: row.last_email_sent,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every subscriber in signup order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_subscribers(pool: &PgPool) -> Result<Vec<SubscriberRow>, DbError> {
    let rows = sqlx::query_as::<_, SubscriberRow>(
        "SELECT id, email, keywords, location, last_email_sent, created_at \
         FROM users \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single subscriber by email, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_subscriber_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<SubscriberRow>, DbError> {
    let row = sqlx::query_as::<_, SubscriberRow>(
        "SELECT id, email, keywords, location, last_email_sent, created_at \
         FROM users \
         WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Sets `users.last_email_sent` for the subscriber with the given email.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no subscriber has that email, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn update_last_email_sent(
    pool: &PgPool,
    email: &str,
    date: NaiveDate,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE users \
         SET last_email_sent = $1 \
         WHERE email = $2",
    )
    .bind(date)
    .bind(email)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Creates exactly one subscriber record.
///
/// # Errors
///
/// Returns [`DbError::DuplicateSubscriber`] if the email is already
/// registered, or [`DbError::Sqlx`] for any other failure.
pub async fn insert_subscriber(
    pool: &PgPool,
    subscriber: &NewSubscriber,
) -> Result<SubscriberRow, DbError> {
    let row = sqlx::query_as::<_, SubscriberRow>(
        "INSERT INTO users (email, keywords, location) \
         VALUES ($1, $2, $3) \
         RETURNING id, email, keywords, location, last_email_sent, created_at",
    )
    .bind(&subscriber.email)
    .bind(&subscriber.keywords)
    .bind(&subscriber.location)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DbError::DuplicateSubscriber(subscriber.email.clone())
        }
        _ => DbError::Sqlx(e),
    })?;

    Ok(row)
}
