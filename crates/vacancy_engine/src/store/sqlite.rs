//! SQLite listing store.
//!
//! One connection is shared by the whole crawl and every statement runs in
//! autocommit mode, so whatever was written before a crash stays written.

use std::str::FromStr;

use chrono::NaiveDate;
use crawl_logging::{crawl_debug, crawl_info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use vacancy_core::{ExtractedFields, Listing, ListingStub, PendingListing};

use super::{ListingStore, StoreCounts, StoreError, UpsertOutcome};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS vacancies (
        url TEXT PRIMARY KEY,
        title TEXT,
        company TEXT,
        street TEXT,
        salary TEXT DEFAULT NULL,
        experience TEXT DEFAULT NULL,
        work_regime TEXT DEFAULT NULL,
        descr TEXT DEFAULT NULL,
        key_skills TEXT DEFAULT NULL,
        creation_date TEXT DEFAULT NULL,
        partner TEXT,
        date_updated DATE DEFAULT CURRENT_DATE,
        visited BOOLEAN DEFAULT FALSE
    )
"#;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database and makes sure the table exists.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://vacancies.sqlite` - File-based database
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.create_schema().await?;
        crawl_info!("Opened listing store at {}", database_url);
        Ok(store)
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:").await
    }

    async fn create_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct ListingRow {
    url: String,
    title: Option<String>,
    company: Option<String>,
    street: Option<String>,
    salary: Option<String>,
    experience: Option<String>,
    work_regime: Option<String>,
    descr: Option<String>,
    key_skills: Option<String>,
    creation_date: Option<String>,
    partner: Option<String>,
    date_updated: NaiveDate,
    visited: bool,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Listing {
            url: row.url,
            title: row.title.unwrap_or_default(),
            company: row.company.unwrap_or_default(),
            location: row.street.unwrap_or_default(),
            partner: row.partner.unwrap_or_default(),
            fields: ExtractedFields {
                salary: row.salary,
                experience_level: row.experience,
                work_regime: row.work_regime,
                description: row.descr,
                key_skills: row.key_skills,
                posting_date: row.creation_date,
            },
            last_updated: row.date_updated,
            visited: row.visited,
        }
    }
}

#[async_trait::async_trait]
impl ListingStore for SqliteStore {
    async fn upsert_stub(&self, stub: &ListingStub) -> Result<UpsertOutcome, StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO vacancies (url, title, company, street, partner) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&stub.url)
        .bind(&stub.title)
        .bind(&stub.company)
        .bind(&stub.location)
        .bind(&stub.partner)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(UpsertOutcome::Inserted),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                crawl_debug!("{} already stored, refreshing date_updated", stub.url);
                sqlx::query("UPDATE vacancies SET date_updated = CURRENT_DATE WHERE url = ?")
                    .bind(&stub.url)
                    .execute(&self.pool)
                    .await?;
                Ok(UpsertOutcome::Touched)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn next_unvisited(&self) -> Result<Option<PendingListing>, StoreError> {
        let row: Option<(String, Option<String>)> = sqlx::query_as(
            "SELECT url, partner FROM vacancies WHERE visited = 0 ORDER BY rowid LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(url, partner)| PendingListing {
            url,
            partner: partner.unwrap_or_default(),
        }))
    }

    async fn merge_and_mark_visited(
        &self,
        url: &str,
        fields: &ExtractedFields,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE vacancies
            SET salary = ?, experience = ?, work_regime = ?, descr = ?,
                key_skills = ?, creation_date = ?, visited = 1
            WHERE url = ?
            "#,
        )
        .bind(&fields.salary)
        .bind(&fields.experience_level)
        .bind(&fields.work_regime)
        .bind(&fields.description)
        .bind(&fields.key_skills)
        .bind(&fields.posting_date)
        .bind(url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownListing(url.to_string()));
        }
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Option<Listing>, StoreError> {
        let row: Option<ListingRow> = sqlx::query_as(
            r#"
            SELECT url, title, company, street, salary, experience, work_regime, descr,
                   key_skills, creation_date, partner, date_updated, visited
            FROM vacancies WHERE url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Listing::from))
    }

    async fn counts(&self) -> Result<StoreCounts, StoreError> {
        let (total, pending): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN visited THEN 0 ELSE 1 END), 0) FROM vacancies",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(StoreCounts {
            total: total.max(0) as u64,
            pending: pending.max(0) as u64,
        })
    }

    async fn reset(&self) -> Result<(), StoreError> {
        sqlx::query("DROP TABLE IF EXISTS vacancies")
            .execute(&self.pool)
            .await?;
        self.create_schema().await?;
        crawl_info!("Listing table recreated");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
