use std::{borrow::Cow, time::Duration};

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, Executor, PgPool};

use crate::models::{BusinessFilter, BusinessRecord, DealBreaker, Interest, INTEREST_SEED};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    include_inactive: bool,
}

impl Database {
    /// Connect, creating the database on first run, and apply embedded
    /// migrations.
    ///
    /// `include_inactive` governs whether the single-entity lookup may see
    /// rows whose status is not `active`; the collection listing always
    /// filters them out.
    pub async fn connect(database_url: &str, include_inactive: bool) -> Result<Self, sqlx::Error> {
        let pool = match pool_options().connect(database_url).await {
            Ok(pool) => pool,
            Err(sqlx::Error::Database(db_err)) if db_err.code() == Some(Cow::Borrowed("3D000")) => {
                log::info!("Database missing, attempting to create it");
                create_database_if_missing(database_url).await?;

                pool_options().connect(database_url).await?
            }
            Err(err) => return Err(err),
        };

        // Run embedded migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool, include_inactive))
    }

    pub fn new(pool: PgPool, include_inactive: bool) -> Self {
        Self {
            pool,
            include_inactive,
        }
    }

    /// Active businesses matching the supplied filters, best-rated first
    /// (review count breaks rating ties), capped at `filter.limit` rows.
    pub async fn list_businesses(
        &self,
        filter: &BusinessFilter,
    ) -> Result<Vec<BusinessRecord>, sqlx::Error> {
        let records = sqlx::query_as::<_, BusinessRecord>(
            r#"
            SELECT
                id,
                slug,
                name,
                category,
                location,
                rating,
                total_rating,
                reviews,
                badge,
                verified,
                image,
                image_alt,
                href,
                service_percentile,
                price_percentile,
                ambience_percentile,
                distance_km,
                price_range,
                description,
                phone,
                website,
                address,
                status,
                created_at,
                updated_at
            FROM businesses
            WHERE status = 'active'
              AND ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR badge = $2)
              AND ($3::boolean IS NULL OR verified = $3)
            ORDER BY total_rating DESC, reviews DESC
            LIMIT $4
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.badge.as_deref())
        .bind(filter.verified)
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Resolve one business by primary key or slug; the caller does not say
    /// which kind of identifier it holds.
    pub async fn get_business(
        &self,
        identifier: &str,
    ) -> Result<Option<BusinessRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, BusinessRecord>(
            r#"
            SELECT
                id,
                slug,
                name,
                category,
                location,
                rating,
                total_rating,
                reviews,
                badge,
                verified,
                image,
                image_alt,
                href,
                service_percentile,
                price_percentile,
                ambience_percentile,
                distance_km,
                price_range,
                description,
                phone,
                website,
                address,
                status,
                created_at,
                updated_at
            FROM businesses
            WHERE (id::text = $1 OR slug = $1)
              AND ($2::boolean OR status = 'active')
            "#,
        )
        .bind(identifier)
        .bind(self.include_inactive)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list_deal_breakers(&self) -> Result<Vec<DealBreaker>, sqlx::Error> {
        let records = sqlx::query_as::<_, DealBreaker>(
            r#"
            SELECT
                id,
                label,
                icon,
                category
            FROM deal_breakers
            ORDER BY label ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_interests(&self) -> Result<Vec<Interest>, sqlx::Error> {
        let records = sqlx::query_as::<_, Interest>(
            r#"
            SELECT
                id,
                name,
                icon
            FROM interests
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Idempotent seed of the interests reference table. Conflicting ids
    /// leave existing rows untouched, so repeated startups are safe.
    pub async fn ensure_interest_seed(&self) -> Result<(), sqlx::Error> {
        for (id, name) in INTEREST_SEED {
            sqlx::query(
                r#"
                INSERT INTO interests (id, name)
                VALUES ($1, $2)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Some(Duration::from_secs(600)))
        .test_before_acquire(true)
}

async fn create_database_if_missing(database_url: &str) -> Result<(), sqlx::Error> {
    let options: PgConnectOptions = database_url.parse()?;
    let database_name = options
        .get_database()
        .map(|name| name.to_string())
        .unwrap_or_else(|| "postgres".to_string());

    // Already targeting the maintenance database, nothing to do.
    if database_name.eq_ignore_ascii_case("postgres") {
        return Ok(());
    }

    let maintenance_options = options.clone().database("postgres");
    let mut connection = sqlx::postgres::PgConnection::connect_with(&maintenance_options).await?;

    let create_stmt = format!("CREATE DATABASE \"{}\"", database_name.replace('"', "\"\""));

    match connection.execute(create_stmt.as_str()).await {
        Ok(_) => {
            log::info!("Created database '{}'", database_name);
            Ok(())
        }
        Err(sqlx::Error::Database(db_err)) if db_err.code() == Some(Cow::Borrowed("42P04")) => {
            log::info!("Database '{}' already exists", database_name);
            Ok(())
        }
        Err(err) => Err(err),
    }
}
