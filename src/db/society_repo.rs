// src/db/society_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::society::{RateHistoryEntry, Society, SocietyMember, SocietyRole},
};

#[derive(Clone)]
pub struct SocietyRepository {
    pool: PgPool,
}

impl SocietyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SOCIEDADES
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn create_society<'e, E>(
        &self,
        executor: E,
        name: &str,
        street: &str,
        city: &str,
        state: &str,
        country: &str,
        zip_code: &str,
        rate_amount: Decimal,
        rate_currency: &str,
        rate_effective_from: NaiveDate,
    ) -> Result<Society, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let society = sqlx::query_as::<_, Society>(
            r#"
            INSERT INTO societies (
                name, street, city, state, country, zip_code,
                rate_amount, rate_currency, rate_effective_from
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(street)
        .bind(city)
        .bind(state)
        .bind(country)
        .bind(zip_code)
        .bind(rate_amount)
        .bind(rate_currency)
        .bind(rate_effective_from)
        .fetch_one(executor)
        .await?;

        Ok(society)
    }

    pub async fn get_society_by_id(&self, society_id: Uuid) -> Result<Option<Society>, AppError> {
        let society = sqlx::query_as::<_, Society>("SELECT * FROM societies WHERE id = $1")
            .bind(society_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(society)
    }

    pub async fn list_societies_for_user(&self, user_id: Uuid) -> Result<Vec<Society>, AppError> {
        let societies = sqlx::query_as::<_, Society>(
            r#"
            SELECT s.*
            FROM societies s
            JOIN society_members m ON m.society_id = s.id
            WHERE m.user_id = $1
            ORDER BY s.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(societies)
    }

    // =========================================================================
    //  MEMBROS
    // =========================================================================

    pub async fn add_member<'e, E>(
        &self,
        executor: E,
        society_id: Uuid,
        user_id: Uuid,
        role: SocietyRole,
        flats: &[String],
    ) -> Result<SocietyMember, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, SocietyMember>(
            r#"
            INSERT INTO society_members (society_id, user_id, role, flats)
            VALUES ($1, $2, $3, $4)
            RETURNING society_id, user_id, role, flats, joined_at
            "#,
        )
        .bind(society_id)
        .bind(user_id)
        .bind(role)
        .bind(flats)
        .fetch_one(executor)
        .await?;

        Ok(member)
    }

    pub async fn get_member(
        &self,
        society_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<SocietyMember>, AppError> {
        let member = sqlx::query_as::<_, SocietyMember>(
            "SELECT * FROM society_members WHERE society_id = $1 AND user_id = $2",
        )
        .bind(society_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    // =========================================================================
    //  HISTÓRICO DE TAXAS (append-only)
    // =========================================================================

    pub async fn get_rate_history(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<RateHistoryEntry>, AppError> {
        let history = sqlx::query_as::<_, RateHistoryEntry>(
            r#"
            SELECT * FROM society_rate_history
            WHERE society_id = $1
            ORDER BY effective_from ASC
            "#,
        )
        .bind(society_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    /// Fecha a taxa vigente no histórico. `effective_to` é o início da nova
    /// taxa: os intervalos do histórico são semiabertos `[from, to)`.
    pub async fn push_rate_history<'e, E>(
        &self,
        executor: E,
        society_id: Uuid,
        amount: Decimal,
        currency: &str,
        effective_from: NaiveDate,
        effective_to: NaiveDate,
    ) -> Result<RateHistoryEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, RateHistoryEntry>(
            r#"
            INSERT INTO society_rate_history (society_id, amount, currency, effective_from, effective_to)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(society_id)
        .bind(amount)
        .bind(currency)
        .bind(effective_from)
        .bind(effective_to)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn update_current_rate<'e, E>(
        &self,
        executor: E,
        society_id: Uuid,
        amount: Decimal,
        currency: &str,
        effective_from: NaiveDate,
    ) -> Result<Society, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let society = sqlx::query_as::<_, Society>(
            r#"
            UPDATE societies
            SET rate_amount = $2,
                rate_currency = $3,
                rate_effective_from = $4,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(society_id)
        .bind(amount)
        .bind(currency)
        .bind(effective_from)
        .fetch_one(executor)
        .await?;

        Ok(society)
    }
}
