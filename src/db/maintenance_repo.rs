// src/db/maintenance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::maintenance::{MaintenancePayment, PaymentStatus},
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        society_id: Uuid,
        flat_no: &str,
        amount: Decimal,
        currency: &str,
        payment_date: NaiveDate,
        payment_method: &str,
        covers_from: NaiveDate,
        covers_to: NaiveDate,
        discount_amount: Decimal,
        discount_reason: &str,
        status: PaymentStatus,
    ) -> Result<MaintenancePayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, MaintenancePayment>(
            r#"
            INSERT INTO maintenance_payments (
                society_id, flat_no, amount, currency,
                payment_date, payment_method,
                covers_from, covers_to,
                discount_amount, discount_reason, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(society_id)
        .bind(flat_no)
        .bind(amount)
        .bind(currency)
        .bind(payment_date)
        .bind(payment_method)
        .bind(covers_from)
        .bind(covers_to)
        .bind(discount_amount)
        .bind(discount_reason)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Dois registros concorrentes derivaram o mesmo `covers_from`:
            // o índice único (society_id, flat_no, covers_from) rejeita o segundo.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::PeriodAlreadyCovered;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(payment)
    }

    /// Todos os pagamentos do conjunto de flats, do período mais recente para
    /// o mais antigo. O banco não garante ordem por si só, então ordenamos aqui.
    pub async fn get_payments_for_flats(
        &self,
        society_id: Uuid,
        flats: &[String],
    ) -> Result<Vec<MaintenancePayment>, AppError> {
        let payments = sqlx::query_as::<_, MaintenancePayment>(
            r#"
            SELECT * FROM maintenance_payments
            WHERE society_id = $1 AND flat_no = ANY($2)
            ORDER BY covers_to DESC, created_at DESC
            "#,
        )
        .bind(society_id)
        .bind(flats)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// O pagamento com o `covers_to` mais recente de um flat. Empates são
    /// desfeitos pelo `created_at` mais novo (determinístico, mas não contratual).
    pub async fn get_last_payment(
        &self,
        society_id: Uuid,
        flat_no: &str,
    ) -> Result<Option<MaintenancePayment>, AppError> {
        let payment = sqlx::query_as::<_, MaintenancePayment>(
            r#"
            SELECT * FROM maintenance_payments
            WHERE society_id = $1 AND flat_no = $2
            ORDER BY covers_to DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(society_id)
        .bind(flat_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }
}
