// src/services/maintenance_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BalanceCache, MaintenanceRepository, SocietyRepository, cache::BALANCE_TTL_SECS},
    models::maintenance::{
        BalanceSummary, FlatBalance, MaintenancePayment, PaymentStatus, RecordPaymentPayload,
    },
    services::accrual::{RateSchedule, accrue_flat_balance, first_of_month, first_of_month_after},
};

#[derive(Clone)]
pub struct MaintenanceService {
    society_repo: SocietyRepository,
    maintenance_repo: MaintenanceRepository,
    cache: BalanceCache,
    pool: PgPool,
}

impl MaintenanceService {
    pub fn new(
        society_repo: SocietyRepository,
        maintenance_repo: MaintenanceRepository,
        cache: BalanceCache,
        pool: PgPool,
    ) -> Self {
        Self {
            society_repo,
            maintenance_repo,
            cache,
            pool,
        }
    }

    /// Saldo pendente de (usuário, sociedade), servido do cache quando fresco.
    ///
    /// Cache hit devolve o valor como está: registrar um pagamento NÃO
    /// invalida a entrada, então o resumo pode ficar obsoleto por até uma
    /// semana (decisão de produto: obsolescência limitada pelo TTL). Cache
    /// miss recalcula do banco e regrava; falhas do Redis nos dois sentidos
    /// são logadas e engolidas.
    pub async fn get_pending_maintenance(
        &self,
        user_id: Uuid,
        society_id: Uuid,
    ) -> Result<BalanceSummary, AppError> {
        let key = BalanceCache::balance_key(user_id, society_id);

        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_str::<BalanceSummary>(&cached) {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    // Entrada corrompida vira miss
                    tracing::warn!("Entrada de cache ilegível ({}): {}", key, e);
                }
            }
        }

        let summary = self.calculate_balance(user_id, society_id).await?;

        match serde_json::to_string(&summary) {
            Ok(serialized) => self.cache.set_ex(&key, &serialized, BALANCE_TTL_SECS).await,
            Err(e) => tracing::warn!("Falha ao serializar resumo de saldo: {}", e),
        }

        Ok(summary)
    }

    /// Recalcula o resumo a partir da fonte da verdade (banco de dados).
    async fn calculate_balance(
        &self,
        user_id: Uuid,
        society_id: Uuid,
    ) -> Result<BalanceSummary, AppError> {
        let society = self
            .society_repo
            .get_society_by_id(society_id)
            .await?
            .ok_or(AppError::SocietyNotFound)?;

        let flats = self
            .society_repo
            .get_member(society_id, user_id)
            .await?
            .map(|member| member.flats)
            .unwrap_or_default();

        if flats.is_empty() {
            return Err(AppError::NoFlatsForUser);
        }

        let history = self.society_repo.get_rate_history(society_id).await?;
        let schedule = RateSchedule::new(&society, history);

        // Já vem ordenado por covers_to decrescente
        let payments = self
            .maintenance_repo
            .get_payments_for_flats(society_id, &flats)
            .await?;

        let society_created = society.created_at.date_naive();
        let today = Utc::now().date_naive();

        let mut total_due = Decimal::ZERO;
        let flat_balances: Vec<FlatBalance> = flats
            .iter()
            .map(|flat| {
                let last_covered_to = payments
                    .iter()
                    .find(|payment| payment.flat_no == *flat)
                    .map(|payment| payment.covers_to);

                let balance_due =
                    accrue_flat_balance(&schedule, society_created, last_covered_to, today);
                total_due += balance_due;

                FlatBalance {
                    flat_no: flat.clone(),
                    balance_due,
                }
            })
            .collect();

        Ok(BalanceSummary {
            total_due,
            flat_balances,
        })
    }

    /// Registra um pagamento de manutenção, derivando o início do período
    /// coberto a partir do histórico do flat.
    ///
    /// `covers_from` é o primeiro dia do mês seguinte ao último `covers_to`
    /// do flat; se o flat nunca pagou, parte do mês de criação da sociedade.
    /// A moeda cai na da taxa vigente quando não informada. O cache de saldo
    /// NÃO é invalidado aqui (ver get_pending_maintenance).
    pub async fn record_payment(
        &self,
        society_id: Uuid,
        payload: RecordPaymentPayload,
    ) -> Result<MaintenancePayment, AppError> {
        let society = self
            .society_repo
            .get_society_by_id(society_id)
            .await?
            .ok_or(AppError::SocietyNotFound)?;

        let flat_no = payload.flat_no.trim().to_uppercase();

        let last_payment = self
            .maintenance_repo
            .get_last_payment(society_id, &flat_no)
            .await?;

        let covers_from = match &last_payment {
            Some(last) => first_of_month_after(last.covers_to),
            // Primeiro pagamento do flat: começa no mês de criação da sociedade
            None => first_of_month(society.created_at.date_naive()),
        };

        let currency = payload
            .currency
            .unwrap_or_else(|| society.rate_currency.clone());
        let status = payload.payment_status.unwrap_or(PaymentStatus::Pending);
        let discount_amount = payload.applied_discount.unwrap_or(Decimal::ZERO);
        let discount_reason = payload
            .discount_reason
            .unwrap_or_else(|| "No discount applied".to_string());

        let payment = self
            .maintenance_repo
            .create_payment(
                &self.pool,
                society_id,
                &flat_no,
                payload.amount,
                &currency,
                payload.payment_date,
                &payload.payment_method,
                covers_from,
                payload.covers_period_to,
                discount_amount,
                &discount_reason,
                status,
            )
            .await?;

        Ok(payment)
    }

    /// Todos os pagamentos dos flats do usuário na sociedade.
    pub async fn get_my_records(
        &self,
        user_id: Uuid,
        society_id: Uuid,
    ) -> Result<Vec<MaintenancePayment>, AppError> {
        let flats = self
            .society_repo
            .get_member(society_id, user_id)
            .await?
            .map(|member| member.flats)
            .unwrap_or_default();

        if flats.is_empty() {
            return Err(AppError::NoFlatsForUser);
        }

        self.maintenance_repo
            .get_payments_for_flats(society_id, &flats)
            .await
    }
}
