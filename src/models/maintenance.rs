// src/models/maintenance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::society::validate_positive_amount;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,   // Aguardando compensação
    Processed, // Compensado
    Failed,    // Falhou
}

// --- Structs ---

// Um pagamento de manutenção liquidado para um flat de uma sociedade.
// Imutável após criado: não há caminho de update/delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePayment {
    pub id: Uuid,

    #[serde(skip_serializing)]
    pub society_id: Uuid,

    pub flat_no: String,
    pub amount: Decimal,
    pub currency: String,
    pub payment_date: NaiveDate,
    pub payment_method: String,

    // Período de cobertura, alinhado ao mês-calendário (`from` normalizado ao dia 1)
    pub covers_from: NaiveDate,
    pub covers_to: NaiveDate,

    pub discount_amount: Decimal,
    pub discount_reason: String,
    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Saldo devedor de um único flat (derivado, nunca persistido)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatBalance {
    pub flat_no: String,
    pub balance_due: Decimal,
}

// Resumo de saldo para (usuário, sociedade). Apenas a serialização em cache persiste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub total_due: Decimal,
    pub flat_balances: Vec<FlatBalance>,
}

// ---
// Payload de registro de pagamento
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    #[validate(length(min = 1, message = "O número do flat é obrigatório."))]
    pub flat_no: String,

    #[validate(custom(function = validate_positive_amount))]
    pub amount: Decimal,

    pub payment_date: NaiveDate,

    // Fim do período coberto, informado pelo cliente (não derivado)
    pub covers_period_to: NaiveDate,

    #[validate(length(min = 1, message = "O método de pagamento é obrigatório."))]
    pub payment_method: String,

    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,

    #[serde(default)]
    pub applied_discount: Option<Decimal>,

    #[serde(default)]
    pub discount_reason: Option<String>,

    // Moeda opcional; cai na moeda da taxa vigente da sociedade
    #[serde(default)]
    pub currency: Option<String>,
}
