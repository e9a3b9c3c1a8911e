// src/models/society.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Papéis dentro de uma sociedade
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "society_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum SocietyRole {
    Admin,
    Secretary,
    Resident,
    Security,
}

// ---
// 2. Society (O "Condomínio")
// ---
// A conta principal: limite de tenancy para cobrança e papéis
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Society {
    pub id: Uuid,
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,

    // Taxa de manutenção vigente (achatada nas colunas da tabela)
    pub rate_amount: Decimal,
    pub rate_currency: String,
    pub rate_effective_from: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Society {
    /// A taxa vigente, no formato aninhado que os clientes esperam.
    pub fn current_rate(&self) -> MaintenanceRate {
        MaintenanceRate {
            amount: self.rate_amount,
            currency: self.rate_currency.clone(),
            effective_from: self.rate_effective_from,
        }
    }
}

// Taxa de manutenção (vigente)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRate {
    pub amount: Decimal,
    pub currency: String,
    pub effective_from: NaiveDate,
}

// Entrada do histórico de taxas substituídas (imutável após criada)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RateHistoryEntry {
    pub id: Uuid,

    #[serde(skip_serializing)]
    pub society_id: Uuid,

    pub amount: Decimal,
    pub currency: String,
    pub effective_from: NaiveDate,
    pub effective_to: NaiveDate,

    pub created_at: DateTime<Utc>,
}

// ---
// 3. SocietyMember (A "Ponte" Usuário-Sociedade)
// ---
// Liga um Usuário a uma Sociedade, com papel e flats
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocietyMember {
    pub society_id: Uuid,
    pub user_id: Uuid,
    pub role: SocietyRole,
    pub flats: Vec<String>,
    pub joined_at: DateTime<Utc>,
}

// ---
// Payloads de requisição
// ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSocietyPayload {
    #[validate(length(min = 2, message = "O nome da sociedade deve ter no mínimo 2 caracteres."))]
    pub name: String,
    #[validate(length(min = 1, message = "A rua é obrigatória."))]
    pub street: String,
    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city: String,
    #[validate(length(min = 1, message = "O estado é obrigatório."))]
    pub state: String,
    #[validate(length(min = 1, message = "O país é obrigatório."))]
    pub country: String,
    #[validate(length(min = 1, message = "O CEP é obrigatório."))]
    pub zip_code: String,

    #[validate(custom(function = validate_positive_amount))]
    pub rate_amount: Decimal,
    #[validate(length(min = 3, max = 3, message = "A moeda deve ter 3 letras (ISO 4217)."))]
    pub rate_currency: String,
    pub rate_effective_from: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberPayload {
    pub user_id: Uuid,
    pub role: SocietyRole,
    #[validate(length(min = 1, message = "Informe pelo menos um flat."))]
    pub flats: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRatePayload {
    #[validate(custom(function = validate_positive_amount))]
    pub amount: Decimal,
    #[validate(length(min = 3, max = 3, message = "A moeda deve ter 3 letras (ISO 4217)."))]
    pub currency: String,
    pub effective_from: NaiveDate,
}

/// Valores monetários precisam ser estritamente positivos.
pub fn validate_positive_amount(amount: &Decimal) -> Result<(), validator::ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("positive_amount");
        err.message = Some("O valor deve ser positivo.".into());
        Err(err)
    }
}
