// src/services/society_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SocietyRepository,
    models::society::{
        AddMemberPayload, CreateSocietyPayload, RateHistoryEntry, Society, SocietyMember,
        SocietyRole, UpdateRatePayload,
    },
};

#[derive(Clone)]
pub struct SocietyService {
    society_repo: SocietyRepository,
    pool: PgPool,
}

impl SocietyService {
    pub fn new(society_repo: SocietyRepository, pool: PgPool) -> Self {
        Self { society_repo, pool }
    }

    /// Cria a sociedade e já vincula o criador como admin, na mesma transação.
    pub async fn create_society(
        &self,
        creator_id: Uuid,
        payload: CreateSocietyPayload,
    ) -> Result<Society, AppError> {
        let mut tx = self.pool.begin().await?;

        let society = self
            .society_repo
            .create_society(
                &mut *tx,
                &payload.name,
                &payload.street,
                &payload.city,
                &payload.state,
                &payload.country,
                &payload.zip_code,
                payload.rate_amount,
                &payload.rate_currency,
                payload.rate_effective_from,
            )
            .await?;

        self.society_repo
            .add_member(&mut *tx, society.id, creator_id, SocietyRole::Admin, &[])
            .await?;

        tx.commit().await?;

        tracing::info!("Sociedade '{}' criada por {}", society.name, creator_id);
        Ok(society)
    }

    pub async fn list_my_societies(&self, user_id: Uuid) -> Result<Vec<Society>, AppError> {
        self.society_repo.list_societies_for_user(user_id).await
    }

    pub async fn add_member(
        &self,
        society_id: Uuid,
        payload: AddMemberPayload,
    ) -> Result<SocietyMember, AppError> {
        self.society_repo
            .get_society_by_id(society_id)
            .await?
            .ok_or(AppError::SocietyNotFound)?;

        // Números de flat são normalizados para maiúsculas
        let flats: Vec<String> = payload
            .flats
            .iter()
            .map(|flat| flat.trim().to_uppercase())
            .collect();

        self.society_repo
            .add_member(&self.pool, society_id, payload.user_id, payload.role, &flats)
            .await
    }

    pub async fn get_rate_history(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<RateHistoryEntry>, AppError> {
        self.society_repo
            .get_society_by_id(society_id)
            .await?
            .ok_or(AppError::SocietyNotFound)?;

        self.society_repo.get_rate_history(society_id).await
    }

    /// Troca a taxa vigente. A taxa antiga é fechada no histórico com
    /// `effective_to` igual ao início da nova (intervalos semiabertos que se
    /// encaixam sem sobreposição). Se valor e moeda não mudaram, a operação é
    /// um no-op que devolve a sociedade como está.
    pub async fn update_rate(
        &self,
        society_id: Uuid,
        payload: UpdateRatePayload,
    ) -> Result<Society, AppError> {
        let society = self
            .society_repo
            .get_society_by_id(society_id)
            .await?
            .ok_or(AppError::SocietyNotFound)?;

        if society.rate_amount == payload.amount && society.rate_currency == payload.currency {
            return Ok(society);
        }

        let mut tx = self.pool.begin().await?;

        self.society_repo
            .push_rate_history(
                &mut *tx,
                society_id,
                society.rate_amount,
                &society.rate_currency,
                society.rate_effective_from,
                payload.effective_from,
            )
            .await?;

        let updated = self
            .society_repo
            .update_current_rate(
                &mut *tx,
                society_id,
                payload.amount,
                &payload.currency,
                payload.effective_from,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Taxa da sociedade {} atualizada para {} {}",
            society_id,
            updated.rate_amount,
            updated.rate_currency
        );
        Ok(updated)
    }
}
