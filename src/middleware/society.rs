// src/middleware/society.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::common::error::AppError;

// O nome do nosso cabeçalho HTTP customizado
const SOCIETY_ID_HEADER: &str = "x-society-id";

// O extrator de contexto de sociedade.
// Armazena o UUID da sociedade que o utilizador quer aceder.
#[derive(Debug, Clone, Copy)]
pub struct SocietyContext(pub Uuid);

impl<S> FromRequestParts<S> for SocietyContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Tenta ler o cabeçalho X-Society-ID
        let header_value = parts
            .headers
            .get(SOCIETY_ID_HEADER)
            .ok_or(AppError::MissingSocietyHeader)?;

        let value_str = header_value
            .to_str()
            .map_err(|_| AppError::MissingSocietyHeader)?;

        let society_id = Uuid::parse_str(value_str).map_err(|_| AppError::MissingSocietyHeader)?;

        Ok(SocietyContext(society_id))
    }
}
