// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Sociedade não encontrada")]
    SocietyNotFound,

    #[error("Cabeçalho X-Society-ID ausente ou inválido")]
    MissingSocietyHeader,

    #[error("Nenhum flat encontrado para o usuário nesta sociedade")]
    NoFlatsForUser,

    #[error("Usuário não é membro desta sociedade")]
    NotAMember,

    #[error("Ação reservada ao papel '{0}'")]
    Forbidden(&'static str),

    // Dois registros concorrentes tentaram reservar o mesmo período de cobertura
    #[error("Período de cobertura já registrado para este flat")]
    PeriodAlreadyCovered,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::SocietyNotFound => (StatusCode::NOT_FOUND, "Sociedade não encontrada."),
            AppError::MissingSocietyHeader => (
                StatusCode::BAD_REQUEST,
                "O cabeçalho X-Society-ID é obrigatório e deve ser um UUID.",
            ),
            AppError::NoFlatsForUser => (
                StatusCode::NOT_FOUND,
                "Nenhum flat encontrado para este usuário na sociedade informada.",
            ),
            AppError::NotAMember => (StatusCode::FORBIDDEN, "Você não é membro desta sociedade."),
            AppError::Forbidden(role) => {
                let body = Json(json!({
                    "error": format!("Você precisa do papel '{}' para realizar esta ação.", role),
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::PeriodAlreadyCovered => (
                StatusCode::CONFLICT,
                "Já existe um pagamento cobrindo este período para o flat.",
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
