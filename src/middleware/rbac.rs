// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::society::SocietyContext,
    models::{auth::User, society::SocietyRole},
};

/// 1. O Trait que define o papel exigido por uma rota
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> SocietyRole;
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
///
/// Verifica a associação do usuário autenticado na sociedade do cabeçalho e
/// exige o papel `T`. Admins passam por qualquer exigência.
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Extrai Usuário (injetado pelo auth_guard)
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        // B. Extrai a sociedade do cabeçalho
        let SocietyContext(society_id) =
            SocietyContext::from_request_parts(parts, state).await?;

        // C. Verifica a associação no banco
        let member = app_state
            .society_repo
            .get_member(society_id, user.id)
            .await?
            .ok_or(AppError::NotAMember)?;

        if member.role != T::role() && member.role != SocietyRole::Admin {
            return Err(AppError::Forbidden(T::slug()));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct RoleAdmin;
impl RoleDef for RoleAdmin {
    fn role() -> SocietyRole {
        SocietyRole::Admin
    }
    fn slug() -> &'static str {
        "admin"
    }
}

pub struct RoleSecretary;
impl RoleDef for RoleSecretary {
    fn role() -> SocietyRole {
        SocietyRole::Secretary
    }
    fn slug() -> &'static str {
        "secretary"
    }
}
