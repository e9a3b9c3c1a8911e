// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{BalanceCache, MaintenanceRepository, SocietyRepository, UserRepository},
    services::{AuthService, MaintenanceService, SocietyService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub society_repo: SocietyRepository,
    pub auth_service: AuthService,
    pub society_service: SocietyService,
    pub maintenance_service: MaintenanceService,
}

impl AppState {
    // Constrói tudo uma única vez no start do processo e injeta por clone:
    // nada de singletons globais escondidos.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let redis_url = env::var("REDIS_URL").expect("REDIS_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let balance_cache = BalanceCache::connect(&redis_url).await?;

        tracing::info!("✅ Conexão com o Redis estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let society_repo = SocietyRepository::new(db_pool.clone());
        let maintenance_repo = MaintenanceRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret, db_pool.clone());
        let society_service = SocietyService::new(society_repo.clone(), db_pool.clone());
        let maintenance_service = MaintenanceService::new(
            society_repo.clone(),
            maintenance_repo,
            balance_cache,
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            society_repo,
            auth_service,
            society_service,
            maintenance_service,
        })
    }
}
