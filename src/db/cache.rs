// src/db/cache.rs

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use uuid::Uuid;

// Prefixo das chaves de saldo no Redis
const BALANCE_KEY_PREFIX: &str = "maintenanceBalance";

/// TTL do saldo em cache: 1 semana. A escrita de um novo pagamento NÃO
/// invalida a entrada; a obsolescência é limitada por este TTL.
pub const BALANCE_TTL_SECS: u64 = 604_800;

// Cache read-through de saldos pendentes. O Redis aqui é estritamente
// derivado e descartável: o banco de dados continua sendo a fonte da verdade.
#[derive(Clone)]
pub struct BalanceCache {
    conn: ConnectionManager,
}

impl BalanceCache {
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    pub fn balance_key(user_id: Uuid, society_id: Uuid) -> String {
        format!("{}:{}:{}", BALANCE_KEY_PREFIX, user_id, society_id)
    }

    /// Busca uma entrada. Falhas do Redis são logadas e tratadas como cache
    /// miss: o chamador recalcula a partir do banco.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Falha ao ler do cache ({}): {}", key, e);
                None
            }
        }
    }

    /// Grava uma entrada com TTL. Best-effort: falhas são logadas e engolidas,
    /// nunca propagadas ao usuário final.
    pub async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            tracing::warn!("Falha ao gravar no cache ({}): {}", key, e);
        }
    }
}
