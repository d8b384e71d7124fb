//! # StudioConfigRepository
//!
//! テナントにつき 1 行のスタジオ設定を保存する。未登録なら `None` を返し、
//! 既定値の適用は呼び出し側が行う。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pilates_domain::{
   studio::{StudioConfig, StudioHours, StudioName},
   tenant::TenantId,
   time_of_day::TimeOfDay,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

#[async_trait]
pub trait StudioConfigRepository: Send + Sync {
   async fn find(&self, tenant_id: &TenantId) -> Result<Option<StudioConfig>, InfraError>;

   /// 作成または更新する
   async fn upsert(&self, config: &StudioConfig) -> Result<(), InfraError>;
}

#[derive(sqlx::FromRow)]
struct StudioConfigRow {
   tenant_id:  Uuid,
   nombre:     String,
   apertura:   String,
   cierre:     String,
   updated_at: DateTime<Utc>,
}

impl TryFrom<StudioConfigRow> for StudioConfig {
   type Error = InfraError;

   fn try_from(row: StudioConfigRow) -> Result<Self, Self::Error> {
      let nombre = StudioName::new(row.nombre).map_err(|e| InfraError::unexpected(e.to_string()))?;
      let hours = TimeOfDay::parse(&row.apertura)
         .and_then(|apertura| Ok((apertura, TimeOfDay::parse(&row.cierre)?)))
         .and_then(|(apertura, cierre)| StudioHours::new(apertura, cierre))
         .map_err(|e| InfraError::unexpected(e.to_string()))?;

      Ok(StudioConfig::new(
         TenantId::from_uuid(row.tenant_id),
         nombre,
         hours,
         row.updated_at,
      ))
   }
}

/// PostgreSQL 実装の StudioConfigRepository
#[derive(Debug, Clone)]
pub struct PostgresStudioConfigRepository {
   pool: PgPool,
}

impl PostgresStudioConfigRepository {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl StudioConfigRepository for PostgresStudioConfigRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id))]
   async fn find(&self, tenant_id: &TenantId) -> Result<Option<StudioConfig>, InfraError> {
      let row = sqlx::query_as::<_, StudioConfigRow>(
         r#"
            SELECT tenant_id, nombre, apertura, cierre, updated_at
            FROM studio_configs
            WHERE tenant_id = $1
            "#,
      )
      .bind(tenant_id.as_uuid())
      .fetch_optional(&self.pool)
      .await?;

      row.map(StudioConfig::try_from).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(tenant_id = %config.tenant_id()))]
   async fn upsert(&self, config: &StudioConfig) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO studio_configs (tenant_id, nombre, apertura, cierre, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (tenant_id) DO UPDATE
            SET nombre = EXCLUDED.nombre,
                apertura = EXCLUDED.apertura,
                cierre = EXCLUDED.cierre,
                updated_at = EXCLUDED.updated_at
            "#,
      )
      .bind(config.tenant_id().as_uuid())
      .bind(config.nombre().as_str())
      .bind(config.hours().apertura().as_str())
      .bind(config.hours().cierre().as_str())
      .bind(config.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }
}
