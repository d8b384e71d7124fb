//! # PackRepository
//!
//! 回数券の永続化を担当するリポジトリ。一覧は有効なものを先に、価格の安い順に並べる。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pilates_domain::{
   pack::{NewPack, Pack, PackId, PackNombre},
   tenant::TenantId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

#[async_trait]
pub trait PackRepository: Send + Sync {
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Pack>, InfraError>;

   async fn count(&self, tenant_id: &TenantId) -> Result<u64, InfraError>;

   async fn insert(&self, pack: &Pack) -> Result<(), InfraError>;
}

#[derive(sqlx::FromRow)]
struct PackRow {
   id:              Uuid,
   tenant_id:       Uuid,
   nombre:          String,
   clases:          i32,
   precio_centavos: i64,
   vigencia_dias:   i32,
   activo:          bool,
   created_at:      DateTime<Utc>,
}

impl TryFrom<PackRow> for Pack {
   type Error = InfraError;

   fn try_from(row: PackRow) -> Result<Self, Self::Error> {
      Ok(Pack::restore(NewPack {
         id:              PackId::from_uuid(row.id),
         tenant_id:       TenantId::from_uuid(row.tenant_id),
         nombre:          PackNombre::new(row.nombre)
            .map_err(|e| InfraError::unexpected(e.to_string()))?,
         clases:          row.clases,
         precio_centavos: row.precio_centavos,
         vigencia_dias:   row.vigencia_dias,
         activo:          row.activo,
         created_at:      row.created_at,
      }))
   }
}

/// PostgreSQL 実装の PackRepository
#[derive(Debug, Clone)]
pub struct PostgresPackRepository {
   pool: PgPool,
}

impl PostgresPackRepository {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl PackRepository for PostgresPackRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id, limit, offset))]
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Pack>, InfraError> {
      let rows = sqlx::query_as::<_, PackRow>(
         r#"
            SELECT id, tenant_id, nombre, clases, precio_centavos, vigencia_dias, activo, created_at
            FROM packs
            WHERE tenant_id = $1
            ORDER BY activo DESC, precio_centavos ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
      )
      .bind(tenant_id.as_uuid())
      .bind(i64::from(limit))
      .bind(i64::try_from(offset).unwrap_or(i64::MAX))
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(Pack::try_from).collect()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id))]
   async fn count(&self, tenant_id: &TenantId) -> Result<u64, InfraError> {
      let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM packs WHERE tenant_id = $1")
         .bind(tenant_id.as_uuid())
         .fetch_one(&self.pool)
         .await?;

      Ok(u64::try_from(count).unwrap_or(0))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(id = %pack.id()))]
   async fn insert(&self, pack: &Pack) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO packs (id, tenant_id, nombre, clases, precio_centavos, vigencia_dias, activo, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
      )
      .bind(pack.id().as_uuid())
      .bind(pack.tenant_id().as_uuid())
      .bind(pack.nombre().as_str())
      .bind(pack.clases())
      .bind(pack.precio_centavos())
      .bind(pack.vigencia_dias())
      .bind(pack.activo())
      .bind(pack.created_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }
}
