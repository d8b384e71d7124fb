//! # HorarioRepository
//!
//! クラス枠の永続化を担当するリポジトリ。
//!
//! 時刻は `HH:MM` の TEXT 列に保存する（ゼロ埋め固定幅のため文字列順 = 時系列順）。
//! 一覧は曜日・開始時刻の順に並べる。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pilates_domain::{
   horario::{Capacidad, DiaSemana, Horario, HorarioId, InstructorName, NewHorario},
   tenant::TenantId,
   time_of_day::TimeOfDay,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// クラス枠リポジトリトレイト
#[async_trait]
pub trait HorarioRepository: Send + Sync {
   /// テナントのクラス枠を 1 ページ分取得する
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Horario>, InfraError>;

   /// テナントのクラス枠の総数
   async fn count(&self, tenant_id: &TenantId) -> Result<u64, InfraError>;

   async fn insert(&self, horario: &Horario) -> Result<(), InfraError>;

   /// 削除する。対象が存在しなければ `false`
   async fn delete(&self, tenant_id: &TenantId, id: &HorarioId) -> Result<bool, InfraError>;
}

/// DB の horarios テーブルの行
#[derive(sqlx::FromRow)]
struct HorarioRow {
   id:          Uuid,
   tenant_id:   Uuid,
   dia:         i16,
   hora_inicio: String,
   hora_fin:    String,
   capacidad:   i32,
   instructor:  Option<String>,
   created_at:  DateTime<Utc>,
}

impl TryFrom<HorarioRow> for Horario {
   type Error = InfraError;

   fn try_from(row: HorarioRow) -> Result<Self, Self::Error> {
      let unexpected = |e: &dyn std::fmt::Display| InfraError::unexpected(e.to_string());

      Ok(Horario::restore(NewHorario {
         id:          HorarioId::from_uuid(row.id),
         tenant_id:   TenantId::from_uuid(row.tenant_id),
         dia:         DiaSemana::from_number(row.dia).map_err(|e| unexpected(&e))?,
         hora_inicio: TimeOfDay::parse(&row.hora_inicio).map_err(|e| unexpected(&e))?,
         hora_fin:    TimeOfDay::parse(&row.hora_fin).map_err(|e| unexpected(&e))?,
         capacidad:   Capacidad::new(row.capacidad).map_err(|e| unexpected(&e))?,
         instructor:  row
            .instructor
            .map(InstructorName::new)
            .transpose()
            .map_err(|e| unexpected(&e))?,
         created_at:  row.created_at,
      }))
   }
}

/// PostgreSQL 実装の HorarioRepository
#[derive(Debug, Clone)]
pub struct PostgresHorarioRepository {
   pool: PgPool,
}

impl PostgresHorarioRepository {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl HorarioRepository for PostgresHorarioRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id, limit, offset))]
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Horario>, InfraError> {
      let rows = sqlx::query_as::<_, HorarioRow>(
         r#"
            SELECT id, tenant_id, dia, hora_inicio, hora_fin, capacidad, instructor, created_at
            FROM horarios
            WHERE tenant_id = $1
            ORDER BY dia ASC, hora_inicio ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
      )
      .bind(tenant_id.as_uuid())
      .bind(i64::from(limit))
      .bind(i64::try_from(offset).unwrap_or(i64::MAX))
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(Horario::try_from).collect()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id))]
   async fn count(&self, tenant_id: &TenantId) -> Result<u64, InfraError> {
      let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM horarios WHERE tenant_id = $1")
         .bind(tenant_id.as_uuid())
         .fetch_one(&self.pool)
         .await?;

      Ok(u64::try_from(count).unwrap_or(0))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(id = %horario.id()))]
   async fn insert(&self, horario: &Horario) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO horarios (id, tenant_id, dia, hora_inicio, hora_fin, capacidad, instructor, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
      )
      .bind(horario.id().as_uuid())
      .bind(horario.tenant_id().as_uuid())
      .bind(horario.dia().number())
      .bind(horario.hora_inicio().as_str())
      .bind(horario.hora_fin().as_str())
      .bind(horario.capacidad().as_i32())
      .bind(horario.instructor().map(InstructorName::as_str))
      .bind(horario.created_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id, %id))]
   async fn delete(&self, tenant_id: &TenantId, id: &HorarioId) -> Result<bool, InfraError> {
      let result = sqlx::query("DELETE FROM horarios WHERE tenant_id = $1 AND id = $2")
         .bind(tenant_id.as_uuid())
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(result.rows_affected() > 0)
   }
}
