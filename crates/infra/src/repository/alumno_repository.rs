//! # AlumnoRepository
//!
//! 生徒の永続化を担当するリポジトリ。
//!
//! - メールアドレスは `(tenant_id, email)` の一意制約で重複を防ぐ。違反は
//!   [`InfraErrorKind::Conflict`](crate::error::InfraErrorKind::Conflict) になる
//! - 検索語は氏名・メールアドレスの部分一致（大文字小文字を区別しない）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pilates_domain::{
   alumno::{Alumno, AlumnoId, AlumnoNombre, Email, NewAlumno, Telefono},
   tenant::TenantId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

#[async_trait]
pub trait AlumnoRepository: Send + Sync {
   /// 氏名順に 1 ページ分取得する。`search` は部分一致
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      search: Option<&str>,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Alumno>, InfraError>;

   async fn count(&self, tenant_id: &TenantId, search: Option<&str>) -> Result<u64, InfraError>;

   async fn insert(&self, alumno: &Alumno) -> Result<(), InfraError>;
}

#[derive(sqlx::FromRow)]
struct AlumnoRow {
   id:         Uuid,
   tenant_id:  Uuid,
   nombre:     String,
   email:      String,
   telefono:   Option<String>,
   created_at: DateTime<Utc>,
}

impl TryFrom<AlumnoRow> for Alumno {
   type Error = InfraError;

   fn try_from(row: AlumnoRow) -> Result<Self, Self::Error> {
      let to_infra = |e: pilates_domain::DomainError| InfraError::unexpected(e.to_string());

      Ok(Alumno::new(NewAlumno {
         id:         AlumnoId::from_uuid(row.id),
         tenant_id:  TenantId::from_uuid(row.tenant_id),
         nombre:     AlumnoNombre::new(row.nombre).map_err(to_infra)?,
         email:      Email::new(row.email).map_err(to_infra)?,
         telefono:   row.telefono.map(Telefono::new).transpose().map_err(to_infra)?,
         created_at: row.created_at,
      }))
   }
}

/// `ILIKE` 用のパターンを作る（`%` `_` `\` はリテラルとして扱う）
fn like_pattern(search: Option<&str>) -> Option<String> {
   let term = search.map(str::trim).filter(|s| !s.is_empty())?;
   let escaped = term
      .replace('\\', "\\\\")
      .replace('%', "\\%")
      .replace('_', "\\_");
   Some(format!("%{escaped}%"))
}

/// PostgreSQL 実装の AlumnoRepository
#[derive(Debug, Clone)]
pub struct PostgresAlumnoRepository {
   pool: PgPool,
}

impl PostgresAlumnoRepository {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl AlumnoRepository for PostgresAlumnoRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id, limit, offset))]
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      search: Option<&str>,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Alumno>, InfraError> {
      let rows = sqlx::query_as::<_, AlumnoRow>(
         r#"
            SELECT id, tenant_id, nombre, email, telefono, created_at
            FROM alumnos
            WHERE tenant_id = $1
              AND ($2::text IS NULL OR nombre ILIKE $2 OR email ILIKE $2)
            ORDER BY nombre ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
      )
      .bind(tenant_id.as_uuid())
      .bind(like_pattern(search))
      .bind(i64::from(limit))
      .bind(i64::try_from(offset).unwrap_or(i64::MAX))
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(Alumno::try_from).collect()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%tenant_id))]
   async fn count(&self, tenant_id: &TenantId, search: Option<&str>) -> Result<u64, InfraError> {
      let (count,): (i64,) = sqlx::query_as(
         r#"
            SELECT COUNT(*)
            FROM alumnos
            WHERE tenant_id = $1
              AND ($2::text IS NULL OR nombre ILIKE $2 OR email ILIKE $2)
            "#,
      )
      .bind(tenant_id.as_uuid())
      .bind(like_pattern(search))
      .fetch_one(&self.pool)
      .await?;

      Ok(u64::try_from(count).unwrap_or(0))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(id = %alumno.id()))]
   async fn insert(&self, alumno: &Alumno) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO alumnos (id, tenant_id, nombre, email, telefono, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
      )
      .bind(alumno.id().as_uuid())
      .bind(alumno.tenant_id().as_uuid())
      .bind(alumno.nombre().as_str())
      .bind(alumno.email().as_str())
      .bind(alumno.telefono().map(Telefono::as_str))
      .bind(alumno.created_at())
      .execute(&self.pool)
      .await
      .map_err(|e| InfraError::from_insert(e, "Alumno", "email"))?;

      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case(None, None)]
   #[case(Some("   "), None)]
   #[case(Some("lucia"), Some("%lucia%"))]
   #[case(Some(" 50%_off "), Some("%50\\%\\_off%"))]
   #[case(Some("a\\b"), Some("%a\\\\b%"))]
   fn test_like_patternは特殊文字をエスケープする(
      #[case] search: Option<&str>,
      #[case] expected: Option<&str>,
   ) {
      assert_eq!(like_pattern(search).as_deref(), expected);
   }
}
