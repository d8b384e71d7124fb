//! 生徒ユースケース

use std::sync::Arc;

use pilates_domain::{
   alumno::{Alumno, AlumnoId, AlumnoNombre, Email, NewAlumno, Telefono},
   clock::Clock,
   tenant::TenantId,
};
use pilates_infra::{CacheInvalidator, CacheTag, repository::AlumnoRepository};
use pilates_shared::{PaginatedResponse, PaginationParams};

use crate::error::CoreError;

/// 生徒登録の入力
#[derive(Debug, Clone)]
pub struct CreateAlumnoInput {
   pub nombre:   AlumnoNombre,
   pub email:    Email,
   pub telefono: Option<Telefono>,
}

/// 生徒ユースケース
pub struct AlumnoUseCaseImpl {
   alumno_repository: Arc<dyn AlumnoRepository>,
   cache:             Arc<dyn CacheInvalidator>,
   clock:             Arc<dyn Clock>,
}

impl AlumnoUseCaseImpl {
   pub fn new(
      alumno_repository: Arc<dyn AlumnoRepository>,
      cache: Arc<dyn CacheInvalidator>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         alumno_repository,
         cache,
         clock,
      }
   }

   /// 生徒の一覧（氏名順）
   ///
   /// `search` は氏名・メールアドレスの部分一致。空白のみは指定なしと同じ。
   pub async fn list_alumnos(
      &self,
      tenant_id: &TenantId,
      search: Option<&str>,
      params: &PaginationParams,
   ) -> Result<PaginatedResponse<Alumno>, CoreError> {
      let search = search.map(str::trim).filter(|s| !s.is_empty());

      let total = self.alumno_repository.count(tenant_id, search).await?;
      let alumnos = self
         .alumno_repository
         .find_page(tenant_id, search, params.limit(), params.skip())
         .await?;

      Ok(PaginatedResponse::new(alumnos, total, params))
   }

   /// 生徒を登録する
   ///
   /// メールアドレスはテナント内で一意。重複は 409 を返す。
   pub async fn create_alumno(
      &self,
      tenant_id: TenantId,
      input: CreateAlumnoInput,
   ) -> Result<Alumno, CoreError> {
      let alumno = Alumno::new(NewAlumno {
         id:         AlumnoId::new(),
         tenant_id:  tenant_id.clone(),
         nombre:     input.nombre,
         email:      input.email,
         telefono:   input.telefono,
         created_at: self.clock.now(),
      });

      self.alumno_repository.insert(&alumno).await.map_err(|e| {
         if e.is_conflict() {
            return CoreError::Conflict("Ya existe un alumno con ese email".to_string());
         }
         CoreError::Database(e)
      })?;
      self.cache.invalidate(&CacheTag::ALUMNOS.scoped_to(&tenant_id));

      tracing::info!(tenant_id = %tenant_id, alumno_id = %alumno.id(), "生徒を登録");

      Ok(alumno)
   }
}

#[cfg(test)]
mod tests {
   use chrono::DateTime;
   use pilates_domain::clock::FixedClock;
   use pilates_infra::mock::{MockAlumnoRepository, RecordingCacheInvalidator};
   use pretty_assertions::assert_eq;

   use super::*;

   fn sut(cache: &RecordingCacheInvalidator) -> AlumnoUseCaseImpl {
      AlumnoUseCaseImpl::new(
         Arc::new(MockAlumnoRepository::new()),
         Arc::new(cache.clone()),
         Arc::new(FixedClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
         )),
      )
   }

   fn input(nombre: &str, email: &str) -> CreateAlumnoInput {
      CreateAlumnoInput {
         nombre:   AlumnoNombre::new(nombre).unwrap(),
         email:    Email::new(email).unwrap(),
         telefono: None,
      }
   }

   #[tokio::test]
   async fn test_重複したemailはconflict() {
      let cache = RecordingCacheInvalidator::new();
      let sut = sut(&cache);
      let tenant_id = TenantId::new();
      sut.create_alumno(tenant_id.clone(), input("Ana", "ana@example.com"))
         .await
         .unwrap();

      let result = sut
         .create_alumno(tenant_id.clone(), input("Ana B", "Ana@Example.com"))
         .await;

      assert!(matches!(result, Err(CoreError::Conflict(msg)) if msg.contains("email")));
      assert_eq!(cache.tags(), vec![format!("alumnos:{tenant_id}")]);
   }

   #[tokio::test]
   async fn test_searchで絞り込み総件数にも反映する() {
      let cache = RecordingCacheInvalidator::new();
      let sut = sut(&cache);
      let tenant_id = TenantId::new();
      for (nombre, email) in [
         ("Lucía Pérez", "lucia@example.com"),
         ("Marta Gómez", "marta@example.com"),
         ("Lucas Díaz", "ldiaz@example.com"),
      ] {
         sut.create_alumno(tenant_id.clone(), input(nombre, email))
            .await
            .unwrap();
      }

      let page = sut
         .list_alumnos(&tenant_id, Some("  luc "), &PaginationParams::from_query(None, None))
         .await
         .unwrap();

      assert_eq!(
         page
            .data
            .iter()
            .map(|a| a.nombre().as_str())
            .collect::<Vec<_>>(),
         vec!["Lucas Díaz", "Lucía Pérez"]
      );
      assert_eq!(page.pagination.total, 2);
   }

   #[tokio::test]
   async fn test_空白のみのsearchは全件() {
      let cache = RecordingCacheInvalidator::new();
      let sut = sut(&cache);
      let tenant_id = TenantId::new();
      sut.create_alumno(tenant_id.clone(), input("Ana", "ana@example.com"))
         .await
         .unwrap();

      let page = sut
         .list_alumnos(&tenant_id, Some("   "), &PaginationParams::from_query(None, None))
         .await
         .unwrap();

      assert_eq!(page.pagination.total, 1);
   }
}
