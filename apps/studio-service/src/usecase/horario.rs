//! クラス枠ユースケース

use std::sync::Arc;

use pilates_domain::{
   DomainError,
   clock::Clock,
   horario::{Capacidad, DiaSemana, Horario, HorarioId, InstructorName, NewHorario},
   studio::StudioConfig,
   tenant::TenantId,
   time_of_day::TimeOfDay,
};
use pilates_infra::{
   CacheInvalidator,
   CacheTag,
   repository::{HorarioRepository, StudioConfigRepository},
};
use pilates_shared::{PaginatedResponse, PaginationParams};

use crate::error::CoreError;

/// クラス枠作成の入力（フィールド単位の検証済み）
#[derive(Debug, Clone)]
pub struct CreateHorarioInput {
   pub dia:         DiaSemana,
   pub hora_inicio: TimeOfDay,
   pub hora_fin:    TimeOfDay,
   pub capacidad:   Capacidad,
   pub instructor:  Option<InstructorName>,
}

/// クラス枠ユースケース
pub struct HorarioUseCaseImpl {
   horario_repository: Arc<dyn HorarioRepository>,
   config_repository:  Arc<dyn StudioConfigRepository>,
   cache:              Arc<dyn CacheInvalidator>,
   clock:              Arc<dyn Clock>,
}

impl HorarioUseCaseImpl {
   pub fn new(
      horario_repository: Arc<dyn HorarioRepository>,
      config_repository: Arc<dyn StudioConfigRepository>,
      cache: Arc<dyn CacheInvalidator>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         horario_repository,
         config_repository,
         cache,
         clock,
      }
   }

   /// クラス枠の一覧（曜日・開始時刻順）
   pub async fn list_horarios(
      &self,
      tenant_id: &TenantId,
      params: &PaginationParams,
   ) -> Result<PaginatedResponse<Horario>, CoreError> {
      let total = self.horario_repository.count(tenant_id).await?;
      let horarios = self
         .horario_repository
         .find_page(tenant_id, params.limit(), params.skip())
         .await?;

      Ok(PaginatedResponse::new(horarios, total, params))
   }

   /// クラス枠を作成する
   ///
   /// 1. スタジオの営業時間を取得（未設定なら既定値）
   /// 2. 開始 < 終了、かつ両端が営業時間内であることを検証
   /// 3. 挿入後に `horarios` タグを無効化
   pub async fn create_horario(
      &self,
      tenant_id: TenantId,
      input: CreateHorarioInput,
   ) -> Result<Horario, CoreError> {
      let now = self.clock.now();
      let config = self
         .config_repository
         .find(&tenant_id)
         .await?
         .unwrap_or_else(|| StudioConfig::default_for(tenant_id.clone(), now));

      let horario = Horario::new(
         NewHorario {
            id: HorarioId::new(),
            tenant_id: tenant_id.clone(),
            dia: input.dia,
            hora_inicio: input.hora_inicio,
            hora_fin: input.hora_fin,
            capacidad: input.capacidad,
            instructor: input.instructor,
            created_at: now,
         },
         config.hours(),
      )?;

      self.horario_repository.insert(&horario).await?;
      self.cache.invalidate(&CacheTag::HORARIOS.scoped_to(&tenant_id));

      tracing::info!(
         tenant_id = %tenant_id,
         horario_id = %horario.id(),
         dia = %horario.dia(),
         "クラス枠を作成"
      );

      Ok(horario)
   }

   /// クラス枠を削除する
   pub async fn delete_horario(&self, tenant_id: &TenantId, id: &HorarioId) -> Result<(), CoreError> {
      let deleted = self.horario_repository.delete(tenant_id, id).await?;
      if !deleted {
         return Err(DomainError::NotFound {
            entity_type: "Horario",
            id:          id.to_string(),
         }
         .into());
      }

      self.cache.invalidate(&CacheTag::HORARIOS.scoped_to(tenant_id));
      Ok(())
   }
}
