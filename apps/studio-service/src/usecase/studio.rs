//! スタジオ設定ユースケース

use std::sync::Arc;

use pilates_domain::{
   clock::Clock,
   studio::{StudioConfig, StudioHours, StudioName},
   tenant::TenantId,
};
use pilates_infra::{CacheInvalidator, CacheTag, repository::StudioConfigRepository};

use crate::error::CoreError;

/// スタジオ設定更新の入力
#[derive(Debug, Clone)]
pub struct UpdateStudioConfigInput {
   pub nombre: StudioName,
   pub hours:  StudioHours,
}

/// スタジオ設定ユースケース
pub struct StudioUseCaseImpl {
   config_repository: Arc<dyn StudioConfigRepository>,
   cache:             Arc<dyn CacheInvalidator>,
   clock:             Arc<dyn Clock>,
}

impl StudioUseCaseImpl {
   pub fn new(
      config_repository: Arc<dyn StudioConfigRepository>,
      cache: Arc<dyn CacheInvalidator>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         config_repository,
         cache,
         clock,
      }
   }

   /// スタジオ設定を取得する（未登録なら既定値）
   pub async fn get_config(&self, tenant_id: &TenantId) -> Result<StudioConfig, CoreError> {
      let config = self.config_repository.find(tenant_id).await?;
      Ok(config.unwrap_or_else(|| StudioConfig::default_for(tenant_id.clone(), self.clock.now())))
   }

   /// スタジオ設定を登録・更新する
   ///
   /// 既存のクラス枠は再検証しない。新しい営業時間は以後の作成にのみ適用される。
   pub async fn update_config(
      &self,
      tenant_id: TenantId,
      input: UpdateStudioConfigInput,
   ) -> Result<StudioConfig, CoreError> {
      let config = StudioConfig::new(tenant_id.clone(), input.nombre, input.hours, self.clock.now());

      self.config_repository.upsert(&config).await?;
      self.cache.invalidate(&CacheTag::CONFIG.scoped_to(&tenant_id));

      tracing::info!(
         tenant_id = %tenant_id,
         apertura = %config.hours().apertura(),
         cierre = %config.hours().cierre(),
         "スタジオ設定を更新"
      );

      Ok(config)
   }
}
