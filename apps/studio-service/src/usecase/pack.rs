//! 回数券ユースケース

use std::sync::Arc;

use pilates_domain::{
   clock::Clock,
   pack::{NewPack, Pack, PackId, PackNombre},
   tenant::TenantId,
};
use pilates_infra::{CacheInvalidator, CacheTag, repository::PackRepository};
use pilates_shared::{PaginatedResponse, PaginationParams};

use crate::error::CoreError;

/// 回数券作成の入力
#[derive(Debug, Clone)]
pub struct CreatePackInput {
   pub nombre:          PackNombre,
   pub clases:          i32,
   pub precio_centavos: i64,
   pub vigencia_dias:   i32,
   pub activo:          bool,
}

/// 回数券ユースケース
pub struct PackUseCaseImpl {
   pack_repository: Arc<dyn PackRepository>,
   cache:           Arc<dyn CacheInvalidator>,
   clock:           Arc<dyn Clock>,
}

impl PackUseCaseImpl {
   pub fn new(
      pack_repository: Arc<dyn PackRepository>,
      cache: Arc<dyn CacheInvalidator>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         pack_repository,
         cache,
         clock,
      }
   }

   /// 回数券の一覧（有効なものから価格の安い順）
   pub async fn list_packs(
      &self,
      tenant_id: &TenantId,
      params: &PaginationParams,
   ) -> Result<PaginatedResponse<Pack>, CoreError> {
      let total = self.pack_repository.count(tenant_id).await?;
      let packs = self
         .pack_repository
         .find_page(tenant_id, params.limit(), params.skip())
         .await?;

      Ok(PaginatedResponse::new(packs, total, params))
   }

   pub async fn create_pack(&self, tenant_id: TenantId, input: CreatePackInput) -> Result<Pack, CoreError> {
      let pack = Pack::new(NewPack {
         id:              PackId::new(),
         tenant_id:       tenant_id.clone(),
         nombre:          input.nombre,
         clases:          input.clases,
         precio_centavos: input.precio_centavos,
         vigencia_dias:   input.vigencia_dias,
         activo:          input.activo,
         created_at:      self.clock.now(),
      })?;

      self.pack_repository.insert(&pack).await?;
      self.cache.invalidate(&CacheTag::PACKS.scoped_to(&tenant_id));

      Ok(pack)
   }
}
