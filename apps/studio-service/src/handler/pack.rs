//! # 回数券ハンドラ
//!
//! - `GET /api/v1/packs` - 回数券一覧（全役割）
//! - `POST /api/v1/packs` - 回数券作成（admin）

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::IntoResponse,
};
use pilates_domain::{
   pack::{Pack, PackNombre},
   validation::{FieldErrors, Parse},
};
use pilates_shared::{ApiResponse, PaginationQuery};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{LenientQuery, ValidatedJson};
use crate::{
   error::CoreError,
   middleware::Identity,
   usecase::{CreatePackInput, PackUseCaseImpl},
};

pub struct PackState {
   pub usecase: PackUseCaseImpl,
}

fn default_activo() -> bool {
   true
}

/// 回数券作成リクエスト
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackRequest {
   #[validate(length(min = 1, max = 100, message = "El nombre debe tener entre 1 y 100 caracteres"))]
   pub nombre:          String,
   #[validate(range(min = 1, max = 200, message = "La cantidad de clases debe estar entre 1 y 200"))]
   pub clases:          i32,
   #[validate(range(min = 0, message = "El precio no puede ser negativo"))]
   pub precio_centavos: i64,
   #[validate(range(min = 1, max = 365, message = "La vigencia debe estar entre 1 y 365 días"))]
   pub vigencia_dias:   i32,
   #[serde(default = "default_activo")]
   pub activo:          bool,
}

impl Parse for CreatePackRequest {
   type Output = CreatePackInput;

   fn parse(self) -> Result<Self::Output, FieldErrors> {
      let mut errors = FieldErrors::new();
      let nombre = errors.check("nombre", PackNombre::new(self.nombre));

      match nombre {
         Some(nombre) => Ok(CreatePackInput {
            nombre,
            clases: self.clases,
            precio_centavos: self.precio_centavos,
            vigencia_dias: self.vigencia_dias,
            activo: self.activo,
         }),
         None => Err(errors),
      }
   }
}

/// 回数券 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackDto {
   pub id:              Uuid,
   pub nombre:          String,
   pub clases:          i32,
   pub precio_centavos: i64,
   pub vigencia_dias:   i32,
   pub activo:          bool,
   pub created_at:      String,
}

impl From<Pack> for PackDto {
   fn from(pack: Pack) -> Self {
      Self {
         id:              *pack.id().as_uuid(),
         nombre:          pack.nombre().as_str().to_string(),
         clases:          pack.clases(),
         precio_centavos: pack.precio_centavos(),
         vigencia_dias:   pack.vigencia_dias(),
         activo:          pack.activo(),
         created_at:      pack.created_at().to_rfc3339(),
      }
   }
}

/// GET /api/v1/packs
pub async fn list_packs(
   State(state): State<Arc<PackState>>,
   identity: Identity,
   LenientQuery(query): LenientQuery<PaginationQuery>,
) -> Result<impl IntoResponse, CoreError> {
   let page = state
      .usecase
      .list_packs(&identity.tenant_id, &query.params())
      .await?;

   Ok((StatusCode::OK, Json(page.map(PackDto::from))))
}

/// POST /api/v1/packs
pub async fn create_pack(
   State(state): State<Arc<PackState>>,
   identity: Identity,
   ValidatedJson(req): ValidatedJson<CreatePackRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let input = req.parse()?;

   let pack = state.usecase.create_pack(identity.tenant_id, input).await?;

   Ok((StatusCode::CREATED, Json(ApiResponse::new(PackDto::from(pack)))))
}
