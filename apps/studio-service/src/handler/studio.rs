//! # スタジオ設定ハンドラ
//!
//! - `GET /api/v1/config` - スタジオ設定（未登録なら既定値）
//! - `PUT /api/v1/config` - スタジオ設定の登録・更新（admin）

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use pilates_domain::{
   studio::{StudioConfig, StudioHours, StudioName},
   time_of_day::TimeOfDay,
   validation::{FieldErrors, Parse},
};
use pilates_shared::ApiResponse;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ValidatedJson;
use crate::{
   error::CoreError,
   middleware::Identity,
   usecase::{StudioUseCaseImpl, UpdateStudioConfigInput},
};

pub struct StudioState {
   pub usecase: StudioUseCaseImpl,
}

/// スタジオ設定更新リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStudioConfigRequest {
   #[validate(length(min = 1, max = 100, message = "El nombre del estudio debe tener entre 1 y 100 caracteres"))]
   pub nombre:   String,
   pub apertura: String,
   pub cierre:   String,
}

impl Parse for UpdateStudioConfigRequest {
   type Output = UpdateStudioConfigInput;

   fn parse(self) -> Result<Self::Output, FieldErrors> {
      let mut errors = FieldErrors::new();

      let nombre = errors.check("nombre", StudioName::new(self.nombre));
      let apertura = errors.check("apertura", TimeOfDay::parse(&self.apertura));
      let cierre = errors.check("cierre", TimeOfDay::parse(&self.cierre));

      // 順序は両方の書式が正しいときだけ検証する
      let hours = match (apertura, cierre) {
         (Some(apertura), Some(cierre)) => errors.check("cierre", StudioHours::new(apertura, cierre)),
         _ => None,
      };

      match (nombre, hours) {
         (Some(nombre), Some(hours)) if errors.is_empty() => {
            Ok(UpdateStudioConfigInput { nombre, hours })
         }
         _ => Err(errors),
      }
   }
}

/// スタジオ設定 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioConfigDto {
   pub nombre:     String,
   pub apertura:   String,
   pub cierre:     String,
   pub updated_at: String,
}

impl From<StudioConfig> for StudioConfigDto {
   fn from(config: StudioConfig) -> Self {
      Self {
         nombre:     config.nombre().as_str().to_string(),
         apertura:   config.hours().apertura().to_string(),
         cierre:     config.hours().cierre().to_string(),
         updated_at: config.updated_at().to_rfc3339(),
      }
   }
}

/// GET /api/v1/config
pub async fn get_config(
   State(state): State<Arc<StudioState>>,
   identity: Identity,
) -> Result<impl IntoResponse, CoreError> {
   let config = state.usecase.get_config(&identity.tenant_id).await?;

   Ok((
      StatusCode::OK,
      Json(ApiResponse::new(StudioConfigDto::from(config))),
   ))
}

/// PUT /api/v1/config
///
/// 既存のクラス枠は新しい営業時間で再検証しない。
pub async fn update_config(
   State(state): State<Arc<StudioState>>,
   identity: Identity,
   ValidatedJson(req): ValidatedJson<UpdateStudioConfigRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let input = req.parse()?;

   let config = state.usecase.update_config(identity.tenant_id, input).await?;

   Ok((
      StatusCode::OK,
      Json(ApiResponse::new(StudioConfigDto::from(config))),
   ))
}
