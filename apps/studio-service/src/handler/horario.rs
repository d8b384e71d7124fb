//! # クラス枠ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/v1/horarios` - クラス枠一覧（全役割）
//! - `POST /api/v1/horarios` - クラス枠作成（admin / instructor）
//! - `DELETE /api/v1/horarios/{horario_id}` - クラス枠削除（admin）
//! - `GET /api/v1/public/horarios` - 予約ポータル向け一覧（テナントのみ、レート制限あり）

use std::{str::FromStr, sync::Arc};

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::IntoResponse,
};
use pilates_domain::{
   horario::{Capacidad, DiaSemana, Horario, HorarioId, InstructorName},
   time_of_day::TimeOfDay,
   validation::{FieldErrors, Parse},
};
use pilates_shared::{ApiResponse, PaginationQuery};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{LenientQuery, ValidatedJson, ValidatedPath};
use crate::{
   error::CoreError,
   middleware::{Identity, TenantContext},
   usecase::{CreateHorarioInput, HorarioUseCaseImpl},
};

/// クラス枠 API の共有状態
pub struct HorarioState {
   pub usecase: HorarioUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// クラス枠作成リクエスト
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHorarioRequest {
   pub dia:         String,
   pub hora_inicio: String,
   pub hora_fin:    String,
   #[validate(range(min = 1, max = 100, message = "La capacidad debe estar entre 1 y 100"))]
   pub capacidad:   i32,
   #[validate(length(max = 100, message = "El instructor no puede superar 100 caracteres"))]
   pub instructor:  Option<String>,
}

impl Parse for CreateHorarioRequest {
   type Output = CreateHorarioInput;

   fn parse(self) -> Result<Self::Output, FieldErrors> {
      let mut errors = FieldErrors::new();

      let dia = errors.check(
         "dia",
         DiaSemana::from_str(self.dia.trim())
            .map_err(|_| format!("Día de la semana inválido: {}", self.dia)),
      );
      let hora_inicio = errors.check("horaInicio", TimeOfDay::parse(&self.hora_inicio));
      let hora_fin = errors.check("horaFin", TimeOfDay::parse(&self.hora_fin));
      let capacidad = errors.check("capacidad", Capacidad::new(self.capacidad));
      let instructor = match self.instructor.filter(|s| !s.trim().is_empty()) {
         Some(raw) => errors.check("instructor", InstructorName::new(raw)).map(Some),
         None => Some(None),
      };

      match (dia, hora_inicio, hora_fin, capacidad, instructor) {
         (Some(dia), Some(hora_inicio), Some(hora_fin), Some(capacidad), Some(instructor))
            if errors.is_empty() =>
         {
            Ok(CreateHorarioInput {
               dia,
               hora_inicio,
               hora_fin,
               capacidad,
               instructor,
            })
         }
         _ => Err(errors),
      }
   }
}

/// クラス枠 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorarioDto {
   pub id:               Uuid,
   pub dia:              DiaSemana,
   pub hora_inicio:      String,
   pub hora_fin:         String,
   pub duracion_minutos: u16,
   pub capacidad:        i32,
   pub instructor:       Option<String>,
   pub created_at:       String,
}

impl From<Horario> for HorarioDto {
   fn from(horario: Horario) -> Self {
      Self {
         id:               *horario.id().as_uuid(),
         dia:              horario.dia(),
         hora_inicio:      horario.hora_inicio().to_string(),
         hora_fin:         horario.hora_fin().to_string(),
         duracion_minutos: horario.duracion_minutos(),
         capacidad:        horario.capacidad().as_i32(),
         instructor:       horario.instructor().map(|i| i.as_str().to_string()),
         created_at:       horario.created_at().to_rfc3339(),
      }
   }
}

/// 予約ポータル向けクラス枠 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicHorarioDto {
   pub id:          Uuid,
   pub dia:         DiaSemana,
   pub hora_inicio: String,
   pub hora_fin:    String,
   pub capacidad:   i32,
   pub instructor:  Option<String>,
}

impl From<Horario> for PublicHorarioDto {
   fn from(horario: Horario) -> Self {
      Self {
         id:          *horario.id().as_uuid(),
         dia:         horario.dia(),
         hora_inicio: horario.hora_inicio().to_string(),
         hora_fin:    horario.hora_fin().to_string(),
         capacidad:   horario.capacidad().as_i32(),
         instructor:  horario.instructor().map(|i| i.as_str().to_string()),
      }
   }
}

// --- ハンドラ ---

/// GET /api/v1/horarios
pub async fn list_horarios(
   State(state): State<Arc<HorarioState>>,
   identity: Identity,
   LenientQuery(query): LenientQuery<PaginationQuery>,
) -> Result<impl IntoResponse, CoreError> {
   let page = state
      .usecase
      .list_horarios(&identity.tenant_id, &query.params())
      .await?;

   Ok((StatusCode::OK, Json(page.map(HorarioDto::from))))
}

/// GET /api/v1/public/horarios
///
/// 識別ヘッダーは `X-Tenant-Id` のみ必要。作成日時は返さない。
pub async fn list_public_horarios(
   State(state): State<Arc<HorarioState>>,
   TenantContext(tenant_id): TenantContext,
   LenientQuery(query): LenientQuery<PaginationQuery>,
) -> Result<impl IntoResponse, CoreError> {
   let page = state.usecase.list_horarios(&tenant_id, &query.params()).await?;

   Ok((StatusCode::OK, Json(page.map(PublicHorarioDto::from))))
}

/// POST /api/v1/horarios
///
/// ## レスポンス
///
/// - `201 Created`: 作成されたクラス枠
/// - `400 Bad Request`: 書式エラー、開始 >= 終了、営業時間外
pub async fn create_horario(
   State(state): State<Arc<HorarioState>>,
   identity: Identity,
   ValidatedJson(req): ValidatedJson<CreateHorarioRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let input = req.parse()?;

   let horario = state.usecase.create_horario(identity.tenant_id, input).await?;

   Ok((
      StatusCode::CREATED,
      Json(ApiResponse::new(HorarioDto::from(horario))),
   ))
}

/// DELETE /api/v1/horarios/{horario_id}
///
/// ## レスポンス
///
/// - `204 No Content`: 削除成功
/// - `400 Bad Request`: ID が UUID として解釈できない
/// - `404 Not Found`: クラス枠が見つからない（他テナントの枠を含む）
pub async fn delete_horario(
   State(state): State<Arc<HorarioState>>,
   identity: Identity,
   ValidatedPath(horario_id): ValidatedPath<Uuid>,
) -> Result<impl IntoResponse, CoreError> {
   let horario_id = HorarioId::from_uuid(horario_id);

   state
      .usecase
      .delete_horario(&identity.tenant_id, &horario_id)
      .await?;

   Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   fn request(dia: &str, inicio: &str, fin: &str) -> CreateHorarioRequest {
      CreateHorarioRequest {
         dia:         dia.to_string(),
         hora_inicio: inicio.to_string(),
         hora_fin:    fin.to_string(),
         capacidad:   8,
         instructor:  Some("  ".to_string()),
      }
   }

   #[test]
   fn test_parseは妥当な入力を変換する() {
      let input = request("martes", "18:00", "19:00").parse().unwrap();

      assert_eq!(input.dia, DiaSemana::Martes);
      assert_eq!(input.hora_inicio.as_str(), "18:00");
      assert_eq!(input.instructor, None);
   }

   #[test]
   fn test_parseは複数フィールドのエラーをまとめる() {
      let errors = request("funday", "9:00", "25:00").parse().unwrap_err();

      assert_eq!(
         errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
         vec!["dia", "horaInicio", "horaFin"]
      );
   }
}
