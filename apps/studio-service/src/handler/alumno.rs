//! # 生徒ハンドラ
//!
//! - `GET /api/v1/alumnos?page&limit&search` - 生徒一覧（admin / instructor）
//! - `POST /api/v1/alumnos` - 生徒登録（admin）
//!
//! 生徒の氏名・連絡先は個人情報のため、ログには ID のみ出力する。

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::IntoResponse,
};
use pilates_domain::{
   alumno::{Alumno, AlumnoNombre, Email, Telefono},
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
   usecase::{AlumnoUseCaseImpl, CreateAlumnoInput},
};

pub struct AlumnoState {
   pub usecase: AlumnoUseCaseImpl,
}

/// 生徒一覧のクエリ
#[derive(Debug, Default, Deserialize)]
pub struct AlumnoListQuery {
   pub page:   Option<String>,
   pub limit:  Option<String>,
   pub search: Option<String>,
}

/// 生徒登録リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAlumnoRequest {
   #[validate(length(min = 1, max = 100, message = "El nombre debe tener entre 1 y 100 caracteres"))]
   pub nombre:   String,
   #[validate(email(message = "El email no es válido"))]
   pub email:    String,
   #[validate(length(max = 30, message = "El teléfono no puede superar 30 caracteres"))]
   pub telefono: Option<String>,
}

impl Parse for CreateAlumnoRequest {
   type Output = CreateAlumnoInput;

   fn parse(self) -> Result<Self::Output, FieldErrors> {
      let mut errors = FieldErrors::new();

      let nombre = errors.check("nombre", AlumnoNombre::new(self.nombre));
      let email = errors.check("email", Email::new(self.email));
      let telefono = match self.telefono.filter(|s| !s.trim().is_empty()) {
         Some(raw) => errors.check("telefono", Telefono::new(raw)).map(Some),
         None => Some(None),
      };

      match (nombre, email, telefono) {
         (Some(nombre), Some(email), Some(telefono)) if errors.is_empty() => Ok(CreateAlumnoInput {
            nombre,
            email,
            telefono,
         }),
         _ => Err(errors),
      }
   }
}

/// 生徒 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlumnoDto {
   pub id:         Uuid,
   pub nombre:     String,
   pub email:      String,
   pub telefono:   Option<String>,
   pub created_at: String,
}

impl From<Alumno> for AlumnoDto {
   fn from(alumno: Alumno) -> Self {
      Self {
         id:         *alumno.id().as_uuid(),
         nombre:     alumno.nombre().as_str().to_string(),
         email:      alumno.email().as_str().to_string(),
         telefono:   alumno.telefono().map(|t| t.as_str().to_string()),
         created_at: alumno.created_at().to_rfc3339(),
      }
   }
}

/// GET /api/v1/alumnos
pub async fn list_alumnos(
   State(state): State<Arc<AlumnoState>>,
   identity: Identity,
   LenientQuery(query): LenientQuery<AlumnoListQuery>,
) -> Result<impl IntoResponse, CoreError> {
   let params = PaginationQuery {
      page:  query.page,
      limit: query.limit,
   }
   .params();

   let page = state
      .usecase
      .list_alumnos(&identity.tenant_id, query.search.as_deref(), &params)
      .await?;

   Ok((StatusCode::OK, Json(page.map(AlumnoDto::from))))
}

/// POST /api/v1/alumnos
///
/// ## レスポンス
///
/// - `201 Created`: 登録された生徒
/// - `400 Bad Request`: 入力エラー
/// - `409 Conflict`: 同じメールアドレスの生徒が存在する
pub async fn create_alumno(
   State(state): State<Arc<AlumnoState>>,
   identity: Identity,
   ValidatedJson(req): ValidatedJson<CreateAlumnoRequest>,
) -> Result<impl IntoResponse, CoreError> {
   let input = req.parse()?;

   let alumno = state.usecase.create_alumno(identity.tenant_id, input).await?;

   Ok((
      StatusCode::CREATED,
      Json(ApiResponse::new(AlumnoDto::from(alumno))),
   ))
}
