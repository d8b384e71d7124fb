//! # Studio Service エラー定義
//!
//! ハンドラ・ユースケースで発生するエラーと、HTTP レスポンスへの変換を定義する。
//! レスポンスの形は [`pilates_shared::ErrorResponse`] のヘルパーに一本化し、
//! 予期しない失敗は `server_error` がログに残す。

use axum::{
   Json,
   http::{HeaderValue, StatusCode, header},
   response::{IntoResponse, Response},
};
use pilates_domain::{DomainError, validation::FieldErrors};
use pilates_infra::InfraError;
use pilates_shared::ErrorResponse;
use thiserror::Error;

/// Studio Service で発生するエラー
///
/// `Database` 以外の `Display` はそのままクライアントに返る。
#[derive(Debug, Error)]
pub enum CoreError {
   /// 識別情報（テナント・役割）がない、または不正
   #[error("{0}")]
   Unauthorized(String),

   /// 役割が操作を許可されていない
   #[error("{0}")]
   Forbidden(String),

   #[error("{0}")]
   NotFound(String),

   /// フィールド単位の入力エラー
   #[error("Solicitud inválida")]
   InvalidInput(FieldErrors),

   /// ビジネスルール違反などフィールドに紐付かない入力エラー
   #[error("{0}")]
   BadRequest(String),

   #[error("{0}")]
   Conflict(String),

   #[error("Demasiadas solicitudes")]
   TooManyRequests { retry_after_secs: u64 },

   /// データアクセスの失敗（詳細はログのみ）
   #[error("Error al acceder a los datos")]
   Database(#[from] InfraError),
}

impl CoreError {
   /// 共通のエラーエンベロープに変換する
   pub fn to_error_response(&self) -> ErrorResponse {
      match self {
         CoreError::Unauthorized(msg) => ErrorResponse::unauthorized(Some(msg)),
         CoreError::Forbidden(msg) => ErrorResponse::forbidden(Some(msg)),
         CoreError::NotFound(msg) => ErrorResponse::not_found(Some(msg)),
         CoreError::InvalidInput(errors) => {
            ErrorResponse::bad_request(None, serde_json::to_value(errors).ok())
         }
         CoreError::BadRequest(msg) => ErrorResponse::bad_request(Some(msg), None),
         CoreError::Conflict(msg) => ErrorResponse::conflict(Some(msg)),
         CoreError::TooManyRequests { retry_after_secs } => {
            ErrorResponse::too_many_requests(Some(*retry_after_secs))
         }
         CoreError::Database(_) => ErrorResponse::server_error(Some(self)),
      }
   }
}

impl From<DomainError> for CoreError {
   fn from(error: DomainError) -> Self {
      match error {
         DomainError::Validation(msg) => CoreError::BadRequest(msg),
         DomainError::NotFound { .. } => CoreError::NotFound(error.to_string()),
         DomainError::Conflict(msg) => CoreError::Conflict(msg),
         DomainError::Forbidden(msg) => CoreError::Forbidden(msg),
      }
   }
}

impl From<FieldErrors> for CoreError {
   fn from(errors: FieldErrors) -> Self {
      CoreError::InvalidInput(errors)
   }
}

impl IntoResponse for CoreError {
   fn into_response(self) -> Response {
      into_http_response(self.to_error_response())
   }
}

/// [`ErrorResponse`] を axum のレスポンスにする
///
/// ステータス・JSON 本文・`Retry-After` ヘッダーを設定する。
pub fn into_http_response(error: ErrorResponse) -> Response {
   let status = StatusCode::from_u16(error.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
   let mut response = (status, Json(error.body)).into_response();

   if let Some(secs) = error.retry_after {
      response
         .headers_mut()
         .insert(header::RETRY_AFTER, HeaderValue::from(secs));
   }

   response
}

#[cfg(test)]
mod tests {
   use axum::body::to_bytes;
   use pretty_assertions::assert_eq;
   use serde_json::{Value, json};

   use super::*;

   async fn body_json(response: Response) -> Value {
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      serde_json::from_slice(&bytes).unwrap()
   }

   #[tokio::test]
   async fn test_invalid_inputはdetails付きの400() {
      let mut errors = FieldErrors::new();
      errors.push("horaFin", "Formato de hora inválido");

      let response = CoreError::InvalidInput(errors).into_response();

      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      assert_eq!(
         body_json(response).await,
         json!({
            "error": "Solicitud inválida",
            "details": [{ "field": "horaFin", "message": "Formato de hora inválido" }]
         })
      );
   }

   #[tokio::test]
   async fn test_too_many_requestsはretry_afterヘッダーを付与する() {
      let response = CoreError::TooManyRequests {
         retry_after_secs: 60,
      }
      .into_response();

      assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
      assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
   }

   #[tokio::test]
   async fn test_databaseエラーは詳細を隠した500() {
      let error = CoreError::from(InfraError::unexpected("connection refused at 10.0.0.3"));

      let response = error.into_response();

      assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(
         body_json(response).await,
         json!({ "error": "Error al acceder a los datos" })
      );
   }

   #[test]
   fn test_domain_errorの変換() {
      let not_found: CoreError = DomainError::NotFound {
         entity_type: "Horario",
         id:          "h-1".to_string(),
      }
      .into();
      let validation: CoreError = DomainError::Validation("La capacidad".to_string()).into();

      assert!(matches!(not_found, CoreError::NotFound(msg) if msg == "Horario no encontrado: h-1"));
      assert!(matches!(validation, CoreError::BadRequest(_)));
   }

   #[test]
   fn test_unauthorizedとforbiddenのステータス() {
      assert_eq!(
         CoreError::Unauthorized("No autorizado".to_string())
            .to_error_response()
            .status,
         401
      );
      assert_eq!(
         CoreError::Forbidden("Acceso denegado".to_string())
            .to_error_response()
            .status,
         403
      );
   }
}
