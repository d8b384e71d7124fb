//! # エラーレスポンス
//!
//! 全エンドポイント共通のエラーエンベロープ `{ "error": string, "details"?: any }`
//! と、失敗条件から HTTP ステータスへの対応付けを提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（ステータス・本文・`Retry-After` 秒数）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）
//! - 副作用を持つのは [`ErrorResponse::server_error`] のログ出力のみ
//!
//! | ヘルパー | ステータス | 用途 |
//! |---------|-----------|------|
//! | `unauthorized` | 401 | 識別情報がない・不正 |
//! | `forbidden` | 403 | 識別情報は有効だが操作が許可されていない |
//! | `not_found` | 404 | リソースが存在しない |
//! | `bad_request` | 400 | 入力不正（構造化された詳細を添付可能） |
//! | `conflict` | 409 | 一意制約違反 |
//! | `too_many_requests` | 429 | レート制限超過（`Retry-After` を付与） |
//! | `server_error` | 500 | 予期しない失敗（原因をログに記録） |

use std::error::Error;

use serde::{Deserialize, Serialize};

/// `too_many_requests` の `Retry-After` デフォルト値（秒）
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const GENERIC_SERVER_ERROR: &str = "Error interno del servidor";

/// エラーレスポンスの本文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
   pub error:   String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub details: Option<serde_json::Value>,
}

/// エラーレスポンス
///
/// `status` は HTTP ステータスコード、`retry_after` は `Retry-After`
/// ヘッダーに設定する秒数（429 のみ）。
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
   pub status:      u16,
   pub body:        ErrorBody,
   pub retry_after: Option<u64>,
}

impl ErrorResponse {
   /// 汎用コンストラクタ
   pub fn new(status: u16, message: impl Into<String>) -> Self {
      Self {
         status,
         body: ErrorBody {
            error:   message.into(),
            details: None,
         },
         retry_after: None,
      }
   }

   /// 構造化された詳細を添付する
   pub fn with_details(mut self, details: serde_json::Value) -> Self {
      self.body.details = Some(details);
      self
   }

   /// 401 Unauthorized
   pub fn unauthorized(message: Option<&str>) -> Self {
      Self::new(401, message.unwrap_or("No autorizado"))
   }

   /// 403 Forbidden
   pub fn forbidden(message: Option<&str>) -> Self {
      Self::new(403, message.unwrap_or("Acceso denegado"))
   }

   /// 404 Not Found
   pub fn not_found(message: Option<&str>) -> Self {
      Self::new(404, message.unwrap_or("Recurso no encontrado"))
   }

   /// 400 Bad Request
   pub fn bad_request(message: Option<&str>, details: Option<serde_json::Value>) -> Self {
      let response = Self::new(400, message.unwrap_or("Solicitud inválida"));
      match details {
         Some(details) => response.with_details(details),
         None => response,
      }
   }

   /// 409 Conflict
   pub fn conflict(message: Option<&str>) -> Self {
      Self::new(409, message.unwrap_or("El recurso ya existe"))
   }

   /// 429 Too Many Requests
   ///
   /// `retry_after_secs` 未指定時は 60 秒。
   pub fn too_many_requests(retry_after_secs: Option<u64>) -> Self {
      let mut response = Self::new(
         429,
         "Demasiadas solicitudes. Inténtalo de nuevo más tarde",
      );
      response.retry_after = Some(retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS));
      response
   }

   /// 500 Internal Server Error
   ///
   /// 原因をソースチェーンごと `tracing::error!` で記録する。
   /// 原因が渡された場合はその最上位メッセージのみを返し、
   /// ソースチェーンやバックトレースはクライアントに返さない。
   /// 原因が不明な場合（panic など）は固定メッセージを返す。
   pub fn server_error(cause: Option<&(dyn Error + 'static)>) -> Self {
      match cause {
         Some(error) => {
            tracing::error!(
               error = %error,
               source_chain = %source_chain(error),
               "予期しないエラーが発生しました"
            );
            Self::new(500, error.to_string())
         }
         None => {
            tracing::error!("分類できないエラーが発生しました");
            Self::new(500, GENERIC_SERVER_ERROR)
         }
      }
   }
}

/// `source()` をたどって原因を ` <- ` で連結する
fn source_chain(error: &(dyn Error + 'static)) -> String {
   let mut chain = Vec::new();
   let mut current = error.source();
   while let Some(source) = current {
      chain.push(source.to_string());
      current = source.source();
   }
   chain.join(" <- ")
}
