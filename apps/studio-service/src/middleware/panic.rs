//! # panic のレスポンス変換
//!
//! `CatchPanicLayer` に渡すハンドラ。panic の内容はクライアントに返さない。

use std::any::Any;

use axum::response::Response;
use pilates_shared::ErrorResponse;

use crate::error::into_http_response;

/// panic を固定メッセージの 500 に変換する
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
   let detail = payload
      .downcast_ref::<String>()
      .map(String::as_str)
      .or_else(|| payload.downcast_ref::<&str>().copied())
      .unwrap_or("不明な panic");
   tracing::error!(panic = %detail, "ハンドラで panic が発生しました");

   into_http_response(ErrorResponse::server_error(None))
}
