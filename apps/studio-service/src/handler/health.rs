//! # ヘルスチェックハンドラ
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（データベースへの接続を確認）
//!
//! レスポンス型は [`pilates_shared::HealthResponse`] / [`pilates_shared::ReadinessResponse`] を参照。

use std::{collections::BTreeMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use pilates_infra::ReadinessCheck;
use pilates_shared::{HealthResponse, ReadinessResponse};

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
   pub checks: Vec<Arc<dyn ReadinessCheck>>,
}

/// Readiness Check エンドポイント
///
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
   let mut checks = BTreeMap::new();
   for check in &state.checks {
      checks.insert(check.name().to_string(), check.check().await);
   }

   let response = ReadinessResponse::from_checks(checks);
   let http_status = if response.is_ready() {
      StatusCode::OK
   } else {
      tracing::warn!(checks = ?response.checks, "Readiness Check に失敗");
      StatusCode::SERVICE_UNAVAILABLE
   };

   (http_status, Json(response))
}
