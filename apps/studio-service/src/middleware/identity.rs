//! # 識別情報と役割チェック
//!
//! このサービスは内部向けで、上流のゲートウェイが認証済みの識別情報をヘッダーで渡す。
//!
//! | ヘッダー | 値 |
//! |---------|-----|
//! | `X-Tenant-Id` | テナントの UUID |
//! | `X-User-Role` | `admin` / `instructor` / `alumno` |
//!
//! - ヘッダーがない・不正 → 401
//! - 識別情報は有効だが役割が許可されていない → 403
//! - 公開エンドポイントは `X-Tenant-Id` のみ必須（[`TenantContext`]）

use std::str::FromStr;

use axum::{
   extract::{FromRequestParts, Request, State},
   http::{HeaderMap, request::Parts},
   middleware::Next,
   response::{IntoResponse, Response},
};
use pilates_domain::{role::StudioRole, tenant::TenantId};

use crate::error::CoreError;

pub const TENANT_ID_HEADER: &str = "x-tenant-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// リクエスト元のテナントと役割
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
   pub tenant_id: TenantId,
   pub role:      StudioRole,
}

impl Identity {
   pub fn from_headers(headers: &HeaderMap) -> Result<Self, CoreError> {
      let tenant_id = tenant_from_headers(headers)?;
      let role = header_str(headers, USER_ROLE_HEADER)
         .and_then(|raw| StudioRole::from_str(raw).ok())
         .ok_or_else(|| CoreError::Unauthorized("Rol de usuario ausente o inválido".to_string()))?;

      Ok(Self { tenant_id, role })
   }
}

impl<S> FromRequestParts<S> for Identity
where
   S: Send + Sync,
{
   type Rejection = CoreError;

   async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
      Identity::from_headers(&parts.headers)
   }
}

/// 公開エンドポイント用（テナントのみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext(pub TenantId);

impl<S> FromRequestParts<S> for TenantContext
where
   S: Send + Sync,
{
   type Rejection = CoreError;

   async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
      tenant_from_headers(&parts.headers).map(TenantContext)
   }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
   headers
      .get(name)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|v| !v.is_empty())
}

fn tenant_from_headers(headers: &HeaderMap) -> Result<TenantId, CoreError> {
   header_str(headers, TENANT_ID_HEADER)
      .and_then(|raw| TenantId::from_str(raw).ok())
      .ok_or_else(|| CoreError::Unauthorized("Tenant ausente o inválido".to_string()))
}

/// 役割チェックミドルウェアの状態
#[derive(Debug, Clone, Copy)]
pub struct RoleGuard {
   pub allowed: &'static [StudioRole],
}

impl RoleGuard {
   pub const ADMIN: Self = Self {
      allowed: &[StudioRole::Admin],
   };
   pub const STAFF: Self = Self {
      allowed: &[StudioRole::Admin, StudioRole::Instructor],
   };
}

/// 役割チェックミドルウェア
///
/// 識別情報がなければ 401、役割が `allowed` に含まれなければ 403 を返す。
pub async fn require_role(State(guard): State<RoleGuard>, request: Request, next: Next) -> Response {
   let identity = match Identity::from_headers(request.headers()) {
      Ok(identity) => identity,
      Err(e) => return e.into_response(),
   };

   if !identity.role.is_one_of(guard.allowed) {
      tracing::info!(
         tenant_id = %identity.tenant_id,
         role = %identity.role,
         "役割が許可されていないため拒否"
      );
      return CoreError::Forbidden("Acceso denegado".to_string()).into_response();
   }

   next.run(request).await
}

#[cfg(test)]
mod tests {
   use axum::{
      Router,
      body::Body,
      http::{Request, StatusCode},
      middleware::from_fn_with_state,
      routing::get,
   };
   use rstest::rstest;
   use tower::ServiceExt;

   use super::*;

   const TEST_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

   async fn whoami(identity: Identity) -> String {
      format!("{}:{}", identity.tenant_id, identity.role)
   }

   fn app(guard: RoleGuard) -> Router {
      Router::new()
         .route("/protected", get(whoami))
         .layer(from_fn_with_state(guard, require_role))
   }

   fn request(tenant: Option<&str>, role: Option<&str>) -> Request<Body> {
      let mut builder = Request::builder().uri("/protected");
      if let Some(tenant) = tenant {
         builder = builder.header(TENANT_ID_HEADER, tenant);
      }
      if let Some(role) = role {
         builder = builder.header(USER_ROLE_HEADER, role);
      }
      builder.body(Body::empty()).unwrap()
   }

   #[rstest]
   #[case(None, Some("admin"))]
   #[case(Some("no-es-uuid"), Some("admin"))]
   #[case(Some(TEST_TENANT_ID), None)]
   #[case(Some(TEST_TENANT_ID), Some("owner"))]
   #[tokio::test]
   async fn test_識別情報が欠けていれば401(#[case] tenant: Option<&str>, #[case] role: Option<&str>) {
      let response = app(RoleGuard::ADMIN).oneshot(request(tenant, role)).await.unwrap();

      assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
   }

   #[rstest]
   #[case(RoleGuard::ADMIN, "instructor")]
   #[case(RoleGuard::ADMIN, "alumno")]
   #[case(RoleGuard::STAFF, "alumno")]
   #[tokio::test]
   async fn test_役割が許可されていなければ403(#[case] guard: RoleGuard, #[case] role: &str) {
      let response = app(guard)
         .oneshot(request(Some(TEST_TENANT_ID), Some(role)))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::FORBIDDEN);
   }

   #[rstest]
   #[case(RoleGuard::ADMIN, "admin")]
   #[case(RoleGuard::STAFF, "admin")]
   #[case(RoleGuard::STAFF, "instructor")]
   #[tokio::test]
   async fn test_許可された役割は通過する(#[case] guard: RoleGuard, #[case] role: &str) {
      let response = app(guard)
         .oneshot(request(Some(TEST_TENANT_ID), Some(role)))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
   }
}
