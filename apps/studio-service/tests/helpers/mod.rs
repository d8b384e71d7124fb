//! 統合テスト用ヘルパー
//!
//! インメモリのリポジトリで [`AppContext`] を組み立て、ルーターを `oneshot` で呼ぶ。

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
   Router,
   body::{Body, to_bytes},
   http::{Request, Response, header},
};
use chrono::DateTime;
use pilates_domain::clock::FixedClock;
use pilates_infra::{
   ReadinessCheck,
   mock::{
      MockAlumnoRepository,
      MockHorarioRepository,
      MockPackRepository,
      MockStudioConfigRepository,
      RecordingCacheInvalidator,
      StaticReadinessCheck,
   },
};
use pilates_shared::CheckStatus;
use pilates_studio_service::{
   AppContext,
   build_app,
   config::RateLimitConfig,
   middleware::{RateLimiter, identity::{TENANT_ID_HEADER, USER_ROLE_HEADER}},
};
use serde_json::Value;
use tower::ServiceExt;

pub const TENANT_A: &str = "0190a000-0000-7000-8000-00000000000a";
pub const TENANT_B: &str = "0190a000-0000-7000-8000-00000000000b";

/// テスト対象のルーターと、検証に使う共有状態
pub struct TestApp {
   pub router:   Router,
   pub horarios: MockHorarioRepository,
   pub cache:    RecordingCacheInvalidator,
}

pub struct TestAppBuilder {
   horarios:   MockHorarioRepository,
   readiness:  CheckStatus,
   rate_limit: RateLimitConfig,
}

impl TestAppBuilder {
   pub fn new() -> Self {
      Self {
         horarios:   MockHorarioRepository::new(),
         readiness:  CheckStatus::Ok,
         rate_limit: RateLimitConfig::default(),
      }
   }

   pub fn horarios(mut self, horarios: MockHorarioRepository) -> Self {
      self.horarios = horarios;
      self
   }

   pub fn readiness(mut self, status: CheckStatus) -> Self {
      self.readiness = status;
      self
   }

   pub fn rate_limit(mut self, window_secs: u64, max_requests: u32) -> Self {
      self.rate_limit = RateLimitConfig {
         window: Duration::from_secs(window_secs),
         max_requests,
      };
      self
   }

   pub fn build(self) -> TestApp {
      let cache = RecordingCacheInvalidator::new();
      let readiness_checks: Vec<Arc<dyn ReadinessCheck>> =
         vec![Arc::new(StaticReadinessCheck::new("database", self.readiness))];

      let ctx = AppContext {
         horarios: Arc::new(self.horarios.clone()),
         studio_configs: Arc::new(MockStudioConfigRepository::new()),
         alumnos: Arc::new(MockAlumnoRepository::new()),
         packs: Arc::new(MockPackRepository::new()),
         cache: Arc::new(cache.clone()),
         readiness_checks,
         clock: Arc::new(FixedClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
         )),
         rate_limiter: RateLimiter::new(self.rate_limit),
      };

      TestApp {
         router: build_app(ctx),
         horarios: self.horarios,
         cache,
      }
   }
}

impl TestApp {
   pub async fn send(&self, request: Request<Body>) -> Response<Body> {
      self.router.clone().oneshot(request).await.unwrap()
   }
}

/// 識別ヘッダー付きのリクエストビルダー
pub fn request(method: &str, uri: &str, tenant: Option<&str>, role: Option<&str>) -> axum::http::request::Builder {
   let mut builder = Request::builder().method(method).uri(uri);
   if let Some(tenant) = tenant {
      builder = builder.header(TENANT_ID_HEADER, tenant);
   }
   if let Some(role) = role {
      builder = builder.header(USER_ROLE_HEADER, role);
   }
   builder
}

pub fn get(uri: &str, tenant: &str, role: &str) -> Request<Body> {
   request("GET", uri, Some(tenant), Some(role))
      .body(Body::empty())
      .unwrap()
}

pub fn json(method: &str, uri: &str, tenant: &str, role: &str, body: Value) -> Request<Body> {
   request(method, uri, Some(tenant), Some(role))
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
   let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
   serde_json::from_slice(&bytes).unwrap()
}
