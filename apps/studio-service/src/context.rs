//! # アプリケーションコンテキスト
//!
//! プロセス全体で共有する資源（リポジトリ、キャッシュ無効化、Readiness チェック、
//! レート制限の状態）を 1 か所にまとめる。エントリポイントが組み立てて
//! [`build_app`](crate::app_builder::build_app) に渡す。グローバル変数は使わない。

use std::sync::Arc;

use pilates_domain::clock::{Clock, SystemClock};
use pilates_infra::{
   CacheInvalidator,
   PgReadinessCheck,
   ReadinessCheck,
   repository::{
      AlumnoRepository,
      HorarioRepository,
      PackRepository,
      PostgresAlumnoRepository,
      PostgresHorarioRepository,
      PostgresPackRepository,
      PostgresStudioConfigRepository,
      StudioConfigRepository,
   },
};
use sqlx::PgPool;

use crate::{config::RateLimitConfig, middleware::RateLimiter};

/// 共有資源の束
#[derive(Clone)]
pub struct AppContext {
   pub horarios:         Arc<dyn HorarioRepository>,
   pub studio_configs:   Arc<dyn StudioConfigRepository>,
   pub alumnos:          Arc<dyn AlumnoRepository>,
   pub packs:            Arc<dyn PackRepository>,
   pub cache:            Arc<dyn CacheInvalidator>,
   pub readiness_checks: Vec<Arc<dyn ReadinessCheck>>,
   pub clock:            Arc<dyn Clock>,
   pub rate_limiter:     RateLimiter,
}

impl AppContext {
   /// PostgreSQL 実装で組み立てる
   pub fn postgres(
      pool: PgPool,
      cache: Arc<dyn CacheInvalidator>,
      rate_limit: RateLimitConfig,
   ) -> Self {
      Self {
         horarios: Arc::new(PostgresHorarioRepository::new(pool.clone())),
         studio_configs: Arc::new(PostgresStudioConfigRepository::new(pool.clone())),
         alumnos: Arc::new(PostgresAlumnoRepository::new(pool.clone())),
         packs: Arc::new(PostgresPackRepository::new(pool.clone())),
         cache,
         readiness_checks: vec![Arc::new(PgReadinessCheck::new(pool))],
         clock: Arc::new(SystemClock),
         rate_limiter: RateLimiter::new(rate_limit),
      }
   }
}
