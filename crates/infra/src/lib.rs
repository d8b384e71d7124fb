//! # Pilates インフラ層
//!
//! PostgreSQL と Redis への接続、リポジトリの実装、キャッシュ無効化を担当する。
//!
//! ## 依存関係
//!
//! ```text
//! studio-service → infra → domain
//!                    ↘
//!                     shared
//! ```
//!
//! ドメイン層はインフラ層に依存しない。
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、マイグレーション、Readiness チェック
//! - [`redis`] - Redis 接続マネージャ
//! - [`cache`] - キャッシュタグの無効化
//! - [`repository`] - リポジトリトレイトと PostgreSQL 実装
//! - [`error`] - インフラ層エラー
//! - `mock` - インメモリ実装（`test-utils` feature）

pub mod cache;
pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod redis;
pub mod repository;

pub use cache::{CacheInvalidator, CacheTag, NoopCacheInvalidator, RedisCacheInvalidator};
pub use db::{PgReadinessCheck, ReadinessCheck};
pub use error::{InfraError, InfraErrorKind};
