//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成、マイグレーション、Readiness チェックを提供する。
//!
//! プールはエントリポイントで一度だけ作成し、`AppContext` 経由で共有する。
//! グレースフルシャットダウンの最後に `PgPool::close` で明示的に閉じる。
//!
//! ```rust,ignore
//! use pilates_infra::db;
//!
//! let pool = db::create_pool("postgres://localhost/pilates").await?;
//! db::run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use pilates_shared::CheckStatus;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Readiness チェックのタイムアウト
const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL 接続プールを作成する
///
/// - `max_connections(10)`: 最大接続数
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト
///
/// この関数はパニックしない。接続失敗や認証エラーは `Result` で返す。
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
   PgPoolOptions::new()
      .max_connections(10)
      .acquire_timeout(Duration::from_secs(5))
      .connect(database_url)
      .await
}

/// データベースマイグレーションを実行する
///
/// `migrations/` のファイルはビルド時に埋め込まれる。適用済みのものはスキップされ、
/// sqlx が advisory lock を取るため複数プロセスから同時に呼び出しても安全。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
   sqlx::migrate!("../../migrations").run(pool).await
}

/// 依存サービスの Readiness チェック
///
/// `/health/ready` が登録されたチェックを並行して実行する。
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
   /// チェック名（レスポンスの `checks` のキー）
   fn name(&self) -> &'static str;

   async fn check(&self) -> CheckStatus;
}

/// PostgreSQL の疎通確認（`SELECT 1`）
pub struct PgReadinessCheck {
   pool: PgPool,
}

impl PgReadinessCheck {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl ReadinessCheck for PgReadinessCheck {
   fn name(&self) -> &'static str {
      "database"
   }

   async fn check(&self) -> CheckStatus {
      let query = sqlx::query("SELECT 1").execute(&self.pool);
      match tokio::time::timeout(READINESS_TIMEOUT, query).await {
         Ok(Ok(_)) => CheckStatus::Ok,
         Ok(Err(e)) => {
            tracing::warn!(error = %e, "データベースの Readiness チェックに失敗");
            CheckStatus::Error
         }
         Err(_) => {
            tracing::warn!(
               timeout_secs = READINESS_TIMEOUT.as_secs(),
               "データベースの Readiness チェックがタイムアウト"
            );
            CheckStatus::Error
         }
      }
   }
}
