//! # Studio Service サーバー
//!
//! 起動の流れ:
//!
//! 1. `.env` の読み込みとトレーシング初期化
//! 2. 環境変数から設定を読み込む
//! 3. PostgreSQL 接続とマイグレーション
//! 4. キャッシュ無効化の送信先を決定（`REDIS_URL` 未設定なら何もしない）
//! 5. ルーターを構築して起動し、SIGINT / SIGTERM で graceful shutdown
//!
//! 終了時は接続プールを閉じる。

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context as _;
use pilates_infra::{CacheInvalidator, NoopCacheInvalidator, RedisCacheInvalidator, db, redis};
use pilates_shared::observability::{TracingConfig, init_tracing};
use pilates_studio_service::{AppContext, build_app, config::ServiceConfig};
use tokio::{net::TcpListener, signal};

/// レート制限の期限切れバケットを掃除する間隔
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   dotenvy::dotenv().ok();

   init_tracing(&TracingConfig::from_env("studio-service"));

   let config = ServiceConfig::from_env().context("設定の読み込みに失敗しました")?;

   tracing::info!(
      "Studio Service サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   let pool = db::create_pool(&config.database_url)
      .await
      .context("データベース接続に失敗しました")?;
   db::run_migrations(&pool)
      .await
      .context("マイグレーションに失敗しました")?;
   tracing::info!("データベースに接続しました");

   let cache: Arc<dyn CacheInvalidator> = match &config.redis_url {
      Some(url) => {
         let conn = redis::create_connection_manager(url)
            .await
            .context("Redis 接続に失敗しました")?;
         tracing::info!("Redis に接続しました");
         Arc::new(RedisCacheInvalidator::new(conn))
      }
      None => {
         tracing::warn!("REDIS_URL が未設定のため、キャッシュ無効化は送信しません");
         Arc::new(NoopCacheInvalidator)
      }
   };

   let ctx = AppContext::postgres(pool.clone(), cache, config.rate_limit);

   let rate_limiter = ctx.rate_limiter.clone();
   tokio::spawn(async move {
      let mut interval = tokio::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
      loop {
         interval.tick().await;
         rate_limiter.prune();
      }
   });

   let app = build_app(ctx);

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("アドレスのパースに失敗しました")?;
   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Studio Service サーバーが起動しました: {}", addr);

   axum::serve(listener, app)
      .with_graceful_shutdown(shutdown_signal())
      .await?;

   pool.close().await;
   tracing::info!("Studio Service サーバーを停止しました");

   Ok(())
}

/// SIGINT または SIGTERM を待つ
///
/// ハンドラの登録に失敗したシグナルは待たない（もう一方で停止できる）。
async fn shutdown_signal() {
   let ctrl_c = async {
      if let Err(e) = signal::ctrl_c().await {
         tracing::error!("Ctrl+C ハンドラの登録に失敗しました: {}", e);
         std::future::pending::<()>().await;
      }
   };

   #[cfg(unix)]
   let terminate = async {
      match signal::unix::signal(signal::unix::SignalKind::terminate()) {
         Ok(mut sig) => {
            sig.recv().await;
         }
         Err(e) => {
            tracing::error!("SIGTERM ハンドラの登録に失敗しました: {}", e);
            std::future::pending::<()>().await;
         }
      }
   };

   #[cfg(not(unix))]
   let terminate = std::future::pending::<()>();

   tokio::select! {
      () = ctrl_c => tracing::info!("SIGINT を受信、graceful shutdown を開始します"),
      () = terminate => tracing::info!("SIGTERM を受信、graceful shutdown を開始します"),
   }
}
