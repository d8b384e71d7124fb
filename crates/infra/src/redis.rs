//! # Redis 接続管理
//!
//! Redis はキャッシュ無効化シグナル（タグのバージョン更新と Pub/Sub 通知）に使う。
//! [`ConnectionManager`] は切断時に自動で再接続し、Clone して複数タスクで共有できる。

use redis::{Client, aio::ConnectionManager};

/// Redis 接続マネージャを作成する
///
/// - `redis_url` の形式: `redis://[[username:]password@]host[:port][/database]`
/// - TLS 接続は `rediss://` スキーム
pub async fn create_connection_manager(redis_url: &str) -> Result<ConnectionManager, redis::RedisError> {
   let client = Client::open(redis_url)?;
   ConnectionManager::new(client).await
}
