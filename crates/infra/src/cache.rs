//! # キャッシュタグの無効化
//!
//! 書き込み系の操作が完了した後、そのデータを読むキャッシュを無効化するシグナルを送る。
//!
//! ## 動作
//!
//! - 呼び出し側は結果を待たない（fire-and-forget）。戻り値はない
//! - 失敗はログに残すだけで、呼び出し元には伝えない
//! - タグはテナントごとに分ける（[`CacheTag::scoped_to`]）
//!
//! ## Redis 上の表現
//!
//! | 操作 | キー / チャネル | 値 |
//! |------|-----------------|----|
//! | `INCR` | `cache-tag:{tag}` | タグのバージョン |
//! | `PUBLISH` | `cache-invalidation` | タグ名 |

use std::borrow::Cow;

use derive_more::Display;
use pilates_domain::tenant::TenantId;
use redis::aio::ConnectionManager;

/// タグのバージョンキーの接頭辞
pub const TAG_VERSION_KEY_PREFIX: &str = "cache-tag:";

/// 無効化を通知する Pub/Sub チャネル
pub const INVALIDATION_CHANNEL: &str = "cache-invalidation";

/// キャッシュされた読み取りのグループ名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct CacheTag(Cow<'static, str>);

impl CacheTag {
   pub const PACKS: Self = Self(Cow::Borrowed("packs"));
   pub const HORARIOS: Self = Self(Cow::Borrowed("horarios"));
   pub const CONFIG: Self = Self(Cow::Borrowed("config"));
   pub const ALUMNOS: Self = Self(Cow::Borrowed("alumnos"));

   pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
      Self(tag.into())
   }

   /// テナント単位のタグ（`"{tag}:{tenant_id}"`）
   pub fn scoped_to(&self, tenant_id: &TenantId) -> Self {
      Self(Cow::Owned(format!("{}:{tenant_id}", self.0)))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   /// Redis 上のバージョンキー
   pub fn version_key(&self) -> String {
      format!("{TAG_VERSION_KEY_PREFIX}{}", self.0)
   }
}

/// キャッシュ無効化トレイト
///
/// 同期メソッドで即座に戻る。実際の送信は実装側がバックグラウンドで行う。
pub trait CacheInvalidator: Send + Sync {
   fn invalidate(&self, tag: &CacheTag);
}

/// Redis 実装の CacheInvalidator
#[derive(Clone)]
pub struct RedisCacheInvalidator {
   conn: ConnectionManager,
}

impl RedisCacheInvalidator {
   pub fn new(conn: ConnectionManager) -> Self {
      Self { conn }
   }
}

impl CacheInvalidator for RedisCacheInvalidator {
   fn invalidate(&self, tag: &CacheTag) {
      let Ok(handle) = tokio::runtime::Handle::try_current() else {
         tracing::warn!(tag = %tag, "tokio ランタイム外のためキャッシュ無効化を送信できない");
         return;
      };

      let mut conn = self.conn.clone();
      let tag = tag.clone();
      handle.spawn(async move {
         let result = redis::pipe()
            .atomic()
            .incr(tag.version_key(), 1)
            .ignore()
            .publish(INVALIDATION_CHANNEL, tag.as_str())
            .ignore()
            .query_async::<()>(&mut conn)
            .await;

         match result {
            Ok(()) => tracing::debug!(tag = %tag, "キャッシュタグを無効化"),
            Err(e) => tracing::warn!(tag = %tag, error = %e, "キャッシュタグの無効化に失敗"),
         }
      });
   }
}

/// 何もしない CacheInvalidator（Redis 未設定時）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheInvalidator;

impl CacheInvalidator for NoopCacheInvalidator {
   fn invalidate(&self, tag: &CacheTag) {
      tracing::debug!(tag = %tag, "Redis 未設定のためキャッシュ無効化をスキップ");
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_既定のタグ名() {
      assert_eq!(CacheTag::PACKS.as_str(), "packs");
      assert_eq!(CacheTag::HORARIOS.as_str(), "horarios");
      assert_eq!(CacheTag::CONFIG.as_str(), "config");
      assert_eq!(CacheTag::ALUMNOS.as_str(), "alumnos");
   }

   #[test]
   fn test_scoped_toはテナントidを付与する() {
      let tenant_id: TenantId = "00000000-0000-0000-0000-000000000007".parse().unwrap();

      let tag = CacheTag::HORARIOS.scoped_to(&tenant_id);

      assert_eq!(tag.as_str(), "horarios:00000000-0000-0000-0000-000000000007");
      assert_eq!(
         tag.version_key(),
         "cache-tag:horarios:00000000-0000-0000-0000-000000000007"
      );
   }

   #[test]
   fn test_noopはパニックしない() {
      NoopCacheInvalidator.invalidate(&CacheTag::new("custom"));
   }

   #[test]
   fn test_trait_objectとして共有できる() {
      fn assert_send_sync<T: Send + Sync + ?Sized>() {}
      assert_send_sync::<dyn CacheInvalidator>();
   }
}
