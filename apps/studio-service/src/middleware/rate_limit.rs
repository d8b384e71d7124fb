//! # レート制限
//!
//! 公開予約ポータル向けエンドポイントのスライディングウィンドウ制限。
//!
//! - キーはクライアント（`X-Forwarded-For` の先頭、なければ `anonymous`）とルートの組
//! - ウィンドウ内のリクエスト数が上限に達したら 429 と `Retry-After`（ウィンドウ秒数）を返す
//! - 状態はプロセス内のみ（複数インスタンス間では共有しない）

use std::{
   sync::Arc,
   time::{Duration, Instant},
};

use axum::{
   extract::{MatchedPath, Request, State},
   http::HeaderMap,
   middleware::Next,
   response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::{config::RateLimitConfig, error::CoreError};

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const ANONYMOUS_CLIENT: &str = "anonymous";

/// スライディングウィンドウ方式のレート制限器
#[derive(Debug, Clone)]
pub struct RateLimiter {
   window:       Duration,
   max_requests: u32,
   buckets:      Arc<DashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
   pub fn new(config: RateLimitConfig) -> Self {
      Self {
         window:       config.window,
         max_requests: config.max_requests,
         buckets:      Arc::new(DashMap::new()),
      }
   }

   /// リクエストを許可するか判定し、許可した場合は記録する
   ///
   /// 戻り値は `(許可, 残り回数)`。
   pub fn allow(&self, client: &str, route: &str) -> (bool, u32) {
      self.allow_at(client, route, Instant::now())
   }

   fn allow_at(&self, client: &str, route: &str, now: Instant) -> (bool, u32) {
      let window = self.window;
      let mut entry = self.buckets.entry(format!("{client}:{route}")).or_default();
      entry.retain(|at| now.saturating_duration_since(*at) < window);

      let used = u32::try_from(entry.len()).unwrap_or(u32::MAX);
      let remaining = self.max_requests.saturating_sub(used);
      if remaining == 0 {
         return (false, 0);
      }

      entry.push(now);
      (true, remaining - 1)
   }

   /// `Retry-After` に使う秒数（最小 1）
   pub fn retry_after_secs(&self) -> u64 {
      self.window.as_secs().max(1)
   }

   /// 期限切れの記録しか持たないキーを削除する
   pub fn prune(&self) {
      let now = Instant::now();
      let window = self.window;
      self
         .buckets
         .retain(|_, entries| entries.iter().any(|at| now.saturating_duration_since(*at) < window));
   }
}

/// `X-Forwarded-For` の先頭アドレス
fn client_key(headers: &HeaderMap) -> String {
   headers
      .get(FORWARDED_FOR_HEADER)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.split(',').next())
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .unwrap_or(ANONYMOUS_CLIENT)
      .to_string()
}

/// レート制限ミドルウェア
///
/// `route_layer` で適用し、[`MatchedPath`] をルートのキーに使う。
pub async fn rate_limit(State(limiter): State<RateLimiter>, request: Request, next: Next) -> Response {
   let client = client_key(request.headers());
   let route = request
      .extensions()
      .get::<MatchedPath>()
      .map(|path| path.as_str().to_string())
      .unwrap_or_else(|| request.uri().path().to_string());

   let (allowed, remaining) = limiter.allow(&client, &route);
   if !allowed {
      tracing::warn!(client = %client, route = %route, "レート制限を超過");
      return CoreError::TooManyRequests {
         retry_after_secs: limiter.retry_after_secs(),
      }
      .into_response();
   }
   tracing::debug!(client = %client, route = %route, remaining, "レート制限を通過");

   next.run(request).await
}

#[cfg(test)]
mod tests {
   use axum::http::HeaderValue;
   use pretty_assertions::assert_eq;

   use super::*;

   fn limiter(window_secs: u64, max_requests: u32) -> RateLimiter {
      RateLimiter::new(RateLimitConfig {
         window: Duration::from_secs(window_secs),
         max_requests,
      })
   }

   #[test]
   fn test_上限まで許可しそれ以降は拒否する() {
      let limiter = limiter(60, 2);
      let now = Instant::now();

      assert_eq!(limiter.allow_at("1.2.3.4", "/r", now), (true, 1));
      assert_eq!(limiter.allow_at("1.2.3.4", "/r", now), (true, 0));
      assert_eq!(limiter.allow_at("1.2.3.4", "/r", now), (false, 0));
   }

   #[test]
   fn test_ウィンドウが過ぎれば再び許可する() {
      let limiter = limiter(60, 1);
      let start = Instant::now();

      assert!(limiter.allow_at("c", "/r", start).0);
      assert!(!limiter.allow_at("c", "/r", start + Duration::from_secs(59)).0);
      assert!(limiter.allow_at("c", "/r", start + Duration::from_secs(60)).0);
   }

   #[test]
   fn test_クライアントとルートごとに独立して数える() {
      let limiter = limiter(60, 1);
      let now = Instant::now();

      assert!(limiter.allow_at("a", "/r1", now).0);
      assert!(limiter.allow_at("b", "/r1", now).0);
      assert!(limiter.allow_at("a", "/r2", now).0);
      assert!(!limiter.allow_at("a", "/r1", now).0);
   }

   #[test]
   fn test_retry_afterはウィンドウ秒数() {
      assert_eq!(limiter(60, 1).retry_after_secs(), 60);
      assert_eq!(
         RateLimiter::new(RateLimitConfig {
            window:       Duration::from_millis(200),
            max_requests: 1,
         })
         .retry_after_secs(),
         1
      );
   }

   #[test]
   fn test_client_keyはx_forwarded_forの先頭を使う() {
      let mut headers = HeaderMap::new();
      assert_eq!(client_key(&headers), "anonymous");

      headers.insert(
         FORWARDED_FOR_HEADER,
         HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"),
      );
      assert_eq!(client_key(&headers), "203.0.113.7");
   }

   #[test]
   fn test_pruneは期限切れのキーを削除する() {
      let limiter = limiter(60, 5);
      let Some(old) = Instant::now().checked_sub(Duration::from_secs(120)) else {
         return;
      };
      limiter.allow_at("old", "/r", old);
      limiter.allow("fresh", "/r");

      limiter.prune();

      assert!(limiter.buckets.get("old:/r").is_none());
      assert!(limiter.buckets.get("fresh:/r").is_some());
   }
}
