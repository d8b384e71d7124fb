//! # Studio Service 設定
//!
//! 環境変数からサーバーの設定を読み込む。
//!
//! | 変数 | 必須 | 既定値 |
//! |------|------|--------|
//! | `STUDIO_HOST` | | `0.0.0.0` |
//! | `STUDIO_PORT` | ✓ | |
//! | `DATABASE_URL` | ✓ | |
//! | `REDIS_URL` | | 未設定ならキャッシュ無効化を行わない |
//! | `RATE_LIMIT_WINDOW_SECS` | | `60` |
//! | `RATE_LIMIT_MAX_REQUESTS` | | `30` |
//!
//! 不正な値はパニックせず [`ConfigError`] として返す。

use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 30;

/// 設定の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   #[error("{var} の値が不正です（{value:?}）: {reason}")]
   Invalid {
      var:    &'static str,
      value:  String,
      reason: String,
   },
}

/// 公開エンドポイントのレート制限設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
   pub window:       Duration,
   pub max_requests: u32,
}

impl Default for RateLimitConfig {
   fn default() -> Self {
      Self {
         window:       Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
         max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
      }
   }
}

/// Studio Service サーバーの設定
#[derive(Debug, Clone)]
pub struct ServiceConfig {
   /// バインドアドレス
   pub host:         String,
   /// ポート番号
   pub port:         u16,
   /// データベース接続 URL
   pub database_url: String,
   /// Redis 接続 URL
   pub redis_url:    Option<String>,
   pub rate_limit:   RateLimitConfig,
}

impl ServiceConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|key| env::var(key).ok())
   }

   /// 任意のキー・値の取得関数から設定を読み込む
   ///
   /// 空文字列は未設定として扱う。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

      let host = get("STUDIO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
      let port = parse_required(&get, "STUDIO_PORT")?;
      let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
      let redis_url = get("REDIS_URL");

      let window_secs: u64 = parse_optional(&get, "RATE_LIMIT_WINDOW_SECS")?
         .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS);
      if window_secs == 0 {
         return Err(ConfigError::Invalid {
            var:    "RATE_LIMIT_WINDOW_SECS",
            value:  window_secs.to_string(),
            reason: "1 以上である必要があります".to_string(),
         });
      }
      let max_requests: u32 = parse_optional(&get, "RATE_LIMIT_MAX_REQUESTS")?
         .unwrap_or(DEFAULT_RATE_LIMIT_MAX_REQUESTS);

      Ok(Self {
         host,
         port,
         database_url,
         redis_url,
         rate_limit: RateLimitConfig {
            window: Duration::from_secs(window_secs),
            max_requests,
         },
      })
   }
}

fn parse_required<T>(get: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<T, ConfigError>
where
   T: FromStr,
   T::Err: std::fmt::Display,
{
   parse_optional(get, var)?.ok_or(ConfigError::Missing(var))
}

fn parse_optional<T>(
   get: &impl Fn(&str) -> Option<String>,
   var: &'static str,
) -> Result<Option<T>, ConfigError>
where
   T: FromStr,
   T::Err: std::fmt::Display,
{
   get(var)
      .map(|value| {
         value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: value.clone(),
            reason: e.to_string(),
         })
      })
      .transpose()
}
