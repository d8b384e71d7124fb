//! # インフラ層エラー定義
//!
//! データベースや Redis との通信で発生するエラーを表現する。
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From` 実装や convenience constructor でエラーを生成した時点の
//! スパン情報（どのリポジトリのどの操作か）が自動的に記録される。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::Conflict { entity, key } => { /* 409 */ }
///     _ => { /* 500 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// SQL の実行失敗、接続エラーなど
   #[error("データベースエラー: {0}")]
   Database(#[source] sqlx::Error),

   /// Redis への接続失敗、コマンド実行エラーなど
   #[error("Redis エラー: {0}")]
   Redis(#[source] redis::RedisError),

   /// 一意制約の違反
   #[error("一意制約に違反しました: {entity}({key})")]
   Conflict {
      /// エンティティ名（例: "Alumno"）
      entity: String,
      /// 重複したキーの説明（個人情報は含めない）
      key:    String,
   },

   /// 上記に分類できないエラー（DB の値がドメインの不変条件を満たさない等）
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraError {
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// 一意制約違反かどうか
   pub fn is_conflict(&self) -> bool {
      matches!(self.kind, InfraErrorKind::Conflict { .. })
   }

   /// 一意制約違反エラーを生成する
   pub fn conflict(entity: impl Into<String>, key: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Conflict {
            entity: entity.into(),
            key:    key.into(),
         },
         span_trace: SpanTrace::capture(),
      }
   }

   /// 予期しないエラーを生成する
   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Unexpected(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }

   /// sqlx のエラーを変換する。一意制約違反は [`InfraErrorKind::Conflict`] にする
   pub(crate) fn from_insert(source: sqlx::Error, entity: &str, key: &str) -> Self {
      let unique_violation = source
         .as_database_error()
         .is_some_and(|db_err| db_err.is_unique_violation());
      if unique_violation {
         return Self::conflict(entity, key);
      }
      source.into()
   }
}

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      self.kind.source()
   }
}

impl From<sqlx::Error> for InfraError {
   fn from(source: sqlx::Error) -> Self {
      Self {
         kind:       InfraErrorKind::Database(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl From<redis::RedisError> for InfraError {
   fn from(source: redis::RedisError) -> Self {
      Self {
         kind:       InfraErrorKind::Redis(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

#[cfg(test)]
mod tests {
   use std::error::Error as _;

   use tracing_subscriber::layer::SubscriberExt as _;

   use super::*;

   /// テスト用に ErrorLayer 付き subscriber を設定する
   fn with_error_layer(f: impl FnOnce()) {
      let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
      let _guard = tracing::subscriber::set_default(subscriber);
      f();
   }

   #[test]
   fn test_from_sqlx_errorでspan_traceがキャプチャされる() {
      with_error_layer(|| {
         let span = tracing::info_span!("horario_repo", tenant_id = "T-1");
         let _enter = span.enter();

         let err: InfraError = sqlx::Error::RowNotFound.into();

         assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
         let trace = format!("{}", err.span_trace());
         assert!(trace.contains("horario_repo"), "SpanTrace がスパン名を含むこと: {trace}");
      });
   }

   #[test]
   fn test_from_redis_errorはredis種別になる() {
      let redis_err: redis::RedisError = (redis::ErrorKind::Io, "接続失敗").into();
      let err: InfraError = redis_err.into();

      assert!(matches!(err.kind(), InfraErrorKind::Redis(_)));
      assert!(err.source().is_some());
   }

   #[test]
   fn test_conflictのdisplay() {
      let err = InfraError::conflict("Alumno", "email");

      assert!(err.is_conflict());
      assert_eq!(err.to_string(), "一意制約に違反しました: Alumno(email)");
   }

   #[test]
   fn test_from_insert_一意制約以外はdatabase種別のまま() {
      let err = InfraError::from_insert(sqlx::Error::PoolTimedOut, "Alumno", "email");

      assert!(!err.is_conflict());
      assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
   }

   #[test]
   fn test_unexpectedはsourceを持たない() {
      let err = InfraError::unexpected("曜日番号が不正");

      assert!(err.source().is_none());
   }
}
