//! # ドメイン層エラー定義
//!
//! ビジネスルール違反を表現するエラー型。
//! メッセージはそのままクライアントに返るため、利用者向けの言語（スペイン語）で書く。
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値がビジネスルールに違反 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `Conflict` | 409 Conflict | 一意制約の違反 |
//! | `Forbidden` | 403 Forbidden | 権限不足 |

use thiserror::Error;

use crate::time_of_day::TimeRangeError;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
   /// バリデーションエラー
   #[error("{0}")]
   Validation(String),

   /// エンティティが見つからない
   #[error("{entity_type} no encontrado: {id}")]
   NotFound {
      /// エンティティの種類（"Horario", "Alumno" など）
      entity_type: &'static str,
      id:          String,
   },

   /// 競合エラー
   #[error("{0}")]
   Conflict(String),

   /// 権限エラー
   ///
   /// 認証（誰か不明 = 401）ではなく認可（権限なし = 403）の失敗を表す。
   #[error("{0}")]
   Forbidden(String),
}

impl From<TimeRangeError> for DomainError {
   fn from(error: TimeRangeError) -> Self {
      Self::Validation(error.to_string())
   }
}
