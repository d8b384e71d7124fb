//! # 入力のパース
//!
//! 外部入力（リクエストボディなど）を型付きの値に変換する契約を定義する。
//!
//! ```text
//! parse(input) -> Result<T, FieldErrors>
//! ```
//!
//! 特定のバリデーションライブラリには依存しない。失敗はフィールド単位の
//! エラーの一覧として返し、API 層で `400 Bad Request` の `details` に載せる。

use std::fmt;

use serde::Serialize;

/// 1 フィールド分のエラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
   pub field:   String,
   pub message: String,
}

/// フィールドエラーの一覧
///
/// JSON では配列としてシリアライズされる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
   pub fn new() -> Self {
      Self::default()
   }

   /// エラーを追加する
   pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
      self.0.push(FieldError {
         field:   field.into(),
         message: message.into(),
      });
   }

   /// `result` が失敗ならエラーを記録して `None` を返す
   ///
   /// 複数フィールドのエラーをまとめて返すために使う:
   ///
   /// ```
   /// use pilates_domain::{time_of_day::TimeOfDay, validation::FieldErrors};
   ///
   /// let mut errors = FieldErrors::new();
   /// let inicio = errors.check("horaInicio", TimeOfDay::parse("9:00"));
   /// let fin = errors.check("horaFin", TimeOfDay::parse("10:00"));
   ///
   /// assert!(inicio.is_none());
   /// assert!(fin.is_some());
   /// assert_eq!(errors.len(), 1);
   /// ```
   pub fn check<T, E: fmt::Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
      match result {
         Ok(value) => Some(value),
         Err(error) => {
            self.push(field, error.to_string());
            None
         }
      }
   }

   /// 1 件でもエラーがあれば `Err(self)` を返す
   pub fn into_result(self) -> Result<(), Self> {
      if self.is_empty() { Ok(()) } else { Err(self) }
   }

   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   pub fn len(&self) -> usize {
      self.0.len()
   }

   pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
      self.0.iter()
   }

   /// 指定フィールドのエラーを含むか
   pub fn contains_field(&self, field: &str) -> bool {
      self.0.iter().any(|e| e.field == field)
   }
}

impl fmt::Display for FieldErrors {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let joined = self
         .0
         .iter()
         .map(|e| format!("{}: {}", e.field, e.message))
         .collect::<Vec<_>>()
         .join("; ");
      write!(f, "{joined}")
   }
}

impl std::error::Error for FieldErrors {}

/// 外部入力を型付きの値に変換する
pub trait Parse {
   type Output;

   fn parse(self) -> Result<Self::Output, FieldErrors>;
}
