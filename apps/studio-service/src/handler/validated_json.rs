//! # 検証付き JSON 抽出
//!
//! `Json<T>` で本文をデシリアライズし、`validator` のルールで検証する。
//! どちらの失敗も `400` の `details`（フィールド単位）として返す。
//!
//! フィールド名はリクエストの JSON に合わせて camelCase で返す。

use axum::{
   Json,
   extract::{FromRequest, Request, rejection::JsonRejection},
};
use pilates_domain::validation::FieldErrors;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// 本文全体に関するエラーのフィールド名
const BODY_FIELD: &str = "body";

/// 検証済みのリクエスト本文
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
   T: DeserializeOwned + Validate + Send,
   S: Send + Sync,
{
   type Rejection = CoreError;

   async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
      let Json(value) = Json::<T>::from_request(req, state)
         .await
         .map_err(rejection_to_error)?;
      value.validate().map_err(|e| CoreError::InvalidInput(to_field_errors(&e)))?;

      Ok(Self(value))
   }
}

fn rejection_to_error(rejection: JsonRejection) -> CoreError {
   tracing::debug!(error = %rejection.body_text(), "JSON の読み取りに失敗");

   let message = match rejection {
      JsonRejection::MissingJsonContentType(_) => {
         "Se requiere Content-Type: application/json".to_string()
      }
      JsonRejection::JsonSyntaxError(_) => "El cuerpo no es un JSON válido".to_string(),
      other => format!("Cuerpo inválido: {}", other.body_text()),
   };

   let mut errors = FieldErrors::new();
   errors.push(BODY_FIELD, message);
   CoreError::InvalidInput(errors)
}

/// `validator` のエラーをフィールド名順の [`FieldErrors`] にする
pub(crate) fn to_field_errors(errors: &ValidationErrors) -> FieldErrors {
   let mut entries: Vec<(String, String)> = errors
      .field_errors()
      .into_iter()
      .flat_map(|(field, field_errors)| {
         let field = to_camel_case(&field);
         field_errors.iter().map(move |error| {
            let message = error
               .message
               .as_ref()
               .map(|m| m.to_string())
               .unwrap_or_else(|| format!("Valor inválido ({})", error.code));
            (field.clone(), message)
         })
      })
      .collect();
   entries.sort();

   let mut result = FieldErrors::new();
   for (field, message) in entries {
      result.push(field, message);
   }
   result
}

fn to_camel_case(field: &str) -> String {
   let mut out = String::with_capacity(field.len());
   let mut upper_next = false;
   for c in field.chars() {
      if c == '_' {
         upper_next = true;
      } else if upper_next {
         out.extend(c.to_uppercase());
         upper_next = false;
      } else {
         out.push(c);
      }
   }
   out
}
