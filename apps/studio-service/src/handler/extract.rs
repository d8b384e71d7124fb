//! # クエリ・パスの抽出
//!
//! axum 標準の `Query` / `Path` の失敗はプレーンテキストの 400 になるため、
//! 共通のエラーエンベロープに揃えたラッパーを用意する。
//!
//! - [`LenientQuery`]: 解釈できないクエリは既定値として扱い、一覧を返し続ける
//! - [`ValidatedPath`]: パスパラメータの変換失敗を [`CoreError::BadRequest`] にする

use axum::{
   extract::{FromRequestParts, Path, Query},
   http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::CoreError;

/// 失敗しないクエリ抽出
///
/// 重複キーなどでデシリアライズできない場合は `T::default()` を返す。
#[derive(Debug, Clone, Default)]
pub struct LenientQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for LenientQuery<T>
where
   T: DeserializeOwned + Default + Send,
   S: Send + Sync,
{
   type Rejection = CoreError;

   async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
      match Query::<T>::from_request_parts(parts, state).await {
         Ok(Query(value)) => Ok(Self(value)),
         Err(rejection) => {
            tracing::debug!(
               error = %rejection.body_text(),
               "クエリを解釈できないため既定値を使用"
            );
            Ok(Self(T::default()))
         }
      }
   }
}

/// 共通エンベロープでエラーを返すパス抽出
#[derive(Debug, Clone)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
   T: DeserializeOwned + Send,
   S: Send + Sync,
{
   type Rejection = CoreError;

   async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
      let Path(value) = Path::<T>::from_request_parts(parts, state)
         .await
         .map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "パスパラメータの変換に失敗");
            CoreError::BadRequest("Identificador inválido en la ruta".to_string())
         })?;

      Ok(Self(value))
   }
}
