//! # API レスポンスエンベロープ
//!
//! 単一オブジェクトを返すエンドポイントの統一形式 `{ "data": T }` を提供する。
//! 一覧系は [`PaginatedResponse`](crate::PaginatedResponse) を使う。

use serde::{Deserialize, Serialize};

/// 単一データ用のレスポンス型
///
/// ```
/// use pilates_shared::ApiResponse;
///
/// let response = ApiResponse::new("07:00");
/// assert_eq!(response.data, "07:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
   pub data: T,
}

impl<T> ApiResponse<T> {
   /// 新しい `ApiResponse` を作成する
   pub fn new(data: T) -> Self {
      Self { data }
   }
}
