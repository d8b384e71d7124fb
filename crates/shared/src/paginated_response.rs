//! # ページネーション
//!
//! オフセットベースのページネーションを扱う。
//!
//! - [`PaginationParams`]: クエリ文字列の `page` / `limit` から算出するパラメータ
//! - [`PaginatedResponse`]: 一覧データとナビゲーション情報をまとめたエンベロープ
//!
//! 一覧エンドポイントを常に応答可能に保つため、不正な入力はエラーにせず
//! デフォルト値と上下限への丸めで吸収する。
//!
//! ## JSON 形式
//!
//! ```json
//! {
//!   "data": [...],
//!   "pagination": {
//!     "page": 3,
//!     "limit": 10,
//!     "total": 25,
//!     "totalPages": 3,
//!     "hasNext": false,
//!     "hasPrev": true
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// `page` 未指定時の値
pub const DEFAULT_PAGE: u32 = 1;
/// `limit` 未指定時の値
pub const DEFAULT_LIMIT: u32 = 50;
/// `limit` の上限
pub const MAX_LIMIT: u32 = 100;

/// ページネーションパラメータ
///
/// # 不変条件
///
/// - `page >= 1`
/// - `1 <= limit <= 100`
/// - `skip == (page - 1) * limit`
///
/// フィールドは非公開で、[`from_query`](Self::from_query) からのみ生成できる。
/// これにより `limit == 0` の値が [`PaginatedResponse::new`] に渡ることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
   page:  u32,
   limit: u32,
   skip:  u64,
}

impl PaginationParams {
   /// クエリ文字列の生の値からパラメータを算出する
   ///
   /// - `page`: 未指定・非数値なら 1、1 未満は 1 に丸める
   /// - `limit`: 未指定・非数値なら 50、`[1, 100]` に丸める
   ///
   /// 数値は先頭の空白と符号を許容し、先頭から続く数字列のみを読む
   /// （`"3abc"` → 3、`"2.7"` → 2）。桁あふれは飽和させる。
   ///
   /// ```
   /// use pilates_shared::PaginationParams;
   ///
   /// let params = PaginationParams::from_query(Some("3"), Some("10"));
   /// assert_eq!((params.page(), params.limit(), params.skip()), (3, 10, 20));
   /// ```
   pub fn from_query(raw_page: Option<&str>, raw_limit: Option<&str>) -> Self {
      let page = raw_page
         .and_then(parse_leading_int)
         .unwrap_or(i64::from(DEFAULT_PAGE))
         .clamp(1, i64::from(u32::MAX));
      let limit = raw_limit
         .and_then(parse_leading_int)
         .unwrap_or(i64::from(DEFAULT_LIMIT))
         .clamp(1, i64::from(MAX_LIMIT));

      let page = u32::try_from(page).unwrap_or(u32::MAX);
      let limit = u32::try_from(limit).unwrap_or(MAX_LIMIT);

      Self {
         page,
         limit,
         skip: u64::from(page - 1) * u64::from(limit),
      }
   }

   pub fn page(&self) -> u32 {
      self.page
   }

   pub fn limit(&self) -> u32 {
      self.limit
   }

   /// 読み飛ばす件数（SQL の `OFFSET`）
   pub fn skip(&self) -> u64 {
      self.skip
   }
}

impl Default for PaginationParams {
   fn default() -> Self {
      Self::from_query(None, None)
   }
}

/// 先頭の整数部分を読み取る
///
/// 数字が 1 つもなければ `None`。
fn parse_leading_int(raw: &str) -> Option<i64> {
   let trimmed = raw.trim_start();
   let (negative, unsigned) = match trimmed.as_bytes().first() {
      Some(b'-') => (true, &trimmed[1..]),
      Some(b'+') => (false, &trimmed[1..]),
      _ => (false, trimmed),
   };

   let end = unsigned
      .find(|c: char| !c.is_ascii_digit())
      .unwrap_or(unsigned.len());
   let digits = &unsigned[..end];
   if digits.is_empty() {
      return None;
   }

   let magnitude = digits.bytes().fold(0_i64, |acc, b| {
      acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
   });
   Some(if negative { -magnitude } else { magnitude })
}

/// axum の `Query` で受け取るページネーション用クエリ
///
/// 数値として解釈できない値でも抽出に失敗しないよう、文字列のまま受け取る。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
   pub page:  Option<String>,
   pub limit: Option<String>,
}

impl PaginationQuery {
   pub fn params(&self) -> PaginationParams {
      PaginationParams::from_query(self.page.as_deref(), self.limit.as_deref())
   }
}

/// ページのナビゲーション情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
   pub page:        u32,
   pub limit:       u32,
   pub total:       u64,
   pub total_pages: u64,
   pub has_next:    bool,
   pub has_prev:    bool,
}

/// ページネーション付きレスポンス
///
/// `total_pages = ceil(total / limit)`、`has_next = page < total_pages`、
/// `has_prev = page > 1`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
   pub data:       Vec<T>,
   pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
   /// 1 ページ分のデータと総件数からエンベロープを組み立てる
   pub fn new(data: Vec<T>, total: u64, params: &PaginationParams) -> Self {
      let total_pages = total.div_ceil(u64::from(params.limit));
      Self {
         data,
         pagination: PaginationMeta {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
            has_next: u64::from(params.page) < total_pages,
            has_prev: params.page > 1,
         },
      }
   }

   /// ナビゲーション情報を保ったまま要素を変換する
   pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
      PaginatedResponse {
         data:       self.data.into_iter().map(f).collect(),
         pagination: self.pagination,
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   // ===== PaginationParams::from_query =====

   #[test]
   fn test_from_query_指定値からskipを算出する() {
      let params = PaginationParams::from_query(Some("3"), Some("10"));

      assert_eq!(params.page(), 3);
      assert_eq!(params.limit(), 10);
      assert_eq!(params.skip(), 20);
   }

   #[test]
   fn test_from_query_未指定ならデフォルト値() {
      let params = PaginationParams::from_query(None, None);

      assert_eq!(params.page(), 1);
      assert_eq!(params.limit(), 50);
      assert_eq!(params.skip(), 0);
   }

   #[rstest]
   #[case(Some(""), 1)]
   #[case(Some("abc"), 1)]
   #[case(Some("0"), 1)]
   #[case(Some("-4"), 1)]
   #[case(Some("3abc"), 3)]
   #[case(Some("2.7"), 2)]
   #[case(Some("  7"), 7)]
   #[case(Some("+5"), 5)]
   #[case(Some("99999999999999999999999"), u32::MAX)]
   fn test_from_query_pageの不正値を丸める(
      #[case] raw: Option<&str>,
      #[case] expected: u32,
   ) {
      assert_eq!(PaginationParams::from_query(raw, None).page(), expected);
   }

   #[rstest]
   #[case(Some("x"), 50)]
   #[case(Some(""), 50)]
   #[case(Some("0"), 1)]
   #[case(Some("-20"), 1)]
   #[case(Some("100"), 100)]
   #[case(Some("101"), 100)]
   #[case(Some("5000"), 100)]
   #[case(Some("25"), 25)]
   fn test_from_query_limitを1から100に丸める(
      #[case] raw: Option<&str>,
      #[case] expected: u32,
   ) {
      assert_eq!(PaginationParams::from_query(None, raw).limit(), expected);
   }

   #[rstest]
   #[case(Some("1"), Some("1"))]
   #[case(Some("2"), Some("100"))]
   #[case(Some("-1"), Some("abc"))]
   #[case(Some("4294967295"), Some("100"))]
   #[case(Some("12"), Some("7"))]
   fn test_from_query_skipは常にpage_minus_1_times_limit(
      #[case] raw_page: Option<&str>,
      #[case] raw_limit: Option<&str>,
   ) {
      let params = PaginationParams::from_query(raw_page, raw_limit);

      assert!(params.page() >= 1);
      assert!((1..=MAX_LIMIT).contains(&params.limit()));
      assert_eq!(
         params.skip(),
         u64::from(params.page() - 1) * u64::from(params.limit())
      );
   }

   #[test]
   fn test_pagination_query_文字列のまま受け取る() {
      let query = PaginationQuery {
         page:  Some("2".to_string()),
         limit: Some("abc".to_string()),
      };

      assert_eq!(query.params(), PaginationParams::from_query(Some("2"), None));
   }

   // ===== PaginatedResponse::new =====

   #[test]
   fn test_new_最終ページではhas_nextがfalse() {
      let params = PaginationParams::from_query(Some("3"), Some("10"));
      let response = PaginatedResponse::new(vec![21, 22, 23, 24, 25], 25, &params);

      assert_eq!(
         response.pagination,
         PaginationMeta {
            page:        3,
            limit:       10,
            total:       25,
            total_pages: 3,
            has_next:    false,
            has_prev:    true,
         }
      );
   }

   #[test]
   fn test_new_先頭ページではhas_prevがfalse() {
      let params = PaginationParams::from_query(Some("1"), Some("10"));
      let response = PaginatedResponse::new(vec![1; 10], 25, &params);

      assert!(response.pagination.has_next);
      assert!(!response.pagination.has_prev);
   }

   #[test]
   fn test_new_総件数0ではtotal_pagesが0() {
      let params = PaginationParams::default();
      let response = PaginatedResponse::<u8>::new(vec![], 0, &params);

      assert_eq!(response.pagination.total_pages, 0);
      assert!(!response.pagination.has_next);
      assert!(!response.pagination.has_prev);
   }

   #[rstest]
   #[case(0, 10, 0)]
   #[case(1, 10, 1)]
   #[case(10, 10, 1)]
   #[case(11, 10, 2)]
   #[case(100, 1, 100)]
   #[case(101, 100, 2)]
   fn test_new_total_pagesは切り上げ(
      #[case] total: u64,
      #[case] limit: u32,
      #[case] expected: u64,
   ) {
      let raw_limit = limit.to_string();
      let params = PaginationParams::from_query(None, Some(&raw_limit));
      let response = PaginatedResponse::<u8>::new(vec![], total, &params);

      assert_eq!(response.pagination.total_pages, expected);
   }

   #[test]
   fn test_new_範囲外のページでもhas_prevはtrue() {
      let params = PaginationParams::from_query(Some("9"), Some("10"));
      let response = PaginatedResponse::<u8>::new(vec![], 25, &params);

      assert!(!response.pagination.has_next);
      assert!(response.pagination.has_prev);
   }

   #[test]
   fn test_jsonのキーはcamel_case() {
      let params = PaginationParams::from_query(Some("2"), Some("1"));
      let response = PaginatedResponse::new(vec!["b"], 3, &params);
      let json = serde_json::to_value(&response).unwrap();

      assert_eq!(
         json,
         serde_json::json!({
            "data": ["b"],
            "pagination": {
               "page": 2,
               "limit": 1,
               "total": 3,
               "totalPages": 3,
               "hasNext": true,
               "hasPrev": true
            }
         })
      );
   }

   #[test]
   fn test_map_ナビゲーション情報を保持する() {
      let params = PaginationParams::from_query(Some("1"), Some("2"));
      let response = PaginatedResponse::new(vec![1, 2], 5, &params).map(|n| n * 10);

      assert_eq!(response.data, vec![10, 20]);
      assert_eq!(response.pagination.total_pages, 3);
   }
}
