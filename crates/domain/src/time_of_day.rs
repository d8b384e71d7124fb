//! # 時刻（`HH:MM`）の検証
//!
//! クラス枠や営業時間で使う `HH:MM`（24 時間制）の時刻文字列を扱う。
//!
//! ## 比較の前提
//!
//! 時刻は文字列のまま辞書順で比較する。これは以下が揃っている場合にのみ
//! 時系列順と一致する:
//!
//! - 固定幅・ゼロ埋め（`"09:00"`。`"9:00"` は不可）
//! - 同一日・同一タイムゾーン
//!
//! そのため書式は `^([01][0-9]|2[0-3]):[0-5][0-9]$` に限定し、
//! ゼロ埋めされていない時刻は正規化せず書式エラーとして拒否する。

use std::{str::FromStr, sync::LazyLock};

use derive_more::Display;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
   Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("時刻パターンは有効な正規表現")
});

/// 時刻検証のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
   /// `HH:MM` 形式ではない
   #[error("Formato de hora inválido \"{value}\": use HH:MM (24 horas)")]
   InvalidFormat { value: String },

   /// 開始時刻が終了時刻以降
   #[error("La hora de inicio debe ser anterior a la hora de fin")]
   StartNotBeforeEnd,

   /// 許容範囲の外
   #[error("{label} debe estar entre {range_start} y {range_fin}")]
   OutOfRange {
      label:       String,
      range_start: String,
      range_fin:   String,
   },
}

/// `HH:MM` 形式（ゼロ埋め 24 時間制）かどうか
pub fn is_valid_time(value: &str) -> bool {
   TIME_PATTERN.is_match(value)
}

/// 開始・終了時刻の組を検証する
///
/// - どちらかが `HH:MM` 形式でなければ書式エラー（開始側を先に判定）
/// - `start >= end` なら順序エラー
///
/// ```
/// use pilates_domain::time_of_day::validate_time_range;
///
/// assert!(validate_time_range("08:00", "09:00").is_ok());
/// assert!(validate_time_range("09:00", "08:00").is_err());
/// ```
pub fn validate_time_range(start: &str, end: &str) -> Result<(), TimeRangeError> {
   for value in [start, end] {
      if !is_valid_time(value) {
         return Err(TimeRangeError::InvalidFormat {
            value: value.to_string(),
         });
      }
   }

   if start >= end {
      return Err(TimeRangeError::StartNotBeforeEnd);
   }

   Ok(())
}

/// 時刻が `[range_start, range_fin]` に収まるかを検証する
///
/// 両端を含む。`label` はエラーメッセージの主語（例: `"La hora de inicio"`）。
/// 書式の検証は行わないため、呼び出し側は [`TimeOfDay`] など検証済みの値を渡すこと。
pub fn validate_time_in_range(
   time: &str,
   range_start: &str,
   range_fin: &str,
   label: &str,
) -> Result<(), TimeRangeError> {
   if time < range_start || time > range_fin {
      return Err(TimeRangeError::OutOfRange {
         label:       label.to_string(),
         range_start: range_start.to_string(),
         range_fin:   range_fin.to_string(),
      });
   }
   Ok(())
}

/// 検証済みの時刻（値オブジェクト）
///
/// 生成時に書式を検証するため、この型同士の比較は常に時系列順と一致する。
#[derive(
   Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct TimeOfDay(String);

impl TimeOfDay {
   /// `HH:MM` 文字列から作成する
   pub fn parse(value: &str) -> Result<Self, TimeRangeError> {
      if !is_valid_time(value) {
         return Err(TimeRangeError::InvalidFormat {
            value: value.to_string(),
         });
      }
      Ok(Self(value.to_string()))
   }

   /// クレート内の定数用
   ///
   /// 書式が不正な定数はリリースビルドでも panic する。
   pub(crate) fn from_static(value: &'static str) -> Self {
      assert!(is_valid_time(value), "不正な時刻定数: {value}");
      Self(value.to_string())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   pub fn hour(&self) -> u8 {
      let b = self.0.as_bytes();
      (b[0] - b'0') * 10 + (b[1] - b'0')
   }

   pub fn minute(&self) -> u8 {
      let b = self.0.as_bytes();
      (b[3] - b'0') * 10 + (b[4] - b'0')
   }

   /// 0:00 からの経過分
   pub fn minutes_since_midnight(&self) -> u16 {
      u16::from(self.hour()) * 60 + u16::from(self.minute())
   }
}

impl FromStr for TimeOfDay {
   type Err = TimeRangeError;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      Self::parse(s)
   }
}

impl TryFrom<String> for TimeOfDay {
   type Error = TimeRangeError;

   fn try_from(value: String) -> Result<Self, Self::Error> {
      Self::parse(&value)
   }
}

impl From<TimeOfDay> for String {
   fn from(value: TimeOfDay) -> Self {
      value.0
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   // ===== validate_time_range =====

   #[rstest]
   #[case("00:00", "00:01")]
   #[case("08:00", "09:00")]
   #[case("09:59", "10:00")]
   #[case("19:30", "20:15")]
   #[case("22:00", "23:59")]
   fn test_validate_time_range_開始が終了より前ならok(#[case] start: &str, #[case] end: &str) {
      assert_eq!(validate_time_range(start, end), Ok(()));
   }

   #[rstest]
   #[case("09:00", "08:00")]
   #[case("10:00", "10:00")]
   #[case("23:59", "00:00")]
   #[case("12:30", "12:29")]
   fn test_validate_time_range_開始が終了以降なら順序エラー(
      #[case] start: &str,
      #[case] end: &str,
   ) {
      assert_eq!(
         validate_time_range(start, end),
         Err(TimeRangeError::StartNotBeforeEnd)
      );
   }

   #[test]
   fn test_validate_time_range_順序エラーのメッセージ() {
      let error = validate_time_range("09:00", "08:00").unwrap_err();

      assert!(error.to_string().contains("inicio debe ser anterior"));
   }

   #[rstest]
   #[case("24:00")]
   #[case("9:00")]
   #[case("09:60")]
   #[case("0900")]
   #[case("09:00:00")]
   #[case("")]
   #[case(" 09:00")]
   #[case("ab:cd")]
   fn test_validate_time_range_書式不正は相手の値に関わらず書式エラー(#[case] invalid: &str) {
      assert!(matches!(
         validate_time_range(invalid, "23:59"),
         Err(TimeRangeError::InvalidFormat { .. })
      ));
      assert!(matches!(
         validate_time_range("00:00", invalid),
         Err(TimeRangeError::InvalidFormat { .. })
      ));
      assert!(matches!(
         validate_time_range(invalid, invalid),
         Err(TimeRangeError::InvalidFormat { .. })
      ));
   }

   #[test]
   fn test_validate_time_range_書式エラーは順序エラーより優先される() {
      assert_eq!(
         validate_time_range("25:00", "01:00"),
         Err(TimeRangeError::InvalidFormat {
            value: "25:00".to_string(),
         })
      );
   }

   // ===== validate_time_in_range =====

   #[rstest]
   #[case("07:00")]
   #[case("12:45")]
   #[case("22:00")]
   fn test_validate_time_in_range_両端を含む範囲内ならok(#[case] time: &str) {
      assert_eq!(
         validate_time_in_range(time, "07:00", "22:00", "La hora de inicio"),
         Ok(())
      );
   }

   #[rstest]
   #[case("06:59")]
   #[case("22:01")]
   #[case("00:00")]
   fn test_validate_time_in_range_範囲外ならラベルと範囲を含むエラー(#[case] time: &str) {
      let error = validate_time_in_range(time, "07:00", "22:00", "La hora de inicio").unwrap_err();
      let message = error.to_string();

      assert_eq!(message, "La hora de inicio debe estar entre 07:00 y 22:00");
      assert!(message.contains("07:00"));
      assert!(message.contains("22:00"));
   }

   // ===== TimeOfDay =====

   #[test]
   fn test_time_of_day_時と分を取り出す() {
      let time = TimeOfDay::parse("18:45").unwrap();

      assert_eq!(time.hour(), 18);
      assert_eq!(time.minute(), 45);
      assert_eq!(time.minutes_since_midnight(), 18 * 60 + 45);
   }

   #[test]
   fn test_time_of_day_ゼロ埋めされていない時刻を拒否する() {
      assert!(TimeOfDay::parse("9:00").is_err());
   }

   #[test]
   fn test_time_of_day_定数用の生成は妥当な書式を受け入れる() {
      assert_eq!(TimeOfDay::from_static("07:00").minutes_since_midnight(), 420);
   }

   #[test]
   #[should_panic(expected = "不正な時刻定数")]
   fn test_time_of_day_定数用の生成は不正な書式でpanicする() {
      let _ = TimeOfDay::from_static("7:00");
   }

   #[test]
   fn test_time_of_day_比較は時系列順() {
      let early: TimeOfDay = "08:30".parse().unwrap();
      let late: TimeOfDay = "17:05".parse().unwrap();

      assert!(early < late);
   }

   #[test]
   fn test_time_of_day_文字列としてシリアライズする() {
      let time = TimeOfDay::parse("07:15").unwrap();

      assert_eq!(serde_json::to_value(&time).unwrap(), serde_json::json!("07:15"));
   }

   #[test]
   fn test_time_of_day_不正な文字列のデシリアライズは失敗する() {
      assert!(serde_json::from_str::<TimeOfDay>(r#""7:15""#).is_err());
      assert_eq!(
         serde_json::from_str::<TimeOfDay>(r#""07:15""#).unwrap(),
         TimeOfDay::parse("07:15").unwrap()
      );
   }
}
