//! # スタジオ内の役割
//!
//! 上流のゲートウェイが `X-User-Role` ヘッダーで渡す役割。
//! 書き込み系の操作は役割ごとに許可する。

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// 役割
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StudioRole {
   /// スタジオ管理者
   Admin,
   /// インストラクター
   Instructor,
   /// 生徒
   Alumno,
}

impl StudioRole {
   /// `allowed` のいずれかに該当するか
   pub fn is_one_of(self, allowed: &[StudioRole]) -> bool {
      allowed.contains(&self)
   }
}

#[cfg(test)]
mod tests {
   use std::str::FromStr;

   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case("admin", StudioRole::Admin)]
   #[case("instructor", StudioRole::Instructor)]
   #[case("alumno", StudioRole::Alumno)]
   fn test_小文字の文字列からパースできる(#[case] raw: &str, #[case] expected: StudioRole) {
      assert_eq!(StudioRole::from_str(raw).unwrap(), expected);
      assert_eq!(expected.to_string(), raw);
   }

   #[test]
   fn test_未知の役割はエラー() {
      assert!(StudioRole::from_str("owner").is_err());
      assert!(StudioRole::from_str("Admin").is_err());
   }

   #[test]
   fn test_is_one_of() {
      let writers = [StudioRole::Admin, StudioRole::Instructor];

      assert!(StudioRole::Instructor.is_one_of(&writers));
      assert!(!StudioRole::Alumno.is_one_of(&writers));
   }
}
