/// UUID v7 ベースの ID 型を定義する宣言型マクロ
///
/// Newtype 構造体と `new()` / `from_uuid()` / `as_uuid()` / `Default` を生成する。
///
/// ```rust
/// use pilates_domain::horario::HorarioId;
///
/// let id = HorarioId::new();
/// let restored = HorarioId::from_uuid(*id.as_uuid());
/// assert_eq!(id, restored);
/// ```
macro_rules! define_uuid_id {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident;
   ) => {
      $(#[$meta])*
      #[derive(
         Debug, Clone, PartialEq, Eq, Hash,
         serde::Serialize, serde::Deserialize,
         derive_more::Display,
      )]
      #[display("{_0}")]
      $vis struct $Name(uuid::Uuid);

      impl $Name {
         /// 新しい ID を生成する（UUID v7）
         pub fn new() -> Self {
            Self(uuid::Uuid::now_v7())
         }

         /// 既存の UUID から ID を作成する
         pub fn from_uuid(uuid: uuid::Uuid) -> Self {
            Self(uuid)
         }

         /// 内部の UUID 参照を取得する
         pub fn as_uuid(&self) -> &uuid::Uuid {
            &self.0
         }
      }

      impl Default for $Name {
         fn default() -> Self {
            Self::new()
         }
      }
   };
}

/// `define_validated_string!` の両アームで共有するメソッド群
macro_rules! _validated_string_common {
   ($Name:ident, $label:expr, $max_length:expr) => {
      impl $Name {
         /// 前後の空白を除去し、空でないこと・最大文字数以内であることを検証する
         pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
            let value = value.into().trim().to_string();

            if value.is_empty() {
               return Err($crate::DomainError::Validation(format!(
                  "{} es obligatorio",
                  $label
               )));
            }

            if value.chars().count() > $max_length {
               return Err($crate::DomainError::Validation(format!(
                  "{} no puede superar {} caracteres",
                  $label, $max_length
               )));
            }

            Ok(Self(value))
         }

         pub fn as_str(&self) -> &str {
            &self.0
         }

         pub fn into_string(self) -> String {
            self.0
         }
      }
   };
}

/// バリデーション付き String Newtype を定義する宣言型マクロ
///
/// `pii: true` を指定すると `Debug` 出力を `[REDACTED]` にマスクし、
/// `Display` を生成しない（生徒の氏名など）。
///
/// ```rust
/// use pilates_domain::alumno::AlumnoNombre;
///
/// let nombre = AlumnoNombre::new("  Lucía Pérez ").unwrap();
/// assert_eq!(nombre.as_str(), "Lucía Pérez");
/// assert!(format!("{:?}", nombre).contains("[REDACTED]"));
/// ```
macro_rules! define_validated_string {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident {
         label: $label:expr,
         max_length: $max_length:expr,
         pii: true $(,)?
      }
   ) => {
      $(#[$meta])*
      #[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
      $vis struct $Name(String);

      impl std::fmt::Debug for $Name {
         fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_tuple(stringify!($Name)).field(&"[REDACTED]").finish()
         }
      }

      _validated_string_common!($Name, $label, $max_length);
   };
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident {
         label: $label:expr,
         max_length: $max_length:expr $(,)?
      }
   ) => {
      $(#[$meta])*
      #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
      $vis struct $Name(String);

      _validated_string_common!($Name, $label, $max_length);

      impl std::fmt::Display for $Name {
         fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
         }
      }
   };
}
