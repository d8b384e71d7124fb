//! # 生徒（Alumno）
//!
//! 氏名・メールアドレス・電話番号は個人情報のため、`Debug` 出力をマスクする。
//! メールアドレスはテナント内で一意（DB の一意制約で保証）。

use chrono::{DateTime, Utc};

use crate::{DomainError, tenant::TenantId};

define_uuid_id! {
   /// 生徒の一意識別子
   pub struct AlumnoId;
}

define_validated_string! {
   /// 生徒の氏名
   pub struct AlumnoNombre {
      label: "El nombre",
      max_length: 100,
      pii: true,
   }
}

define_validated_string! {
   /// 電話番号（書式は国ごとに異なるため長さのみ検証する）
   pub struct Telefono {
      label: "El teléfono",
      max_length: 30,
      pii: true,
   }
}

/// メールアドレス（値オブジェクト）
///
/// 前後の空白を除去して小文字に正規化する。
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Email(String);

impl Email {
   const MAX_LENGTH: usize = 255;

   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into().trim().to_lowercase();

      if value.is_empty() {
         return Err(DomainError::Validation("El email es obligatorio".to_string()));
      }

      if value.chars().count() > Self::MAX_LENGTH {
         return Err(DomainError::Validation(format!(
            "El email no puede superar {} caracteres",
            Self::MAX_LENGTH
         )));
      }

      let valid = match value.split_once('@') {
         Some((local, domain)) => {
            !local.is_empty()
               && !domain.contains('@')
               && domain.contains('.')
               && !domain.starts_with('.')
               && !domain.ends_with('.')
               && !value.contains(char::is_whitespace)
         }
         None => false,
      };
      if !valid {
         return Err(DomainError::Validation("El email no es válido".to_string()));
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

impl std::fmt::Debug for Email {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("Email").field(&"[REDACTED]").finish()
   }
}

/// 生徒の生成パラメータ
#[derive(Debug, Clone)]
pub struct NewAlumno {
   pub id:         AlumnoId,
   pub tenant_id:  TenantId,
   pub nombre:     AlumnoNombre,
   pub email:      Email,
   pub telefono:   Option<Telefono>,
   pub created_at: DateTime<Utc>,
}

/// 生徒エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alumno {
   id:         AlumnoId,
   tenant_id:  TenantId,
   nombre:     AlumnoNombre,
   email:      Email,
   telefono:   Option<Telefono>,
   created_at: DateTime<Utc>,
}

impl Alumno {
   pub fn new(params: NewAlumno) -> Self {
      Self {
         id:         params.id,
         tenant_id:  params.tenant_id,
         nombre:     params.nombre,
         email:      params.email,
         telefono:   params.telefono,
         created_at: params.created_at,
      }
   }

   pub fn id(&self) -> &AlumnoId {
      &self.id
   }

   pub fn tenant_id(&self) -> &TenantId {
      &self.tenant_id
   }

   pub fn nombre(&self) -> &AlumnoNombre {
      &self.nombre
   }

   pub fn email(&self) -> &Email {
      &self.email
   }

   pub fn telefono(&self) -> Option<&Telefono> {
      self.telefono.as_ref()
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   /// 氏名またはメールアドレスに `term` を含むか（大文字小文字を区別しない）
   pub fn matches(&self, term: &str) -> bool {
      let term = term.trim().to_lowercase();
      term.is_empty()
         || self.nombre.as_str().to_lowercase().contains(&term)
         || self.email.as_str().contains(&term)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[test]
   fn test_emailは小文字に正規化される() {
      let email = Email::new("  Lucia.Perez@Example.COM ").unwrap();

      assert_eq!(email.as_str(), "lucia.perez@example.com");
   }

   #[rstest]
   #[case("")]
   #[case("sin-arroba")]
   #[case("@example.com")]
   #[case("a@b@example.com")]
   #[case("lucia@localhost")]
   #[case("lucia@.com")]
   #[case("lucia perez@example.com")]
   fn test_不正なemailを拒否する(#[case] raw: &str) {
      assert!(Email::new(raw).is_err());
   }

   #[test]
   fn test_個人情報はdebug出力でマスクされる() {
      let nombre = AlumnoNombre::new("Lucía").unwrap();
      let email = Email::new("lucia@example.com").unwrap();

      assert!(!format!("{nombre:?}").contains("Lucía"));
      assert!(!format!("{email:?}").contains("lucia@"));
   }

   #[test]
   fn test_氏名は100文字まで() {
      assert!(AlumnoNombre::new("a".repeat(100)).is_ok());
      let error = AlumnoNombre::new("a".repeat(101)).unwrap_err();

      assert_eq!(error.to_string(), "El nombre no puede superar 100 caracteres");
   }

   #[rstest]
   #[case("luc", true)]
   #[case("PÉREZ", true)]
   #[case("example.com", true)]
   #[case("", true)]
   #[case("gomez", false)]
   fn test_matches_氏名とemailを検索する(#[case] term: &str, #[case] expected: bool) {
      let alumno = Alumno::new(NewAlumno {
         id:         AlumnoId::new(),
         tenant_id:  TenantId::new(),
         nombre:     AlumnoNombre::new("Lucía Pérez").unwrap(),
         email:      Email::new("lucia@example.com").unwrap(),
         telefono:   None,
         created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
      });

      assert_eq!(alumno.matches(term), expected);
   }
}
