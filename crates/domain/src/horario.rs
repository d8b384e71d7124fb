//! # クラス枠（Horario）
//!
//! 曜日ごとに繰り返されるレッスンの枠。予約の単位になる。
//!
//! ## 不変条件
//!
//! - `hora_inicio < hora_fin`
//! - 開始・終了ともスタジオの営業時間内（両端を含む）
//! - `capacidad` は 1〜100
//!
//! 営業時間はテナントごとに異なるため、生成時に [`StudioHours`] を受け取って検証する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
   DomainError,
   studio::StudioHours,
   tenant::TenantId,
   time_of_day::{TimeOfDay, validate_time_range},
};

define_uuid_id! {
   /// クラス枠の一意識別子
   pub struct HorarioId;
}

define_validated_string! {
   /// 担当インストラクター名
   pub struct InstructorName {
      label: "El nombre del instructor",
      max_length: 100,
   }
}

/// 曜日
///
/// DB には ISO 8601 の曜日番号（月曜 = 1 〜 日曜 = 7）で保存する。
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   PartialOrd,
   Ord,
   Hash,
   Serialize,
   Deserialize,
   Display,
   EnumString,
   EnumIter,
   IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiaSemana {
   Lunes,
   Martes,
   Miercoles,
   Jueves,
   Viernes,
   Sabado,
   Domingo,
}

impl DiaSemana {
   /// ISO 8601 の曜日番号
   pub fn number(self) -> i16 {
      match self {
         Self::Lunes => 1,
         Self::Martes => 2,
         Self::Miercoles => 3,
         Self::Jueves => 4,
         Self::Viernes => 5,
         Self::Sabado => 6,
         Self::Domingo => 7,
      }
   }

   pub fn from_number(number: i16) -> Result<Self, DomainError> {
      match number {
         1 => Ok(Self::Lunes),
         2 => Ok(Self::Martes),
         3 => Ok(Self::Miercoles),
         4 => Ok(Self::Jueves),
         5 => Ok(Self::Viernes),
         6 => Ok(Self::Sabado),
         7 => Ok(Self::Domingo),
         other => Err(DomainError::Validation(format!(
            "Día de la semana inválido: {other}"
         ))),
      }
   }
}

/// 定員（1〜100）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Capacidad(i32);

impl Capacidad {
   pub const MIN: i32 = 1;
   pub const MAX: i32 = 100;

   pub fn new(value: i32) -> Result<Self, DomainError> {
      if !(Self::MIN..=Self::MAX).contains(&value) {
         return Err(DomainError::Validation(format!(
            "La capacidad debe estar entre {} y {}",
            Self::MIN,
            Self::MAX
         )));
      }
      Ok(Self(value))
   }

   pub fn as_i32(self) -> i32 {
      self.0
   }
}

impl TryFrom<i32> for Capacidad {
   type Error = DomainError;

   fn try_from(value: i32) -> Result<Self, Self::Error> {
      Self::new(value)
   }
}

impl From<Capacidad> for i32 {
   fn from(value: Capacidad) -> Self {
      value.0
   }
}

/// クラス枠の生成パラメータ
#[derive(Debug, Clone)]
pub struct NewHorario {
   pub id:          HorarioId,
   pub tenant_id:   TenantId,
   pub dia:         DiaSemana,
   pub hora_inicio: TimeOfDay,
   pub hora_fin:    TimeOfDay,
   pub capacidad:   Capacidad,
   pub instructor:  Option<InstructorName>,
   pub created_at:  DateTime<Utc>,
}

/// クラス枠エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Horario {
   id:          HorarioId,
   tenant_id:   TenantId,
   dia:         DiaSemana,
   hora_inicio: TimeOfDay,
   hora_fin:    TimeOfDay,
   capacidad:   Capacidad,
   instructor:  Option<InstructorName>,
   created_at:  DateTime<Utc>,
}

impl Horario {
   /// 新しいクラス枠を作成する
   ///
   /// 開始と終了の順序を先に検証し、その後で営業時間との関係を検証する。
   pub fn new(params: NewHorario, hours: &StudioHours) -> Result<Self, DomainError> {
      validate_time_range(params.hora_inicio.as_str(), params.hora_fin.as_str())?;
      hours.check_within(&params.hora_inicio, "La hora de inicio")?;
      hours.check_within(&params.hora_fin, "La hora de fin")?;

      Ok(Self::restore(params))
   }

   /// 永続化済みの値から復元する（検証しない）
   pub fn restore(params: NewHorario) -> Self {
      Self {
         id:          params.id,
         tenant_id:   params.tenant_id,
         dia:         params.dia,
         hora_inicio: params.hora_inicio,
         hora_fin:    params.hora_fin,
         capacidad:   params.capacidad,
         instructor:  params.instructor,
         created_at:  params.created_at,
      }
   }

   pub fn id(&self) -> &HorarioId {
      &self.id
   }

   pub fn tenant_id(&self) -> &TenantId {
      &self.tenant_id
   }

   pub fn dia(&self) -> DiaSemana {
      self.dia
   }

   pub fn hora_inicio(&self) -> &TimeOfDay {
      &self.hora_inicio
   }

   pub fn hora_fin(&self) -> &TimeOfDay {
      &self.hora_fin
   }

   pub fn capacidad(&self) -> Capacidad {
      self.capacidad
   }

   pub fn instructor(&self) -> Option<&InstructorName> {
      self.instructor.as_ref()
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   /// レッスンの長さ（分）
   pub fn duracion_minutos(&self) -> u16 {
      self
         .hora_fin
         .minutes_since_midnight()
         .saturating_sub(self.hora_inicio.minutes_since_midnight())
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};
   use strum::IntoEnumIterator;

   use super::*;

   #[fixture]
   fn now() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   fn params(inicio: &str, fin: &str, now: DateTime<Utc>) -> NewHorario {
      NewHorario {
         id:          HorarioId::new(),
         tenant_id:   TenantId::new(),
         dia:         DiaSemana::Martes,
         hora_inicio: TimeOfDay::parse(inicio).unwrap(),
         hora_fin:    TimeOfDay::parse(fin).unwrap(),
         capacidad:   Capacidad::new(10).unwrap(),
         instructor:  None,
         created_at:  now,
      }
   }

   #[rstest]
   fn test_営業時間内のクラス枠を作成できる(now: DateTime<Utc>) {
      let horario = Horario::new(params("08:00", "09:00", now), &StudioHours::default()).unwrap();

      assert_eq!(horario.dia(), DiaSemana::Martes);
      assert_eq!(horario.duracion_minutos(), 60);
      assert_eq!(horario.created_at(), now);
   }

   #[rstest]
   fn test_営業時間の両端ちょうどの枠を作成できる(now: DateTime<Utc>) {
      assert!(Horario::new(params("07:00", "22:00", now), &StudioHours::default()).is_ok());
   }

   #[rstest]
   fn test_開始が終了以降なら順序エラー(now: DateTime<Utc>) {
      let error = Horario::new(params("10:00", "09:00", now), &StudioHours::default()).unwrap_err();

      assert!(matches!(error, DomainError::Validation(msg) if msg.contains("inicio debe ser anterior")));
   }

   #[rstest]
   #[case("06:30", "08:00", "La hora de inicio debe estar entre 07:00 y 22:00")]
   #[case("21:00", "22:30", "La hora de fin debe estar entre 07:00 y 22:00")]
   fn test_営業時間外ならラベル付きのエラー(
      now: DateTime<Utc>,
      #[case] inicio: &str,
      #[case] fin: &str,
      #[case] expected: &str,
   ) {
      let error = Horario::new(params(inicio, fin, now), &StudioHours::default()).unwrap_err();

      assert_eq!(error.to_string(), expected);
   }

   #[rstest]
   #[case(0)]
   #[case(101)]
   #[case(-5)]
   fn test_定員の範囲外を拒否する(#[case] value: i32) {
      assert!(Capacidad::new(value).is_err());
   }

   #[test]
   fn test_曜日番号は往復できる() {
      for dia in DiaSemana::iter() {
         assert_eq!(DiaSemana::from_number(dia.number()).unwrap(), dia);
      }
      assert!(DiaSemana::from_number(0).is_err());
      assert!(DiaSemana::from_number(8).is_err());
   }

   #[test]
   fn test_曜日は小文字でシリアライズする() {
      assert_eq!(
         serde_json::to_value(DiaSemana::Miercoles).unwrap(),
         serde_json::json!("miercoles")
      );
   }
}
