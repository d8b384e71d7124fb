//! # スタジオ設定
//!
//! テナントごとの表示名と営業時間。クラス枠はこの営業時間内に収める必要がある。
//! 設定が未登録のテナントには [`StudioConfig::default_for`] の既定値を使う。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
   tenant::TenantId,
   time_of_day::{TimeOfDay, TimeRangeError, validate_time_in_range, validate_time_range},
};

define_validated_string! {
   /// スタジオの表示名
   pub struct StudioName {
      label: "El nombre del estudio",
      max_length: 100,
   }
}

/// 営業時間（値オブジェクト）
///
/// # 不変条件
///
/// - `apertura < cierre`（日をまたぐ営業は扱わない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioHours {
   apertura: TimeOfDay,
   cierre:   TimeOfDay,
}

impl StudioHours {
   pub fn new(apertura: TimeOfDay, cierre: TimeOfDay) -> Result<Self, TimeRangeError> {
      validate_time_range(apertura.as_str(), cierre.as_str())?;
      Ok(Self { apertura, cierre })
   }

   pub fn apertura(&self) -> &TimeOfDay {
      &self.apertura
   }

   pub fn cierre(&self) -> &TimeOfDay {
      &self.cierre
   }

   /// 時刻が営業時間内（両端を含む）かを検証する
   pub fn check_within(&self, time: &TimeOfDay, label: &str) -> Result<(), TimeRangeError> {
      validate_time_in_range(
         time.as_str(),
         self.apertura.as_str(),
         self.cierre.as_str(),
         label,
      )
   }
}

impl Default for StudioHours {
   /// 07:00〜22:00
   fn default() -> Self {
      Self {
         apertura: TimeOfDay::from_static("07:00"),
         cierre:   TimeOfDay::from_static("22:00"),
      }
   }
}

/// スタジオ設定エンティティ（テナントにつき 1 件）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
   tenant_id:  TenantId,
   nombre:     StudioName,
   hours:      StudioHours,
   updated_at: DateTime<Utc>,
}

impl StudioConfig {
   pub fn new(
      tenant_id: TenantId,
      nombre: StudioName,
      hours: StudioHours,
      updated_at: DateTime<Utc>,
   ) -> Self {
      Self {
         tenant_id,
         nombre,
         hours,
         updated_at,
      }
   }

   /// 未登録テナント向けの既定設定
   pub fn default_for(tenant_id: TenantId, now: DateTime<Utc>) -> Self {
      Self {
         tenant_id,
         nombre: StudioName("Mi estudio".to_string()),
         hours: StudioHours::default(),
         updated_at: now,
      }
   }

   pub fn tenant_id(&self) -> &TenantId {
      &self.tenant_id
   }

   pub fn nombre(&self) -> &StudioName {
      &self.nombre
   }

   pub fn hours(&self) -> &StudioHours {
      &self.hours
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }
}
