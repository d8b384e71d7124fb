//! # 回数券（Pack）
//!
//! 一定回数のクラスを有効期間内に受講できるプラン。価格は最小通貨単位（centavos）で持つ。

use chrono::{DateTime, Utc};

use crate::{DomainError, tenant::TenantId};

define_uuid_id! {
   /// 回数券の一意識別子
   pub struct PackId;
}

define_validated_string! {
   /// 回数券の名称
   pub struct PackNombre {
      label: "El nombre del pack",
      max_length: 100,
   }
}

/// 回数券の生成パラメータ
#[derive(Debug, Clone)]
pub struct NewPack {
   pub id:              PackId,
   pub tenant_id:       TenantId,
   pub nombre:          PackNombre,
   pub clases:          i32,
   pub precio_centavos: i64,
   pub vigencia_dias:   i32,
   pub activo:          bool,
   pub created_at:      DateTime<Utc>,
}

/// 回数券エンティティ
///
/// # 不変条件
///
/// - `clases` は 1〜200
/// - `precio_centavos` は 0 以上
/// - `vigencia_dias` は 1〜365
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pack {
   id:              PackId,
   tenant_id:       TenantId,
   nombre:          PackNombre,
   clases:          i32,
   precio_centavos: i64,
   vigencia_dias:   i32,
   activo:          bool,
   created_at:      DateTime<Utc>,
}

impl Pack {
   pub const MAX_CLASES: i32 = 200;
   pub const MAX_VIGENCIA_DIAS: i32 = 365;

   /// 新しい回数券を作成する
   pub fn new(params: NewPack) -> Result<Self, DomainError> {
      if !(1..=Self::MAX_CLASES).contains(&params.clases) {
         return Err(DomainError::Validation(format!(
            "La cantidad de clases debe estar entre 1 y {}",
            Self::MAX_CLASES
         )));
      }
      if params.precio_centavos < 0 {
         return Err(DomainError::Validation(
            "El precio no puede ser negativo".to_string(),
         ));
      }
      if !(1..=Self::MAX_VIGENCIA_DIAS).contains(&params.vigencia_dias) {
         return Err(DomainError::Validation(format!(
            "La vigencia debe estar entre 1 y {} días",
            Self::MAX_VIGENCIA_DIAS
         )));
      }

      Ok(Self::restore(params))
   }

   /// 永続化済みの値から復元する（検証しない）
   pub fn restore(params: NewPack) -> Self {
      Self {
         id:              params.id,
         tenant_id:       params.tenant_id,
         nombre:          params.nombre,
         clases:          params.clases,
         precio_centavos: params.precio_centavos,
         vigencia_dias:   params.vigencia_dias,
         activo:          params.activo,
         created_at:      params.created_at,
      }
   }

   pub fn id(&self) -> &PackId {
      &self.id
   }

   pub fn tenant_id(&self) -> &TenantId {
      &self.tenant_id
   }

   pub fn nombre(&self) -> &PackNombre {
      &self.nombre
   }

   pub fn clases(&self) -> i32 {
      self.clases
   }

   pub fn precio_centavos(&self) -> i64 {
      self.precio_centavos
   }

   pub fn vigencia_dias(&self) -> i32 {
      self.vigencia_dias
   }

   pub fn activo(&self) -> bool {
      self.activo
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }
}
