//! # テナント
//!
//! 1 つのスタジオ（または同一事業者の店舗群）を 1 テナントとして扱う。
//! すべてのエンティティは `TenantId` を持ち、クエリは必ずテナントで絞り込む。
//!
//! ```rust
//! use pilates_domain::tenant::TenantId;
//! use uuid::Uuid;
//!
//! let uuid = Uuid::parse_str("01234567-89ab-cdef-0123-456789abcdef").unwrap();
//! let tenant_id = TenantId::from_uuid(uuid);
//! assert_eq!(tenant_id.as_uuid(), &uuid);
//! ```

define_uuid_id! {
   /// テナントの一意識別子
   ///
   /// 上流のゲートウェイが `X-Tenant-Id` ヘッダーで渡す。
   pub struct TenantId;
}

impl std::str::FromStr for TenantId {
   type Err = uuid::Error;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      uuid::Uuid::parse_str(s).map(Self::from_uuid)
   }
}
