//! # ミドルウェア
//!
//! - [`identity`]: 上流ゲートウェイが付与する識別ヘッダーの抽出と役割チェック
//! - [`rate_limit`]: 公開エンドポイントのレート制限
//! - [`cache_control`]: `Cache-Control: no-store` の付与
//! - [`panic`]: ハンドラ内の panic を 500 に変換

pub mod cache_control;
pub mod identity;
pub mod panic;
pub mod rate_limit;

pub use cache_control::no_cache;
pub use identity::{Identity, RoleGuard, TenantContext, require_role};
pub use panic::handle_panic;
pub use rate_limit::{RateLimiter, rate_limit};
