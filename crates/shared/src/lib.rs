//! # Pilates 共有ユーティリティ
//!
//! スタジオ管理サービス全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - infra と studio-service から依存される（domain は依存しない）
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（HTTP レスポンスへの変換は各サービスの責務）

pub mod api_response;
pub mod error_response;
pub mod health;
pub mod observability;
pub mod paginated_response;

pub use api_response::ApiResponse;
pub use error_response::{ErrorBody, ErrorResponse};
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
pub use paginated_response::{PaginatedResponse, PaginationMeta, PaginationParams, PaginationQuery};
