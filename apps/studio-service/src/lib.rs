//! # Pilates Studio Service
//!
//! スタジオ運営の内部 API（クラス枠・スタジオ設定・生徒・回数券）と、
//! 予約ポータル向けの公開一覧を提供する。
//!
//! 識別情報（テナント・役割）は上流のゲートウェイがヘッダーで渡す。
//! 詳細は [`middleware::identity`] を参照。

pub mod app_builder;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;

pub use app_builder::build_app;
pub use context::AppContext;
