//! # Pilates ドメイン層
//!
//! スタジオ運営（クラス枠・営業時間・生徒・回数券）のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! studio-service → infra → domain
//!        ↘           ↓
//!               shared
//! ```
//!
//! ドメイン層はインフラ層（DB、Redis）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`time_of_day`] - `HH:MM` 時刻の検証と比較
//! - [`validation`] - 入力のパース結果（フィールド単位のエラー）
//! - [`horario`] - クラス枠
//! - [`studio`] - スタジオ設定（営業時間）
//! - [`alumno`] - 生徒
//! - [`pack`] - 回数券
//! - [`role`] - スタジオ内の役割
//! - [`tenant`] - テナント識別子
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー

#[macro_use]
mod macros;

pub mod alumno;
pub mod clock;
pub mod error;
pub mod horario;
pub mod pack;
pub mod role;
pub mod studio;
pub mod tenant;
pub mod time_of_day;
pub mod validation;

pub use error::DomainError;
