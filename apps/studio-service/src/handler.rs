//! # HTTP リクエストハンドラ
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保ち、入力の変換以外はユースケースに委譲する
//! - リクエスト本文は [`ValidatedJson`] で受け取り、`Parse` でドメインの値に変換する
//! - クエリは [`LenientQuery`]、パスは [`ValidatedPath`] で受け取る

pub mod alumno;
pub mod health;
pub mod horario;
pub mod pack;
pub mod studio;
mod extract;
mod validated_json;

pub use alumno::{AlumnoState, create_alumno, list_alumnos};
pub use health::{ReadinessState, health_check, readiness_check};
pub use horario::{
   HorarioState,
   create_horario,
   delete_horario,
   list_horarios,
   list_public_horarios,
};
pub use pack::{PackState, create_pack, list_packs};
pub use studio::{StudioState, get_config, update_config};
pub use extract::{LenientQuery, ValidatedPath};
pub use validated_json::ValidatedJson;
