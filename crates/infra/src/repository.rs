//! # リポジトリ
//!
//! 永続化の境界となるトレイトと PostgreSQL 実装。
//! ユースケース層はトレイトオブジェクト（`Arc<dyn ...>`）経由で利用し、
//! テストでは [`mock`](crate::mock) のインメモリ実装に差し替える。
//!
//! すべての操作はテナントで絞り込む。

pub mod alumno_repository;
pub mod horario_repository;
pub mod pack_repository;
pub mod studio_config_repository;

pub use alumno_repository::{AlumnoRepository, PostgresAlumnoRepository};
pub use horario_repository::{HorarioRepository, PostgresHorarioRepository};
pub use pack_repository::{PackRepository, PostgresPackRepository};
pub use studio_config_repository::{PostgresStudioConfigRepository, StudioConfigRepository};
