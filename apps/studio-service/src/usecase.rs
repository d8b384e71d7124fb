//! # ユースケース
//!
//! ハンドラから呼ばれるアプリケーションロジック。
//!
//! 書き込み系の操作は「検証 → 永続化 → テナント単位のキャッシュタグ無効化」の順で行う。
//! 無効化は永続化が成功した後にだけ送る。

pub mod alumno;
pub mod horario;
pub mod pack;
pub mod studio;

pub use alumno::{AlumnoUseCaseImpl, CreateAlumnoInput};
pub use horario::{CreateHorarioInput, HorarioUseCaseImpl};
pub use pack::{CreatePackInput, PackUseCaseImpl};
pub use studio::{StudioUseCaseImpl, UpdateStudioConfigInput};
