//! # テスト用モック
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! pilates-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 並び順とテナントでの絞り込みは PostgreSQL 実装と揃えてある。

use std::sync::{
   Arc,
   Mutex,
   atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use pilates_domain::{
   alumno::Alumno,
   horario::{Horario, HorarioId},
   pack::Pack,
   studio::StudioConfig,
   tenant::TenantId,
};
use pilates_shared::CheckStatus;

use crate::{
   cache::{CacheInvalidator, CacheTag},
   db::ReadinessCheck,
   error::InfraError,
   repository::{AlumnoRepository, HorarioRepository, PackRepository, StudioConfigRepository},
};

/// `offset` と `limit` でスライスする
fn page_of<T: Clone>(items: &[T], limit: u32, offset: u64) -> Vec<T> {
   let offset = usize::try_from(offset).unwrap_or(usize::MAX);
   items
      .iter()
      .skip(offset)
      .take(limit as usize)
      .cloned()
      .collect()
}

// ===== MockHorarioRepository =====

#[derive(Clone, Default)]
pub struct MockHorarioRepository {
   horarios: Arc<Mutex<Vec<Horario>>>,
   failing:  Arc<AtomicBool>,
}

impl MockHorarioRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// すべての操作が失敗するリポジトリ
   pub fn failing() -> Self {
      let repo = Self::default();
      repo.failing.store(true, Ordering::SeqCst);
      repo
   }

   pub fn add(&self, horario: Horario) {
      self.horarios.lock().unwrap().push(horario);
   }

   pub fn all(&self) -> Vec<Horario> {
      self.horarios.lock().unwrap().clone()
   }

   fn check_failing(&self) -> Result<(), InfraError> {
      if self.failing.load(Ordering::SeqCst) {
         return Err(InfraError::unexpected("接続できません"));
      }
      Ok(())
   }

   fn sorted_for(&self, tenant_id: &TenantId) -> Vec<Horario> {
      let mut horarios: Vec<Horario> = self
         .horarios
         .lock()
         .unwrap()
         .iter()
         .filter(|h| h.tenant_id() == tenant_id)
         .cloned()
         .collect();
      horarios.sort_by(|a, b| {
         (a.dia(), a.hora_inicio(), a.id().as_uuid()).cmp(&(b.dia(), b.hora_inicio(), b.id().as_uuid()))
      });
      horarios
   }
}

#[async_trait]
impl HorarioRepository for MockHorarioRepository {
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Horario>, InfraError> {
      self.check_failing()?;
      Ok(page_of(&self.sorted_for(tenant_id), limit, offset))
   }

   async fn count(&self, tenant_id: &TenantId) -> Result<u64, InfraError> {
      self.check_failing()?;
      Ok(self.sorted_for(tenant_id).len() as u64)
   }

   async fn insert(&self, horario: &Horario) -> Result<(), InfraError> {
      self.check_failing()?;
      self.horarios.lock().unwrap().push(horario.clone());
      Ok(())
   }

   async fn delete(&self, tenant_id: &TenantId, id: &HorarioId) -> Result<bool, InfraError> {
      self.check_failing()?;
      let mut horarios = self.horarios.lock().unwrap();
      let before = horarios.len();
      horarios.retain(|h| !(h.tenant_id() == tenant_id && h.id() == id));
      Ok(horarios.len() < before)
   }
}

// ===== MockStudioConfigRepository =====

#[derive(Clone, Default)]
pub struct MockStudioConfigRepository {
   configs: Arc<Mutex<Vec<StudioConfig>>>,
}

impl MockStudioConfigRepository {
   pub fn new() -> Self {
      Self::default()
   }
}

#[async_trait]
impl StudioConfigRepository for MockStudioConfigRepository {
   async fn find(&self, tenant_id: &TenantId) -> Result<Option<StudioConfig>, InfraError> {
      Ok(self
         .configs
         .lock()
         .unwrap()
         .iter()
         .find(|c| c.tenant_id() == tenant_id)
         .cloned())
   }

   async fn upsert(&self, config: &StudioConfig) -> Result<(), InfraError> {
      let mut configs = self.configs.lock().unwrap();
      configs.retain(|c| c.tenant_id() != config.tenant_id());
      configs.push(config.clone());
      Ok(())
   }
}

// ===== MockAlumnoRepository =====

#[derive(Clone, Default)]
pub struct MockAlumnoRepository {
   alumnos: Arc<Mutex<Vec<Alumno>>>,
}

impl MockAlumnoRepository {
   pub fn new() -> Self {
      Self::default()
   }

   fn matching(&self, tenant_id: &TenantId, search: Option<&str>) -> Vec<Alumno> {
      let mut alumnos: Vec<Alumno> = self
         .alumnos
         .lock()
         .unwrap()
         .iter()
         .filter(|a| a.tenant_id() == tenant_id)
         .filter(|a| search.is_none_or(|term| a.matches(term)))
         .cloned()
         .collect();
      alumnos.sort_by(|a, b| {
         (a.nombre().as_str(), a.id().as_uuid()).cmp(&(b.nombre().as_str(), b.id().as_uuid()))
      });
      alumnos
   }
}

#[async_trait]
impl AlumnoRepository for MockAlumnoRepository {
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      search: Option<&str>,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Alumno>, InfraError> {
      Ok(page_of(&self.matching(tenant_id, search), limit, offset))
   }

   async fn count(&self, tenant_id: &TenantId, search: Option<&str>) -> Result<u64, InfraError> {
      Ok(self.matching(tenant_id, search).len() as u64)
   }

   async fn insert(&self, alumno: &Alumno) -> Result<(), InfraError> {
      let mut alumnos = self.alumnos.lock().unwrap();
      let duplicate = alumnos
         .iter()
         .any(|a| a.tenant_id() == alumno.tenant_id() && a.email() == alumno.email());
      if duplicate {
         return Err(InfraError::conflict("Alumno", "email"));
      }
      alumnos.push(alumno.clone());
      Ok(())
   }
}

// ===== MockPackRepository =====

#[derive(Clone, Default)]
pub struct MockPackRepository {
   packs: Arc<Mutex<Vec<Pack>>>,
}

impl MockPackRepository {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn add(&self, pack: Pack) {
      self.packs.lock().unwrap().push(pack);
   }
}

#[async_trait]
impl PackRepository for MockPackRepository {
   async fn find_page(
      &self,
      tenant_id: &TenantId,
      limit: u32,
      offset: u64,
   ) -> Result<Vec<Pack>, InfraError> {
      let mut packs: Vec<Pack> = self
         .packs
         .lock()
         .unwrap()
         .iter()
         .filter(|p| p.tenant_id() == tenant_id)
         .cloned()
         .collect();
      packs.sort_by(|a, b| {
         (!a.activo(), a.precio_centavos(), a.id().as_uuid())
            .cmp(&(!b.activo(), b.precio_centavos(), b.id().as_uuid()))
      });
      Ok(page_of(&packs, limit, offset))
   }

   async fn count(&self, tenant_id: &TenantId) -> Result<u64, InfraError> {
      Ok(self
         .packs
         .lock()
         .unwrap()
         .iter()
         .filter(|p| p.tenant_id() == tenant_id)
         .count() as u64)
   }

   async fn insert(&self, pack: &Pack) -> Result<(), InfraError> {
      self.packs.lock().unwrap().push(pack.clone());
      Ok(())
   }
}

// ===== RecordingCacheInvalidator =====

/// 無効化されたタグを記録する CacheInvalidator
#[derive(Clone, Default)]
pub struct RecordingCacheInvalidator {
   tags: Arc<Mutex<Vec<CacheTag>>>,
}

impl RecordingCacheInvalidator {
   pub fn new() -> Self {
      Self::default()
   }

   /// 記録されたタグ名（呼び出し順）
   pub fn tags(&self) -> Vec<String> {
      self
         .tags
         .lock()
         .unwrap()
         .iter()
         .map(|t| t.as_str().to_string())
         .collect()
   }
}

impl CacheInvalidator for RecordingCacheInvalidator {
   fn invalidate(&self, tag: &CacheTag) {
      self.tags.lock().unwrap().push(tag.clone());
   }
}

// ===== StaticReadinessCheck =====

/// 固定の結果を返す ReadinessCheck
pub struct StaticReadinessCheck {
   name:   &'static str,
   status: CheckStatus,
}

impl StaticReadinessCheck {
   pub fn new(name: &'static str, status: CheckStatus) -> Self {
      Self { name, status }
   }
}

#[async_trait]
impl ReadinessCheck for StaticReadinessCheck {
   fn name(&self) -> &'static str {
      self.name
   }

   async fn check(&self) -> CheckStatus {
      self.status
   }
}

#[cfg(test)]
mod tests {
   use chrono::DateTime;
   use pilates_domain::{
      alumno::{AlumnoId, AlumnoNombre, Email, NewAlumno},
      horario::{Capacidad, DiaSemana, NewHorario},
      time_of_day::TimeOfDay,
   };
   use pretty_assertions::assert_eq;

   use super::*;

   fn horario(tenant_id: &TenantId, dia: DiaSemana, inicio: &str, fin: &str) -> Horario {
      Horario::restore(NewHorario {
         id:          HorarioId::new(),
         tenant_id:   tenant_id.clone(),
         dia,
         hora_inicio: TimeOfDay::parse(inicio).unwrap(),
         hora_fin:    TimeOfDay::parse(fin).unwrap(),
         capacidad:   Capacidad::new(8).unwrap(),
         instructor:  None,
         created_at:  DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
      })
   }

   fn alumno(tenant_id: &TenantId, email: &str) -> Alumno {
      Alumno::new(NewAlumno {
         id:         AlumnoId::new(),
         tenant_id:  tenant_id.clone(),
         nombre:     AlumnoNombre::new("Ana").unwrap(),
         email:      Email::new(email).unwrap(),
         telefono:   None,
         created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
      })
   }

   #[tokio::test]
   async fn test_horarioは曜日と開始時刻の順に並ぶ() {
      let tenant_id = TenantId::new();
      let repo = MockHorarioRepository::new();
      repo.add(horario(&tenant_id, DiaSemana::Jueves, "08:00", "09:00"));
      repo.add(horario(&tenant_id, DiaSemana::Lunes, "18:00", "19:00"));
      repo.add(horario(&tenant_id, DiaSemana::Lunes, "09:00", "10:00"));
      repo.add(horario(&TenantId::new(), DiaSemana::Lunes, "07:00", "08:00"));

      let page = repo.find_page(&tenant_id, 2, 0).await.unwrap();

      assert_eq!(repo.count(&tenant_id).await.unwrap(), 3);
      assert_eq!(
         page
            .iter()
            .map(|h| (h.dia(), h.hora_inicio().as_str()))
            .collect::<Vec<_>>(),
         vec![(DiaSemana::Lunes, "09:00"), (DiaSemana::Lunes, "18:00")]
      );
   }

   #[tokio::test]
   async fn test_alumnoの重複emailはconflict() {
      let tenant_id = TenantId::new();
      let repo = MockAlumnoRepository::new();
      repo.insert(&alumno(&tenant_id, "ana@example.com")).await.unwrap();

      let result = repo.insert(&alumno(&tenant_id, "ANA@example.com")).await;

      assert!(result.unwrap_err().is_conflict());
      // 別テナントなら同じメールアドレスを登録できる
      assert!(repo.insert(&alumno(&TenantId::new(), "ana@example.com")).await.is_ok());
   }

   #[test]
   fn test_recording_cache_invalidatorは呼び出し順に記録する() {
      let invalidator = RecordingCacheInvalidator::new();
      invalidator.invalidate(&CacheTag::PACKS);
      invalidator.invalidate(&CacheTag::CONFIG);

      assert_eq!(invalidator.tags(), vec!["packs", "config"]);
   }
}
