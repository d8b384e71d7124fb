//! # アプリケーション構築
//!
//! [`AppContext`] からユースケース・State を組み立て、ルーターを定義する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
   Router,
   middleware::{from_fn, from_fn_with_state},
   routing::{delete, get, post, put},
};
use pilates_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
   catch_panic::CatchPanicLayer,
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};

use crate::{
   context::AppContext,
   handler::{
      AlumnoState,
      HorarioState,
      PackState,
      ReadinessState,
      StudioState,
      create_alumno,
      create_horario,
      create_pack,
      delete_horario,
      get_config,
      health_check,
      list_alumnos,
      list_horarios,
      list_packs,
      list_public_horarios,
      readiness_check,
      update_config,
   },
   middleware::{RoleGuard, handle_panic, no_cache, rate_limit, require_role},
   usecase::{AlumnoUseCaseImpl, HorarioUseCaseImpl, PackUseCaseImpl, StudioUseCaseImpl},
};

/// ルーターを構築する
///
/// 役割チェックは書き込み系のルートグループにだけ掛ける。読み取り系は
/// ハンドラの `Identity` 抽出で識別情報の有無（401）のみ確認する。
pub fn build_app(ctx: AppContext) -> Router {
   let readiness_state = Arc::new(ReadinessState {
      checks: ctx.readiness_checks.clone(),
   });
   let horario_state = Arc::new(HorarioState {
      usecase: HorarioUseCaseImpl::new(
         ctx.horarios.clone(),
         ctx.studio_configs.clone(),
         ctx.cache.clone(),
         ctx.clock.clone(),
      ),
   });
   let studio_state = Arc::new(StudioState {
      usecase: StudioUseCaseImpl::new(
         ctx.studio_configs.clone(),
         ctx.cache.clone(),
         ctx.clock.clone(),
      ),
   });
   let alumno_state = Arc::new(AlumnoState {
      usecase: AlumnoUseCaseImpl::new(ctx.alumnos.clone(), ctx.cache.clone(), ctx.clock.clone()),
   });
   let pack_state = Arc::new(PackState {
      usecase: PackUseCaseImpl::new(ctx.packs.clone(), ctx.cache.clone(), ctx.clock.clone()),
   });

   Router::new()
      .route("/health", get(health_check))
      .merge(
         Router::new()
            .route("/health/ready", get(readiness_check))
            .with_state(readiness_state),
      )
      // クラス枠 API
      .merge(
         Router::new()
            .route("/api/v1/horarios", get(list_horarios))
            .with_state(horario_state.clone()),
      )
      .merge(
         Router::new()
            .route("/api/v1/horarios", post(create_horario))
            .layer(from_fn_with_state(RoleGuard::STAFF, require_role))
            .with_state(horario_state.clone()),
      )
      .merge(
         Router::new()
            .route("/api/v1/horarios/{horario_id}", delete(delete_horario))
            .layer(from_fn_with_state(RoleGuard::ADMIN, require_role))
            .with_state(horario_state.clone()),
      )
      // 予約ポータル（テナントのみ、レート制限）
      .merge(
         Router::new()
            .route("/api/v1/public/horarios", get(list_public_horarios))
            .route_layer(from_fn_with_state(ctx.rate_limiter.clone(), rate_limit))
            .with_state(horario_state),
      )
      // スタジオ設定 API
      .merge(
         Router::new()
            .route("/api/v1/config", get(get_config))
            .with_state(studio_state.clone()),
      )
      .merge(
         Router::new()
            .route("/api/v1/config", put(update_config))
            .layer(from_fn_with_state(RoleGuard::ADMIN, require_role))
            .with_state(studio_state),
      )
      // 生徒 API
      .merge(
         Router::new()
            .route("/api/v1/alumnos", get(list_alumnos))
            .layer(from_fn_with_state(RoleGuard::STAFF, require_role))
            .with_state(alumno_state.clone()),
      )
      .merge(
         Router::new()
            .route("/api/v1/alumnos", post(create_alumno))
            .layer(from_fn_with_state(RoleGuard::ADMIN, require_role))
            .with_state(alumno_state),
      )
      // 回数券 API
      .merge(
         Router::new()
            .route("/api/v1/packs", get(list_packs))
            .with_state(pack_state.clone()),
      )
      .merge(
         Router::new()
            .route("/api/v1/packs", post(create_pack))
            .layer(from_fn_with_state(RoleGuard::ADMIN, require_role))
            .with_state(pack_state),
      )
      // レイヤー順序: 下に書いたものが外側
      // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
      // 2. TraceLayer: スパンに request_id を含める
      // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
      // 4. no_cache: Cache-Control: no-store
      // 5. CatchPanicLayer（最内）: panic を 500 に変換し、外側のレイヤーを通す
      .layer(CatchPanicLayer::custom(handle_panic))
      .layer(from_fn(no_cache))
      .layer(PropagateRequestIdLayer::x_request_id())
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
