//! vam-server/src/server.rs
//!
//! The local HTTP surface consumed by the UI. Every answer is a JSON
//! envelope with an `ok` flag; upstream failures keep their status and
//! body, an unknown session maps to 401, anything else to 500. The
//! session id travels in a `vam_sid` cookie.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use vam_common::Error;
use vam_common::models::auth::{LoginOutcome, TwoFactorMethod};
use vam_common::models::prefs::{
    AvatarBaseMap, AvatarFavMap, AvatarTagMap, BodyBase, FavFolder, PrefsSnapshot,
};
use vam_core::services::avatar_service;
use vam_core::sessions::Session;

use crate::Args;
use crate::context::ServerContext;

const SESSION_COOKIE: &str = "vam_sid";

pub async fn run_server(args: Args) -> Result<(), Error> {
    let ctx = ServerContext::new(&args).await?;
    let app = build_router(ctx, &args)?;

    let addr: SocketAddr = args.bind_addr.parse()?;
    info!("Local API listening on http://{}", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

fn build_router(ctx: ServerContext, args: &Args) -> Result<Router, Error> {
    let origin: HeaderValue = args
        .ui_origin
        .parse()
        .map_err(|_| Error::Parse(format!("Invalid UI origin: {}", args.ui_origin)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/auth/login", post(handle_login))
        .route("/auth/2fa", post(handle_two_factor))
        .route("/avatars", get(handle_avatars))
        .route("/avatars/search", get(handle_avatar_search))
        .route("/prefs", get(handle_prefs_export))
        .route("/prefs/import", post(handle_prefs_import))
        .route(
            "/prefs/body-bases",
            post(handle_add_body_base).put(handle_save_body_bases),
        )
        .route("/prefs/body-bases/{id}", delete(handle_remove_body_base))
        .route(
            "/prefs/fav-folders",
            post(handle_add_fav_folder).put(handle_save_fav_folders),
        )
        .route("/prefs/fav-folders/{id}", delete(handle_remove_fav_folder))
        .route("/prefs/avatar-base-map", put(handle_save_avatar_base_map))
        .route("/prefs/avatar-fav-map", put(handle_save_avatar_fav_map))
        .route("/prefs/avatar-tags", put(handle_save_avatar_tags))
        .route("/prefs/confirm-avatar-change", put(handle_set_confirm))
        .with_state(ctx)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        ))
}

// ---------- envelope plumbing ----------

fn ok_json(body: Value) -> Response {
    Json(body).into_response()
}

fn error_response(err: Error) -> Response {
    match err {
        Error::UpstreamStatus { status, body } => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                code,
                Json(json!({ "ok": false, "status": status, "body": body })),
            )
                .into_response()
        }
        Error::NoSession(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "ok": false, "error": "no_session" })),
        )
            .into_response(),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false, "error": other.to_string() })),
        )
            .into_response(),
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "ok": false, "error": message })),
    )
        .into_response()
}

fn session_id_from_headers(headers: &HeaderMap) -> Result<Uuid, Error> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    for pair in cookie_header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(SESSION_COOKIE) {
            let value = parts.next().unwrap_or("");
            return Uuid::parse_str(value)
                .map_err(|_| Error::NoSession(format!("bad session cookie: {value}")));
        }
    }
    Err(Error::NoSession("missing session cookie".into()))
}

fn session_for(ctx: &ServerContext, headers: &HeaderMap) -> Result<Arc<Session>, Error> {
    let sid = session_id_from_headers(headers)?;
    ctx.sessions.get(sid)
}

fn with_session_cookie(session_id: Uuid, body: Value) -> Response {
    let mut response = Json(body).into_response();
    let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

// ---------- auth ----------

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn handle_login(
    State(ctx): State<ServerContext>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let session = match ctx.sessions.create_session() {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match session.client.login(&req.username, &req.password).await {
        Ok(LoginOutcome::TwoFactorRequired { methods }) => with_session_cookie(
            session.session_id,
            json!({ "ok": true, "state": "2fa_required", "methods": methods }),
        ),
        Ok(LoginOutcome::LoggedIn { user }) => with_session_cookie(
            session.session_id,
            json!({ "ok": true, "state": "logged_in", "displayName": user.display_name }),
        ),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct TwoFactorRequest {
    method: TwoFactorMethod,
    code: String,
}

async fn handle_two_factor(
    State(ctx): State<ServerContext>,
    headers: HeaderMap,
    Json(req): Json<TwoFactorRequest>,
) -> Response {
    let session = match session_for(&ctx, &headers) {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match session.client.verify_two_factor(req.method, &req.code).await {
        Ok(user) => ok_json(
            json!({ "ok": true, "state": "logged_in", "displayName": user.display_name }),
        ),
        Err(e) => error_response(e),
    }
}

// ---------- avatars ----------

fn default_page_size() -> usize {
    50
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default = "default_page_size")]
    n: usize,
    #[serde(default)]
    offset: usize,
}

async fn handle_avatars(
    State(ctx): State<ServerContext>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let session = match session_for(&ctx, &headers) {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    match avatar_service::page(&session.client, query.n, query.offset).await {
        Ok(page) => {
            let mut body = json!({
                "ok": true,
                "avatars": page.avatars,
                "hasMore": page.has_more
            });
            if let Some(total) = page.total {
                body["total"] = json!(total);
            }
            ok_json(body)
        }
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
    #[serde(default = "default_page_size")]
    n: usize,
    #[serde(default)]
    offset: usize,
}

async fn handle_avatar_search(
    State(ctx): State<ServerContext>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let session = match session_for(&ctx, &headers) {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    if query.q.trim().is_empty() {
        return bad_request("empty query");
    }

    match avatar_service::search(&session.client, &query.q, query.n, query.offset).await {
        Ok(found) => ok_json(json!({
            "ok": true,
            "avatars": found.avatars,
            "totalMatches": found.total_matches,
            "hasMore": found.has_more
        })),
        Err(e) => error_response(e),
    }
}

// ---------- preferences ----------

async fn handle_prefs_export(State(ctx): State<ServerContext>) -> Response {
    match ctx.prefs.export_snapshot().await {
        Ok(snapshot) => ok_json(json!({ "ok": true, "prefs": snapshot })),
        Err(e) => error_response(e),
    }
}

async fn handle_prefs_import(
    State(ctx): State<ServerContext>,
    Json(snapshot): Json<PrefsSnapshot>,
) -> Response {
    match ctx.prefs.import_snapshot(&snapshot).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct NameRequest {
    name: String,
}

async fn handle_add_body_base(
    State(ctx): State<ServerContext>,
    Json(req): Json<NameRequest>,
) -> Response {
    let name = req.name.trim();
    if name.is_empty() {
        return bad_request("empty name");
    }
    match ctx.prefs.add_body_base(name).await {
        Ok(base) => ok_json(json!({ "ok": true, "base": base })),
        Err(e) => error_response(e),
    }
}

async fn handle_save_body_bases(
    State(ctx): State<ServerContext>,
    Json(list): Json<Vec<BodyBase>>,
) -> Response {
    match ctx.prefs.save_body_bases(&list).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

async fn handle_remove_body_base(
    State(ctx): State<ServerContext>,
    Path(id): Path<Uuid>,
) -> Response {
    match ctx.prefs.remove_body_base(id).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

async fn handle_add_fav_folder(
    State(ctx): State<ServerContext>,
    Json(req): Json<NameRequest>,
) -> Response {
    let name = req.name.trim();
    if name.is_empty() {
        return bad_request("empty name");
    }
    match ctx.prefs.add_fav_folder(name).await {
        Ok(folder) => ok_json(json!({ "ok": true, "folder": folder })),
        Err(e) => error_response(e),
    }
}

async fn handle_save_fav_folders(
    State(ctx): State<ServerContext>,
    Json(list): Json<Vec<FavFolder>>,
) -> Response {
    match ctx.prefs.save_fav_folders(&list).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

async fn handle_remove_fav_folder(
    State(ctx): State<ServerContext>,
    Path(id): Path<Uuid>,
) -> Response {
    match ctx.prefs.remove_fav_folder(id).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

async fn handle_save_avatar_base_map(
    State(ctx): State<ServerContext>,
    Json(map): Json<AvatarBaseMap>,
) -> Response {
    match ctx.prefs.save_avatar_base_map(&map).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

async fn handle_save_avatar_fav_map(
    State(ctx): State<ServerContext>,
    Json(map): Json<AvatarFavMap>,
) -> Response {
    match ctx.prefs.save_avatar_fav_map(&map).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

async fn handle_save_avatar_tags(
    State(ctx): State<ServerContext>,
    Json(map): Json<AvatarTagMap>,
) -> Response {
    match ctx.prefs.save_avatar_tags(&map).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct ConfirmRequest {
    enabled: bool,
}

async fn handle_set_confirm(
    State(ctx): State<ServerContext>,
    Json(req): Json<ConfirmRequest>,
) -> Response {
    match ctx.prefs.set_confirm_avatar_change(req.enabled).await {
        Ok(()) => ok_json(json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}
