//! JSON / form API under `/api`.

use log::error;
use rocket::form::Form;
use rocket::http::{CookieJar, Status};
use rocket::response::Redirect;
use rocket::serde::json::{json, Json, Value};
use rocket::State;
use rocket_db_pools::diesel::prelude::*;
use rocket_db_pools::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::auth::{self, AdminSession, Claims};
use crate::config::AppConfig;
use crate::errors::Error;
use crate::geo::ClientGeo;
use crate::locale;
use crate::models::{NewVisitor, Rsvp};
use crate::rsvp::{self, RsvpForm, SubmitOutcome};
use crate::Db;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    password: Option<String>,
}

#[derive(Debug, FromForm)]
pub struct LoginForm {
    password: Option<String>,
}

type LoginResult = Result<Redirect, (Status, Json<Value>)>;

#[post("/login?<from>", format = "json", data = "<body>", rank = 1)]
pub fn login_json(
    config: &State<AppConfig>,
    cookies: &CookieJar<'_>,
    from: Option<String>,
    body: Option<Json<LoginRequest>>,
) -> LoginResult {
    let password = body.and_then(|body| body.into_inner().password);
    complete_login(config, cookies, from, password)
}

#[post("/login?<from>", format = "form", data = "<body>", rank = 2)]
pub fn login_form(
    config: &State<AppConfig>,
    cookies: &CookieJar<'_>,
    from: Option<String>,
    body: Form<LoginForm>,
) -> LoginResult {
    complete_login(config, cookies, from, body.into_inner().password)
}

/// Any other content type carries no password and lands on the error
/// redirect, matching the two accepted body kinds above.
#[post("/login?<from>", rank = 3)]
pub fn login_other(
    config: &State<AppConfig>,
    cookies: &CookieJar<'_>,
    from: Option<String>,
) -> LoginResult {
    complete_login(config, cookies, from, None)
}

fn complete_login(
    config: &AppConfig,
    cookies: &CookieJar<'_>,
    from: Option<String>,
    password: Option<String>,
) -> LoginResult {
    let Some(expected) = config.admin_password.as_deref() else {
        return Err(misconfigured());
    };
    if password.as_deref() != Some(expected) {
        return Ok(Redirect::to(uri!(crate::pages::login_page(
            from = _,
            err = Some(1)
        ))));
    }
    let token = match auth::issue_token(config, "admin", "admin") {
        Ok(token) => token,
        Err(err) => {
            error!("login accepted but no session could be issued: {err}");
            return Err(misconfigured());
        }
    };
    auth::set_session_cookie(config, cookies, token);
    let target = from
        .filter(|path| path.starts_with('/'))
        .unwrap_or_else(|| "/admin".to_string());
    Ok(Redirect::to(target))
}

fn misconfigured() -> (Status, Json<Value>) {
    (
        Status::InternalServerError,
        Json(json!({ "error": "Server misconfigured" })),
    )
}

#[get("/logout")]
pub fn logout(config: &State<AppConfig>, cookies: &CookieJar<'_>) -> Redirect {
    auth::clear_session_cookie(config, cookies);
    Redirect::to(uri!(crate::pages::wedding(from = _)))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub session: Option<Claims>,
}

#[get("/session")]
pub fn session(config: &State<AppConfig>, cookies: &CookieJar<'_>) -> Json<SessionResponse> {
    let claims = auth::session_from_jar(config, cookies);
    Json(SessionResponse {
        authenticated: claims.is_some(),
        session: claims,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoResponse {
    pub city: String,
    pub country: String,
    pub country_region: String,
    pub region: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub suggested_language: String,
}

#[get("/geo")]
pub fn geo(client: ClientGeo) -> Json<GeoResponse> {
    let suggested = locale::resolve_locale(
        client.info.country.as_deref(),
        client.accept_language.as_deref(),
    );
    let unknown = || "Unknown".to_string();
    Json(GeoResponse {
        city: client.info.city.unwrap_or_else(unknown),
        country: client.info.country.unwrap_or_else(unknown),
        country_region: client.info.country_region.unwrap_or_else(unknown),
        region: client.info.region.unwrap_or_else(unknown),
        latitude: client.info.latitude,
        longitude: client.info.longitude,
        suggested_language: suggested.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitorPayload {
    city: Option<String>,
    country: Option<String>,
    country_region: Option<String>,
    region: Option<String>,
    latitude: Option<Value>,
    longitude: Option<Value>,
    language: Option<String>,
    page: Option<String>,
}

/// Coordinates may arrive as JSON numbers or strings; both are stored as
/// text. Anything else is dropped.
fn coordinate_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[post("/visitor", format = "json", data = "<payload>")]
pub async fn visitor(
    mut db: Connection<Db>,
    client: ClientGeo,
    payload: Json<VisitorPayload>,
) -> (Status, Json<Value>) {
    let payload = payload.into_inner();
    let record = NewVisitor {
        id: Uuid::new_v4().to_string(),
        city: payload.city.filter(|text| !text.is_empty()),
        country: payload.country.filter(|text| !text.is_empty()),
        country_region: payload.country_region.filter(|text| !text.is_empty()),
        region: payload.region.filter(|text| !text.is_empty()),
        latitude: payload.latitude.as_ref().and_then(coordinate_string),
        longitude: payload.longitude.as_ref().and_then(coordinate_string),
        language: payload.language.filter(|text| !text.is_empty()),
        page: payload.page.filter(|text| !text.is_empty()),
        user_agent: client.user_agent,
        created_at: chrono::Utc::now().naive_utc(),
    };

    let inserted = {
        use crate::schema::visitors::dsl::*;
        diesel::insert_into(visitors)
            .values(&record)
            .execute(&mut db)
            .await
    };
    match inserted {
        Ok(_) => (Status::Ok, Json(json!({ "success": true, "id": record.id }))),
        Err(err) => {
            error!("failed to save visitor row: {err}");
            (
                Status::InternalServerError,
                Json(json!({ "success": false, "error": "Failed to save visitor data" })),
            )
        }
    }
}

#[post("/rsvp", data = "<form>")]
pub async fn submit_rsvp(
    db: Connection<Db>,
    config: &State<AppConfig>,
    cookies: &CookieJar<'_>,
    form: Form<RsvpForm>,
) -> Json<SubmitOutcome> {
    Json(rsvp::submit(db, config.inner(), cookies, form.into_inner()).await)
}

#[derive(Debug, Deserialize)]
pub struct CheckEmailRequest {
    email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckEmailResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CheckEmailResponse {
    fn missing() -> Self {
        CheckEmailResponse {
            exists: false,
            name: None,
            status: None,
        }
    }
}

/// Advisory duplicate lookup: tells the form whether this email answered
/// before so it can offer to update, without ever blocking a re-submit.
#[post("/rsvp/check-email", format = "json", data = "<payload>")]
pub async fn check_email(
    mut db: Connection<Db>,
    payload: Option<Json<CheckEmailRequest>>,
) -> (Status, Json<CheckEmailResponse>) {
    let lookup = payload
        .and_then(|payload| payload.into_inner().email)
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());
    let Some(lookup) = lookup else {
        return (Status::Ok, Json(CheckEmailResponse::missing()));
    };

    let newest = {
        use crate::schema::rsvps::dsl;
        dsl::rsvps
            .filter(dsl::email.eq(&lookup))
            .order(dsl::created_at.desc())
            .select(Rsvp::as_select())
            .first::<Rsvp>(&mut db)
            .await
            .optional()
    };
    match newest {
        Ok(Some(previous)) => (
            Status::Ok,
            Json(CheckEmailResponse {
                exists: true,
                name: Some(previous.name),
                status: Some(previous.status),
            }),
        ),
        Ok(None) => (Status::Ok, Json(CheckEmailResponse::missing())),
        Err(err) => {
            error!("email lookup failed: {err}");
            (Status::InternalServerError, Json(CheckEmailResponse::missing()))
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub created_at: chrono::NaiveDateTime,
    pub status: String,
    pub plus_one: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Rsvp> for HistoryItem {
    fn from(row: Rsvp) -> Self {
        HistoryItem {
            id: row.id,
            created_at: row.created_at,
            status: row.status,
            plus_one: row.plus_one,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub ok: bool,
    pub items: Vec<HistoryItem>,
}

#[get("/rsvp/history?<name>")]
pub async fn rsvp_history(
    mut db: Connection<Db>,
    name: Option<String>,
) -> Result<Json<HistoryResponse>, (Status, Json<Value>)> {
    let lookup = name.map(|name| name.trim().to_string()).unwrap_or_default();
    if lookup.is_empty() {
        return Err((
            Status::BadRequest,
            Json(json!({ "ok": false, "error": "Missing name" })),
        ));
    }

    let rows = {
        use crate::schema::rsvps::dsl;
        dsl::rsvps
            .filter(dsl::name.eq(&lookup))
            .order(dsl::created_at.desc())
            .limit(20)
            .select(Rsvp::as_select())
            .load::<Rsvp>(&mut db)
            .await
    };
    match rows {
        Ok(rows) => Ok(Json(HistoryResponse {
            ok: true,
            items: rows.into_iter().map(HistoryItem::from).collect(),
        })),
        Err(err) => {
            error!("history fetch for {lookup} failed: {err}");
            Err((
                Status::InternalServerError,
                Json(json!({ "ok": false, "error": "Server error" })),
            ))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminRsvps {
    pub ok: bool,
    pub items: Vec<Rsvp>,
}

#[get("/admin/rsvps")]
pub async fn admin_rsvps(
    _session: AdminSession,
    mut db: Connection<Db>,
) -> Result<Json<AdminRsvps>, Error> {
    let items = {
        use crate::schema::rsvps::dsl;
        dsl::rsvps
            .order(dsl::created_at.desc())
            .limit(200)
            .select(Rsvp::as_select())
            .load::<Rsvp>(&mut db)
            .await?
    };
    Ok(Json(AdminRsvps { ok: true, items }))
}

/// Unauthenticated hits on `/api/admin/...` bounce to the public wedding
/// page carrying the original path, same as the page-level gate. Applies
/// to every method, so each verb gets a route delegating here.
fn gate_admin(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    if session.is_some() {
        return Err(Status::NotFound);
    }
    let suffix = path.to_string_lossy().into_owned();
    let from = if suffix.is_empty() {
        "/api/admin".to_string()
    } else {
        format!("/api/admin/{suffix}")
    };
    Ok(Redirect::to(uri!(crate::pages::wedding(from = Some(from)))))
}

#[get("/admin/<path..>", rank = 2)]
pub fn admin_redirect(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    gate_admin(session, path)
}

#[post("/admin/<path..>", rank = 2)]
pub fn admin_redirect_post(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    gate_admin(session, path)
}

#[put("/admin/<path..>", rank = 2)]
pub fn admin_redirect_put(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    gate_admin(session, path)
}

#[delete("/admin/<path..>", rank = 2)]
pub fn admin_redirect_delete(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    gate_admin(session, path)
}
