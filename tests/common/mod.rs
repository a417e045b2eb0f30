//! Shared test harness: an app state wired to an unroutable backend for
//! no-network tests, bearer-token minting, and a small in-process stand-in
//! for the hosted backend (GoTrue user/logout plus the PostgREST row
//! endpoints the repositories talk to).

use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use gymclub_be::AppState;
use gymclub_be::config::Config;

/// State pointing at a port nothing listens on: any request that should
/// have been stopped by validation fails loudly instead.
#[allow(dead_code)]
pub fn offline_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Config::test_default(),
        reqwest::Client::new(),
    ))
}

/// State pointing at a running stub.
#[allow(dead_code)]
pub fn stub_state(base_url: &str) -> web::Data<AppState> {
    let config = Config {
        supabase_url: base_url.trim_end_matches('/').to_string(),
        ..Config::test_default()
    };
    web::Data::new(AppState::new(config, reqwest::Client::new()))
}

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    aud: String,
    exp: usize,
}

/// Access token the extractor accepts: signed with the test secret,
/// audience `authenticated`, one hour of validity.
#[allow(dead_code)]
pub fn auth_token(user_id: Uuid) -> String {
    let claims = TestClaims {
        sub: user_id.to_string(),
        aud: "authenticated".to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(Config::test_default().supabase_jwt_secret.as_bytes()),
    )
    .unwrap()
}

/// Rows and switches behind the stub endpoints, plus a request log the
/// tests assert against (entries look like "POST /rest/v1/user_forms").
#[derive(Default)]
pub struct StubState {
    pub auth_user: Option<Value>,
    pub profiles: Vec<Value>,
    pub coaches: Vec<Value>,
    pub forms: Vec<Value>,
    pub purchases: Vec<Value>,
    pub fail_profile_insert: bool,
    pub fail_purchase_insert: bool,
    pub fail_form_update: bool,
    pub log: Vec<String>,
}

impl StubState {
    #[allow(dead_code)]
    pub fn count_logged(&self, entry: &str) -> usize {
        self.log.iter().filter(|l| l.as_str() == entry).count()
    }
}

pub type Stub = Arc<Mutex<StubState>>;

type Shared = web::Data<Stub>;

/// Minimal PostgREST filter handling: `eq.` and `in.(...)` on the columns
/// the repositories actually filter by.
fn row_matches(row: &Value, query: &str) -> bool {
    for pair in query.split('&') {
        let Some((key, raw)) = pair.split_once('=') else {
            continue;
        };
        if !matches!(key, "id" | "user_id" | "role") {
            continue;
        }
        let filter = urlencoding::decode(raw).unwrap_or_default().into_owned();
        let field = row.get(key).and_then(Value::as_str).unwrap_or_default();
        if let Some(v) = filter.strip_prefix("eq.") {
            if field != v {
                return false;
            }
        } else if let Some(list) = filter
            .strip_prefix("in.(")
            .and_then(|s| s.strip_suffix(')'))
        {
            if !list.split(',').any(|x| x == field) {
                return false;
            }
        }
    }
    true
}

fn filtered(rows: &[Value], query: &str) -> Vec<Value> {
    rows.iter()
        .filter(|r| row_matches(r, query))
        .cloned()
        .collect()
}

async fn get_auth_user(stub: Shared) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("GET /auth/v1/user".to_string());
    match &s.auth_user {
        Some(user) => HttpResponse::Ok().json(user),
        None => HttpResponse::Unauthorized().json(json!({"msg": "invalid token"})),
    }
}

async fn post_logout(stub: Shared) -> HttpResponse {
    stub.lock()
        .unwrap()
        .log
        .push("POST /auth/v1/logout".to_string());
    HttpResponse::NoContent().finish()
}

async fn get_profiles(stub: Shared, req: HttpRequest) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("GET /rest/v1/profiles".to_string());
    HttpResponse::Ok().json(filtered(&s.profiles, req.query_string()))
}

async fn post_profiles(stub: Shared, body: web::Json<Value>) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("POST /rest/v1/profiles".to_string());
    if s.fail_profile_insert {
        return HttpResponse::InternalServerError().json(json!({"message": "insert refused"}));
    }
    let row = body.into_inner();
    s.profiles.push(row.clone());
    HttpResponse::Created().json(json!([row]))
}

async fn patch_profiles(stub: Shared, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("PATCH /rest/v1/profiles".to_string());
    let query = req.query_string().to_string();
    let patch = body.into_inner();
    for row in s.profiles.iter_mut().filter(|r| row_matches(r, &query)) {
        if let (Value::Object(target), Value::Object(fields)) = (&mut *row, &patch) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
    }
    HttpResponse::NoContent().finish()
}

async fn get_coaches(stub: Shared, req: HttpRequest) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("GET /rest/v1/coaches".to_string());
    HttpResponse::Ok().json(filtered(&s.coaches, req.query_string()))
}

async fn post_coaches(stub: Shared, body: web::Json<Value>) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("POST /rest/v1/coaches".to_string());
    let mut row = body.into_inner();
    if let Value::Object(map) = &mut row {
        map.entry("id".to_string())
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    }
    s.coaches.push(row.clone());
    HttpResponse::Created().json(json!([row]))
}

async fn patch_coaches(stub: Shared, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("PATCH /rest/v1/coaches".to_string());
    let query = req.query_string().to_string();
    let patch = body.into_inner();
    for row in s.coaches.iter_mut().filter(|r| row_matches(r, &query)) {
        if let (Value::Object(target), Value::Object(fields)) = (&mut *row, &patch) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
    }
    HttpResponse::NoContent().finish()
}

async fn delete_coaches(stub: Shared, req: HttpRequest) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("DELETE /rest/v1/coaches".to_string());
    let query = req.query_string().to_string();
    s.coaches.retain(|r| !row_matches(r, &query));
    HttpResponse::NoContent().finish()
}

async fn get_forms(stub: Shared, req: HttpRequest) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("GET /rest/v1/user_forms".to_string());
    HttpResponse::Ok().json(filtered(&s.forms, req.query_string()))
}

async fn post_forms(stub: Shared, body: web::Json<Value>) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("POST /rest/v1/user_forms".to_string());
    let mut row = body.into_inner();
    if let Value::Object(map) = &mut row {
        map.insert(
            "id".to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        map.insert(
            "created_at".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
    s.forms.push(row.clone());
    HttpResponse::Created().json(json!([row]))
}

async fn patch_forms(stub: Shared, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("PATCH /rest/v1/user_forms".to_string());
    if s.fail_form_update {
        return HttpResponse::InternalServerError().json(json!({"message": "update refused"}));
    }
    let query = req.query_string().to_string();
    let patch = body.into_inner();
    for row in s.forms.iter_mut().filter(|r| row_matches(r, &query)) {
        if let (Value::Object(target), Value::Object(fields)) = (&mut *row, &patch) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
    }
    HttpResponse::NoContent().finish()
}

async fn delete_forms(stub: Shared, req: HttpRequest) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("DELETE /rest/v1/user_forms".to_string());
    let query = req.query_string().to_string();
    s.forms.retain(|r| !row_matches(r, &query));
    HttpResponse::NoContent().finish()
}

async fn post_purchases(stub: Shared, body: web::Json<Value>) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("POST /rest/v1/purchases".to_string());
    if s.fail_purchase_insert {
        return HttpResponse::InternalServerError().json(json!({"message": "insert refused"}));
    }
    let mut row = body.into_inner();
    if let Value::Object(map) = &mut row {
        map.insert(
            "id".to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        map.insert(
            "created_at".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
    }
    s.purchases.push(row.clone());
    HttpResponse::Created().json(json!([row]))
}

async fn delete_purchases(stub: Shared, req: HttpRequest) -> HttpResponse {
    let mut s = stub.lock().unwrap();
    s.log.push("DELETE /rest/v1/purchases".to_string());
    let query = req.query_string().to_string();
    s.purchases.retain(|r| !row_matches(r, &query));
    HttpResponse::NoContent().finish()
}

/// Boot the stub on an ephemeral port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_stub(stub: Stub) -> String {
    let data = web::Data::new(stub);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/auth/v1/user", web::get().to(get_auth_user))
            .route("/auth/v1/logout", web::post().to(post_logout))
            .route("/rest/v1/profiles", web::get().to(get_profiles))
            .route("/rest/v1/profiles", web::post().to(post_profiles))
            .route("/rest/v1/profiles", web::patch().to(patch_profiles))
            .route("/rest/v1/coaches", web::get().to(get_coaches))
            .route("/rest/v1/coaches", web::post().to(post_coaches))
            .route("/rest/v1/coaches", web::patch().to(patch_coaches))
            .route("/rest/v1/coaches", web::delete().to(delete_coaches))
            .route("/rest/v1/user_forms", web::get().to(get_forms))
            .route("/rest/v1/user_forms", web::post().to(post_forms))
            .route("/rest/v1/user_forms", web::patch().to(patch_forms))
            .route("/rest/v1/user_forms", web::delete().to(delete_forms))
            .route("/rest/v1/purchases", web::post().to(post_purchases))
            .route("/rest/v1/purchases", web::delete().to(delete_purchases))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("failed to bind stub server");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}
