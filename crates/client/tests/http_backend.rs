//! Black-box tests: `HttpBackend` against a stub backend on an ephemeral port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::{Value, json};

use adminconsole_auth::{Credentials, Session, SessionHolder, SessionUser};
use adminconsole_client::{AdminApi, ApiError, ClientConfig, HttpBackend};
use adminconsole_core::{Module, ModuleDraft, ModuleId, Profile, ProfileDraft, ProfileId, Status};

const TOKEN: &str = "stub-token";

#[derive(Default)]
struct Recorded {
    module_list_calls: usize,
    busy_mutation_calls: usize,
    last_put: Option<Value>,
    last_request_id: Option<String>,
}

type Shared = Arc<Mutex<Recorded>>;

struct TestServer {
    base_url: String,
    recorded: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let recorded: Shared = Arc::default();
        let app = Router::new()
            .route("/restful/usuarios/login", post(login))
            .route("/perfiles", get(list_profiles).post(busy_mutation))
            .route("/perfiles/:id", put(update_profile))
            .route("/modulos", get(flaky_modules))
            .route("/modulos/:id", put(busy_mutation).delete(refuse_delete))
            .route("/accesos/perfil/:id/modulos", get(profile_modules))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            recorded,
            handle,
        }
    }

    fn backend(&self, session: Arc<SessionHolder>) -> HttpBackend {
        let config = ClientConfig::new(self.base_url.clone()).with_timeout(Duration::from_secs(5));
        HttpBackend::new(config, session).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["nombreUsuarioLogin"] == "admin" && body["contrasena"] == "admin-pass" {
        (
            StatusCode::OK,
            Json(json!({
                "token": TOKEN,
                "idUsuario": 1,
                "nombreUsuario": "Admin",
                "nombrePerfil": "Administrador",
                "rolId": 1
            })),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad credentials"})))
    }
}

async fn list_profiles(State(recorded): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    recorded.lock().unwrap().last_request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "expired"})));
    }
    (
        StatusCode::OK,
        Json(json!([
            {"idPerfil": 1, "nombrePerfil": "Administrador", "estado": 1},
            {"idPerfil": 2, "nombrePerfil": "Cajero", "estado": 0}
        ])),
    )
}

async fn update_profile(
    State(recorded): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    recorded.lock().unwrap().last_put = Some(json!({"id": id, "body": body}));
    StatusCode::OK
}

async fn flaky_modules(State(recorded): State<Shared>) -> impl IntoResponse {
    let mut rec = recorded.lock().unwrap();
    rec.module_list_calls += 1;
    if rec.module_list_calls == 1 {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"message": "warming up"})));
    }
    (
        StatusCode::OK,
        Json(json!([{"idModulo": 3, "nombreModulo": "Ventas", "orden": 1, "estado": 1}])),
    )
}

async fn busy_mutation(State(recorded): State<Shared>) -> impl IntoResponse {
    recorded.lock().unwrap().busy_mutation_calls += 1;
    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"message": "try later"})))
}

async fn refuse_delete(Path(_id): Path<i64>) -> impl IntoResponse {
    (
        StatusCode::CONFLICT,
        Json(json!({"message": "module still granted to profiles"})),
    )
}

async fn profile_modules(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 1 {
        Json(json!([{"idModulo": 3, "nombreModulo": "Ventas", "orden": 1, "estado": 1}]))
    } else {
        Json(json!([]))
    }
}

fn signed_in() -> Arc<SessionHolder> {
    let holder = Arc::new(SessionHolder::ephemeral());
    holder
        .establish(Session::new(TOKEN, SessionUser::default(), chrono_now()))
        .unwrap();
    holder
}

fn chrono_now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let server = TestServer::spawn().await;
    let backend = server.backend(Arc::new(SessionHolder::ephemeral()));

    let resp = backend
        .login(&Credentials::new("admin", "admin-pass"))
        .await
        .unwrap();
    assert_eq!(resp.token, TOKEN);
    assert_eq!(resp.user.profile_name.as_deref(), Some("Administrador"));
}

#[tokio::test]
async fn rejected_login_is_invalid_credentials() {
    let server = TestServer::spawn().await;
    let backend = server.backend(Arc::new(SessionHolder::ephemeral()));

    let err = backend
        .login(&Credentials::new("admin", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::InvalidCredentials);
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let server = TestServer::spawn().await;
    let backend = server.backend(signed_in());

    let profiles: Vec<Profile> = backend.list().await.unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[1].status, Status::Inactive);

    let request_id = server.recorded.lock().unwrap().last_request_id.clone();
    assert!(request_id.is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn unauthorized_clears_the_session() {
    let server = TestServer::spawn().await;
    let holder = Arc::new(SessionHolder::ephemeral());
    holder
        .establish(Session::new("stale", SessionUser::default(), chrono_now()))
        .unwrap();
    let backend = server.backend(holder.clone());

    let err = backend.list::<Profile>().await.unwrap_err();
    assert_eq!(err, ApiError::SessionExpired);
    assert!(!holder.is_authenticated());
}

#[tokio::test]
async fn get_is_retried_once_on_server_error() {
    let server = TestServer::spawn().await;
    let backend = server.backend(signed_in());

    let modules: Vec<Module> = backend.list().await.unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(server.recorded.lock().unwrap().module_list_calls, 2);
}

#[tokio::test]
async fn get_is_not_retried_when_retries_are_off() {
    let server = TestServer::spawn().await;
    let config = ClientConfig::new(server.base_url.clone()).with_retries(0);
    let backend = HttpBackend::new(config, signed_in()).unwrap();

    let err = backend.list::<Module>().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, ref message } if message == "warming up"));
}

#[tokio::test]
async fn mutations_are_sent_once_even_on_server_error() {
    let server = TestServer::spawn().await;
    let config = ClientConfig::new(server.base_url.clone()).with_retries(3);
    let backend = HttpBackend::new(config, signed_in()).unwrap();

    let err = backend
        .create::<Profile>(&ProfileDraft::new("Supervisor"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    assert_eq!(server.recorded.lock().unwrap().busy_mutation_calls, 1);

    let draft = ModuleDraft::new("Ventas");
    let err = backend
        .update::<Module>(ModuleId::new(3), &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    assert_eq!(server.recorded.lock().unwrap().busy_mutation_calls, 2);
}

#[tokio::test]
async fn update_sends_wire_body() {
    let server = TestServer::spawn().await;
    let backend = server.backend(signed_in());

    let draft = ProfileDraft {
        name: "Supervisor".to_string(),
        status: Status::Inactive,
    };
    backend
        .update::<Profile>(ProfileId::new(2), &draft)
        .await
        .unwrap();

    let put = server.recorded.lock().unwrap().last_put.clone().unwrap();
    assert_eq!(put, json!({"id": 2, "body": {"nombrePerfil": "Supervisor", "estado": 0}}));
}

#[tokio::test]
async fn backend_message_is_surfaced() {
    let server = TestServer::spawn().await;
    let backend = server.backend(signed_in());

    let err = backend.delete::<Module>(ModuleId::new(3)).await.unwrap_err();
    assert_eq!(err, ApiError::status(409, "module still granted to profiles"));
}

#[tokio::test]
async fn derived_profile_modules_endpoint() {
    let server = TestServer::spawn().await;
    let backend = server.backend(signed_in());

    let allowed = backend.modules_for_profile(ProfileId::new(1)).await.unwrap();
    assert_eq!(allowed[0].name, "Ventas");
    assert!(backend.modules_for_profile(ProfileId::new(2)).await.unwrap().is_empty());
}
