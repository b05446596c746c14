use std::{
    collections::HashMap,
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        Arc,
        Mutex,
    },
};

use axum::{
    extract::{
        Path,
        Query,
        State,
    },
    http::{
        header::AUTHORIZATION,
        HeaderMap,
        StatusCode,
    },
    response::{
        IntoResponse,
        Response,
    },
    routing::{
        get,
        patch,
        post,
        put,
    },
    Json,
    Router,
};
use hortas::{
    admin::{
        CourseState,
        GardenRequest,
        GardenStatus,
        RequestStatus,
    },
    core::{
        session::TOKEN_KEY,
        Credentials,
        RestCollection,
    },
    list::{
        CollectionApi,
        LoadState,
        SettlementOutcome,
    },
    persistence::{
        CredentialStore,
        MemoryCredentialStore,
    },
    AdminPanel,
    ApiError,
    AppShell,
    Config,
    EntityId,
    ListError,
    NoticeKind,
    Route,
    ViewQuery,
};
use serde_json::{
    json,
    Value,
};
use tokio::runtime::Handle;

const GOOD_TOKEN: &str = "good-token";

#[derive(Clone)]
struct ServerState {
    gardens: Arc<Mutex<Vec<Value>>>,
    courses: Arc<Mutex<Vec<Value>>>,
    valid_token: Arc<Mutex<String>>,
    fail_updates: Arc<AtomicBool>,
    course_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    request_updates: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            gardens: Arc::new(Mutex::new(vec![
                json!({ "id": 1, "nome": "Horta Norte", "bairro": "Centro", "status": "ATIVA" }),
                json!({ "id": 2, "nome": "Horta Sul", "bairro": "Vila Nova", "status": "INATIVA" }),
            ])),
            courses: Arc::new(Mutex::new(vec![
                json!({ "id": "c-1", "titulo": "Compostagem", "ativo": true, "vagas": 20 }),
            ])),
            valid_token: Arc::new(Mutex::new(GOOD_TOKEN.to_string())),
            fail_updates: Arc::new(AtomicBool::new(false)),
            course_queries: Arc::new(Mutex::new(Vec::new())),
            request_updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.valid_token.lock().unwrap());
        headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) == Some(expected.as_str())
    }

    fn garden_status(&self, id: i64) -> Value {
        self.gardens.lock().unwrap().iter().find(|g| g["id"] == json!(id)).unwrap()["status"].clone()
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(json!({ "token": GOOD_TOKEN })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn list_gardens(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(state.gardens.lock().unwrap().clone()).into_response()
}

async fn patch_garden_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if state.fail_updates.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let mut gardens = state.gardens.lock().unwrap();
    match gardens.iter_mut().find(|g| g["id"] == json!(id)) {
        Some(garden) => {
            garden["status"] = body["status"].clone();
            StatusCode::NO_CONTENT.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_courses(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(state.courses.lock().unwrap().clone()).into_response()
}

async fn put_course_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.course_queries.lock().unwrap().push(params.clone());

    let mut courses = state.courses.lock().unwrap();
    match courses.iter_mut().find(|c| c["id"] == json!(id)) {
        Some(course) => {
            course["ativo"] = json!(params.get("ativo").map(String::as_str) == Some("true"));
            course["atualizadoEm"] = json!("2025-01-01T00:00:00Z");
            Json(course.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn put_request_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !state.authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.request_updates.lock().unwrap().push((id, params));
    StatusCode::NO_CONTENT.into_response()
}

async fn list_requests() -> Response {
    Json(json!({ "unexpected": "shape" })).into_response()
}

async fn spawn_server(state: ServerState) -> Config {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/hortas", get(list_gardens))
        .route("/api/hortas/{id}/status", patch(patch_garden_status))
        .route("/api/cursos", get(list_courses))
        .route("/api/cursos/{id}/status", put(put_course_status))
        .route("/api/solicitacoes", get(list_requests))
        .route("/api/solicitacoes/{id}/status", put(put_request_status))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Config { api_base_url: format!("http://{}/api/", address), ..Config::default() }
}

fn store_with(token: Option<&str>) -> Arc<MemoryCredentialStore> {
    let store = Arc::new(MemoryCredentialStore::new());
    if let Some(token) = token {
        store.set(TOKEN_KEY, token).unwrap();
    }
    store
}

#[tokio::test]
async fn login_load_and_toggle_garden() {
    let server = ServerState::new();
    let config = spawn_server(server.clone()).await;
    let store = store_with(None);
    let mut shell = AppShell::new(&config, store.clone()).unwrap();
    assert_eq!(shell.navigator().current(), Route::Login);

    let wrong = Credentials { email: "admin@hortas.example".into(), password: "nope".into() };
    assert!(shell.login(&wrong).await.is_err());
    assert_eq!(store.get(TOKEN_KEY), None);

    let credentials = Credentials { email: "admin@hortas.example".into(), password: "secret".into() };
    shell.login(&credentials).await.unwrap();
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some(GOOD_TOKEN));
    assert_eq!(shell.navigator().current(), Route::Gardens);

    let mut panel = AdminPanel::new(shell.client(), Handle::current());
    let gardens = panel.gardens.load_all().await.unwrap();
    assert_eq!(gardens.len(), 2);

    panel.gardens.set_status(&EntityId::Int(1), GardenStatus::Inativa).unwrap();
    let inactive = ViewQuery::new().with_status(GardenStatus::Inativa);
    assert_eq!(panel.gardens.view(&inactive).len(), 2);

    let settlements = panel.gardens.settle().await;
    assert!(matches!(
        settlements[0].outcome,
        SettlementOutcome::Confirmed { status: GardenStatus::Inativa }
    ));
    assert_eq!(server.garden_status(1), json!("INATIVA"));
    assert_eq!(panel.gardens.notices().count(NoticeKind::Success), 1);
}

#[tokio::test]
async fn server_error_rolls_back_garden_status() {
    let server = ServerState::new();
    let config = spawn_server(server.clone()).await;
    let mut shell = AppShell::new(&config, store_with(Some(GOOD_TOKEN))).unwrap();
    let mut panel = AdminPanel::new(shell.client(), Handle::current());
    panel.gardens.load_all().await.unwrap();

    server.fail_updates.store(true, Ordering::SeqCst);
    panel.gardens.set_status(&EntityId::Int(1), GardenStatus::Inativa).unwrap();
    let settlements = panel.gardens.settle().await;

    match &settlements[0].outcome {
        SettlementOutcome::RolledBack { restored, error } => {
            assert_eq!(*restored, GardenStatus::Ativa);
            assert!(matches!(
                error,
                ListError::Update { source: ApiError::Status { status: 500, .. }, .. }
            ));
        }
        other => panic!("Expected rollback, got {:?}", other),
    }

    let inactive = ViewQuery::new().with_status(GardenStatus::Inativa);
    let ids: Vec<EntityId> = panel.gardens.view(&inactive).iter().map(|g| g.id.clone()).collect();
    assert_eq!(ids, vec![EntityId::Int(2)]);
    assert_eq!(panel.gardens.notices().count(NoticeKind::Error), 1);
    assert_eq!(server.garden_status(1), json!("ATIVA"));

    assert_eq!(shell.poll_session_events(), 0);
    assert_eq!(shell.navigator().current(), Route::Gardens);
}

#[tokio::test]
async fn unauthorized_load_signs_out() {
    let server = ServerState::new();
    let config = spawn_server(server.clone()).await;
    let store = store_with(Some("stale-token"));
    let mut shell = AppShell::new(&config, store.clone()).unwrap();
    assert_eq!(shell.navigator().current(), Route::Gardens);

    let mut panel = AdminPanel::new(shell.client(), Handle::current());
    let error = panel.gardens.load_all().await.unwrap_err();
    assert!(error.is_auth());
    assert!(matches!(panel.gardens.load_state(), LoadState::Failed(_)));
    assert!(panel.gardens.notices().active().is_empty());

    shell.poll_session_events();
    assert_eq!(store.get(TOKEN_KEY), None);
    assert_eq!(shell.navigator().current(), Route::Login);
}

#[tokio::test]
async fn forbidden_update_signs_out_and_rolls_back() {
    let server = ServerState::new();
    let config = spawn_server(server.clone()).await;
    let store = store_with(Some(GOOD_TOKEN));
    let mut shell = AppShell::new(&config, store.clone()).unwrap();
    let mut panel = AdminPanel::new(shell.client(), Handle::current());
    panel.gardens.load_all().await.unwrap();

    *server.valid_token.lock().unwrap() = "rotated".to_string();
    panel.gardens.set_status(&EntityId::Int(2), GardenStatus::Ativa).unwrap();
    panel.gardens.settle().await;

    assert_eq!(panel.gardens.get(&EntityId::Int(2)).unwrap().status, GardenStatus::Inativa);
    assert!(panel.gardens.notices().active().is_empty());

    assert_eq!(shell.poll_session_events(), 1);
    assert_eq!(store.get(TOKEN_KEY), None);
    assert_eq!(shell.navigator().current(), Route::Login);
}

#[tokio::test]
async fn course_status_goes_through_query_and_merges_reply() {
    let server = ServerState::new();
    let config = spawn_server(server.clone()).await;
    let shell = AppShell::new(&config, store_with(Some(GOOD_TOKEN))).unwrap();
    let mut panel = AdminPanel::new(shell.client(), Handle::current());
    panel.courses.load_all().await.unwrap();

    let id = EntityId::from("c-1");
    panel.courses.set_status(&id, CourseState::Inativo).unwrap();
    panel.courses.settle().await;

    let queries = server.course_queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("ativo").map(String::as_str), Some("false"));

    let course = panel.courses.get(&id).unwrap();
    assert!(!course.active);
    assert_eq!(course.seats, Some(20));
    assert_eq!(course.fields.get("atualizadoEm"), Some(&json!("2025-01-01T00:00:00Z")));
}

#[tokio::test]
async fn panel_reports_malformed_collection() {
    let server = ServerState::new();
    let config = spawn_server(server.clone()).await;
    let mut shell = AppShell::new(&config, store_with(Some(GOOD_TOKEN))).unwrap();
    let mut panel = AdminPanel::new(shell.client(), Handle::current());

    let errors = panel.load_all().await;
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ListError::Fetch { resource, source: ApiError::Decode { .. } } if resource == "solicitacoes"
    ));

    assert_eq!(panel.gardens.items().len(), 2);
    assert_eq!(panel.courses.items().len(), 1);
    assert_eq!(panel.requests.notices().count(NoticeKind::Error), 1);
    assert_eq!(shell.poll_session_events(), 0);
    assert_eq!(shell.navigator().current(), Route::Gardens);
}

#[tokio::test]
async fn text_id_stays_one_path_segment() {
    let server = ServerState::new();
    let config = spawn_server(server.clone()).await;
    let shell = AppShell::new(&config, store_with(Some(GOOD_TOKEN))).unwrap();
    let requests: RestCollection<GardenRequest> = RestCollection::new(shell.client().clone());

    let reply = requests
        .update_status(&EntityId::from("2024/17"), &RequestStatus::Aprovada)
        .await
        .unwrap();
    assert!(reply.is_none());

    let updates = server.request_updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "2024/17");
    assert_eq!(updates[0].1.get("status").map(String::as_str), Some("APROVADA"));
}
