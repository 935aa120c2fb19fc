//! In-process mock of the IMS REST API
//!
//! Serves the `/api/v1` routes the client uses from in-memory tables, counts
//! every request, and can be told to fail everything with a given status.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use shared::models::{
    AddItemPayload, ConfirmDispensePayload, DeliveryItem, DeliveryItemPayload, DeliveryItemUpdate,
    Dispense, DispenseItem, DispenseRef, Inspection, InspectionPayload, InspectionUpdate,
    LibraryPayload, LoginRequest, LoginResponse, Requisition, RequisitionItem, RequisitionPayload,
    SessionUser, Stock, UpdateItemPayload, User, UserPayload,
};
use shared::types::NamedRef;

use ims_client::{Config, Context, MemoryNotifier, Session};

pub const TOKEN: &str = "test-token";
pub const EMAIL: &str = "admin@ims.test";
pub const PASSWORD: &str = "secret";

type ApiError = (StatusCode, Json<Value>);
type ApiResult = Result<Json<Value>, ApiError>;

/// In-memory tables
#[derive(Default)]
pub struct Db {
    pub requisitions: BTreeMap<u64, Requisition>,
    pub items: BTreeMap<u64, RequisitionItem>,
    pub stocks: BTreeMap<u64, Stock>,
    pub dispenses: BTreeMap<u64, Dispense>,
    pub dispense_items: BTreeMap<u64, Vec<DispenseItem>>,
    pub libraries: BTreeMap<String, BTreeMap<u64, NamedRef>>,
    pub inspections: BTreeMap<u64, Inspection>,
    /// Delivery items keyed by item id, with their inspection id
    pub delivery_items: BTreeMap<u64, (u64, DeliveryItem)>,
    pub users: BTreeMap<u64, User>,
    /// Last filters seen by the system log endpoint
    pub log_queries: Vec<BTreeMap<String, String>>,
    next_id: u64,
}

impl Db {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MockState {
    pub db: Mutex<Db>,
    hits: Mutex<Vec<String>>,
    forced: Mutex<Option<(StatusCode, String)>>,
    /// Dispense replies carry only a message
    bare_dispense_reply: AtomicBool,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = app(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });
        Self { addr, state }
    }

    /// API host as the client is configured with it
    pub fn host(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Requests seen for `METHOD /api/v1/...`
    pub fn hits(&self, method: &str, path: &str) -> usize {
        let line = format!("{method} /api/v1/{}", path.trim_start_matches('/'));
        self.state
            .hits
            .lock()
            .unwrap()
            .iter()
            .filter(|h| **h == line)
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.state.hits.lock().unwrap().len()
    }

    /// Answer every request with `status` until [`MockBackend::recover`]
    pub fn fail_all(&self, status: StatusCode, message: &str) {
        *self.state.forced.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn recover(&self) {
        *self.state.forced.lock().unwrap() = None;
    }

    /// Answer dispense requests with `{success, message}` and no `data`
    pub fn bare_dispense_reply(&self) {
        self.state.bare_dispense_reply.store(true, Ordering::SeqCst);
    }

    pub fn seed_stock(&self, lot_no: &str, balance: i64, unit_price: i64) -> u64 {
        let mut db = self.state.db.lock().unwrap();
        let id = db.next_id();
        db.stocks.insert(
            id,
            Stock {
                id,
                product_id: 100 + id,
                brand_id: None,
                lot_no: Some(lot_no.to_string()),
                running_balance: Decimal::from(balance),
                unit_price: Some(Decimal::from(unit_price)),
                expiry_date: None,
                product: None,
                brand: None,
            },
        );
        id
    }

    pub fn seed_requisition(&self, ris_no: &str) -> u64 {
        let mut db = self.state.db.lock().unwrap();
        let id = db.next_id();
        db.requisitions.insert(
            id,
            Requisition {
                id,
                department_id: 1,
                ris_no: ris_no.to_string(),
                with_inspection: false,
                is_for_dispense: false,
                is_dispense: false,
                requested_by: "Juan Dela Cruz".into(),
                designation: "Nurse".into(),
                purpose: Some("Ward supplies".into()),
                department: Some(department(1)),
            },
        );
        id
    }

    /// Add an item straight into the tables
    pub fn seed_item(&self, requisition_id: u64, stock_id: u64, quantity: i64) -> u64 {
        let mut db = self.state.db.lock().unwrap();
        let id = db.next_id();
        let stock = db.stocks.get(&stock_id).cloned().expect("seeded stock");
        db.items.insert(id, item_from_stock(id, requisition_id, &stock, quantity.into()));
        id
    }

    pub fn seed_inspection(&self, iar_no: &str, is_forward: bool) -> u64 {
        let mut db = self.state.db.lock().unwrap();
        let id = db.next_id();
        db.inspections.insert(
            id,
            Inspection {
                id,
                iar_no: iar_no.to_string(),
                for_warehouse: true,
                is_forward,
                remarks: None,
                delivery: None,
                purchase_order: None,
            },
        );
        id
    }

    pub fn seed_delivery_item(&self, inspection_id: u64, quantity: i64, unit_price: i64) -> u64 {
        let mut db = self.state.db.lock().unwrap();
        let id = db.next_id();
        let item = DeliveryItem {
            id,
            product_id: 200 + id,
            brand_id: None,
            lot_no: Some(format!("DLV-{id}")),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            expiry_date: None,
            product: None,
            brand: None,
        };
        db.delivery_items.insert(id, (inspection_id, item));
        id
    }

    pub fn inspection(&self, id: u64) -> Option<Inspection> {
        self.state.db.lock().unwrap().inspections.get(&id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.state.db.lock().unwrap().users.len()
    }

    pub fn log_queries(&self) -> Vec<BTreeMap<String, String>> {
        self.state.db.lock().unwrap().log_queries.clone()
    }

    pub fn requisition(&self, id: u64) -> Option<Requisition> {
        self.state.db.lock().unwrap().requisitions.get(&id).cloned()
    }

    pub fn dispense(&self, id: u64) -> Option<Dispense> {
        self.state.db.lock().unwrap().dispenses.get(&id).cloned()
    }

    pub fn item_quantity(&self, id: u64) -> Option<Decimal> {
        self.state.db.lock().unwrap().items.get(&id).map(|i| i.quantity)
    }
}

/// A signed-in client wired to a fresh mock backend
pub struct Harness {
    pub backend: MockBackend,
    pub ctx: Context,
    pub notifier: Arc<MemoryNotifier>,
}

impl Harness {
    pub async fn signed_in() -> Self {
        let harness = Self::signed_out().await;
        harness
            .ctx
            .session
            .set_auth(login_response())
            .expect("in-memory session");
        harness
    }

    pub async fn signed_out() -> Self {
        let backend = MockBackend::start().await;
        let config = test_config(&backend.host());
        let notifier = Arc::new(MemoryNotifier::new());
        let ctx = Context::new(&config, Arc::new(Session::in_memory()), notifier.clone())
            .expect("client context");
        Self {
            backend,
            ctx,
            notifier,
        }
    }

    pub fn toasts_titled(&self, title: &str) -> usize {
        self.notifier.count_titled(title)
    }

    pub fn last_toast(&self) -> Option<ims_client::Notification> {
        self.notifier.snapshot().pop()
    }
}

/// Defaults with short retry delays
pub fn test_config(host: &str) -> Config {
    let mut config = Config::for_host(host);
    config.api.domain = "http://ims.test".into();
    config.query.retry_base_ms = 5;
    config
}

fn login_response() -> LoginResponse {
    LoginResponse {
        user: SessionUser {
            id: 1,
            name: "Admin".into(),
            email: EMAIL.into(),
        },
        token: TOKEN.into(),
        role: Some("super-admin".into()),
        permission: vec!["roles.index".into()],
    }
}

fn department(id: u64) -> NamedRef {
    NamedRef {
        id,
        name: format!("Department {id}"),
    }
}

fn item_from_stock(id: u64, requisition_id: u64, stock: &Stock, quantity: Decimal) -> RequisitionItem {
    RequisitionItem {
        id,
        requisition_id,
        stock_id: stock.id,
        product_id: stock.product_id,
        brand_id: stock.brand_id,
        lot_no: stock.lot_no.clone(),
        quantity,
        unit_price: stock.unit_price,
        expiry_date: stock.expiry_date,
        product: None,
        brand: None,
    }
}

// ============================================================================
// Responses
// ============================================================================

fn ok<T: Serialize>(data: T) -> ApiResult {
    Ok(Json(json!({ "success": true, "data": data })))
}

fn ack() -> ApiResult {
    Ok(Json(json!({ "success": true })))
}

fn list<T: Serialize>(data: Vec<T>) -> ApiResult {
    let total = data.len();
    Ok(Json(json!({
        "success": true,
        "data": data,
        "meta": { "current_page": 1, "last_page": 1, "per_page": 20, "total": total },
    })))
}

fn reject(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "success": false, "message": message })))
}

fn unprocessable(message: &str) -> ApiError {
    reject(StatusCode::UNPROCESSABLE_ENTITY, message)
}

fn not_found() -> ApiError {
    reject(StatusCode::NOT_FOUND, "Record not found.")
}

// ============================================================================
// Routes
// ============================================================================

fn app(state: Arc<MockState>) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/user", get(current_user))
        .nest("/requisitions", requisition_routes())
        .nest("/dispenses", dispense_routes())
        .nest("/inspections", inspection_routes())
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user))
        .route("/dashboard", get(dashboard))
        .route("/settings/system-logs", get(system_logs))
        .route("/libraries/:slug", get(list_library).post(create_library))
        .route(
            "/libraries/:slug/:id",
            put(update_library).delete(delete_library),
        )
        .route_layer(middleware::from_fn(require_token));

    let v1 = Router::new()
        .route("/auth/login", post(login))
        .merge(protected);

    Router::new()
        .nest("/api/v1", v1)
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

fn requisition_routes() -> Router<Arc<MockState>> {
    Router::new()
        .route("/", get(list_requisitions).post(create_requisition))
        .route("/stocks/warehouse", get(warehouse_stocks))
        .route(
            "/requisition-items/:item_id",
            put(update_item).delete(delete_item),
        )
        .route(
            "/:id",
            get(show_requisition)
                .put(update_requisition)
                .delete(delete_requisition),
        )
        .route("/:id/items", post(add_item))
        .route("/:id/mark-for-dispense", put(mark_for_dispense))
        .route("/:id/dispense", post(dispense_requisition))
}

fn dispense_routes() -> Router<Arc<MockState>> {
    Router::new()
        .route("/for-dispense", get(for_dispense))
        .route("/dispensed", get(dispensed))
        .route("/:id", get(show_dispense))
        .route("/:id/items", get(dispense_items))
        .route("/:id/confirm", post(confirm_dispense))
}

fn inspection_routes() -> Router<Arc<MockState>> {
    Router::new()
        .route("/", get(list_inspections).post(create_inspection))
        .route("/to-forward", get(inspections_to_forward))
        .route("/forwarded", get(forwarded_inspections))
        .route(
            "/delivery/items/:item_id",
            put(update_delivery_item).delete(delete_delivery_item),
        )
        .route(
            "/:id",
            get(show_inspection)
                .put(update_inspection)
                .delete(delete_inspection),
        )
        .route("/:id/remarks", put(update_remarks))
        .route("/:id/submit", post(submit_inspection))
        .route(
            "/:id/delivery/items",
            get(list_delivery_items).post(add_delivery_item),
        )
}

async fn record(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    state.hits.lock().unwrap().push(line);
    let forced = state.forced.lock().unwrap().clone();
    if let Some((status, message)) = forced {
        return reject(status, &message).into_response();
    }
    next.run(request).await
}

async fn require_token(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == format!("Bearer {TOKEN}"));
    if !authorized {
        return reject(StatusCode::UNAUTHORIZED, "Unauthenticated.").into_response();
    }
    next.run(request).await
}

// ============================================================================
// Auth
// ============================================================================

async fn login(Json(body): Json<LoginRequest>) -> ApiResult {
    if body.email != EMAIL || body.password != PASSWORD {
        return Err(reject(StatusCode::UNAUTHORIZED, "Invalid credentials."));
    }
    ok(login_response())
}

async fn logout() -> ApiResult {
    ack()
}

async fn current_user() -> ApiResult {
    let login = login_response();
    ok(json!({
        "user": login.user,
        "role": login.role,
        "permission": ["roles.index", "roles.store"],
    }))
}

// ============================================================================
// Requisitions
// ============================================================================

async fn list_requisitions(
    State(state): State<Arc<MockState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult {
    let db = state.db.lock().unwrap();
    let want = |key: &str| params.get(key).map(|v| v == "1");
    let rows: Vec<Requisition> = db
        .requisitions
        .values()
        .filter(|r| want("is_for_dispense").map_or(true, |w| r.is_for_dispense == w))
        .filter(|r| want("is_dispense").map_or(true, |w| r.is_dispense == w))
        .filter(|r| {
            params
                .get("search")
                .map_or(true, |s| r.ris_no.contains(s.as_str()))
        })
        .cloned()
        .collect();
    list(rows)
}

async fn create_requisition(
    State(state): State<Arc<MockState>>,
    Json(body): Json<RequisitionPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let id = db.next_id();
    let requisition = Requisition {
        id,
        department_id: body.department_id,
        ris_no: body.ris_no,
        with_inspection: body.with_inspection,
        is_for_dispense: false,
        is_dispense: false,
        requested_by: body.requested_by,
        designation: body.designation,
        purpose: Some(body.purpose),
        department: Some(department(body.department_id)),
    };
    db.requisitions.insert(id, requisition.clone());
    ok(requisition)
}

async fn show_requisition(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> ApiResult {
    let db = state.db.lock().unwrap();
    let requisition = db.requisitions.get(&id).ok_or_else(not_found)?;
    let items: Vec<&RequisitionItem> = db
        .items
        .values()
        .filter(|i| i.requisition_id == id)
        .collect();
    ok(json!({ "requisition": requisition, "requisition_items": items }))
}

async fn update_requisition(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<RequisitionPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let r = db.requisitions.get_mut(&id).ok_or_else(not_found)?;
    r.ris_no = body.ris_no;
    r.department_id = body.department_id;
    r.requested_by = body.requested_by;
    r.designation = body.designation;
    r.purpose = Some(body.purpose);
    r.department = Some(department(body.department_id));
    ack()
}

async fn delete_requisition(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    db.requisitions.remove(&id).ok_or_else(not_found)?;
    db.items.retain(|_, i| i.requisition_id != id);
    ack()
}

async fn add_item(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<AddItemPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let requisition = db.requisitions.get(&id).ok_or_else(not_found)?;
    if requisition.is_for_dispense || requisition.is_dispense {
        return Err(unprocessable("Items can only be added to pending requisitions."));
    }
    let stock = db
        .stocks
        .get(&body.stock_id)
        .cloned()
        .ok_or_else(|| unprocessable("Stock not found."))?;
    let item_id = db.next_id();
    let item = item_from_stock(item_id, id, &stock, body.quantity);
    db.items.insert(item_id, item.clone());
    ok(item)
}

async fn update_item(
    State(state): State<Arc<MockState>>,
    Path(item_id): Path<u64>,
    Json(body): Json<UpdateItemPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let item = db.items.get_mut(&item_id).ok_or_else(not_found)?;
    if let Some(quantity) = body.quantity {
        item.quantity = quantity;
    }
    if let Some(price) = body.unit_price {
        item.unit_price = Some(price);
    }
    ack()
}

async fn delete_item(State(state): State<Arc<MockState>>, Path(item_id): Path<u64>) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    db.items.remove(&item_id).ok_or_else(not_found)?;
    ack()
}

async fn mark_for_dispense(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let has_items = db.items.values().any(|i| i.requisition_id == id);
    let r = db.requisitions.get_mut(&id).ok_or_else(not_found)?;
    if !has_items {
        return Err(unprocessable("Requisition has no items."));
    }
    r.is_for_dispense = true;
    ack()
}

async fn dispense_requisition(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let requisition = db.requisitions.get(&id).cloned().ok_or_else(not_found)?;
    if !requisition.is_for_dispense || requisition.is_dispense {
        return Err(unprocessable("Requisition is not ready for dispensing."));
    }
    let dispense_id = db.next_id();
    let items: Vec<DispenseItem> = db
        .items
        .values()
        .filter(|i| i.requisition_id == id)
        .map(|i| DispenseItem {
            id: i.id,
            product_id: i.product_id,
            quantity: i.quantity,
            unit_price: i.unit_price.unwrap_or_default(),
            product: None,
        })
        .collect();
    let code = format!("DSP-{dispense_id:04}");
    if let Some(r) = db.requisitions.get_mut(&id) {
        r.is_dispense = true;
    }
    db.dispenses.insert(
        dispense_id,
        Dispense {
            id: dispense_id,
            requisition_id: id,
            dispense_code: code.clone(),
            is_dispense: false,
            receive_by: None,
            dispense_at: None,
            requisition: Some(requisition),
        },
    );
    db.dispense_items.insert(dispense_id, items);
    if state.bare_dispense_reply.load(Ordering::SeqCst) {
        return Ok(Json(json!({ "success": true, "message": "Dispensed." })));
    }
    ok(DispenseRef {
        id: dispense_id,
        requisition_id: id,
        dispense_code: code,
    })
}

async fn warehouse_stocks(
    State(state): State<Arc<MockState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult {
    let db = state.db.lock().unwrap();
    let rows: Vec<Stock> = db
        .stocks
        .values()
        .filter(|s| {
            params.get("search").map_or(true, |q| {
                s.lot_no.as_deref().is_some_and(|lot| lot.contains(q.as_str()))
            })
        })
        .cloned()
        .collect();
    list(rows)
}

// ============================================================================
// Dispenses
// ============================================================================

fn dispenses_where(state: &MockState, confirmed: bool) -> Vec<Dispense> {
    state
        .db
        .lock()
        .unwrap()
        .dispenses
        .values()
        .filter(|d| d.is_dispense == confirmed)
        .cloned()
        .collect()
}

async fn for_dispense(State(state): State<Arc<MockState>>) -> ApiResult {
    list(dispenses_where(&state, false))
}

async fn dispensed(State(state): State<Arc<MockState>>) -> ApiResult {
    list(dispenses_where(&state, true))
}

async fn show_dispense(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> ApiResult {
    let db = state.db.lock().unwrap();
    ok(db.dispenses.get(&id).ok_or_else(not_found)?)
}

async fn dispense_items(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> ApiResult {
    let db = state.db.lock().unwrap();
    list(db.dispense_items.get(&id).cloned().unwrap_or_default())
}

async fn confirm_dispense(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<ConfirmDispensePayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let d = db.dispenses.get_mut(&id).ok_or_else(not_found)?;
    if d.is_dispense {
        return Err(unprocessable("Dispense already confirmed."));
    }
    d.is_dispense = true;
    d.receive_by = Some(body.receive_by);
    d.dispense_at = Some(body.dispense_at);
    ack()
}

// ============================================================================
// Libraries
// ============================================================================

async fn list_library(State(state): State<Arc<MockState>>, Path(slug): Path<String>) -> ApiResult {
    let db = state.db.lock().unwrap();
    let rows: Vec<NamedRef> = db
        .libraries
        .get(&slug)
        .map(|t| t.values().cloned().collect())
        .unwrap_or_default();
    list(rows)
}

async fn create_library(
    State(state): State<Arc<MockState>>,
    Path(slug): Path<String>,
    Json(body): Json<LibraryPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let id = db.next_id();
    let record = NamedRef {
        id,
        name: body.name,
    };
    db.libraries.entry(slug).or_default().insert(id, record.clone());
    ok(record)
}

async fn update_library(
    State(state): State<Arc<MockState>>,
    Path((slug, id)): Path<(String, u64)>,
    Json(body): Json<LibraryPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let record = db
        .libraries
        .get_mut(&slug)
        .and_then(|t| t.get_mut(&id))
        .ok_or_else(not_found)?;
    record.name = body.name;
    ack()
}

async fn delete_library(
    State(state): State<Arc<MockState>>,
    Path((slug, id)): Path<(String, u64)>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    db.libraries
        .get_mut(&slug)
        .and_then(|t| t.remove(&id))
        .ok_or_else(not_found)?;
    ack()
}

// ============================================================================
// Inspections
// ============================================================================

fn inspections_where(
    state: &MockState,
    params: &BTreeMap<String, String>,
    forwarded: Option<bool>,
) -> Vec<Inspection> {
    state
        .db
        .lock()
        .unwrap()
        .inspections
        .values()
        .filter(|i| forwarded.map_or(true, |f| i.is_forward == f))
        .filter(|i| {
            params
                .get("iar_no")
                .map_or(true, |s| i.iar_no.contains(s.as_str()))
        })
        .cloned()
        .collect()
}

async fn list_inspections(
    State(state): State<Arc<MockState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult {
    list(inspections_where(&state, &params, None))
}

async fn inspections_to_forward(
    State(state): State<Arc<MockState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult {
    list(inspections_where(&state, &params, Some(false)))
}

async fn forwarded_inspections(
    State(state): State<Arc<MockState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult {
    list(inspections_where(&state, &params, Some(true)))
}

async fn create_inspection(
    State(state): State<Arc<MockState>>,
    Json(body): Json<InspectionPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    if db.inspections.values().any(|i| i.iar_no == body.iar_no) {
        return Err(unprocessable("The iar no has already been taken."));
    }
    let id = db.next_id();
    let inspection = Inspection {
        id,
        iar_no: body.iar_no,
        for_warehouse: body.for_warehouse.unwrap_or(true),
        is_forward: false,
        remarks: body.remarks,
        delivery: None,
        purchase_order: None,
    };
    db.inspections.insert(id, inspection.clone());
    ok(inspection)
}

async fn show_inspection(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> ApiResult {
    let db = state.db.lock().unwrap();
    let inspection = db.inspections.get(&id).ok_or_else(not_found)?;
    let total: Decimal = db
        .delivery_items
        .values()
        .filter(|(owner, _)| *owner == id)
        .map(|(_, item)| item.quantity * item.unit_price)
        .sum();
    ok(json!({ "inspection": inspection, "total_amount": total }))
}

async fn update_inspection(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<InspectionUpdate>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let inspection = db.inspections.get_mut(&id).ok_or_else(not_found)?;
    if let Some(iar_no) = body.iar_no {
        inspection.iar_no = iar_no;
    }
    if body.remarks.is_some() {
        inspection.remarks = body.remarks;
    }
    ack()
}

async fn delete_inspection(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    db.inspections.remove(&id).ok_or_else(not_found)?;
    db.delivery_items.retain(|_, (owner, _)| *owner != id);
    ack()
}

async fn update_remarks(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let inspection = db.inspections.get_mut(&id).ok_or_else(not_found)?;
    inspection.remarks = body["remarks"].as_str().map(str::to_string);
    ack()
}

async fn submit_inspection(State(state): State<Arc<MockState>>, Path(id): Path<u64>) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let inspection = db.inspections.get_mut(&id).ok_or_else(not_found)?;
    if inspection.is_forward {
        return Err(unprocessable("Inspection already forwarded."));
    }
    inspection.is_forward = true;
    ack()
}

async fn list_delivery_items(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    let db = state.db.lock().unwrap();
    let rows: Vec<DeliveryItem> = db
        .delivery_items
        .values()
        .filter(|(owner, _)| *owner == id)
        .map(|(_, item)| item.clone())
        .collect();
    list(rows)
}

async fn add_delivery_item(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<DeliveryItemPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    if !db.inspections.contains_key(&id) {
        return Err(not_found());
    }
    let item_id = db.next_id();
    let item = DeliveryItem {
        id: item_id,
        product_id: body.product_id,
        brand_id: body.brand_id,
        lot_no: body.lot_no,
        quantity: body.quantity,
        unit_price: body.unit_price,
        expiry_date: body.expiry_date,
        product: None,
        brand: None,
    };
    db.delivery_items.insert(item_id, (id, item.clone()));
    ok(item)
}

async fn update_delivery_item(
    State(state): State<Arc<MockState>>,
    Path(item_id): Path<u64>,
    Json(body): Json<DeliveryItemUpdate>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let (_, item) = db.delivery_items.get_mut(&item_id).ok_or_else(not_found)?;
    item.quantity = body.quantity;
    item.unit_price = body.unit_price;
    ack()
}

async fn delete_delivery_item(
    State(state): State<Arc<MockState>>,
    Path(item_id): Path<u64>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    db.delivery_items.remove(&item_id).ok_or_else(not_found)?;
    ack()
}

// ============================================================================
// Users, dashboard and logs
// ============================================================================

async fn list_users(State(state): State<Arc<MockState>>) -> ApiResult {
    let db = state.db.lock().unwrap();
    list(db.users.values().cloned().collect())
}

async fn create_user(
    State(state): State<Arc<MockState>>,
    Json(body): Json<UserPayload>,
) -> ApiResult {
    if body.password.is_none() {
        return Err(unprocessable("The password field is required."));
    }
    let mut db = state.db.lock().unwrap();
    let id = db.next_id();
    let user = User {
        id,
        name: body.name,
        email: body.email,
        role_id: body.role_id,
        role_name: None,
    };
    db.users.insert(id, user.clone());
    ok(user)
}

async fn update_user(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    Json(body): Json<UserPayload>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    let user = db.users.get_mut(&id).ok_or_else(not_found)?;
    user.name = body.name;
    user.email = body.email;
    user.role_id = body.role_id;
    ack()
}

async fn dashboard(State(state): State<Arc<MockState>>) -> ApiResult {
    let db = state.db.lock().unwrap();
    ok(json!({
        "product_count": db.stocks.len(),
        "category_count": 2,
        "low_stock_count": db.stocks.values().filter(|s| s.running_balance < Decimal::TEN).count(),
        "requisition_count": db.requisitions.len(),
        "inspection_count": db.inspections.len(),
        "product_per_category": [{ "name": "Medicines", "total": db.stocks.len() }],
    }))
}

async fn system_logs(
    State(state): State<Arc<MockState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult {
    let mut db = state.db.lock().unwrap();
    db.log_queries.push(params.clone());
    let rows = vec![json!({
        "id": 1,
        "log_name": "default",
        "description": "created",
        "subject_type": "App\\Models\\Requisition",
        "subject_id": 7,
        "causer_type": "App\\Models\\User",
        "causer_id": 1,
        "properties": {},
        "created_at": "2026-01-05 08:30:00",
        "causer": { "id": 1, "name": "Admin" },
    })];
    list(rows)
}
