#![allow(dead_code)]
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use time::{macros::datetime, OffsetDateTime};
use uuid::Uuid;

use orderdesk_admin::{
    api,
    auth::{create_token, Grant, Operation, Service},
    client::{CrudClient, GetOptions, HttpCrudClient, RequestError},
    models::{
        company::Company,
        order::{CreateOrderRequest, Order, OrderQuery},
    },
    AppState,
};

pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars-long!!";
pub const COMPANY_ID: &str = "c1";
pub const COMPANY_NAME: &str = "Acme Metals";

// ----------------------------------------------------------------------------
// Recording mock for controller tests
// ----------------------------------------------------------------------------

#[derive(Default)]
struct MockState {
    created: Vec<CreateOrderRequest>,
    gets: Vec<(String, GetOptions)>,
    create_error: Option<RequestError>,
    records: HashMap<String, Order>,
}

/// In-process `CrudClient<Order>` that records every call.
#[derive(Clone, Default)]
pub struct MockOrders {
    inner: Arc<Mutex<MockState>>,
}

impl MockOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_creates_with(&self, message: &str) {
        self.inner.lock().unwrap().create_error = Some(RequestError::with_status(400, message));
    }

    pub fn succeed_creates(&self) {
        self.inner.lock().unwrap().create_error = None;
    }

    pub fn insert(&self, order: Order) {
        self.inner.lock().unwrap().records.insert(order.id.clone(), order);
    }

    pub fn created(&self) -> Vec<CreateOrderRequest> {
        self.inner.lock().unwrap().created.clone()
    }

    pub fn gets(&self) -> Vec<(String, GetOptions)> {
        self.inner.lock().unwrap().gets.clone()
    }
}

#[async_trait]
impl CrudClient<Order> for MockOrders {
    async fn create(&self, input: &CreateOrderRequest) -> Result<Order, RequestError> {
        let mut state = self.inner.lock().unwrap();
        state.created.push(input.clone());
        if let Some(e) = &state.create_error {
            return Err(e.clone());
        }
        let order = order_from_request(&format!("o{}", state.created.len()), input);
        state.records.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn get_by_id(&self, id: &str, options: &GetOptions) -> Result<Order, RequestError> {
        let mut state = self.inner.lock().unwrap();
        state.gets.push((id.to_string(), options.clone()));
        state
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| RequestError::with_status(404, format!("Order {} not found", id)))
    }

    async fn list(&self, _query: &OrderQuery) -> Result<Vec<Order>, RequestError> {
        Ok(self.inner.lock().unwrap().records.values().cloned().collect())
    }
}

pub fn company() -> Company {
    Company {
        id: COMPANY_ID.to_string(),
        name: COMPANY_NAME.to_string(),
        description: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn order_from_request(id: &str, req: &CreateOrderRequest) -> Order {
    let now = OffsetDateTime::now_utc();
    Order {
        id: id.to_string(),
        customer_name: req.customer_name.clone(),
        product_category: req.product_category.clone(),
        size: req.size,
        length: req.length,
        weight: req.weight,
        purity: req.purity,
        screw_type: req.screw_type.clone(),
        rhodium_details: req.rhodium_details.clone(),
        delivery_date: req.delivery_date,
        company_id: req.company_id.clone(),
        created_at: Some(now),
        updated_at: Some(now),
        company: None,
    }
}

pub fn sample_request() -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: "Acme".into(),
        product_category: "bolt".into(),
        size: 5,
        length: 10,
        weight: 2,
        purity: 99,
        screw_type: "hex".into(),
        rhodium_details: "none".into(),
        delivery_date: datetime!(2024-01-01 0:00 UTC),
        company_id: COMPANY_ID.into(),
    }
}

pub fn sample_order(id: &str) -> Order {
    let mut order = order_from_request(id, &sample_request());
    order.company = Some(company());
    order
}

// ----------------------------------------------------------------------------
// Stand-in for the remote persistence service
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct RemoteData {
    pub orders: HashMap<String, Order>,
    pub companies: HashMap<String, Company>,
    /// Raw JSON bodies received by `POST /orders`.
    pub create_bodies: Vec<serde_json::Value>,
    /// `Authorization` header of every request received.
    pub auth_headers: Vec<Option<String>>,
    /// Query strings received by `GET /orders/:id`.
    pub get_queries: Vec<HashMap<String, String>>,
    pub reject_creates: Option<String>,
}

pub type Remote = Arc<Mutex<RemoteData>>;

fn record_auth(remote: &Remote, headers: &HeaderMap) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    remote.lock().unwrap().auth_headers.push(auth);
}

async fn remote_create_order(
    State(remote): State<Remote>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    record_auth(&remote, &headers);
    let mut data = remote.lock().unwrap();
    data.create_bodies.push(body.clone());

    if let Some(message) = &data.reject_creates {
        return (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": message })))
            .into_response();
    }

    let req: CreateOrderRequest = match serde_json::from_value(body) {
        Ok(req) => req,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": e.to_string() })))
                .into_response()
        }
    };
    let order = order_from_request(&Uuid::new_v4().to_string(), &req);
    data.orders.insert(order.id.clone(), order.clone());
    Json(order).into_response()
}

async fn remote_get_order(
    State(remote): State<Remote>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record_auth(&remote, &headers);
    let mut data = remote.lock().unwrap();
    data.get_queries.push(query.clone());

    let Some(mut order) = data.orders.get(&id).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("Order {} not found", id) })),
        )
            .into_response();
    };
    let expand = query
        .get("relations")
        .is_some_and(|r| r.split(',').any(|rel| rel == "company"));
    if expand {
        order.company = data.companies.get(&order.company_id).cloned();
    }
    Json(order).into_response()
}

#[derive(Deserialize)]
struct OrderListQuery {
    company_id: Option<String>,
    limit: Option<usize>,
}

async fn remote_list_orders(
    State(remote): State<Remote>,
    headers: HeaderMap,
    Query(q): Query<OrderListQuery>,
) -> Json<Vec<Order>> {
    record_auth(&remote, &headers);
    let data = remote.lock().unwrap();
    let mut orders: Vec<Order> = data
        .orders
        .values()
        .filter(|o| q.company_id.as_deref().map_or(true, |c| o.company_id == c))
        .cloned()
        .collect();
    orders.sort_by(|a, b| a.id.cmp(&b.id));
    if let Some(limit) = q.limit {
        orders.truncate(limit);
    }
    Json(orders)
}

async fn remote_list_companies(State(remote): State<Remote>) -> Json<Vec<Company>> {
    let data = remote.lock().unwrap();
    Json(data.companies.values().cloned().collect())
}

async fn remote_get_company(State(remote): State<Remote>, Path(id): Path<String>) -> Response {
    let data = remote.lock().unwrap();
    match data.companies.get(&id) {
        Some(c) => Json(c.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Company not found" })),
        )
            .into_response(),
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Spin up the remote stand-in seeded with one company.
pub async fn setup_remote() -> (SocketAddr, Remote) {
    let remote: Remote = Arc::default();
    remote
        .lock()
        .unwrap()
        .companies
        .insert(COMPANY_ID.to_string(), company());

    let app = Router::new()
        .route("/orders", get(remote_list_orders).post(remote_create_order))
        .route("/orders/:id", get(remote_get_order))
        .route("/companies", get(remote_list_companies))
        .route("/companies/:id", get(remote_get_company))
        .with_state(remote.clone());

    (serve(app).await, remote)
}

/// Spin up the admin app on a random port, talking to the remote stand-in.
pub async fn setup_test_app() -> (SocketAddr, Remote) {
    let (remote_addr, remote) = setup_remote().await;

    let state = AppState {
        client: HttpCrudClient::new(&format!("http://{}", remote_addr), Duration::from_secs(5))
            .expect("Failed to build remote client"),
        jwt_secret: JWT_SECRET.to_string(),
        auth_redirect_to: "/".to_string(),
    };

    (serve(api::router(state)).await, remote)
}

pub fn grant(entity: &str, operation: Operation) -> Grant {
    Grant::new(entity, operation, Service::Project)
}

/// Token carrying exactly the given grants.
pub fn token_with(grants: &[Grant]) -> String {
    create_token("user-1", grants.to_vec(), JWT_SECRET, 1).expect("Failed to create token")
}

/// Token for a caller allowed to create and read orders and read companies.
pub fn full_token() -> String {
    token_with(&[
        grant("order", Operation::Create),
        grant("order", Operation::Read),
        grant("order", Operation::Update),
        grant("company", Operation::Read),
    ])
}

/// Build a reqwest client that does not follow redirects.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

pub fn sample_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("customer_name", "Acme"),
        ("product_category", "bolt"),
        ("size", "5"),
        ("length", "10"),
        ("weight", "2"),
        ("purity", "99"),
        ("screw_type", "hex"),
        ("rhodium_details", "none"),
        ("delivery_date", "2024-01-01"),
        ("company_id", COMPANY_ID),
    ]
}

pub fn insert_remote_order(remote: &Remote, id: &str) -> Order {
    let order = order_from_request(id, &sample_request());
    remote.lock().unwrap().orders.insert(id.to_string(), order.clone());
    order
}
