// pos-client/tests/common/backend.rs
// In-process fake of the restaurant backend

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{Duration, NaiveDateTime};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::client::{LoginRequest, LoginResponse, RegisterRequest};
use shared::models::{
    MenuItem, OngoingOrder, OrderCreate, OrderItemDetail, OrderItemsUpdate, OrderLineItem,
    OrderStatus, OrderSummary, OrderType, PaymentMethod, PaymentRequest, Role,
};
use shared::response::{ErrorBody, MessageResponse, OrderCreated};
use std::collections::HashMap;
use std::sync::Arc;

pub const USERNAME: &str = "cashier";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub id: i64,
    pub order_type: OrderType,
    pub table_number: Option<u32>,
    pub items: Vec<OrderLineItem>,
    pub timestamp: NaiveDateTime,
    pub kot_count: u32,
    pub paid_with: Option<PaymentMethod>,
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub menu: Vec<MenuItem>,
    pub orders: Vec<StoredOrder>,
    pub registered: Vec<String>,
    pub last_history_query: Option<HashMap<String, String>>,
    pub next_id: i64,
}

impl BackendState {
    fn details(&self, items: &[OrderLineItem]) -> Vec<OrderItemDetail> {
        items
            .iter()
            .filter_map(|line| {
                self.menu.iter().find(|m| m.id == line.menu_item_id).map(|m| OrderItemDetail {
                    menu_item_id: m.id,
                    name: m.name.clone(),
                    price: m.price,
                    quantity: line.quantity,
                })
            })
            .collect()
    }

    fn total(&self, items: &[OrderLineItem]) -> Decimal {
        self.details(items)
            .iter()
            .map(|d| d.price * Decimal::from(d.quantity))
            .sum()
    }

    pub fn order(&self, id: i64) -> Option<&StoredOrder> {
        self.orders.iter().find(|o| o.id == id)
    }
}

type Shared = Arc<Mutex<BackendState>>;
type Rejection = (StatusCode, Json<ErrorBody>);

fn reject(status: StatusCode, msg: &str) -> Rejection {
    (status, Json(ErrorBody::new(msg)))
}

fn check_auth(headers: &HeaderMap) -> Result<(), Rejection> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(reject(StatusCode::UNAUTHORIZED, "Missing or invalid token")),
    }
}

async fn login(Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>, Rejection> {
    if req.username == USERNAME && req.password == PASSWORD {
        Ok(Json(LoginResponse {
            access_token: TOKEN.to_string(),
            role: Role::Cashier,
        }))
    } else {
        Err(reject(StatusCode::UNAUTHORIZED, "Invalid username or password"))
    }
}

async fn register(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), Rejection> {
    check_auth(&headers)?;
    let mut state = state.lock();
    if state.registered.contains(&req.username) {
        return Err(reject(StatusCode::BAD_REQUEST, "Username already exists"));
    }
    state.registered.push(req.username);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

async fn list_menu(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<MenuItem>>, Rejection> {
    check_auth(&headers)?;
    Ok(Json(state.lock().menu.clone()))
}

async fn ongoing(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<OngoingOrder>>, Rejection> {
    check_auth(&headers)?;
    let state = state.lock();
    // Insertion order (oldest first), like the real backend
    let orders = state
        .orders
        .iter()
        .filter(|o| o.paid_with.is_none())
        .map(|o| OngoingOrder {
            id: o.id,
            order_type: o.order_type,
            total_price: state.total(&o.items),
            table_number: o.table_number,
            timestamp: o.timestamp,
            items: state.details(&o.items),
        })
        .collect();
    Ok(Json(orders))
}

async fn history(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<OrderSummary>>, Rejection> {
    check_auth(&headers)?;
    let mut state = state.lock();
    state.last_history_query = Some(query);
    let mut orders: Vec<OrderSummary> = state
        .orders
        .iter()
        .map(|o| OrderSummary {
            id: o.id,
            order_type: o.order_type,
            total_price: state.total(&o.items),
            status: if o.paid_with.is_some() {
                OrderStatus::Completed
            } else {
                OrderStatus::Ongoing
            },
            table_number: o.table_number,
            timestamp: o.timestamp,
            items: state.details(&o.items),
        })
        .collect();
    orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(Json(orders))
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<OrderCreate>,
) -> Result<(StatusCode, Json<OrderCreated>), Rejection> {
    check_auth(&headers)?;
    if req.items.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Order type and items are required"));
    }
    if req.order_type == OrderType::DineIn && req.table_number.is_none() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Table number is required for Dine-In orders",
        ));
    }

    let mut state = state.lock();
    state.next_id += 1;
    let id = state.next_id;
    let base = NaiveDateTime::parse_from_str("2024-03-01 10:00:00", "%Y-%m-%d %H:%M:%S")
        .map_err(|_| reject(StatusCode::INTERNAL_SERVER_ERROR, "clock"))?;
    state.orders.push(StoredOrder {
        id,
        order_type: req.order_type,
        table_number: req.table_number,
        items: req.items,
        timestamp: base + Duration::minutes(id),
        kot_count: 0,
        paid_with: None,
    });
    Ok((
        StatusCode::CREATED,
        Json(OrderCreated {
            message: "Order added successfully!".into(),
            order_id: id,
        }),
    ))
}

async fn update_items(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<OrderItemsUpdate>,
) -> Result<Json<MessageResponse>, Rejection> {
    check_auth(&headers)?;
    let mut state = state.lock();
    let order = state
        .orders
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Order not found"))?;
    order.items = req.items;
    Ok(Json(MessageResponse::new("Order updated successfully!")))
}

async fn kot(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, Rejection> {
    check_auth(&headers)?;
    let mut state = state.lock();
    let order = state
        .orders
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Order not found"))?;
    order.kot_count += 1;
    Ok(Json(MessageResponse::new("KOT printed successfully!")))
}

async fn payment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<MessageResponse>, Rejection> {
    check_auth(&headers)?;
    let mut state = state.lock();
    let order = state
        .orders
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Order not found"))?;
    order.paid_with = Some(req.payment_method);
    Ok(Json(MessageResponse::new(format!(
        "Payment successful using {}!",
        req.payment_method
    ))))
}

/// Running fake backend
pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    pub async fn start(menu: Vec<MenuItem>) -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            menu,
            ..BackendState::default()
        }));

        let router = Router::new()
            .route("/login", post(login))
            .route("/register", post(register))
            .route("/menu", get(list_menu))
            .route("/orders", get(history).post(create_order))
            .route("/orders/ongoing", get(ongoing))
            .route("/orders/{id}/items", put(update_items))
            .route("/orders/{id}/kot", post(kot))
            .route("/orders/{id}/payment", post(payment))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }
}
