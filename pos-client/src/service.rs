//! Remote services the order workflow depends on
//!
//! [`MenuCatalog`] and [`OrderService`] are the seams between the workflow
//! controller and the backend. [`ApiService`] implements both over HTTP.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{
    MenuItem, OngoingOrder, OrderCreate, OrderItemsUpdate, OrderLineItem, OrderSummary,
    PaymentMethod, PaymentRequest, sort_newest_first,
};
use shared::response::{MessageResponse, OrderCreated};

use crate::{ClientResult, NetworkHttpClient};

/// Read-only menu catalog
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Every purchasable item, in catalog order
    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>>;
}

/// Order persistence, kitchen tickets and payment
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Not-yet-paid orders, newest first
    async fn fetch_ongoing_orders(&self) -> ClientResult<Vec<OngoingOrder>>;

    /// Persist a new order, returning the server-assigned id
    async fn create_order(&self, order: &OrderCreate) -> ClientResult<i64>;

    /// Replace the line list of an existing order
    async fn update_order_items(&self, order_id: i64, items: &[OrderLineItem]) -> ClientResult<()>;

    /// Issue the kitchen order ticket for an order
    async fn issue_kitchen_ticket(&self, order_id: i64) -> ClientResult<String>;

    /// Record payment and close the order
    async fn record_payment(&self, order_id: i64, method: PaymentMethod) -> ClientResult<String>;
}

/// Inclusive date filter for the order history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(rename = "start_date", skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(rename = "end_date", skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Backend API over HTTP
#[derive(Debug, Clone)]
pub struct ApiService {
    http: NetworkHttpClient,
}

impl ApiService {
    pub fn new(http: NetworkHttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &NetworkHttpClient {
        &self.http
    }

    /// All orders (completed and ongoing), newest first, optionally by date
    pub async fn order_history(&self, range: DateRange) -> ClientResult<Vec<OrderSummary>> {
        self.http.get_with_query("/orders", &range).await
    }
}

#[async_trait]
impl MenuCatalog for ApiService {
    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
        self.http.get("/menu").await
    }
}

#[async_trait]
impl OrderService for ApiService {
    async fn fetch_ongoing_orders(&self) -> ClientResult<Vec<OngoingOrder>> {
        let mut orders: Vec<OngoingOrder> = self.http.get("/orders/ongoing").await?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    async fn create_order(&self, order: &OrderCreate) -> ClientResult<i64> {
        let created: OrderCreated = self.http.post("/orders", order).await?;
        tracing::info!(order_id = created.order_id, "Order created");
        Ok(created.order_id)
    }

    async fn update_order_items(&self, order_id: i64, items: &[OrderLineItem]) -> ClientResult<()> {
        let body = OrderItemsUpdate {
            items: items.to_vec(),
        };
        let _: MessageResponse = self
            .http
            .put(&format!("/orders/{order_id}/items"), &body)
            .await?;
        Ok(())
    }

    async fn issue_kitchen_ticket(&self, order_id: i64) -> ClientResult<String> {
        let resp: MessageResponse = self
            .http
            .post_empty(&format!("/orders/{order_id}/kot"))
            .await?;
        Ok(resp.message)
    }

    async fn record_payment(&self, order_id: i64, method: PaymentMethod) -> ClientResult<String> {
        let body = PaymentRequest {
            payment_method: method,
        };
        let resp: MessageResponse = self
            .http
            .post(&format!("/orders/{order_id}/payment"), &body)
            .await?;
        Ok(resp.message)
    }
}
