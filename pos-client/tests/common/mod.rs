// pos-client/tests/common/mod.rs
// Shared test fixtures

#![allow(dead_code)]

pub mod backend;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use pos_client::{ClientError, ClientResult, MenuCatalog, OrderService, OrderWorkflow};
use rust_decimal::Decimal;
use shared::models::{
    MenuItem, OngoingOrder, OrderCreate, OrderItemDetail, OrderLineItem, OrderType, PaymentMethod,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("pos_client=debug"))
        .with_test_writer()
        .try_init();
}

pub fn item(id: i64, name: &str, cents: i64) -> MenuItem {
    MenuItem::new(id, name, Decimal::new(cents, 2))
}

pub fn at(ts: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn ongoing(id: i64, order_type: OrderType, table: Option<u32>, lines: &[(&MenuItem, u32)]) -> OngoingOrder {
    let items: Vec<OrderItemDetail> = lines
        .iter()
        .map(|(item, quantity)| OrderItemDetail {
            menu_item_id: item.id,
            name: item.name.clone(),
            price: item.price,
            quantity: *quantity,
        })
        .collect();
    OngoingOrder {
        id,
        order_type,
        total_price: items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum(),
        table_number: table,
        timestamp: at("2024-03-01 12:00:00"),
        items,
    }
}

/// Remote operations of the order service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchOngoing,
    Create,
    UpdateItems,
    IssueTicket,
    Payment,
}

/// Calls received by [`MockOrderService`], in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchOngoing,
    Create(OrderCreate),
    UpdateItems(i64, Vec<OrderLineItem>),
    IssueTicket(i64),
    Payment(i64, PaymentMethod),
}

/// Scripted failure for the next call of an operation
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Unauthorized,
    Internal,
}

impl Failure {
    fn into_error(self) -> ClientError {
        match self {
            Failure::Unauthorized => ClientError::Unauthorized("token expired".into()),
            Failure::Internal => ClientError::Internal("database unavailable".into()),
        }
    }
}

/// Pause point for the next call of an operation
#[derive(Clone, Default)]
pub struct Hold {
    /// Notified once the call has been received
    pub entered: Arc<Notify>,
    /// Notify to let the call return
    pub release: Arc<Notify>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    next_id: i64,
    failures: HashMap<Op, VecDeque<Failure>>,
    holds: HashMap<Op, Hold>,
    ongoing: Vec<OngoingOrder>,
}

/// In-memory order service recording every call
pub struct MockOrderService {
    state: Mutex<MockState>,
}

impl MockOrderService {
    pub fn new() -> Arc<Self> {
        Self::with_first_id(42)
    }

    pub fn with_first_id(first_id: i64) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockState {
                next_id: first_id,
                ..MockState::default()
            }),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls()
            .iter()
            .filter(|c| {
                op == match c {
                    Call::FetchOngoing => Op::FetchOngoing,
                    Call::Create(_) => Op::Create,
                    Call::UpdateItems(..) => Op::UpdateItems,
                    Call::IssueTicket(_) => Op::IssueTicket,
                    Call::Payment(..) => Op::Payment,
                }
            })
            .count()
    }

    pub fn fail_next(&self, op: Op, failure: Failure) {
        self.state
            .lock()
            .failures
            .entry(op)
            .or_default()
            .push_back(failure);
    }

    pub fn hold_next(&self, op: Op) -> Hold {
        let hold = Hold::default();
        self.state.lock().holds.insert(op, hold.clone());
        hold
    }

    pub fn set_ongoing(&self, orders: Vec<OngoingOrder>) {
        self.state.lock().ongoing = orders;
    }

    /// Record the call, then honour any scripted hold or failure
    async fn enter(&self, op: Op, call: Call) -> ClientResult<()> {
        let (hold, failure) = {
            let mut state = self.state.lock();
            state.calls.push(call);
            let hold = state.holds.remove(&op);
            let failure = state.failures.get_mut(&op).and_then(VecDeque::pop_front);
            (hold, failure)
        };
        if let Some(hold) = hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
        match failure {
            Some(f) => Err(f.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OrderService for MockOrderService {
    async fn fetch_ongoing_orders(&self) -> ClientResult<Vec<OngoingOrder>> {
        self.enter(Op::FetchOngoing, Call::FetchOngoing).await?;
        Ok(self.state.lock().ongoing.clone())
    }

    async fn create_order(&self, order: &OrderCreate) -> ClientResult<i64> {
        self.enter(Op::Create, Call::Create(order.clone())).await?;
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        Ok(id)
    }

    async fn update_order_items(&self, order_id: i64, items: &[OrderLineItem]) -> ClientResult<()> {
        self.enter(Op::UpdateItems, Call::UpdateItems(order_id, items.to_vec()))
            .await
    }

    async fn issue_kitchen_ticket(&self, order_id: i64) -> ClientResult<String> {
        self.enter(Op::IssueTicket, Call::IssueTicket(order_id)).await?;
        Ok("KOT printed successfully!".into())
    }

    async fn record_payment(&self, order_id: i64, method: PaymentMethod) -> ClientResult<String> {
        self.enter(Op::Payment, Call::Payment(order_id, method)).await?;
        Ok(format!("Payment successful using {method}!"))
    }
}

/// Fixed catalog
pub struct StaticCatalog(pub Vec<MenuItem>);

#[async_trait]
impl MenuCatalog for StaticCatalog {
    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
        Ok(self.0.clone())
    }
}

/// Controller over the mock service and a small catalog
pub fn workflow(service: &Arc<MockOrderService>) -> OrderWorkflow {
    let catalog = StaticCatalog(vec![
        item(1, "Chicken Kottu", 1000).with_category("Mains"),
        item(2, "Iced Coffee", 500).with_category("Drinks"),
        item(3, "Watalappan", 350),
    ]);
    OrderWorkflow::new(service.clone(), Arc::new(catalog))
}
