//! Order workflow controller
//!
//! Drives one draft order through
//! `Composing -> Placed -> TicketIssued -> (paid) -> Composing`.
//!
//! Local edits apply immediately and never fail. Remote transitions are
//! split around the network call: preconditions are checked and the request
//! is captured under the lock, the lock is released for the call, and the
//! result is applied only if the draft was not reset in the meantime.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::models::{
    MenuItem, OngoingOrder, OrderType, PaymentMethod, group_by_category,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::draft::{DraftOrder, OrderLine};
use super::error::{Transition, WorkflowError, WorkflowResult};
use crate::cache::ListCache;
use crate::service::{ApiService, MenuCatalog, OrderService};

/// Observable workflow state.
///
/// Payment is terminal and resets the draft at once, so a paid order is
/// reported through [`PaymentReceipt`] rather than as a lasting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No server id yet
    Composing,
    /// Persisted, kitchen ticket not issued in this session
    Placed,
    /// Kitchen ticket issued, payment possible
    TicketIssued,
}

/// Result of [`OrderWorkflow::print_ticket`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketOutcome {
    Issued { order_id: i64, message: String },
    /// Ticket already current; nothing was sent
    Skipped,
}

/// Result of a successful [`OrderWorkflow::complete_payment`]
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub order_id: i64,
    pub method: PaymentMethod,
    pub total: Decimal,
    pub message: String,
    /// Whether the ongoing-orders list was reloaded after payment
    pub ongoing_orders_refreshed: bool,
}

/// Read-only view of the controller for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub order_id: Option<i64>,
    pub order_type: OrderType,
    pub table_number: Option<u32>,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub reprint_allowed: bool,
    pub in_flight: Option<Transition>,
}

#[derive(Debug, Default)]
struct Inner {
    draft: DraftOrder,
    ticket_issued: bool,
    /// Lines changed since the last ticket
    reprint_allowed: bool,
    payment_method: Option<PaymentMethod>,
    in_flight: Option<Transition>,
    /// Bumped whenever the draft is discarded
    epoch: u64,
}

impl Inner {
    fn state(&self) -> WorkflowState {
        match (self.draft.order_id(), self.ticket_issued) {
            (None, _) => WorkflowState::Composing,
            (Some(_), false) => WorkflowState::Placed,
            (Some(_), true) => WorkflowState::TicketIssued,
        }
    }

    fn ensure_idle(&self) -> WorkflowResult<()> {
        match self.in_flight {
            Some(t) => Err(WorkflowError::InFlight(t)),
            None => Ok(()),
        }
    }

    /// Discard the draft and everything tied to it
    fn reset(&mut self, draft: DraftOrder) {
        self.draft = draft;
        self.ticket_issued = false;
        self.reprint_allowed = false;
        self.payment_method = None;
        self.in_flight = None;
        self.epoch += 1;
    }
}

/// Marks a remote transition in flight; clears the mark on drop unless the
/// draft has been reset since (reset clears it itself).
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    transition: Transition,
    epoch: u64,
}

impl<'a> InFlight<'a> {
    fn start(mutex: &'a Mutex<Inner>, inner: &mut Inner, transition: Transition) -> Self {
        inner.in_flight = Some(transition);
        Self {
            inner: mutex,
            transition,
            epoch: inner.epoch,
        }
    }

    fn is_current(&self, inner: &Inner) -> bool {
        inner.epoch == self.epoch
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        if inner.epoch == self.epoch && inner.in_flight == Some(self.transition) {
            inner.in_flight = None;
        }
    }
}

/// Client-side controller for one in-progress order
pub struct OrderWorkflow {
    orders: Arc<dyn OrderService>,
    catalog: Arc<dyn MenuCatalog>,
    inner: Mutex<Inner>,
    menu: tokio::sync::Mutex<ListCache<MenuItem>>,
    ongoing: tokio::sync::Mutex<ListCache<OngoingOrder>>,
}

impl OrderWorkflow {
    pub fn new(orders: Arc<dyn OrderService>, catalog: Arc<dyn MenuCatalog>) -> Self {
        Self {
            orders,
            catalog,
            inner: Mutex::new(Inner::default()),
            menu: tokio::sync::Mutex::new(ListCache::new()),
            ongoing: tokio::sync::Mutex::new(ListCache::new()),
        }
    }

    /// Controller backed by the HTTP API for both catalog and orders
    pub fn from_api(api: Arc<ApiService>) -> Self {
        Self::new(api.clone(), api)
    }

    // ========== Read access ==========

    pub fn state(&self) -> WorkflowState {
        self.inner.lock().state()
    }

    pub fn order_id(&self) -> Option<i64> {
        self.inner.lock().draft.order_id()
    }

    pub fn total(&self) -> Decimal {
        self.inner.lock().draft.total()
    }

    pub fn is_reprint_allowed(&self) -> bool {
        self.inner.lock().reprint_allowed
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let inner = self.inner.lock();
        WorkflowSnapshot {
            state: inner.state(),
            order_id: inner.draft.order_id(),
            order_type: inner.draft.order_type(),
            table_number: inner.draft.table_number(),
            lines: inner.draft.lines().to_vec(),
            total: inner.draft.total(),
            payment_method: inner.payment_method,
            reprint_allowed: inner.reprint_allowed,
            in_flight: inner.in_flight,
        }
    }

    // ========== Local transitions ==========

    /// Add one unit of `item`. After a ticket has been issued this makes a
    /// reprint necessary.
    pub fn add_item(&self, item: &MenuItem) {
        let mut inner = self.inner.lock();
        inner.draft.add_item(item);
        if inner.ticket_issued {
            inner.reprint_allowed = true;
        }
        tracing::debug!(
            menu_item_id = item.id,
            quantity = inner.draft.quantity_of(item.id),
            "Item added"
        );
    }

    /// Remove one unit of the item; `false` when the draft has no such line
    pub fn remove_item(&self, menu_item_id: i64) -> bool {
        let mut inner = self.inner.lock();
        if !inner.draft.remove_item(menu_item_id) {
            return false;
        }
        if inner.ticket_issued {
            inner.reprint_allowed = true;
        }
        tracing::debug!(
            menu_item_id,
            quantity = inner.draft.quantity_of(menu_item_id),
            "Item removed"
        );
        true
    }

    /// Change the order type; `false` once the order is persisted
    pub fn set_order_type(&self, order_type: OrderType) -> bool {
        self.inner.lock().draft.set_order_type(order_type)
    }

    /// Set the Dine-In table; `false` once persisted or for Takeaway
    pub fn set_table_number(&self, table_number: Option<u32>) -> bool {
        self.inner.lock().draft.set_table_number(table_number)
    }

    /// Choose how the order will be paid; only accepted once the ticket is out
    pub fn select_payment_method(&self, method: PaymentMethod) -> bool {
        let mut inner = self.inner.lock();
        if inner.state() != WorkflowState::TicketIssued {
            return false;
        }
        inner.payment_method = Some(method);
        true
    }

    /// Drop the persisted draft without telling the server
    pub fn cancel_edit(&self) -> bool {
        let mut inner = self.inner.lock();
        let Some(order_id) = inner.draft.order_id() else {
            return false;
        };
        inner.reset(DraftOrder::new());
        tracing::info!(order_id, "Order edit cancelled");
        true
    }

    /// Replace the current draft (whatever its state) with an ongoing order
    pub fn resume_ongoing_order(&self, order: &OngoingOrder) {
        let mut inner = self.inner.lock();
        inner.reset(DraftOrder::from_ongoing(order));
        tracing::info!(order_id = order.id, "Resumed ongoing order");
    }

    /// Resume an order from the cached ongoing list
    pub async fn resume_ongoing_order_by_id(&self, order_id: i64) -> WorkflowResult<()> {
        let order = {
            let cache = self.ongoing.lock().await;
            cache.items().iter().find(|o| o.id == order_id).cloned()
        };
        let order = order.ok_or_else(|| {
            WorkflowError::validation(format!("order {order_id} is not in the ongoing list"))
        })?;
        self.resume_ongoing_order(&order);
        Ok(())
    }

    // ========== Remote transitions ==========

    /// Persist the draft and enter edit mode
    pub async fn place_order(&self) -> WorkflowResult<i64> {
        let (flight, request) = {
            let mut inner = self.inner.lock();
            inner.ensure_idle()?;
            if inner.draft.order_id().is_some() {
                return Err(WorkflowError::validation("order has already been placed"));
            }
            let request = inner
                .draft
                .placement_request()
                .map_err(WorkflowError::Validation)?;
            (
                InFlight::start(&self.inner, &mut inner, Transition::PlaceOrder),
                request,
            )
        };

        let result = self.orders.create_order(&request).await;

        let order_id = {
            let mut inner = self.inner.lock();
            if !flight.is_current(&inner) {
                tracing::warn!("Discarding create-order response for a replaced draft");
                return Err(WorkflowError::Superseded);
            }
            let order_id = result.map_err(|e| {
                tracing::warn!(error = %e, "Failed to place order");
                WorkflowError::from(e)
            })?;
            inner.draft.assign_id(order_id);
            tracing::info!(
                order_id,
                order_type = %request.order_type,
                lines = request.items.len(),
                "Order placed"
            );
            order_id
        };

        drop(flight);
        self.ongoing.lock().await.invalidate();
        Ok(order_id)
    }

    /// Push the current lines, then issue the kitchen ticket.
    ///
    /// Sends nothing when a ticket was already issued and the lines have not
    /// changed since.
    pub async fn print_ticket(&self) -> WorkflowResult<TicketOutcome> {
        let (flight, order_id, items, revision) = {
            let mut inner = self.inner.lock();
            inner.ensure_idle()?;
            let Some(order_id) = inner.draft.order_id() else {
                return Err(WorkflowError::validation(
                    "place the order before printing the kitchen ticket",
                ));
            };
            if inner.ticket_issued && !inner.reprint_allowed {
                tracing::debug!(order_id, "Kitchen ticket already current, skipping");
                return Ok(TicketOutcome::Skipped);
            }
            if inner.draft.is_empty() {
                return Err(WorkflowError::validation(
                    "cannot print a kitchen ticket for an order without items",
                ));
            }
            let items = inner.draft.line_items();
            let revision = inner.draft.revision();
            (
                InFlight::start(&self.inner, &mut inner, Transition::PrintTicket),
                order_id,
                items,
                revision,
            )
        };

        let pushed = self.orders.update_order_items(order_id, &items).await;
        if pushed.is_ok() {
            self.ongoing.lock().await.invalidate();
        }
        // No await between this check and the ticket request.
        {
            let inner = self.inner.lock();
            if !flight.is_current(&inner) {
                tracing::warn!(order_id, "Draft replaced while pushing lines, ticket not issued");
                return Err(WorkflowError::Superseded);
            }
        }
        pushed.map_err(|e| {
            tracing::warn!(order_id, error = %e, "Failed to push order lines");
            WorkflowError::from(e)
        })?;

        let issued = self.orders.issue_kitchen_ticket(order_id).await;
        let message = {
            let mut inner = self.inner.lock();
            if !flight.is_current(&inner) {
                tracing::warn!(order_id, "Discarding kitchen-ticket response for a replaced draft");
                return Err(WorkflowError::Superseded);
            }
            let message = issued.map_err(|e| {
                tracing::warn!(order_id, error = %e, "Failed to issue kitchen ticket");
                WorkflowError::from(e)
            })?;
            inner.ticket_issued = true;
            // Edits made while the request was in flight are not on this ticket.
            inner.reprint_allowed = inner.draft.revision() != revision;
            message
        };

        tracing::info!(order_id, lines = items.len(), "Kitchen ticket issued");
        Ok(TicketOutcome::Issued { order_id, message })
    }

    /// Settle the order with the selected method and start a fresh draft.
    ///
    /// Rejected while edits made after the last ticket are still unprinted.
    pub async fn complete_payment(&self) -> WorkflowResult<PaymentReceipt> {
        let (flight, order_id, method, total) = {
            let mut inner = self.inner.lock();
            inner.ensure_idle()?;
            if inner.state() != WorkflowState::TicketIssued {
                return Err(WorkflowError::validation(
                    "the kitchen ticket must be issued before payment",
                ));
            }
            if inner.reprint_allowed {
                return Err(WorkflowError::validation(
                    "items changed since the last kitchen ticket; print the updated ticket first",
                ));
            }
            let Some(method) = inner.payment_method else {
                return Err(WorkflowError::validation("select a payment method first"));
            };
            let order_id = inner
                .draft
                .order_id()
                .ok_or_else(|| WorkflowError::validation("order has not been placed"))?;
            let total = inner.draft.total();
            (
                InFlight::start(&self.inner, &mut inner, Transition::CompletePayment),
                order_id,
                method,
                total,
            )
        };

        let result = self.orders.record_payment(order_id, method).await;
        let message = {
            let mut inner = self.inner.lock();
            if !flight.is_current(&inner) {
                tracing::warn!(order_id, "Discarding payment response for a replaced draft");
                return Err(WorkflowError::Superseded);
            }
            let message = result.map_err(|e| {
                tracing::warn!(order_id, error = %e, "Payment failed");
                WorkflowError::from(e)
            })?;
            inner.reset(DraftOrder::new());
            message
        };
        drop(flight);
        tracing::info!(order_id, method = %method, total = %total, "Order paid");

        self.ongoing.lock().await.invalidate();
        let ongoing_orders_refreshed = match self.refresh_ongoing_orders().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh ongoing orders after payment");
                false
            }
        };

        Ok(PaymentReceipt {
            order_id,
            method,
            total,
            message,
            ongoing_orders_refreshed,
        })
    }

    // ========== Cached lists ==========

    /// Reload the menu catalog
    pub async fn refresh_menu(&self) -> WorkflowResult<Vec<MenuItem>> {
        let mut cache = self.menu.lock().await;
        let items = cache.refresh(|| self.catalog.fetch_menu()).await?;
        Ok(items.to_vec())
    }

    /// Menu items from the last refresh
    pub async fn menu_items(&self) -> Vec<MenuItem> {
        self.menu.lock().await.items().to_vec()
    }

    /// Menu from the last refresh, grouped by category
    pub async fn menu_by_category(&self) -> BTreeMap<String, Vec<MenuItem>> {
        group_by_category(self.menu.lock().await.items())
    }

    /// Look up a menu item from the last refresh
    pub async fn find_menu_item(&self, menu_item_id: i64) -> Option<MenuItem> {
        self.menu
            .lock()
            .await
            .items()
            .iter()
            .find(|i| i.id == menu_item_id)
            .cloned()
    }

    /// Reload the ongoing-orders list (newest first)
    pub async fn refresh_ongoing_orders(&self) -> WorkflowResult<Vec<OngoingOrder>> {
        let mut cache = self.ongoing.lock().await;
        let orders = cache.refresh(|| self.orders.fetch_ongoing_orders()).await?;
        Ok(orders.to_vec())
    }

    /// Ongoing orders from the last refresh
    pub async fn ongoing_orders(&self) -> Vec<OngoingOrder> {
        self.ongoing.lock().await.items().to_vec()
    }

    /// Whether a mutation happened since the ongoing list was last loaded
    pub async fn ongoing_orders_stale(&self) -> bool {
        self.ongoing.lock().await.is_stale()
    }
}
