//! Draft order - the in-memory order being composed or edited
//!
//! All line arithmetic lives here, free of I/O. The total is always derived
//! from the lines; there is no cached total that could drift.

use rust_decimal::Decimal;
use shared::models::{MenuItem, OngoingOrder, OrderCreate, OrderLineItem, OrderType};

/// One menu item on the draft with its quantity (always >= 1)
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub menu_item_id: i64,
    /// Name snapshot taken when the line was created
    pub name: String,
    /// Unit price snapshot taken when the line was created
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl OrderLine {
    fn from_menu_item(item: &MenuItem) -> Self {
        Self {
            menu_item_id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftOrder {
    order_type: OrderType,
    table_number: Option<u32>,
    lines: Vec<OrderLine>,
    order_id: Option<i64>,
    /// Bumped by every line change
    revision: u64,
}

impl DraftOrder {
    /// Empty Takeaway draft with no server id
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a persisted, unpaid order for editing
    pub fn from_ongoing(order: &OngoingOrder) -> Self {
        let lines = order
            .items
            .iter()
            .filter(|item| item.quantity > 0)
            .map(|item| OrderLine {
                menu_item_id: item.menu_item_id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: item.quantity,
            })
            .collect();

        Self {
            order_type: order.order_type,
            table_number: order.table_number.filter(|_| order.order_type.requires_table()),
            lines,
            order_id: Some(order.id),
            revision: 0,
        }
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn table_number(&self) -> Option<u32> {
        self.table_number
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn order_id(&self) -> Option<i64> {
        self.order_id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// A persisted draft: type and table are frozen
    pub fn is_edit_mode(&self) -> bool {
        self.order_id.is_some()
    }

    /// Sum of unit price x quantity over the current lines
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn quantity_of(&self, menu_item_id: i64) -> u32 {
        self.line(menu_item_id).map_or(0, |l| l.quantity)
    }

    fn line(&self, menu_item_id: i64) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.menu_item_id == menu_item_id)
    }

    /// Increment the item's line, appending a new line on first add
    pub fn add_item(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(OrderLine::from_menu_item(item)),
        }
        self.revision += 1;
    }

    /// Decrement the item's line, dropping it at zero.
    ///
    /// Returns `false` when the draft has no line for the item.
    pub fn remove_item(&mut self, menu_item_id: i64) -> bool {
        let Some(idx) = self
            .lines
            .iter()
            .position(|l| l.menu_item_id == menu_item_id)
        else {
            return false;
        };

        if self.lines[idx].quantity > 1 {
            self.lines[idx].quantity -= 1;
        } else {
            self.lines.remove(idx);
        }
        self.revision += 1;
        true
    }

    /// Change the order type; rejected once the order is persisted.
    ///
    /// Switching to Takeaway forgets the table number.
    pub fn set_order_type(&mut self, order_type: OrderType) -> bool {
        if self.is_edit_mode() {
            return false;
        }
        self.order_type = order_type;
        if !order_type.requires_table() {
            self.table_number = None;
        }
        true
    }

    /// Set the table; only meaningful for a Dine-In draft not yet persisted
    pub fn set_table_number(&mut self, table_number: Option<u32>) -> bool {
        if self.is_edit_mode() || !self.order_type.requires_table() {
            return false;
        }
        self.table_number = table_number;
        true
    }

    /// Record the server-assigned id; an assigned id never changes
    pub(crate) fn assign_id(&mut self, order_id: i64) -> bool {
        if self.order_id.is_some() {
            return false;
        }
        self.order_id = Some(order_id);
        true
    }

    /// Lines in wire form
    pub fn line_items(&self) -> Vec<OrderLineItem> {
        self.lines
            .iter()
            .map(|l| OrderLineItem {
                menu_item_id: l.menu_item_id,
                quantity: l.quantity,
            })
            .collect()
    }

    /// Build the create-order payload, checking local preconditions
    pub fn placement_request(&self) -> Result<OrderCreate, String> {
        if self.is_empty() {
            return Err("cannot place an order without items".into());
        }
        let table_number = match self.order_type {
            OrderType::DineIn => Some(
                self.table_number
                    .ok_or_else(|| "a table number is required for Dine-In orders".to_string())?,
            ),
            OrderType::Takeaway => None,
        };
        Ok(OrderCreate {
            order_type: self.order_type,
            table_number,
            items: self.line_items(),
        })
    }
}
