//! Plain-text rendering of menu, draft and order lists

use pos_client::{OngoingOrder, WorkflowSnapshot, WorkflowState};
use rust_decimal::Decimal;
use shared::models::{MenuItem, OrderSummary};
use std::collections::BTreeMap;
use std::fmt::Write;

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

pub fn menu(grouped: &BTreeMap<String, Vec<MenuItem>>) -> String {
    if grouped.is_empty() {
        return "menu is empty".into();
    }
    let mut out = String::new();
    for (category, items) in grouped {
        let _ = writeln!(out, "[{category}]");
        for item in items {
            let _ = writeln!(out, "  {:>4}  {:<32} {:>9}", item.id, item.name, money(item.price));
        }
    }
    out
}

pub fn draft(snap: &WorkflowSnapshot) -> String {
    let mut out = String::new();
    let header = match (snap.state, snap.order_id) {
        (WorkflowState::Composing, _) | (_, None) => "new order".to_string(),
        (WorkflowState::Placed, Some(id)) => format!("order #{id} (placed)"),
        (WorkflowState::TicketIssued, Some(id)) => format!("order #{id} (ticket issued)"),
    };
    let _ = write!(out, "{header} - {}", snap.order_type);
    if let Some(table) = snap.table_number {
        let _ = write!(out, ", table {table}");
    }
    out.push('\n');

    if snap.lines.is_empty() {
        out.push_str("  (no items)\n");
    }
    for line in &snap.lines {
        let _ = writeln!(
            out,
            "  {:>4}  {:<28} x{:<3} {:>9}",
            line.menu_item_id,
            line.name,
            line.quantity,
            money(line.line_total())
        );
    }
    let _ = writeln!(out, "  total {:>42}", money(snap.total));

    if snap.reprint_allowed {
        out.push_str("  items changed since the last ticket; `print` to reprint\n");
    }
    if let Some(method) = snap.payment_method {
        let _ = writeln!(out, "  paying by {method}");
    }
    out
}

pub fn ongoing(orders: &[OngoingOrder]) -> String {
    if orders.is_empty() {
        return "no ongoing orders".into();
    }
    let mut out = String::new();
    for order in orders {
        let table = order
            .table_number
            .map(|t| format!("table {t}"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "#{:<5} {}  {:<9} {:<9} {:>9}",
            order.id,
            order.timestamp.format("%H:%M"),
            order.order_type,
            table,
            money(order.total_price)
        );
        for item in &order.items {
            let _ = writeln!(out, "         {} x{}", item.name, item.quantity);
        }
    }
    out
}

pub fn history(orders: &[OrderSummary]) -> String {
    if orders.is_empty() {
        return "no orders in range".into();
    }
    let mut out = String::new();
    for order in orders {
        let _ = writeln!(
            out,
            "#{:<5} {}  {:<9} {:<10} {:>9}",
            order.id,
            order.timestamp.format("%Y-%m-%d %H:%M"),
            order.order_type,
            format!("{:?}", order.status),
            money(order.total_price)
        );
    }
    let total: Decimal = orders.iter().map(|o| o.total_price).sum();
    let _ = writeln!(out, "{} orders, {}", orders.len(), money(total));
    out
}
