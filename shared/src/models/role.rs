//! Role Model
//!
//! Roles come from the backend as free-form strings. What each role may open
//! is a static table consulted by the navigation layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "manager")]
    Manager,
    #[serde(rename = "waiter")]
    Waiter,
    #[serde(rename = "cashier")]
    Cashier,
    // Backend spelling
    #[serde(rename = "head cheff")]
    HeadChef,
    #[serde(rename = "cheff")]
    Chef,
    /// Any role string this client does not know; grants nothing
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Waiter => "waiter",
            Self::Cashier => "cashier",
            Self::HeadChef => "head cheff",
            Self::Chef => "cheff",
            Self::Unknown => "unknown",
        }
    }

    /// Capability check keyed by role and screen
    pub fn can_access(&self, screen: Screen) -> bool {
        use Role::*;
        use Screen::*;

        match screen {
            AddOrder => matches!(self, Admin | Manager | Waiter | Cashier),
            Orders => matches!(self, Admin | Manager | HeadChef | Cashier | Chef),
            MenuManagement => matches!(self, Admin),
            InventoryManagement => matches!(self, Admin | Manager | HeadChef),
            SalesReport => matches!(self, Admin | Manager | Cashier),
            InventoryReport => matches!(self, Admin | Manager | HeadChef),
            Predictions => matches!(self, Admin | Manager | HeadChef),
            UserRegistration => matches!(self, Admin),
        }
    }

    /// Screens this role may open, in navigation order
    pub fn screens(&self) -> Vec<Screen> {
        Screen::ALL
            .into_iter()
            .filter(|s| self.can_access(*s))
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigable screen of the POS client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    AddOrder,
    Orders,
    MenuManagement,
    InventoryManagement,
    SalesReport,
    InventoryReport,
    Predictions,
    UserRegistration,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::AddOrder,
        Screen::Orders,
        Screen::MenuManagement,
        Screen::InventoryManagement,
        Screen::SalesReport,
        Screen::InventoryReport,
        Screen::Predictions,
        Screen::UserRegistration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddOrder => "add_order",
            Self::Orders => "orders",
            Self::MenuManagement => "menu_management",
            Self::InventoryManagement => "inventory_management",
            Self::SalesReport => "sales_report",
            Self::InventoryReport => "inventory_report",
            Self::Predictions => "predictions",
            Self::UserRegistration => "user_registration",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|screen| screen.as_str() == wanted)
            .ok_or_else(|| ParseError::Screen(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        let role: Role = serde_json::from_str(r#""head cheff""#).unwrap();
        assert_eq!(role, Role::HeadChef);
        let role: Role = serde_json::from_str(r#""sommelier""#).unwrap();
        assert_eq!(role, Role::Unknown);
        assert_eq!(serde_json::to_string(&Role::Chef).unwrap(), r#""cheff""#);
    }

    #[test]
    fn test_admin_sees_everything() {
        assert_eq!(Role::Admin.screens(), Screen::ALL.to_vec());
    }

    #[test]
    fn test_unknown_role_sees_nothing() {
        assert!(Role::Unknown.screens().is_empty());
    }

    #[test]
    fn test_capability_table() {
        assert_eq!(
            Role::Waiter.screens(),
            vec![Screen::AddOrder]
        );
        assert_eq!(
            Role::Chef.screens(),
            vec![Screen::Orders]
        );
        assert_eq!(
            Role::Cashier.screens(),
            vec![Screen::AddOrder, Screen::Orders, Screen::SalesReport]
        );
        assert_eq!(
            Role::HeadChef.screens(),
            vec![
                Screen::Orders,
                Screen::InventoryManagement,
                Screen::InventoryReport,
                Screen::Predictions,
            ]
        );
        assert!(!Role::Manager.can_access(Screen::MenuManagement));
        assert!(!Role::Manager.can_access(Screen::UserRegistration));
        assert!(Role::Manager.can_access(Screen::SalesReport));
    }

    #[test]
    fn test_screen_from_str() {
        assert_eq!("add-order".parse::<Screen>().unwrap(), Screen::AddOrder);
        assert_eq!("Sales_Report".parse::<Screen>().unwrap(), Screen::SalesReport);
        assert!("kitchen".parse::<Screen>().is_err());
    }
}
