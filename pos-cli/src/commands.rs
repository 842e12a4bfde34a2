//! Command line parsing for the interactive loop

use anyhow::{Context, bail};
use chrono::NaiveDate;
use shared::models::{OrderType, PaymentMethod, Screen};

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Reload and print the menu
    Menu,
    Add { menu_item_id: i64, quantity: u32 },
    Remove { menu_item_id: i64, quantity: u32 },
    Type(OrderType),
    Table(Option<u32>),
    Show,
    Place,
    Print,
    Method(PaymentMethod),
    Pay,
    /// Reload and print ongoing orders
    Orders,
    Resume(i64),
    Cancel,
    History {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Login { username: String, password: String },
    Logout,
    Quit,
}

pub const HELP: &str = "\
commands:
  menu                      reload and list the menu
  add <item-id> [qty]       add an item to the draft
  remove <item-id> [qty]    remove an item from the draft
  type takeaway|dine-in     set the order type
  table <n>|none            set the Dine-In table
  show                      print the current draft
  place                     create the order on the server
  print                     send the kitchen ticket
  method cash|card          choose the payment method
  pay                       record payment and start a new order
  orders                    list ongoing orders
  resume <order-id>         load an ongoing order for editing
  cancel                    drop the loaded order
  history [from] [to]       order history, dates as YYYY-MM-DD
  login <user> <password>   log in again
  logout
  quit";

fn parse_id(arg: Option<&str>, what: &str) -> anyhow::Result<i64> {
    let arg = arg.with_context(|| format!("missing {what}"))?;
    arg.parse()
        .with_context(|| format!("invalid {what}: {arg}"))
}

fn parse_quantity(arg: Option<&str>) -> anyhow::Result<u32> {
    match arg {
        None => Ok(1),
        Some(s) => match s.parse::<u32>() {
            Ok(0) | Err(_) => bail!("invalid quantity: {s}"),
            Ok(n) => Ok(n),
        },
    }
}

fn parse_date(arg: Option<&str>) -> anyhow::Result<Option<NaiveDate>> {
    arg.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date: {s}"))
    })
    .transpose()
}

impl Command {
    /// Parse a prompt line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();
        let arg = |i: usize| args.get(i).copied();

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "menu" => Self::Menu,
            "add" => Self::Add {
                menu_item_id: parse_id(arg(0), "item id")?,
                quantity: parse_quantity(arg(1))?,
            },
            "remove" | "rm" => Self::Remove {
                menu_item_id: parse_id(arg(0), "item id")?,
                quantity: parse_quantity(arg(1))?,
            },
            "type" => {
                let value = args.join(" ");
                Self::Type(value.parse()?)
            }
            "table" => match arg(0) {
                None | Some("none") => Self::Table(None),
                Some(s) => Self::Table(Some(
                    s.parse().with_context(|| format!("invalid table number: {s}"))?,
                )),
            },
            "show" | "draft" => Self::Show,
            "place" => Self::Place,
            "print" | "kot" => Self::Print,
            "method" => Self::Method(arg(0).context("missing payment method")?.parse()?),
            "pay" => Self::Pay,
            "orders" | "ongoing" => Self::Orders,
            "resume" | "edit" => Self::Resume(parse_id(arg(0), "order id")?),
            "cancel" => Self::Cancel,
            "history" => Self::History {
                start: parse_date(arg(0))?,
                end: parse_date(arg(1))?,
            },
            "login" => Self::Login {
                username: arg(0).context("missing username")?.to_string(),
                password: arg(1).context("missing password")?.to_string(),
            },
            "logout" => Self::Logout,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command: {other} (try `help`)"),
        };
        Ok(Some(command))
    }

    /// Screen whose capability the command needs; `None` for commands open
    /// to every session
    pub fn required_screen(&self) -> Option<Screen> {
        match self {
            Self::Add { .. }
            | Self::Remove { .. }
            | Self::Type(_)
            | Self::Table(_)
            | Self::Place
            | Self::Print
            | Self::Method(_)
            | Self::Pay
            | Self::Cancel => Some(Screen::AddOrder),
            Self::Orders | Self::Resume(_) => Some(Screen::Orders),
            Self::History { .. } => Some(Screen::SalesReport),
            Self::Help
            | Self::Menu
            | Self::Show
            | Self::Login { .. }
            | Self::Logout
            | Self::Quit => None,
        }
    }
}
