//! Terminal front end for the restaurant POS
//!
//! Logs in, then reads one command per line and drives the order workflow.

mod commands;
mod logging;
mod render;

use anyhow::{Context, bail};
use clap::Parser;
use commands::{Command, HELP};
use pos_client::{
    ApiService, AuthApi, ClientConfig, ClientError, DateRange, NetworkHttpClient, OrderWorkflow,
    Screen, SessionStore, TicketOutcome, WorkflowError,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Debug, Parser)]
#[command(name = "pos", version, about = "Restaurant point-of-sale terminal")]
struct Args {
    /// Backend base URL
    #[arg(long, env = "POS_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "POS_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "POS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Directory for the daily log files
    #[arg(long, env = "POS_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,
}

type Input = Lines<BufReader<Stdin>>;

async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|l| l.trim().to_string()))
}

enum Flow {
    Continue,
    Quit,
}

struct App {
    session: SessionStore,
    auth: AuthApi,
    api: Arc<ApiService>,
    workflow: OrderWorkflow,
}

impl App {
    fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let session = SessionStore::new();
        let http = NetworkHttpClient::new(config, session.clone())?;
        let api = Arc::new(ApiService::new(http.clone()));
        Ok(Self {
            session,
            auth: AuthApi::new(http),
            workflow: OrderWorkflow::from_api(api.clone()),
            api,
        })
    }

    fn require(&self, screen: Screen) -> anyhow::Result<()> {
        match self.session.role() {
            None => bail!("not logged in; use `login <user> <password>`"),
            Some(role) if !role.can_access(screen) => {
                bail!("role {role} has no access to {screen}")
            }
            Some(_) => Ok(()),
        }
    }

    async fn login(&self, username: &str, password: &str) -> anyhow::Result<()> {
        let session = self.auth.login(username, password).await?;
        let screens: Vec<&str> = session.role.screens().iter().map(Screen::as_str).collect();
        println!(
            "logged in as {} ({}); screens: {}",
            session.username,
            session.role,
            screens.join(", ")
        );
        Ok(())
    }

    async fn execute(&self, command: Command) -> anyhow::Result<Flow> {
        if let Some(screen) = command.required_screen() {
            self.require(screen)?;
        }
        let wf = &self.workflow;
        match command {
            Command::Help => println!("{HELP}"),
            Command::Menu => {
                wf.refresh_menu().await?;
                print!("{}", render::menu(&wf.menu_by_category().await));
            }
            Command::Add {
                menu_item_id,
                quantity,
            } => {
                let item = match wf.find_menu_item(menu_item_id).await {
                    Some(item) => item,
                    None => {
                        wf.refresh_menu().await?;
                        wf.find_menu_item(menu_item_id)
                            .await
                            .with_context(|| format!("no menu item with id {menu_item_id}"))?
                    }
                };
                for _ in 0..quantity {
                    wf.add_item(&item);
                }
                print!("{}", render::draft(&wf.snapshot()));
            }
            Command::Remove {
                menu_item_id,
                quantity,
            } => {
                let removed = (0..quantity)
                    .take_while(|_| wf.remove_item(menu_item_id))
                    .count();
                if removed == 0 {
                    bail!("item {menu_item_id} is not on the order");
                }
                print!("{}", render::draft(&wf.snapshot()));
            }
            Command::Type(order_type) => {
                if !wf.set_order_type(order_type) {
                    bail!("the order type cannot change once the order is placed");
                }
                print!("{}", render::draft(&wf.snapshot()));
            }
            Command::Table(table) => {
                if !wf.set_table_number(table) {
                    bail!("a table can only be set on a new Dine-In order");
                }
                print!("{}", render::draft(&wf.snapshot()));
            }
            Command::Show => print!("{}", render::draft(&wf.snapshot())),
            Command::Place => {
                let order_id = wf.place_order().await?;
                println!("order #{order_id} placed");
            }
            Command::Print => match wf.print_ticket().await? {
                TicketOutcome::Issued { order_id, message } => {
                    println!("order #{order_id}: {message}")
                }
                TicketOutcome::Skipped => println!("kitchen ticket is already up to date"),
            },
            Command::Method(method) => {
                if !wf.select_payment_method(method) {
                    bail!("print the kitchen ticket before choosing a payment method");
                }
                println!("paying by {method}");
            }
            Command::Pay => {
                let receipt = wf.complete_payment().await?;
                println!(
                    "order #{} paid by {}: {:.2}. {}",
                    receipt.order_id, receipt.method, receipt.total, receipt.message
                );
                if !receipt.ongoing_orders_refreshed {
                    println!("(ongoing orders could not be reloaded; run `orders`)");
                }
            }
            Command::Orders => {
                let orders = wf.refresh_ongoing_orders().await?;
                print!("{}", render::ongoing(&orders));
            }
            Command::Resume(order_id) => {
                if wf.ongoing_orders_stale().await {
                    wf.refresh_ongoing_orders().await?;
                }
                wf.resume_ongoing_order_by_id(order_id).await?;
                print!("{}", render::draft(&wf.snapshot()));
            }
            Command::Cancel => {
                if !wf.cancel_edit() {
                    bail!("no placed order is loaded");
                }
                println!("back to a new order");
            }
            Command::History { start, end } => {
                let orders = self.api.order_history(DateRange { start, end }).await?;
                print!("{}", render::history(&orders));
            }
            Command::Login { username, password } => self.login(&username, &password).await?,
            Command::Logout => match self.auth.logout() {
                Some(s) => println!("{} logged out", s.username),
                None => println!("not logged in"),
            },
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

fn needs_login(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(cause.downcast_ref::<WorkflowError>(), Some(WorkflowError::Authorization(_)))
            || cause
                .downcast_ref::<ClientError>()
                .is_some_and(ClientError::is_unauthorized)
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    let _log_guard = logging::init(&args.log_dir)?;

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.api_url {
        config.base_url = url;
    }
    tracing::info!(base_url = %config.base_url, "Starting POS terminal");
    let app = App::new(&config)?;

    let mut input: Input = BufReader::new(tokio::io::stdin()).lines();

    let username = match args.username {
        Some(u) => u,
        None => prompt(&mut input, "username: ")
            .await?
            .context("no username given")?,
    };
    let password = match args.password {
        Some(p) => p,
        None => prompt(&mut input, "password: ")
            .await?
            .context("no password given")?,
    };
    app.login(&username, &password)
        .await
        .context("login failed")?;
    println!("type `help` for commands");

    while let Some(line) = prompt(&mut input, "pos> ").await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e:#}");
                continue;
            }
        };
        match app.execute(command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                println!("error: {e:#}");
                if needs_login(&e) {
                    println!("session is missing or expired; use `login <user> <password>`");
                }
            }
        }
    }

    tracing::info!("POS terminal stopped");
    Ok(())
}
