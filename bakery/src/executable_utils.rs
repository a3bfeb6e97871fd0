use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::error::Error;
use tracing_subscriber::EnvFilter;

use common::config::Config;
use transport::{ApiClient, FileTokenStore, LOGIN_ROUTE, Navigator, SessionHandle, TracingNotifier};

use crate::routes::DASHBOARD_ROUTE;
use crate::services::{
    CategoryService, CustomerService, OfferService, OrderService, ProductService, ResourceService,
};
use crate::stores::{AuthStore, FilterPatch, ListFilter, ResourceStore, SortDirection};
use crate::views::{CsvRow, to_csv};

#[derive(Parser, Debug)]
#[command(author, version, about = "Bakery admin console", long_about = None)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "target/debug/config/total_config.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and persist the session
    Login { email: String, password: String },
    /// Drop the persisted session
    Logout,
    /// Show the current session
    Whoami,
    /// Print one page of a resource as CSV
    List {
        resource: ResourceKind,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },
    /// Download the order export
    ExportOrders {
        file: PathBuf,
        #[arg(long)]
        status: Option<String>,
    },
    /// Download an order's invoice
    Invoice { order_id: i64, file: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Customers,
    Products,
    Categories,
    Orders,
    Offers,
}

pub fn initialize_executable() -> Result<(Args, Config), Box<dyn Error + Send + Sync>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to read .env: {}", e);
        }
    }

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    Ok((args, config))
}

/// `RUST_LOG` wins when set; otherwise the configured level applies.
pub fn initialize_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// There is no screen to switch in a terminal; a redirect tells the operator
/// to log in again.
pub struct TerminalNavigator {
    route: Mutex<String>,
}

impl TerminalNavigator {
    pub fn new(route: &str) -> Self {
        Self {
            route: Mutex::new(route.to_string()),
        }
    }
}

#[async_trait]
impl Navigator for TerminalNavigator {
    fn current_route(&self) -> String {
        self.route.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    async fn redirect_to_login(&self) {
        *self.route.lock().unwrap_or_else(|p| p.into_inner()) = LOGIN_ROUTE.to_string();
        tracing::warn!("Session is no longer valid, run `bakery-admin login <email> <password>`");
    }
}

pub struct AdminContext {
    pub config: Config,
    pub client: Arc<ApiClient>,
}

impl AdminContext {
    /// Builds the client on top of the persisted session.
    pub async fn connect(config: Config) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let store = FileTokenStore::new(&config.session.storage_path, &config.session.storage_key);
        let session = SessionHandle::new(Arc::new(store));
        if session.rehydrate().await? {
            tracing::debug!("Restored persisted session");
        }

        let client = ApiClient::from_config(
            &config,
            session,
            Arc::new(TracingNotifier),
            Arc::new(TerminalNavigator::new(DASHBOARD_ROUTE)),
        )?;
        tracing::info!(
            api = %config.common.api_base_url,
            environment = ?config.common.environment,
            "Client ready"
        );
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    fn session(&self) -> &SessionHandle {
        self.client.session()
    }

    async fn print_page<S>(&self, service: S, patch: FilterPatch) -> Result<(), Box<dyn Error + Send + Sync>>
    where
        S: ResourceService + 'static,
        S::Item: CsvRow,
    {
        let store = ResourceStore::new(
            Arc::new(service),
            self.session().clone(),
            self.client.notifier().clone(),
        )
        .with_filter(ListFilter::with_page_size(self.config.admin.page_size));
        store.set_filter(patch).await?;

        let state = store.snapshot().await;
        print!("{}", to_csv(&state.items));
        tracing::info!(
            page = state.filter.page,
            total_pages = state.total_pages,
            total = state.total,
            "Listed {}",
            store.service().resource()
        );
        Ok(())
    }

    pub async fn run(&self, command: Command) -> Result<(), Box<dyn Error + Send + Sync>> {
        let auth = AuthStore::new(self.client.clone());
        match command {
            Command::Login { email, password } => {
                auth.login(&email, &password).await?;
                println!("Logged in as {}", email);
            }
            Command::Logout => {
                auth.logout().await?;
                println!("Logged out");
            }
            Command::Whoami => {
                let snapshot = auth.snapshot();
                if snapshot.is_authenticated {
                    match snapshot.expires_at {
                        Some(expires_at) => println!("Authenticated until {}", expires_at.to_rfc3339()),
                        None => println!("Authenticated"),
                    }
                } else {
                    println!("Not logged in");
                }
            }
            Command::List {
                resource,
                page,
                search,
                sort,
                desc,
            } => {
                let mut patch = FilterPatch::new().page(page);
                if let Some(search) = search {
                    patch = patch.search(search);
                }
                if let Some(sort) = sort {
                    let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
                    patch = patch.sort(sort, direction);
                }
                let client = self.client.clone();
                match resource {
                    ResourceKind::Customers => self.print_page(CustomerService::new(client), patch).await?,
                    ResourceKind::Products => self.print_page(ProductService::new(client), patch).await?,
                    ResourceKind::Categories => self.print_page(CategoryService::new(client), patch).await?,
                    ResourceKind::Orders => self.print_page(OrderService::new(client), patch).await?,
                    ResourceKind::Offers => self.print_page(OfferService::new(client), patch).await?,
                }
            }
            Command::ExportOrders { file, status } => {
                let mut filter = ListFilter::default();
                if let Some(status) = status {
                    filter.merge(FilterPatch::new().extra("status", status));
                }
                let bytes = OrderService::new(self.client.clone()).export(&filter).await?;
                tokio::fs::write(&file, &bytes).await?;
                println!("Wrote {} bytes to {}", bytes.len(), file.display());
            }
            Command::Invoice { order_id, file } => {
                let bytes = OrderService::new(self.client.clone()).invoice(order_id).await?;
                tokio::fs::write(&file, &bytes).await?;
                println!("Wrote invoice for order {} to {}", order_id, file.display());
            }
        }
        Ok(())
    }
}
