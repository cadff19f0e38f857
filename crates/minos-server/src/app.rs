//! The application facade.
//!
//! An [`App`] owns the registration tables, loads configuration, template
//! mixins and filters on [`initialize`](App::initialize), then binds the
//! controllers and serves on [`listen`](App::listen).
//!
//! Directory layout below the base path:
//!
//! | Path | Contents |
//! |------|----------|
//! | `config/app.json`, `config/app.toml` | configuration |
//! | `lib/controllers` | controller sources |
//! | `lib/filters` | filter sources |
//! | `lib/template_mixins` | template mixin sources |
//! | `lib/templates` | templates |

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use minos_config::{Config, ConfigLoader};
use minos_controller::ControllerServices;
use minos_core::Environment;
use minos_dispatch::{
    ControllerCatalog, DispatchOptions, Dispatcher, ProcessControl, DEFAULT_CONTROLLER_TIMEOUT,
};
use minos_filter::{FilterCatalog, FilterChain};
use minos_telemetry::profile;
use minos_view::{MiniJinjaEngine, MixinCatalog, TemplateMixins};

use crate::config::{ServerConfig, DEFAULT_HOSTNAME};
use crate::error::ServerError;
use crate::router::HttpRoutes;
use crate::server::Server;
use crate::shutdown::ShutdownSignal;

/// Prefix for configuration overrides from the process environment.
pub const ENV_PREFIX: &str = "MINOS";

/// Message that asks a worker to stop.
pub const SHUTDOWN_MESSAGE: &str = "shutdown";

/// Application options.
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Application root.
    pub base_path: PathBuf,
    /// Instance number of this process.
    pub instance: u32,
    /// Limit for filters plus action of one request.
    pub controller_timeout: Duration,
    /// Bind host.
    pub hostname: String,
    /// Port; falls back to the `port` configuration key.
    pub port: Option<u16>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            instance: 1,
            controller_timeout: DEFAULT_CONTROLLER_TIMEOUT,
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: None,
        }
    }
}

impl AppOptions {
    /// Options rooted at `base_path`.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Sets the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the bind host.
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Sets the controller timeout.
    #[must_use]
    pub fn controller_timeout(mut self, timeout: Duration) -> Self {
        self.controller_timeout = timeout;
        self
    }

    /// Sets the instance number.
    #[must_use]
    pub fn instance(mut self, instance: u32) -> Self {
        self.instance = instance;
        self
    }
}

struct Loaded {
    services: Arc<ControllerServices>,
    filters: FilterChain,
}

/// A Minos application.
///
/// # Example
///
/// ```rust,no_run
/// use minos_dispatch::ControllerCatalog;
/// use minos_server::{App, AppOptions};
///
/// # async fn run() -> Result<(), minos_server::ServerError> {
/// let mut app = App::new(AppOptions::new(".").port(3000))
///     .controllers(ControllerCatalog::new());
///
/// app.initialize()?;
/// app.listen().await
/// # }
/// ```
pub struct App {
    options: AppOptions,
    environment: Environment,
    controllers: ControllerCatalog,
    filter_catalog: FilterCatalog,
    mixin_catalog: MixinCatalog,
    shutdown: ShutdownSignal,
    process: Option<Arc<dyn ProcessControl>>,
    closing: AtomicBool,
    started_at: Instant,
    loaded: Option<Loaded>,
}

impl App {
    /// Creates an application. The environment comes from `MINOS_ENV` and
    /// `MINOS_WORKER`.
    #[must_use]
    pub fn new(options: AppOptions) -> Self {
        let environment = Environment::from_env()
            .with_base_path(options.base_path.clone())
            .with_instance(options.instance);

        Self {
            options,
            environment,
            controllers: ControllerCatalog::new(),
            filter_catalog: FilterCatalog::new(),
            mixin_catalog: MixinCatalog::new(),
            shutdown: ShutdownSignal::new(),
            process: None,
            closing: AtomicBool::new(false),
            started_at: Instant::now(),
            loaded: None,
        }
    }

    /// Replaces the environment read from the process.
    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment
            .with_base_path(self.options.base_path.clone())
            .with_instance(self.options.instance);
        self
    }

    /// Sets the controller registrations.
    #[must_use]
    pub fn controllers(mut self, catalog: ControllerCatalog) -> Self {
        self.controllers = catalog;
        self
    }

    /// Sets the filter registrations.
    #[must_use]
    pub fn filters(mut self, catalog: FilterCatalog) -> Self {
        self.filter_catalog = catalog;
        self
    }

    /// Sets the template mixin registrations.
    #[must_use]
    pub fn mixins(mut self, catalog: MixinCatalog) -> Self {
        self.mixin_catalog = catalog;
        self
    }

    /// Overrides what happens when a worker runs out of budget or a
    /// controller fails to load. Defaults to the app's shutdown signal.
    #[must_use]
    pub fn process_control(mut self, process: Arc<dyn ProcessControl>) -> Self {
        self.process = Some(process);
        self
    }

    /// The options the app was created with.
    #[must_use]
    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    /// The shutdown signal `listen` waits on.
    #[must_use]
    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Loaded configuration, once initialized.
    #[must_use]
    pub fn config(&self) -> Option<&Config> {
        self.loaded.as_ref().map(|l| l.services.config())
    }

    /// Loads configuration, template mixins and filters.
    pub fn initialize(&mut self) -> Result<(), ServerError> {
        let started_at = Instant::now();
        self.started_at = started_at;
        let base = self.options.base_path.clone();

        let config = ConfigLoader::new(self.environment.name())
            .with_optional_file(base.join("config/app.json"))?
            .with_optional_file(base.join("config/app.toml"))?
            .with_env_prefix(ENV_PREFIX)
            .load()?;

        let mixins = TemplateMixins::new();
        mixins.load(&base.join("lib/template_mixins"), &self.mixin_catalog)?;

        let filters = FilterChain::new();
        let filter_dir = base.join("lib/filters");
        if filter_dir.is_dir() {
            filters
                .load(&filter_dir, &self.filter_catalog)
                .map_err(|e| ServerError::load(&filter_dir, e))?;
        } else {
            tracing::debug!("No filter directory, installing registered filters");
            filters.install(&self.filter_catalog);
        }

        let views = MiniJinjaEngine::new(base.join("lib/templates"))
            .with_reload(self.environment.is_development());

        let services = ControllerServices::new(config, self.environment.clone(), Arc::new(views))
            .with_mixins(mixins);

        self.loaded = Some(Loaded {
            services: Arc::new(services),
            filters,
        });

        profile("Initialize Minos", started_at);
        Ok(())
    }

    /// The listen port: the `port` option, else the `port` configuration key.
    pub fn port(&self) -> Result<u16, ServerError> {
        if let Some(port) = self.options.port {
            return Ok(port);
        }

        self.config()
            .and_then(|config| config.get_u64("port").ok())
            .and_then(|port| u16::try_from(port).ok())
            .ok_or(ServerError::MissingPort)
    }

    /// Loads `lib/controllers` and binds every route.
    pub fn routes(&self) -> Result<HttpRoutes, ServerError> {
        let loaded = self.loaded.as_ref().ok_or(ServerError::NotInitialized)?;
        let started_at = Instant::now();

        let process = self
            .process
            .clone()
            .unwrap_or_else(|| Arc::new(self.shutdown.clone()));

        let dispatcher = Dispatcher::builder(
            Arc::clone(&loaded.services),
            self.controllers.clone(),
            process,
        )
        .filters(loaded.filters.clone())
        .options(DispatchOptions {
            controller_timeout: self.options.controller_timeout,
        })
        .build();

        let controller_dir = self.controller_dir();
        let mut routes = HttpRoutes::new();
        dispatcher
            .load(&mut routes, &controller_dir)
            .map_err(|e| ServerError::load(&controller_dir, e))?;

        profile("Load controllers", started_at);
        Ok(routes)
    }

    /// Binds the controllers and serves until shutdown.
    ///
    /// SIGTERM, SIGINT, [`shutdown`](Self::shutdown) and an exhausted worker
    /// budget all stop the server gracefully.
    pub async fn listen(&self) -> Result<(), ServerError> {
        let routes = self.routes().map_err(|e| {
            tracing::error!("Error loading controllers and registering routes: {e}");
            e
        })?;
        let port = self.port()?;

        let config = ServerConfig::builder()
            .hostname(self.options.hostname.clone())
            .port(port)
            .build();

        profile("Load Minos", self.started_at);
        tracing::info!(
            "Minos HTTP server listening on {}:{port}",
            self.options.hostname
        );

        Server::new(config, routes)
            .run(port, self.shutdown.clone().with_os_signals())
            .await
    }

    /// Handles a message from a process supervisor.
    ///
    /// Only [`SHUTDOWN_MESSAGE`] is understood; anything else is ignored.
    pub fn handle_message(&self, message: &str) {
        if message == SHUTDOWN_MESSAGE {
            self.shutdown();
        }
    }

    /// Stops accepting connections. Later calls do nothing.
    pub fn shutdown(&self) {
        if self.closing.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!(
            instance = self.environment.instance(),
            "Shutting down Minos"
        );
        self.shutdown.trigger();
    }

    /// Whether shutdown has started.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    fn controller_dir(&self) -> PathBuf {
        self.options.base_path.join("lib/controllers")
    }
}
