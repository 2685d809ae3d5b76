//! # Client Shell
//!
//! The client-side half of the shell: holds the duplicate of the Session
//! Context the page was rendered with, decides on every navigation whether it
//! is still valid, and keeps the cart and channel in step with it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ShellClient Lifecycle                             │
//! │                                                                         │
//! │  boot(initial context)                                                 │
//! │  ├── deliver ──────────► spawn OrderManager::refresh()     (detached)  │
//! │  └── !sessionChannelChanged                                            │
//! │        └──────────────► spawn geolocation, at most once    (detached)  │
//! │                           in_eu ⇒ OrderManager::switch_channel("eu")   │
//! │                                                                         │
//! │  navigate(next, submission)                                            │
//! │  ├── decide() = Reuse ──────► keep context                             │
//! │  └── decide() = Recompute ──► ContextLoader::load(next)                │
//! │        ├── newer navigation started ──► Superseded (result dropped)    │
//! │        └── loaded ──► swap Arc, deliver ──► spawn refresh              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Background failures (order refresh, geolocation) are logged and
//! swallowed. They never reach the caller and never alter the context.

use std::future::pending;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::StorefrontConfig;
use crate::error::ShellResult;
use crate::geolocation::{GeoLocator, IpApiLocator};
use crate::order::{OrderManager, RemoteOrderManager};
use crate::remote::StorefrontConnection;
use storefront_core::navigation::{decide, ReloadRule, ReuseDecision, Submission};
use storefront_core::validation::validate_channel_token;
use storefront_core::{HeaderView, SessionContext};

// =============================================================================
// Context Loader
// =============================================================================

/// Fetches a freshly composed Session Context for a URL.
#[async_trait]
pub trait ContextLoader: Send + Sync {
    async fn load(&self, url: &str) -> ShellResult<SessionContext>;
}

/// [`ContextLoader`] calling the storefront server's root loader endpoint.
#[derive(Debug, Clone)]
pub struct RemoteContextLoader {
    connection: StorefrontConnection,
}

impl RemoteContextLoader {
    pub fn new(connection: StorefrontConnection) -> Self {
        RemoteContextLoader { connection }
    }
}

#[async_trait]
impl ContextLoader for RemoteContextLoader {
    async fn load(&self, url: &str) -> ShellResult<SessionContext> {
        let mut endpoint = self.connection.endpoint("api/root")?;
        endpoint.query_pairs_mut().append_pair("path", url);
        self.connection.get_json(endpoint).await
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// What a navigation did to the Session Context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The previous context is still valid.
    Reused,
    /// A new context was loaded because `rule` fired.
    Recomputed { rule: ReloadRule },
    /// A newer navigation started before the load finished.
    Superseded,
}

/// Result of [`ShellClient::navigate`].
#[derive(Debug)]
pub struct Navigated {
    pub outcome: NavigationOutcome,
    /// Order refresh spawned for a recomputed context. Dropping it detaches
    /// the task.
    pub order_refresh: Option<JoinHandle<()>>,
}

impl Navigated {
    fn superseded() -> Self {
        Navigated {
            outcome: NavigationOutcome::Superseded,
            order_refresh: None,
        }
    }
}

/// Background tasks started by [`ShellClient::boot`].
#[derive(Debug)]
pub struct BootTasks {
    pub order_refresh: JoinHandle<()>,
    /// Present only when the one-time geolocation lookup was started.
    pub geolocation: Option<JoinHandle<()>>,
}

// =============================================================================
// Dependencies
// =============================================================================

/// Collaborators of the client shell.
#[derive(Clone)]
pub struct ShellDeps {
    pub loader: Arc<dyn ContextLoader>,
    pub orders: Arc<dyn OrderManager>,
    /// `None` disables the first-visit lookup.
    pub geolocator: Option<Arc<dyn GeoLocator>>,
    pub eu_channel_token: String,
}

impl ShellDeps {
    /// Remote collaborators sharing one cookie-keeping `connection`.
    ///
    /// No geolocator is wired when `[geolocation].enabled` is false.
    pub fn from_config(config: &StorefrontConfig, connection: StorefrontConnection) -> ShellResult<Self> {
        let geolocator: Option<Arc<dyn GeoLocator>> = if config.geolocation.enabled {
            Some(Arc::new(IpApiLocator::new(&config.geolocation)?))
        } else {
            debug!("Geolocation disabled, first-visit channel default is off");
            None
        };

        Ok(ShellDeps {
            loader: Arc::new(RemoteContextLoader::new(connection.clone())),
            orders: Arc::new(RemoteOrderManager::new(connection)),
            geolocator,
            eu_channel_token: config.eu_channel_token().to_string(),
        })
    }
}

// =============================================================================
// Shell Client
// =============================================================================

struct ShellInner {
    context: RwLock<Arc<SessionContext>>,
    current_url: RwLock<String>,
    active_channel_token: RwLock<String>,
    cart_tray_open: AtomicBool,
    geolocation_started: AtomicBool,
    navigation: watch::Sender<u64>,
    deps: ShellDeps,
}

/// Client-held shell state for one full page load. Cheap to clone; clones
/// share state.
#[derive(Clone)]
pub struct ShellClient {
    inner: Arc<ShellInner>,
}

impl ShellClient {
    /// Starts the shell with the context the page was rendered with.
    pub fn boot(initial: SessionContext, url: impl Into<String>, deps: ShellDeps) -> (Self, BootTasks) {
        let (navigation, _) = watch::channel(0);
        let session_channel_changed = initial.session_channel_changed;

        let client = ShellClient {
            inner: Arc::new(ShellInner {
                active_channel_token: RwLock::new(initial.active_channel.token.clone()),
                context: RwLock::new(Arc::new(initial)),
                current_url: RwLock::new(url.into()),
                cart_tray_open: AtomicBool::new(false),
                geolocation_started: AtomicBool::new(false),
                navigation,
                deps,
            }),
        };

        info!(url = %client.current_url(), "Shell booted");

        let order_refresh = client.spawn_order_refresh();
        let geolocation = if session_channel_changed {
            None
        } else {
            client.spawn_geolocation_default()
        };

        (
            client,
            BootTasks {
                order_refresh,
                geolocation,
            },
        )
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Handles a client-side navigation to `next_url`.
    ///
    /// ## Errors
    /// A failed context load. The previous context stays in place.
    pub async fn navigate(&self, next_url: &str, submission: Option<&Submission>) -> ShellResult<Navigated> {
        let prev_url = self.current_url();
        let generation = self.begin_navigation();

        let rule = match decide(&prev_url, next_url, submission) {
            ReuseDecision::Reuse => {
                debug!(from = %prev_url, to = %next_url, "Reusing session context");
                self.set_current_url(next_url);
                return Ok(Navigated {
                    outcome: NavigationOutcome::Reused,
                    order_refresh: None,
                });
            }
            ReuseDecision::Recompute(rule) => rule,
        };

        info!(from = %prev_url, to = %next_url, rule = %rule, reason = rule.reason(), "Recomputing session context");

        let loaded = tokio::select! {
            result = self.inner.deps.loader.load(next_url) => result,
            _ = self.superseded(generation) => {
                debug!(to = %next_url, "Navigation superseded while loading");
                return Ok(Navigated::superseded());
            }
        };

        let context = loaded.map_err(|e| {
            error!(to = %next_url, error = %e, "Session context load failed");
            e
        })?;

        // A newer navigation may have started while the result was in hand.
        if *self.inner.navigation.borrow() != generation {
            return Ok(Navigated::superseded());
        }

        self.set_current_url(next_url);
        let order_refresh = self.deliver(context);

        Ok(Navigated {
            outcome: NavigationOutcome::Recomputed { rule },
            order_refresh: Some(order_refresh),
        })
    }

    fn begin_navigation(&self) -> u64 {
        let mut generation = 0;
        self.inner.navigation.send_modify(|current| {
            *current += 1;
            generation = *current;
        });
        generation
    }

    /// Resolves once a navigation newer than `generation` has started.
    async fn superseded(&self, generation: u64) {
        let mut watcher = self.inner.navigation.subscribe();
        loop {
            if *watcher.borrow_and_update() != generation {
                return;
            }
            if watcher.changed().await.is_err() {
                pending::<()>().await;
            }
        }
    }

    /// Swaps in a new context and refreshes the order against it.
    fn deliver(&self, context: SessionContext) -> JoinHandle<()> {
        if let Ok(mut current) = self.inner.context.write() {
            *current = Arc::new(context);
        }
        self.spawn_order_refresh()
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    fn spawn_order_refresh(&self) -> JoinHandle<()> {
        let orders = self.inner.deps.orders.clone();
        tokio::spawn(async move {
            if let Err(e) = orders.refresh().await {
                warn!(error = %e, "Active order refresh failed, cart may be stale");
            }
        })
    }

    /// Starts the first-visit geolocation lookup unless it already ran in
    /// this page load.
    fn spawn_geolocation_default(&self) -> Option<JoinHandle<()>> {
        let geolocator = self.inner.deps.geolocator.clone()?;
        if self.inner.geolocation_started.swap(true, Ordering::SeqCst) {
            return None;
        }

        let client = self.clone();
        Some(tokio::spawn(async move {
            let location = match geolocator.locate().await {
                Ok(location) => location,
                Err(e) => {
                    warn!(error = %e, "Geolocation lookup failed");
                    return;
                }
            };

            let eu_token = client.inner.deps.eu_channel_token.clone();
            let Some(token) = location.default_channel(&eu_token) else {
                debug!(country = ?location.country, "Visitor outside the EU, keeping channel");
                return;
            };

            info!(country = ?location.country, token = %token, "Defaulting EU visitor to EU channel");
            client.set_active_channel_token(token);
            if let Err(e) = client.inner.deps.orders.switch_channel(token).await {
                warn!(error = %e, token = %token, "Automatic channel switch failed");
            }
        }))
    }

    // =========================================================================
    // Header Actions
    // =========================================================================

    /// Channel switcher action from the header.
    pub fn switch_channel(&self, token: &str) -> ShellResult<JoinHandle<()>> {
        validate_channel_token(token)?;
        let token = token.trim().to_string();
        self.set_active_channel_token(&token);

        let orders = self.inner.deps.orders.clone();
        Ok(tokio::spawn(async move {
            if let Err(e) = orders.switch_channel(&token).await {
                warn!(error = %e, token = %token, "Channel switch failed");
            }
        }))
    }

    /// Opens or closes the cart tray; returns the new state.
    pub fn toggle_cart_tray(&self) -> bool {
        !self.inner.cart_tray_open.fetch_xor(true, Ordering::SeqCst)
    }

    /// Current header view.
    pub fn header(&self) -> HeaderView {
        HeaderView::build(
            &self.context(),
            self.inner.deps.orders.active_order().as_ref(),
            &self.active_channel_token(),
            self.inner.cart_tray_open.load(Ordering::SeqCst),
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The Session Context currently in effect.
    pub fn context(&self) -> Arc<SessionContext> {
        let current = self.inner.context.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    pub fn current_url(&self) -> String {
        self.inner
            .current_url
            .read()
            .map(|u| u.clone())
            .unwrap_or_default()
    }

    pub fn active_channel_token(&self) -> String {
        self.inner
            .active_channel_token
            .read()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    fn set_current_url(&self, url: &str) {
        if let Ok(mut current) = self.inner.current_url.write() {
            *current = url.to_string();
        }
    }

    fn set_active_channel_token(&self, token: &str) {
        if let Ok(mut current) = self.inner.active_channel_token.write() {
            *current = token.to_string();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
