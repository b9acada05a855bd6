//! Handler Method Dispatch Server
//!
//! An HTTP server that resolves every request through a handler method
//! registry, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────────┐
//!                        │                  DISPATCH SERVER                    │
//!                        │                                                     │
//!     Client Request     │  ┌─────────┐    ┌──────────────┐    ┌───────────┐  │
//!     ───────────────────┼─▶│ server  │───▶│ lookup path  │───▶│  mapping  │  │
//!                        │  │dispatch │    │ (request.rs) │    │ registry  │  │
//!                        │  └─────────┘    └──────────────┘    └─────┬─────┘  │
//!                        │                                           │        │
//!                        │                       narrow / sort / pick best    │
//!                        │                                           │        │
//!     Client Response    │  ┌─────────┐    ┌──────────────┐    ┌─────▼─────┐  │
//!     ◀──────────────────┼──│response │◀───│   invoke     │◀───│  handler  │  │
//!                        │  │404/405..│    │              │    │  method   │  │
//!                        │  └─────────┘    └──────────────┘    └───────────┘  │
//!                        │                                                     │
//!                        │  ┌───────────────────────────────────────────────┐ │
//!                        │  │            Cross-Cutting Concerns              │ │
//!                        │  │  ┌────────┐ ┌─────────────┐ ┌──────────────┐  │ │
//!                        │  │  │ config │ │observability│ │  lifecycle   │  │ │
//!                        │  │  └────────┘ └─────────────┘ └──────────────┘  │ │
//!                        │  └───────────────────────────────────────────────┘ │
//!                        └────────────────────────────────────────────────────┘
//! ```
//!
//! # Startup
//!
//! Components are detected and their handler methods registered before the
//! listener accepts anything; the frozen registry is immutable from then on.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Json;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use clap::Parser;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use request_mapping::config::{load_config, RouterConfig};
use request_mapping::lifecycle::Shutdown;
use request_mapping::mapping::{HandlerComponent, HandlerMethodDef, MappingRegistryBuilder};
use request_mapping::request::LookupPathHelper;
use request_mapping::route::{RouteMappingStrategy, RouteSpec};
use request_mapping::server::DispatchServer;

#[derive(Parser)]
#[command(name = "request-mapping")]
#[command(about = "HTTP dispatch server backed by a handler method registry", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults apply when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the registered mappings and exit.
    #[arg(long)]
    print_mappings: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "request_mapping={},tower_http=debug",
                    config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind_address = %config.server.bind_address,
        request_timeout_secs = config.server.request_timeout_secs,
        "configuration loaded"
    );

    // Register components and freeze the registry before serving anything.
    let registry = {
        let strategy = RouteMappingStrategy::with_config(config.path_match.clone());
        let path_helper = LookupPathHelper::from_config(&config.path_match);
        let mut builder = MappingRegistryBuilder::with_path_helper(strategy, path_helper);
        builder.detect(&NotesComponent::new())?;
        builder.detect(&StatusComponent)?;
        Arc::new(builder.freeze())
    };

    if cli.print_mappings {
        for (mapping, handler) in registry.handler_methods() {
            println!("{} => {}", mapping, handler);
        }
        return Ok(());
    }

    // Initialize metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            request_mapping::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = DispatchServer::new(config, registry);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// In-memory notes store exposed as a handler component.
struct NotesComponent {
    store: Arc<RwLock<HashMap<u64, Value>>>,
    next_id: Arc<AtomicU64>,
}

impl NotesComponent {
    fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl HandlerComponent<RouteSpec> for NotesComponent {
    fn name(&self) -> &str {
        "notes"
    }

    fn base_attributes(&self) -> Option<RouteSpec> {
        Some(RouteSpec::new().path("/notes"))
    }

    fn handler_methods(&self) -> Vec<HandlerMethodDef<RouteSpec>> {
        let list_store = self.store.clone();
        let create_store = self.store.clone();
        let show_store = self.store.clone();
        let remove_store = self.store.clone();
        let next_id = self.next_id.clone();

        vec![
            HandlerMethodDef::new("list", RouteSpec::new().method(Method::GET), move |_req| {
                let store = list_store.clone();
                async move {
                    let store = store.read().await;
                    let notes: Vec<Value> = store.values().cloned().collect();
                    Json(notes).into_response()
                }
            }),
            HandlerMethodDef::new("create", RouteSpec::new().method(Method::POST), move |req| {
                let store = create_store.clone();
                let next_id = next_id.clone();
                async move {
                    let note: Value = match serde_json::from_slice(req.body()) {
                        Ok(v) => v,
                        Err(e) => {
                            return (StatusCode::BAD_REQUEST, format!("invalid JSON body: {}", e))
                                .into_response()
                        }
                    };
                    let id = next_id.fetch_add(1, Ordering::Relaxed);
                    store.write().await.insert(id, note);
                    (StatusCode::CREATED, Json(serde_json::json!({ "id": id }))).into_response()
                }
            }),
            HandlerMethodDef::new("show", RouteSpec::get("/{id}"), move |req| {
                let store = show_store.clone();
                async move {
                    let id = match req.path_var("id").and_then(|v| v.parse::<u64>().ok()) {
                        Some(id) => id,
                        None => return (StatusCode::BAD_REQUEST, "invalid note id").into_response(),
                    };
                    match store.read().await.get(&id) {
                        Some(note) => Json(note.clone()).into_response(),
                        None => (StatusCode::NOT_FOUND, "no such note").into_response(),
                    }
                }
            }),
            HandlerMethodDef::new("remove", RouteSpec::delete("/{id}"), move |req| {
                let store = remove_store.clone();
                async move {
                    let id = match req.path_var("id").and_then(|v| v.parse::<u64>().ok()) {
                        Some(id) => id,
                        None => return (StatusCode::BAD_REQUEST, "invalid note id").into_response(),
                    };
                    match store.write().await.remove(&id) {
                        Some(_) => StatusCode::NO_CONTENT.into_response(),
                        None => (StatusCode::NOT_FOUND, "no such note").into_response(),
                    }
                }
            }),
        ]
    }
}

/// Liveness probe component.
struct StatusComponent;

impl HandlerComponent<RouteSpec> for StatusComponent {
    fn name(&self) -> &str {
        "status"
    }

    fn handler_methods(&self) -> Vec<HandlerMethodDef<RouteSpec>> {
        vec![HandlerMethodDef::new(
            "status",
            RouteSpec::get("/status"),
            |_req| async { Json(serde_json::json!({ "status": "ok" })).into_response() },
        )]
    }
}
