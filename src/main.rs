use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use storefront_api::config;
use storefront_api::database::manager::DatabaseManager;
use storefront_api::handlers::{admin, protected, public};
use storefront_api::middleware::auth::{admin_middleware, auth_middleware};
use storefront_api::services::{otp, presence};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting storefront API in {:?} mode", config.environment);

    if config.database.run_migrations {
        match DatabaseManager::migrate().await {
            Ok(()) => {}
            Err(e) => tracing::warn!("Skipping migrations: {}", e),
        }
    }

    // Background sweeps for the advisory in-memory maps
    tokio::spawn(presence::run_sweeper());
    tokio::spawn(otp::run_sweeper());

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("STOREFRONT_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Storefront API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    DatabaseManager::close().await;
    tracing::info!("Storefront API stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn app() -> Router {
    let config = config::config();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .merge(admin_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn public_routes() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Accounts
        .route("/api/auth/register", post(public::auth::register))
        .route("/api/auth/login", post(public::auth::login))
        // Mocked OTP password-reset flow
        .route("/api/auth/request-otp", post(public::auth::request_otp))
        .route("/api/auth/verify-otp", post(public::auth::verify_otp))
        .route("/api/auth/reset-password", post(public::auth::reset_password))
        // Catalog reads
        .route("/api/products", get(public::catalog::list_products))
        .route("/api/products/:id", get(public::catalog::get_product))
        .route(
            "/api/reviews/product/:product_id",
            get(public::catalog::list_reviews),
        )
        // Best-effort visitor heartbeat
        .route("/api/presence/heartbeat", post(public::presence::heartbeat))
}

fn protected_routes() -> Router {
    Router::new()
        .route("/api/auth/me", get(protected::profile::me))
        .route("/api/profile", put(protected::profile::update))
        // Cart
        .route("/api/cart", get(protected::cart::list).post(protected::cart::add))
        .route(
            "/api/cart/:id",
            put(protected::cart::update).delete(protected::cart::remove),
        )
        // Orders and checkout
        .route(
            "/api/orders",
            get(protected::orders::list).post(protected::orders::create),
        )
        .route("/api/orders/:id", get(protected::orders::get))
        // Reviews
        .route("/api/reviews", post(protected::reviews::create))
        .layer(axum_middleware::from_fn(auth_middleware))
}

fn admin_routes() -> Router {
    Router::new()
        // Catalog management
        .route("/api/admin/products", post(admin::products::create))
        .route(
            "/api/admin/products/:id",
            put(admin::products::update).delete(admin::products::delete),
        )
        // Order console
        .route("/api/admin/orders", get(admin::orders::list))
        .route("/api/admin/orders/:id", put(admin::orders::update_status))
        // User management
        .route("/api/admin/users", get(admin::users::list))
        .route("/api/admin/users/:id", delete(admin::users::delete))
        .route("/api/admin/users/:id/role", put(admin::users::update_role))
        // Dashboard
        .route("/api/admin/stats", get(admin::stats::stats))
        // Auth runs first (outermost), then the role gate
        .layer(axum_middleware::from_fn(admin_middleware))
        .layer(axum_middleware::from_fn(auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Storefront API",
            "version": version,
            "endpoints": {
                "auth": "/api/auth/* (register, login, OTP reset - public; /api/auth/me - token required)",
                "products": "/api/products[/:id] (public reads)",
                "reviews": "/api/reviews/product/:id (public), /api/reviews (token required)",
                "cart": "/api/cart[/:id] (token required)",
                "orders": "/api/orders[/:id] (token required; POST /api/orders = checkout)",
                "admin": "/api/admin/* (admin role required)",
                "presence": "/api/presence/heartbeat (public, best effort)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
