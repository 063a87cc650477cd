//! Application state wiring and the HTTP server entry point.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, patch, post};
use axum::Router;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::config::Config;
use crate::jwt::TokenManager;
use crate::middleware::csrf::CSRF_HEADER;
use crate::middleware::{
    audit_trail, csrf_protect, normalize_error_response, rate_limit, require_auth, CsrfState,
    RateLimiter,
};
use crate::openapi::ApiDoc;
use crate::repository::{
    ClientRepositoryImpl, ProductRepositoryImpl, SaleRepositoryImpl, UserRepositoryImpl,
};
use crate::service::{AuthService, ClientService, ProductService, ReportService, SaleService};
use crate::store::KeyedStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CSRF_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

pub type Auth = AuthService<UserRepositoryImpl>;
pub type Clients = ClientService<ClientRepositoryImpl>;
pub type Sales = SaleService<SaleRepositoryImpl, ClientRepositoryImpl>;
pub type Products = ProductService<ProductRepositoryImpl>;
pub type Reports = ReportService<SaleRepositoryImpl, ClientRepositoryImpl>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub tokens: TokenManager,
    pub csrf: CsrfState,
    pub auth: Arc<Auth>,
    pub clients: Arc<Clients>,
    pub sales: Arc<Sales>,
    pub products: Arc<Products>,
    pub reports: Arc<Reports>,
}

impl AppState {
    pub fn build(config: Arc<Config>, pool: MySqlPool) -> Self {
        let tokens = TokenManager::new(&config.jwt);
        let users = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let clients = Arc::new(ClientRepositoryImpl::new(pool.clone()));
        let sales = Arc::new(SaleRepositoryImpl::new(pool.clone()));
        let products = Arc::new(ProductRepositoryImpl::new(pool.clone()));

        AppState {
            csrf: CsrfState::new(config.csrf.enabled),
            auth: Arc::new(AuthService::new(users, tokens.clone())),
            clients: Arc::new(ClientService::new(clients.clone())),
            sales: Arc::new(SaleService::new(sales.clone(), clients.clone())),
            products: Arc::new(ProductService::new(products)),
            reports: Arc::new(ReportService::new(sales, clients)),
            tokens,
            config,
            db_pool: pool,
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([CSRF_HEADER]);
    }
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, CSRF_HEADER])
        .expose_headers([CSRF_HEADER])
}

pub fn build_router(state: AppState) -> Router {
    let mut auth_public: Router<AppState> = Router::new()
        .route("/api/auth/register", post(api::auth::register))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/refresh", post(api::auth::refresh));
    if state.config.rate_limit.enabled {
        let limiter = RateLimiter::new(&state.config.rate_limit.auth);
        auth_public = auth_public.layer(from_fn_with_state(limiter, rate_limit));
    }

    let protected: Router<AppState> = Router::new()
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/me", get(api::auth::me))
        .route(
            "/api/clients",
            get(api::client::list_clients).post(api::client::create_client),
        )
        .route(
            "/api/clients/{id}",
            get(api::client::get_client)
                .put(api::client::update_client)
                .delete(api::client::delete_client),
        )
        .route(
            "/api/sales",
            get(api::sale::list_sales).post(api::sale::create_sale),
        )
        .route(
            "/api/sales/{id}",
            get(api::sale::get_sale)
                .put(api::sale::update_sale)
                .delete(api::sale::delete_sale),
        )
        .route(
            "/api/products",
            get(api::product::list_products).post(api::product::create_product),
        )
        .route(
            "/api/products/{id}",
            get(api::product::get_product)
                .put(api::product::update_product)
                .delete(api::product::delete_product),
        )
        .route("/api/products/{id}/stock", patch(api::product::update_stock))
        .route("/api/reports/summary", get(api::report::summary))
        .route("/api/reports/top-clients", get(api::report::top_clients))
        .route("/api/reports/trends", get(api::report::trends))
        .route("/api/reports/by-industry", get(api::report::by_industry))
        .route("/api/reports/export", get(api::report::export))
        .layer(from_fn(audit_trail))
        .layer(from_fn_with_state(state.clone(), csrf_protect))
        .layer(from_fn_with_state(state.clone(), require_auth));

    let mut router = Router::new()
        .route("/health", get(api::health::health))
        .merge(auth_public)
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(from_fn(normalize_error_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    if state.config.rate_limit.enabled {
        let limiter = RateLimiter::new(&state.config.rate_limit.general);
        router = router.layer(from_fn_with_state(limiter, rate_limit));
    }

    router.with_state(state)
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to the database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let state = AppState::build(Arc::new(config), pool);

    // CSRF tokens are single-use per key but keys accumulate; sweep hourly.
    let csrf_store = state.csrf.store().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CSRF_SWEEP_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            csrf_store.clear();
        }
    });

    let addr = state.config.http_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, build_router(state))
        .await
        .context("server error")?;
    Ok(())
}
