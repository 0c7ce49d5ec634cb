//! Delta Sharing 网关服务
//!
//! 面向浏览器与脚本的 HTTP 入口，提供以下功能：
//! - 根据上传的配置列出可访问的 share / schema / table
//! - 将整张表导出为 CSV 下载
//! - 健康检查与内置网页

mod client;
mod encoder;
mod handlers;
mod profile;
mod routes;
mod service;
mod state;

use std::path::Path;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Json, Router};
use common::config::{load_dotenv, AppConfig, LogFormat};
use common::middleware::request_id_middleware;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "sharing-gateway";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Delta Sharing Gateway API",
        version = "0.1.0",
        description = "列出 Delta Sharing 表并导出 CSV"
    ),
    paths(
        handlers::get_metadata,
        handlers::download_data,
        handlers::health_check,
        handlers::web_interface,
    ),
    components(schemas(
        common::models::MetadataTree,
        common::models::DownloadRequest,
        common::response::ErrorBody,
        common::response::HealthResponse,
    )),
    tags(
        (name = "sharing", description = "Delta Sharing 端点"),
        (name = "health", description = "健康检查端点")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv(Path::new(".env"));

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME);

    // 初始化日志追踪
    init_tracing(config.log_format);

    // 创建应用状态
    let state = AppState::new(config.clone())?;

    // 创建路由
    let app = create_router(state);

    // 启动服务
    let addr = config.bind_addr();
    info!(
        service = SERVICE_NAME,
        address = %addr,
        access_key = config.access_key.is_some(),
        "启动 Delta Sharing 网关"
    );

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("收到停止信号，正在关闭");
}

/// Builds the full application: routes at the root and again under `/api`.
pub(crate) fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = routes::router(&state);

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
