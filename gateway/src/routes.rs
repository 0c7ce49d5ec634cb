//! 网关路由模块

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use common::middleware::{access_key_middleware, AccessKey};

use crate::handlers;
use crate::state::AppState;

/// 创建网关路由
///
/// `/health` stays outside the access key check so liveness probes never
/// need credentials.
pub fn router(state: &AppState) -> Router<AppState> {
    let access_key = AccessKey::new(state.config.access_key.clone());

    let protected = Router::new()
        .route("/metadata", post(handlers::get_metadata))
        .route("/download", post(handlers::download_data))
        .route("/web_interface", get(handlers::web_interface))
        .route_layer(middleware::from_fn_with_state(
            access_key,
            access_key_middleware,
        ));

    Router::new()
        .merge(protected)
        .route("/health", get(handlers::health_check))
}
