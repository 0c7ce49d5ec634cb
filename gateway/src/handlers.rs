//! 网关请求处理模块
//!
//! 每个请求独立完成：读取请求体、将配置写入临时文件、调用共享客户端、编码响应。
//! 临时配置文件在所有返回路径上都会被删除。

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Html,
    Json,
};
use sharing_client::Table;

use common::errors::AppError;
use common::models::{DownloadRequest, MetadataTree};
use common::response::{ErrorBody, HealthResponse};

use crate::encoder::{encode_csv, CsvAttachment};
use crate::profile::ScopedProfile;
use crate::service::SharingGateway;
use crate::state::AppState;

/// Message returned when the download body is not a JSON object.
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";

const WEB_INTERFACE: &str = include_str!("../static/index.html");

/// 列出配置可见的所有表
///
/// The request body is the raw profile document.
#[utoipa::path(
    post,
    path = "/metadata",
    tag = "sharing",
    request_body(content = String, description = "Delta Sharing 配置文件内容", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "share → schema → tables", body = MetadataTree),
        (status = 400, description = "未提供配置", body = ErrorBody),
        (status = 413, description = "请求体超出大小限制", body = ErrorBody),
        (status = 500, description = "共享服务或临时文件错误", body = ErrorBody)
    )
)]
pub async fn get_metadata(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<MetadataTree>, AppError> {
    let body = body?;
    tracing::info!(bytes = body.len(), "metadata request");

    let profile = ScopedProfile::materialize(&body, state.config.profile_temp_dir.as_deref())?;
    let tree = SharingGateway::new(state.sharing.as_ref())
        .list_tables(&profile)
        .await?;
    profile.release()?;

    Ok(Json(tree))
}

/// 下载整张表为 CSV
#[utoipa::path(
    post,
    path = "/download",
    tag = "sharing",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "CSV 附件", content_type = "text/csv", body = String),
        (status = 400, description = "请求体无效或缺少参数", body = ErrorBody),
        (status = 413, description = "请求体超出大小限制", body = ErrorBody),
        (status = 500, description = "共享服务或临时文件错误", body = ErrorBody)
    )
)]
pub async fn download_data(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<CsvAttachment, AppError> {
    let target = parse_download_request(&body?)?.into_target()?;
    let table = Table::new(target.share, target.schema, target.table);
    tracing::info!(table = %table, "download request");

    let profile = ScopedProfile::materialize(
        target.config.as_bytes(),
        state.config.profile_temp_dir.as_deref(),
    )?;
    let frame = SharingGateway::new(state.sharing.as_ref())
        .fetch_table(&profile, &table)
        .await?;
    // CSV 编码可能耗时较长，放到阻塞线程池执行
    let csv = tokio::task::spawn_blocking(move || encode_csv(&frame))
        .await
        .map_err(|e| AppError::Internal(format!("CSV encoding task failed: {}", e)))??;
    profile.release()?;

    Ok(CsvAttachment::new(&table.name, csv))
}

/// Accepts only a non-empty JSON object; field checks happen afterwards.
fn parse_download_request(body: &[u8]) -> Result<DownloadRequest, AppError> {
    let invalid = || AppError::Validation(INVALID_REQUEST_BODY.to_string());

    let value: serde_json::Value = serde_json::from_slice(body).map_err(|_| invalid())?;
    match value.as_object() {
        Some(fields) if !fields.is_empty() => {}
        _ => return Err(invalid()),
    }
    serde_json::from_value(value).map_err(|_| invalid())
}

/// 健康检查
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "网关运行正常", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// 浏览器页面
#[utoipa::path(
    get,
    path = "/web_interface",
    tag = "sharing",
    responses(
        (status = 200, description = "HTML 页面", content_type = "text/html", body = String)
    )
)]
pub async fn web_interface() -> Html<&'static str> {
    Html(WEB_INTERFACE)
}
