//! 共享网关服务模块
//!
//! 每个请求只调用一次共享客户端：列表请求把 (share, schema, table) 三元组归并为元数据树，
//! 下载请求按 `<配置路径>#<share>.<schema>.<table>` 加载整张表。
//! 客户端错误原样转为 `AppError::Gateway`，不做重试。

use sharing_client::{table_url, DataFrame, Table};

use common::errors::{AppError, AppResult};
use common::models::MetadataTree;

use crate::client::SharingClient;
use crate::profile::ScopedProfile;

/// 共享网关服务，借用请求期间的共享客户端
pub struct SharingGateway<'a> {
    client: &'a dyn SharingClient,
}

impl<'a> SharingGateway<'a> {
    /// 创建新的网关服务实例
    pub fn new(client: &'a dyn SharingClient) -> Self {
        Self { client }
    }

    /// 列出配置可见的所有表，按 share → schema 分组
    pub async fn list_tables(&self, profile: &ScopedProfile) -> AppResult<MetadataTree> {
        let tables = self
            .client
            .list_all_tables(profile.path())
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        let tree: MetadataTree = tables
            .into_iter()
            .map(|t| (t.share, t.schema, t.name))
            .collect();

        tracing::info!(tables = tree.table_count(), "tables listed");
        Ok(tree)
    }

    /// 加载整张表
    pub async fn fetch_table(&self, profile: &ScopedProfile, table: &Table) -> AppResult<DataFrame> {
        let url = table_url(&profile.path_str(), table);
        let frame = self
            .client
            .load_as_frame(&url)
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        tracing::info!(table = %table, rows = frame.num_rows(), "table fetched");
        Ok(frame)
    }
}
