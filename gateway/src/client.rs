//! 共享客户端抽象
//!
//! 网关只依赖共享客户端的两个能力：按配置文件路径列出全部表、按表地址加载整张表。
//! 生产环境使用 `DeltaSharingClient`，测试中可替换为桩实现。

use std::path::Path;

use async_trait::async_trait;
use sharing_client::{ClientError, DataFrame, DeltaSharingClient, Table};

/// 共享客户端 Trait
#[async_trait]
pub trait SharingClient: Send + Sync {
    /// Lists every table visible to the profile stored at `profile_path`.
    async fn list_all_tables(&self, profile_path: &Path) -> Result<Vec<Table>, ClientError>;

    /// Loads the table addressed as `<profile-path>#<share>.<schema>.<table>`.
    async fn load_as_frame(&self, table_url: &str) -> Result<DataFrame, ClientError>;
}

#[async_trait]
impl SharingClient for DeltaSharingClient {
    async fn list_all_tables(&self, profile_path: &Path) -> Result<Vec<Table>, ClientError> {
        self.list_all_tables_at(profile_path).await
    }

    async fn load_as_frame(&self, table_url: &str) -> Result<DataFrame, ClientError> {
        DeltaSharingClient::load_as_frame(self, table_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use mockito::Server;
    use serde_json::json;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_rest_client_works_as_trait_object() {
        let mut server = Server::new_async().await;
        let profile = NamedTempFile::new().unwrap();
        let config = json!({
            "shareCredentialsVersion": 1,
            "endpoint": server.url(),
            "bearerToken": "tok",
        });
        std::fs::write(profile.path(), config.to_string()).unwrap();

        server
            .mock("GET", "/shares")
            .with_status(200)
            .with_body(json!({"items": [{"name": "sales"}]}).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/shares/sales/all-tables")
            .with_status(200)
            .with_body(
                json!({"items": [{"name": "orders", "schema": "eu", "share": "sales"}]})
                    .to_string(),
            )
            .create_async()
            .await;
        let schema = r#"{"type":"struct","fields":[{"name":"id","type":"long","nullable":true,"metadata":{}}]}"#;
        server
            .mock("POST", "/shares/sales/schemas/eu/tables/orders/query")
            .with_status(200)
            .with_body(format!(
                "{}\n{}",
                json!({"protocol": {"minReaderVersion": 1}}),
                json!({"metaData": {"format": {"provider": "parquet"}, "schemaString": schema}}),
            ))
            .create_async()
            .await;

        let client: Arc<dyn SharingClient> = Arc::new(DeltaSharingClient::default());

        let tables = client.list_all_tables(profile.path()).await.unwrap();
        assert_eq!(tables, vec![Table::new("sales", "eu", "orders")]);

        let url = format!("{}#sales.eu.orders", profile.path().display());
        let frame = client.load_as_frame(&url).await.unwrap();
        assert_eq!(frame.columns(), ["id"]);
        assert!(frame.is_empty());
    }
}
