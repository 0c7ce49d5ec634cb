//! Data models for Delta Sharing REST responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Highest table reader version this client understands.
pub const SUPPORTED_READER_VERSION: u32 = 1;

/// A share visible to the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub name: String,
}

/// A shared table, addressed by share, schema and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub share: String,
    pub schema: String,
}

impl Table {
    pub fn new(share: impl Into<String>, schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            share: share.into(),
            schema: schema.into(),
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.share, self.schema, self.name)
    }
}

/// One page of a paginated listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl<T> ListResponse<T> {
    /// Token for the next page, if the server reported a non-empty one.
    pub fn next_page(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Error body returned by sharing servers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error_code: Option<String>,
    pub message: String,
}

/// `protocol` line of a query response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub min_reader_version: u32,
}

/// File format of the table data.
#[derive(Debug, Clone, Deserialize)]
pub struct Format {
    pub provider: String,
}

/// `metaData` line of a query response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub format: Format,
    pub schema_string: String,
}

impl Metadata {
    /// Top-level column names from the schema string, in order.
    pub fn column_names(&self) -> Result<Vec<String>> {
        let schema: StructType = serde_json::from_str(&self.schema_string)
            .map_err(|e| ClientError::Protocol(format!("invalid schemaString: {}", e)))?;
        Ok(schema.fields.into_iter().map(|f| f.name).collect())
    }
}

#[derive(Debug, Deserialize)]
struct StructType {
    fields: Vec<StructField>,
}

#[derive(Debug, Deserialize)]
struct StructField {
    name: String,
}

/// `file` line of a query response: one Parquet object behind a presigned URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAction {
    pub url: String,
    pub id: String,
    #[serde(default)]
    pub partition_values: HashMap<String, Option<String>>,
}

/// A single NDJSON line of a query response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
enum Action {
    Protocol(Protocol),
    MetaData(Metadata),
    File(FileAction),
}

/// Parsed table query response.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub protocol: Protocol,
    pub metadata: Metadata,
    pub files: Vec<FileAction>,
}

impl QueryResponse {
    /// Parses the newline-delimited JSON body of a table query.
    pub fn from_ndjson(body: &str) -> Result<Self> {
        let mut protocol = None;
        let mut metadata = None;
        let mut files = Vec::new();

        for (line_no, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let action: Action = serde_json::from_str(line).map_err(|e| {
                ClientError::Protocol(format!("line {}: {}", line_no + 1, e))
            })?;
            match action {
                Action::Protocol(p) => protocol = Some(p),
                Action::MetaData(m) => metadata = Some(m),
                Action::File(f) => files.push(f),
            }
        }

        let protocol =
            protocol.ok_or_else(|| ClientError::Protocol("missing protocol".to_string()))?;
        if protocol.min_reader_version > SUPPORTED_READER_VERSION {
            return Err(ClientError::Protocol(format!(
                "the table requires reader version {} but this client supports up to {}",
                protocol.min_reader_version, SUPPORTED_READER_VERSION
            )));
        }
        let metadata =
            metadata.ok_or_else(|| ClientError::Protocol("missing metaData".to_string()))?;

        Ok(Self {
            protocol,
            metadata,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{\"type\":\"struct\",\"fields\":[{\"name\":\"id\",\"type\":\"long\",\"nullable\":true,\"metadata\":{}},{\"name\":\"day\",\"type\":\"date\",\"nullable\":true,\"metadata\":{}}]}"#;

    fn body() -> String {
        format!(
            "{}\n{}\n{}\n",
            r#"{"protocol":{"minReaderVersion":1}}"#,
            format!(
                r#"{{"metaData":{{"id":"m1","format":{{"provider":"parquet"}},"schemaString":"{}","partitionColumns":["day"]}}}}"#,
                SCHEMA
            ),
            r#"{"file":{"url":"https://s3/part-0.parquet","id":"f1","partitionValues":{"day":"2021-04-28"},"size":573,"stats":"{}"}}"#,
        )
    }

    #[test]
    fn test_parse_query_response() {
        let response = QueryResponse::from_ndjson(&body()).unwrap();
        assert_eq!(response.protocol.min_reader_version, 1);
        assert_eq!(response.metadata.format.provider, "parquet");
        assert_eq!(response.metadata.column_names().unwrap(), vec!["id", "day"]);
        assert_eq!(response.files.len(), 1);
        assert_eq!(
            response.files[0].partition_values["day"].as_deref(),
            Some("2021-04-28")
        );
    }

    #[test]
    fn test_rejects_newer_reader_version() {
        let body = body().replace("\"minReaderVersion\":1", "\"minReaderVersion\":3");
        let err = QueryResponse::from_ndjson(&body).unwrap_err();
        assert!(err.to_string().contains("reader version 3"));
    }

    #[test]
    fn test_missing_metadata_is_an_error() {
        let err = QueryResponse::from_ndjson(r#"{"protocol":{"minReaderVersion":1}}"#).unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[test]
    fn test_list_response_page_token() {
        let page: ListResponse<Table> = serde_json::from_str(
            r#"{"items":[{"name":"t","schema":"d","share":"s"}],"nextPageToken":""}"#,
        )
        .unwrap();
        assert_eq!(page.items, vec![Table::new("s", "d", "t")]);
        assert!(page.next_page().is_none());

        let page: ListResponse<Share> = serde_json::from_str(r#"{"nextPageToken":"abc"}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_page(), Some("abc"));
    }
}
