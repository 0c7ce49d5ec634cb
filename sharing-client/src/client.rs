//! Delta Sharing REST client.

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::frame::{DataFrame, FrameBuilder};
use crate::models::{ApiErrorResponse, ListResponse, QueryResponse, Share, Table};
use crate::profile::Profile;
use crate::url::parse_table_url;

/// User agent sent with every protocol request.
const USER_AGENT: &str = concat!("delta-sharing-gateway/", env!("CARGO_PKG_VERSION"));

/// Number of data files downloaded concurrently for one table.
const DOWNLOAD_CONCURRENCY: usize = 4;

/// Client for Delta Sharing servers.
///
/// The client holds no per-profile state: every call names the profile it
/// runs against, so one instance can serve any number of callers.
#[derive(Debug, Clone)]
pub struct DeltaSharingClient {
    http: Client,
}

impl Default for DeltaSharingClient {
    fn default() -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { http }
    }
}

impl DeltaSharingClient {
    /// Creates a client whose HTTP calls each time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Lists every table in every share the profile at `profile_path` can see.
    pub async fn list_all_tables_at(&self, profile_path: impl AsRef<Path>) -> Result<Vec<Table>> {
        let profile = Profile::from_path(profile_path).await?;
        self.list_all_tables(&profile).await
    }

    /// Loads a whole table addressed as `<profile-path>#<share>.<schema>.<table>`.
    pub async fn load_as_frame(&self, table_url: &str) -> Result<DataFrame> {
        let (profile_path, table) = parse_table_url(table_url)?;
        let profile = Profile::from_path(&profile_path).await?;
        self.load_table(&profile, &table).await
    }

    /// Lists all shares.
    pub async fn list_shares(&self, profile: &Profile) -> Result<Vec<Share>> {
        self.paginate(profile, &["shares"]).await
    }

    /// Lists all tables in one share, across all of its schemas.
    pub async fn list_all_tables_in_share(
        &self,
        profile: &Profile,
        share: &str,
    ) -> Result<Vec<Table>> {
        self.paginate(profile, &["shares", share, "all-tables"]).await
    }

    /// Lists all tables in all shares, in server order.
    pub async fn list_all_tables(&self, profile: &Profile) -> Result<Vec<Table>> {
        let mut tables = Vec::new();
        for share in self.list_shares(profile).await? {
            tables.extend(self.list_all_tables_in_share(profile, &share.name).await?);
        }
        tracing::debug!(tables = tables.len(), "listed all tables");
        Ok(tables)
    }

    /// Asks the server for the files that make up `table`.
    pub async fn query_table(&self, profile: &Profile, table: &Table) -> Result<QueryResponse> {
        let url = endpoint_url(
            profile,
            &[
                "shares",
                &table.share,
                "schemas",
                &table.schema,
                "tables",
                &table.name,
                "query",
            ],
        )?;
        tracing::debug!(table = %table, "querying table");

        let response = self
            .authorized(self.http.post(url), profile)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;
        QueryResponse::from_ndjson(&body)
    }

    /// Downloads and decodes every data file of `table`.
    pub async fn load_table(&self, profile: &Profile, table: &Table) -> Result<DataFrame> {
        let QueryResponse {
            metadata, files, ..
        } = self.query_table(profile, table).await?;
        if metadata.format.provider != "parquet" {
            return Err(ClientError::Protocol(format!(
                "unsupported table format '{}'",
                metadata.format.provider
            )));
        }

        let mut builder = FrameBuilder::new(metadata.column_names()?);

        // Downloads overlap, decoding stays in file order.
        let mut downloads = futures::stream::iter(files)
            .map(move |file| async move {
                let data = self.download(&file.url).await?;
                Ok::<_, ClientError>((file, data))
            })
            .buffered(DOWNLOAD_CONCURRENCY);

        while let Some((file, data)) = downloads.try_next().await? {
            tracing::debug!(file = %file.id, bytes = data.len(), "decoding data file");
            // Parquet 解码是 CPU 密集型操作，放到阻塞线程池执行
            builder = tokio::task::spawn_blocking(move || {
                let mut builder = builder;
                builder.append_parquet(data, &file.partition_values)?;
                Ok::<_, ClientError>(builder)
            })
            .await??;
        }

        let frame = builder.finish();
        tracing::debug!(table = %table, rows = frame.num_rows(), "table loaded");
        Ok(frame)
    }

    /// Fetches a presigned data file. No bearer token: the URL carries its own.
    async fn download(&self, url: &str) -> Result<Bytes> {
        let response = self.http.get(url).send().await?;
        Ok(check_status(response).await?.bytes().await?)
    }

    async fn paginate<T: DeserializeOwned>(
        &self,
        profile: &Profile,
        segments: &[&str],
    ) -> Result<Vec<T>> {
        let url = endpoint_url(profile, segments)?;
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.authorized(self.http.get(url.clone()), profile);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }
            tracing::debug!(url = %url, page_token = ?page_token, "listing page");

            let response = check_status(request.send().await?).await?;
            let page: ListResponse<T> = response.json().await?;
            let next = page.next_page().map(str::to_string);
            items.extend(page.items);

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(items)
    }

    fn authorized(&self, request: RequestBuilder, profile: &Profile) -> RequestBuilder {
        request.bearer_auth(&profile.bearer_token)
    }
}

/// Appends percent-encoded path segments to the profile endpoint.
fn endpoint_url(profile: &Profile, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(&profile.endpoint).map_err(|e| {
        ClientError::Profile(format!("Invalid endpoint '{}': {}", profile.endpoint, e))
    })?;
    url.path_segments_mut()
        .map_err(|_| ClientError::Profile(format!("Invalid endpoint '{}'", profile.endpoint)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turns non-2xx responses into `ClientError::Api`.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => match api_error.error_code {
            Some(code) => format!("{}: {}", code, api_error.message),
            None => api_error.message,
        },
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => body,
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(endpoint: &str) -> Profile {
        Profile::from_json(&format!(
            r#"{{"shareCredentialsVersion":1,"endpoint":"{}","bearerToken":"t"}}"#,
            endpoint
        ))
        .unwrap()
    }

    #[test]
    fn test_endpoint_url_joins_segments() {
        let url = endpoint_url(
            &profile("https://host/delta-sharing/"),
            &["shares", "s", "all-tables"],
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://host/delta-sharing/shares/s/all-tables");
    }

    #[test]
    fn test_endpoint_url_encodes_segments() {
        let url = endpoint_url(&profile("https://host"), &["shares", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://host/shares/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_url_rejects_relative_endpoint() {
        let err = endpoint_url(&profile("not-a-url"), &["shares"]).unwrap_err();
        assert!(matches!(err, ClientError::Profile(_)));
    }
}
