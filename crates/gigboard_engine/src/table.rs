use std::sync::Arc;

use gigboard_logging::board_debug;
use reqwest::Method;
use serde_json::Value;

use crate::client::RestClient;
use crate::coerce::{coerce_rows, ColumnMap};
use crate::identity::SessionStore;
use crate::{BackendSettings, FailureKind, FetchError, Page};

/// Reads raw rows from a hosted table.
#[async_trait::async_trait]
pub trait TableReader: Send + Sync {
    async fn query(&self, table: &str, offset: usize, limit: usize)
        -> Result<Vec<Value>, FetchError>;
}

/// PostgREST-style reader: `GET /rest/v1/{table}?select=*&offset=..&limit=..`.
#[derive(Debug, Clone)]
pub struct RestTableReader {
    client: RestClient,
    session: SessionStore,
}

impl RestTableReader {
    pub fn new(settings: &BackendSettings, session: SessionStore) -> Result<Self, FetchError> {
        Ok(Self {
            client: RestClient::new(settings)?,
            session,
        })
    }
}

#[async_trait::async_trait]
impl TableReader for RestTableReader {
    async fn query(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>, FetchError> {
        let mut url = self.client.endpoint(&format!("rest/v1/{table}"))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());

        let token = self.session.access_token();
        let request = self.client.request(Method::GET, url, token.as_deref());
        match self.client.send(request).await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Err(FetchError::new(
                FailureKind::Decode,
                format!("expected a JSON array of rows, got {}", json_kind(&other)),
            )),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Turns table reads into pages of job records.
#[derive(Clone)]
pub struct PageFetcher {
    reader: Arc<dyn TableReader>,
    table: String,
    columns: ColumnMap,
}

impl PageFetcher {
    pub fn new(reader: Arc<dyn TableReader>, table: impl Into<String>, columns: ColumnMap) -> Self {
        Self {
            reader,
            table: table.into(),
            columns,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fetches page `page_index` of `page_size` rows. A short page is the last one.
    pub async fn fetch_page(&self, page_index: u32, page_size: usize) -> Result<Page, FetchError> {
        self.fetch_range(page_index as usize * page_size, page_size)
            .await
    }

    pub async fn fetch_range(&self, offset: usize, limit: usize) -> Result<Page, FetchError> {
        let rows = self.reader.query(&self.table, offset, limit).await?;
        let is_last = rows.len() < limit;
        let (records, rejected) = coerce_rows(&rows, &self.columns);
        board_debug!(
            "Fetched {} rows from {} at offset {} ({} rejected)",
            rows.len(),
            self.table,
            offset,
            rejected
        );
        Ok(Page {
            records,
            rejected,
            is_last,
        })
    }
}
