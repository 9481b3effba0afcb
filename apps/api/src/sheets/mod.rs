//! Spreadsheet access and the parsers that turn a raw value range into
//! metrics and lead records.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

pub mod leads;
pub mod metrics;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Row-major cell values. Rows may be ragged.
pub type Grid = Vec<Vec<String>>;

/// Returns the cell at `idx`, or `""` when the row is shorter.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid sheet id '{0}'")]
    InvalidSheetId(String),

    #[error("Sheets API base URL '{0}' cannot take path segments")]
    BaseUrl(String),
}

/// Reads a value range from a remote spreadsheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_range(
        &self,
        sheet_id: &str,
        access_token: &str,
        range: &str,
    ) -> Result<Grid, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Grid,
}

/// Google Sheets v4 `values.get` client.
#[derive(Clone)]
pub struct SheetsClient {
    http: Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    /// `{base}/{sheet_id}/values/{range}` with each segment percent-encoded.
    fn values_url(&self, sheet_id: &str, range: &str) -> Result<Url, FetchError> {
        let base_err = || FetchError::BaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| base_err())?;
        url.path_segments_mut()
            .map_err(|_| base_err())?
            .push(sheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for SheetsClient {
    async fn fetch_range(
        &self,
        sheet_id: &str,
        access_token: &str,
        range: &str,
    ) -> Result<Grid, FetchError> {
        if sheet_id.trim().is_empty() {
            return Err(FetchError::InvalidSheetId(sheet_id.to_string()));
        }

        let response = self
            .http
            .get(self.values_url(sheet_id, range)?)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: ValueRange = response.json().await?;
        Ok(body.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_out_of_bounds_is_empty() {
        let row = vec!["a".to_string()];
        assert_eq!(cell(&row, 0), "a");
        assert_eq!(cell(&row, 5), "");
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = SheetsClient::new(Client::new());
        let url = client.values_url("abc123", "Respostas!A:Z").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Respostas!A:Z"
        );

        let url = client.values_url("abc123", "My Sheet!A:Z").unwrap();
        assert!(url.as_str().ends_with("/values/My%20Sheet!A:Z"));
    }

    #[test]
    fn test_broken_base_url_is_not_blamed_on_sheet_id() {
        let mut client = SheetsClient::new(Client::new());
        client.base_url = "mailto:sheets@example.com".to_string();
        let err = client.values_url("abc123", "A:Z").unwrap_err();
        assert!(matches!(err, FetchError::BaseUrl(_)));

        client.base_url = "not a url".to_string();
        assert!(matches!(
            client.values_url("abc123", "A:Z").unwrap_err(),
            FetchError::BaseUrl(_)
        ));
    }

    #[test]
    fn test_value_range_without_values_is_empty() {
        let body: ValueRange = serde_json::from_str(r#"{"range": "A1:Z1000"}"#).unwrap();
        assert!(body.values.is_empty());
    }

    #[tokio::test]
    async fn test_blank_sheet_id_is_rejected_without_request() {
        let client = SheetsClient::new(Client::new());
        let err = client.fetch_range(" ", "token", "A:Z").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidSheetId(_)));
    }
}
