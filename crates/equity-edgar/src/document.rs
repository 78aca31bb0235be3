//! On-demand download of a filing's XBRL instance document.
//!
//! The filing directory listing (`index.json`) is read first to locate the
//! instance document, which is then downloaded. Nothing is fetched until
//! [`FilingDocumentSource::fetch_document`] is called.

use async_trait::async_trait;
use equity_core::{FilingDocumentSource, ProfileError, Result};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::RateLimiter;

/// SEC EDGAR archives base URL
const ARCHIVES_BASE_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// Linkbase suffixes that are never the instance document.
const LINKBASE_SUFFIXES: [&str; 4] = ["_cal.xml", "_def.xml", "_lab.xml", "_pre.xml"];

/// Lazy handle to one EDGAR filing's XBRL instance document.
#[derive(Debug)]
pub struct EdgarDocument {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    cik: String,
    accession_number: String,
}

impl EdgarDocument {
    pub(crate) fn new(
        client: reqwest::Client,
        rate_limiter: Arc<Mutex<RateLimiter>>,
        cik: &str,
        accession_number: &str,
    ) -> Self {
        Self {
            client,
            rate_limiter,
            // Archive paths use the CIK without zero padding
            cik: cik.trim_start_matches('0').to_string(),
            accession_number: accession_number.to_string(),
        }
    }

    /// URL of the filing's directory in the EDGAR archives.
    #[must_use]
    pub fn directory_url(&self) -> String {
        format!(
            "{}/{}/{}",
            ARCHIVES_BASE_URL,
            self.cik,
            self.accession_number.replace('-', "")
        )
    }

    /// GET a URL under the shared rate limiter, mapping failures to
    /// [`ProfileError::Download`].
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.lock().await.wait().await;

        debug!("Downloading {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProfileError::Download(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(ProfileError::Download(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl FilingDocumentSource for EdgarDocument {
    async fn fetch_document(&self) -> Result<Vec<u8>> {
        let directory_url = self.directory_url();

        let index: DirectoryIndex = self
            .get(&format!("{}/index.json", directory_url))
            .await?
            .json()
            .await
            .map_err(|e| {
                ProfileError::Download(format!("Invalid filing index for {}: {}", directory_url, e))
            })?;

        let names: Vec<&str> = index
            .directory
            .item
            .iter()
            .map(|item| item.name.as_str())
            .collect();

        let instance = select_instance_document(&names).ok_or_else(|| {
            ProfileError::Download(format!(
                "No XBRL instance document in filing {}",
                self.accession_number
            ))
        })?;

        let bytes = self
            .get(&format!("{}/{}", directory_url, instance))
            .await?
            .bytes()
            .await
            .map_err(|e| ProfileError::Download(e.to_string()))?;

        debug!(
            accession = %self.accession_number,
            size = bytes.len(),
            "Downloaded XBRL instance document"
        );
        Ok(bytes.to_vec())
    }
}

/// Pick the XBRL instance document out of a filing directory listing.
///
/// Inline XBRL filings publish an extracted instance named `*_htm.xml`;
/// older filings ship a plain `.xml` instance next to the linkbases.
fn select_instance_document<'a>(names: &[&'a str]) -> Option<&'a str> {
    names
        .iter()
        .find(|name| name.to_ascii_lowercase().ends_with("_htm.xml"))
        .or_else(|| {
            names.iter().find(|name| {
                let name = name.to_ascii_lowercase();
                name.ends_with(".xml")
                    && name != "filingsummary.xml"
                    && !LINKBASE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
            })
        })
        .copied()
}

/// `index.json` listing of a filing directory.
#[derive(Debug, Deserialize)]
struct DirectoryIndex {
    directory: Directory,
}

#[derive(Debug, Deserialize)]
struct Directory {
    #[serde(default)]
    item: Vec<DirectoryItem>,
}

#[derive(Debug, Deserialize)]
struct DirectoryItem {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn document(cik: &str, accession: &str) -> EdgarDocument {
        EdgarDocument::new(
            reqwest::Client::new(),
            Arc::new(Mutex::new(RateLimiter::new(Duration::from_millis(100)))),
            cik,
            accession,
        )
    }

    #[test]
    fn test_directory_url() {
        let doc = document("0000320193", "0000320193-24-000123");
        assert_eq!(
            doc.directory_url(),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019324000123"
        );
    }

    #[test]
    fn test_prefers_inline_extracted_instance() {
        let names = [
            "FilingSummary.xml",
            "aapl-20240928_cal.xml",
            "aapl-20240928.htm",
            "aapl-20240928_htm.xml",
            "aapl-20240928.xsd",
        ];
        assert_eq!(select_instance_document(&names), Some("aapl-20240928_htm.xml"));
    }

    #[test]
    fn test_falls_back_to_plain_instance() {
        let names = [
            "FilingSummary.xml",
            "msft-20100630_def.xml",
            "msft-20100630_lab.xml",
            "msft-20100630_pre.xml",
            "msft-20100630.xml",
        ];
        assert_eq!(select_instance_document(&names), Some("msft-20100630.xml"));
    }

    #[test]
    fn test_no_instance_document() {
        let names = ["FilingSummary.xml", "d10k.htm", "R1.htm"];
        assert_eq!(select_instance_document(&names), None);
    }

    #[test]
    fn test_directory_index_deserializes() {
        let index: DirectoryIndex = serde_json::from_str(
            r#"{"directory": {"item": [
                {"last-modified": "2024-11-01 06:01:36", "name": "aapl-20240928_htm.xml", "type": "text.gif", "size": "1234"}
            ], "name": "/Archives/edgar/data/320193/000032019324000123", "parent-dir": "/Archives/edgar/data/320193"}}"#,
        )
        .unwrap();
        assert_eq!(index.directory.item[0].name, "aapl-20240928_htm.xml");
    }
}
