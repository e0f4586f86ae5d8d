use crate::error::SourceError;
use crate::state::CatalogEntry;

use super::CatalogSource;

/// Owned-app catalog served as JSON by the catalog service.
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    /// Catalog rooted at `base_url` (e.g. `http://catalog.lan:8080`).
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn apps_url(&self) -> String {
        format!("{}/apps", self.base_url)
    }
}

impl CatalogSource for HttpCatalog {
    /// What: `GET {base}/apps` and decode the entry list.
    ///
    /// Output:
    /// - Entries in the order the service returns them.
    ///
    /// Details:
    /// - Duplicate ids are dropped after their first occurrence so the catalog
    ///   keeps its uniqueness guarantee.
    async fn list_owned_apps(&self) -> Result<Vec<CatalogEntry>, SourceError> {
        let url = self.apps_url();
        tracing::debug!(url = %url, "[Catalog] Listing owned apps");
        let entries: Vec<CatalogEntry> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let mut seen = std::collections::HashSet::new();
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .filter(|e| seen.insert(e.app_id.clone()))
            .collect();
        tracing::info!(count = entries.len(), "[Catalog] Owned apps listed");
        Ok(entries)
    }
}
