//! Client for the external review service.
//!
//! Review items, insights and the audit trail live in another service; this
//! module only forwards reads. Payloads are passed through as JSON values.

use crate::http::{HttpClient, HttpError, RequestOptions};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use utoipa::IntoParams;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct Page {
    /// 1-based page number.
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Page {
    fn apply(self, mut options: RequestOptions) -> RequestOptions {
        if let Some(page) = self.page {
            options = options.query("page", page);
        }
        if let Some(per_page) = self.per_page {
            options = options.query("perPage", per_page);
        }
        options
    }
}

#[derive(Clone, Debug)]
pub struct ReviewApi {
    http: HttpClient,
}

impl ReviewApi {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Review queue.
    ///
    /// # Errors
    /// Propagates the upstream [`HttpError`].
    #[instrument(skip(self))]
    pub async fn list(&self, page: Page) -> Result<Value, HttpError> {
        self.http
            .request("/reviews", page.apply(RequestOptions::get()))
            .await
    }

    /// Aggregated insights.
    ///
    /// # Errors
    /// Propagates the upstream [`HttpError`].
    #[instrument(skip(self))]
    pub async fn insights(&self) -> Result<Value, HttpError> {
        self.http.request("/insights", RequestOptions::get()).await
    }

    /// Audit trail.
    ///
    /// # Errors
    /// Propagates the upstream [`HttpError`].
    #[instrument(skip(self))]
    pub async fn audit_log(&self, page: Page) -> Result<Value, HttpError> {
        self.http
            .request("/audit-log", page.apply(RequestOptions::get()))
            .await
    }
}
