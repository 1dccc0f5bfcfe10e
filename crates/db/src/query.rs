//! PostgREST query builder.
//!
//! Builds the declarative filter/order/embed query strings the backend's
//! table interface understands and executes them with the shared
//! [`SupabaseClient`]. Each call is attempted exactly once; backend
//! failures are classified into the error taxonomy and passed through
//! otherwise untouched.

use gigram_core::error::CoreError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::SupabaseClient;
use crate::error::{DbError, DbResult};

/// PostgREST code reported when a single-object request matched no rows.
const CODE_NO_ROWS: &str = "PGRST116";

/// Postgres code for a unique constraint violation.
const CODE_UNIQUE_VIOLATION: &str = "23505";

/// Accept header requesting a bare object instead of a one-element array.
const ACCEPT_SINGLE: &str = "application/vnd.pgrst.object+json";

/// A query against one backend table.
///
/// Filter methods follow PostgREST operator names (`eq`, `gte`, `lte`,
/// `ov`, `or`). Terminal methods consume the builder and perform the
/// request.
#[must_use]
pub struct QueryBuilder<'a> {
    client: &'a SupabaseClient,
    table: &'static str,
    params: Vec<(String, String)>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(client: &'a SupabaseClient, table: &'static str) -> Self {
        Self {
            client,
            table,
            params: Vec::new(),
        }
    }

    /// Column/embed selection, e.g. `"*,client:profiles!jobs_client_id_fkey(*)"`.
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), columns.into()));
        self
    }

    /// Equality filter: `column = value`.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    /// Inclusive lower bound: `column >= value`.
    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.into(), format!("gte.{}", value.to_string())));
        self
    }

    /// Inclusive upper bound: `column <= value`.
    pub fn lte(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.into(), format!("lte.{}", value.to_string())));
        self
    }

    /// Array overlap (any-match): the column shares at least one element
    /// with `values`.
    pub fn overlaps(mut self, column: &str, values: &[String]) -> Self {
        let list = values
            .iter()
            .map(|v| format!("\"{}\"", v.replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(",");
        self.params.push((column.into(), format!("ov.{{{list}}}")));
        self
    }

    /// Disjunction of raw PostgREST conditions, e.g.
    /// `title.ilike.*term*,description.ilike.*term*`.
    pub fn or(mut self, conditions: &str) -> Self {
        self.params.push(("or".into(), format!("({conditions})")));
        self
    }

    /// Sort by a column.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params
            .push(("order".into(), format!("{column}.{direction}")));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, count: usize) -> Self {
        self.params.push(("limit".into(), count.to_string()));
        self
    }

    // ---- terminal methods ----

    /// Fetch all matching rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> DbResult<Vec<T>> {
        let response = self.request(reqwest::Method::GET).send().await?;
        parse_response(response).await
    }

    /// Fetch the single matching row, or `None` when no row matched.
    ///
    /// Row absence is an explicit outcome here, distinguished from every
    /// other backend failure.
    pub async fn maybe_one<T: DeserializeOwned>(self) -> DbResult<Option<T>> {
        let response = self
            .request(reqwest::Method::GET)
            .header(reqwest::header::ACCEPT, ACCEPT_SINGLE)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(Some(response.json().await?));
        }
        match classify_error(response).await {
            DbError::Api { code: Some(code), .. } if code == CODE_NO_ROWS => Ok(None),
            other => Err(other),
        }
    }

    /// Count matching rows without transferring them.
    ///
    /// Issues a `HEAD` request with `Prefer: count=exact` and reads the
    /// total from the `Content-Range` header.
    pub async fn count(self) -> DbResult<i64> {
        let response = self
            .request(reqwest::Method::HEAD)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_error(response).await);
        }

        let total = response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);

        total.ok_or_else(|| DbError::Api {
            status: status.as_u16(),
            code: None,
            message: "Missing or malformed Content-Range header in count response".into(),
        })
    }

    /// Insert one row, returning the stored representation.
    pub async fn insert<T: DeserializeOwned>(self, row: &impl serde::Serialize) -> DbResult<T> {
        let response = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=representation")
            .header(reqwest::header::ACCEPT, ACCEPT_SINGLE)
            .json(row)
            .send()
            .await?;
        parse_response(response).await
    }

    /// Insert-or-replace one row keyed on `on_conflict`, returning the
    /// stored representation. Existing rows are merged, not duplicated.
    pub async fn upsert<T: DeserializeOwned>(
        mut self,
        row: &impl serde::Serialize,
        on_conflict: &str,
    ) -> DbResult<T> {
        self.params
            .push(("on_conflict".into(), on_conflict.into()));
        let response = self
            .request(reqwest::Method::POST)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .header(reqwest::header::ACCEPT, ACCEPT_SINGLE)
            .json(row)
            .send()
            .await?;
        parse_response(response).await
    }

    /// Patch matching rows, returning their stored representations.
    /// An empty result means no row matched the filters.
    pub async fn update<T: DeserializeOwned>(self, patch: &impl serde::Serialize) -> DbResult<Vec<T>> {
        let response = self
            .request(reqwest::Method::PATCH)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        parse_response(response).await
    }

    /// Patch matching rows without requesting a representation.
    /// Matching zero rows is a success, not an error.
    pub async fn update_only(self, patch: &impl serde::Serialize) -> DbResult<()> {
        let response = self
            .request(reqwest::Method::PATCH)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(classify_error(response).await)
        }
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.client.config().rest_url(), self.table);
        self.client
            .authorize(self.client.http().request(method, url))
            .query(&self.params)
    }
}

// ---- response handling ----

/// Error body shape the backend's table interface reports.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Parse a successful JSON response body into the expected type.
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> DbResult<T> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(classify_error(response).await)
    }
}

/// Classify a backend error response.
///
/// Unique constraint violations (Postgres `23505`) map to
/// [`CoreError::Conflict`]; everything else is surfaced as
/// [`DbError::Api`] with the backend's message intact.
async fn classify_error(response: reqwest::Response) -> DbError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());

    let parsed: Option<ErrorBody> = serde_json::from_str(&body).ok();
    let (code, message) = match parsed {
        Some(err) => (err.code, err.message.unwrap_or(body)),
        None => (None, body),
    };

    if code.as_deref() == Some(CODE_UNIQUE_VIOLATION) {
        return CoreError::Conflict(message).into();
    }

    DbError::Api {
        status,
        code,
        message,
    }
}

/// Extract the total from a `Content-Range` value such as `0-24/57` or `*/57`.
fn parse_content_range_total(value: &str) -> Option<i64> {
    value.rsplit('/').next()?.parse().ok()
}
