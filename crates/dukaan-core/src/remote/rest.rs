//! Supabase REST implementation of the remote store

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::models::{
    Customer, CustomerId, CustomerPatch, KhataEntry, Product, ProductId, ProductPatch,
};
use crate::remote::RemoteStore;
use crate::util::compact_text;

const PRODUCTS_TABLE: &str = "products";
const CUSTOMERS_TABLE: &str = "customers";
const KHATA_TABLE: &str = "khata_entries";

/// REST client for a Supabase-style backend
///
/// Every table lives under `/rest/v1/` and is addressed with
/// `column=eq.value` filters. Auth rides the public anon key.
#[derive(Clone)]
pub struct SupabaseStore {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
    }

    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api(parse_api_error(status, &body)))
    }

    /// Insert-or-replace a row keyed by its primary key
    async fn upsert_row<T: Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let response = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "resolution=merge-duplicates")
            .json(row)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// Insert a row and return the stored representation
    async fn insert_row<T: Serialize, R: DeserializeOwned>(&self, table: &str, row: &T) -> Result<R> {
        let response = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let mut rows: Vec<R> = Self::check(response).await?.json().await?;
        rows.pop()
            .ok_or_else(|| Error::Api("insert returned no representation".to_string()))
    }

    /// Patch the row matching `id`; absent rows match nothing and succeed
    async fn patch_row<T: Serialize>(&self, table: &str, id: &str, patch: &T) -> Result<()> {
        let url = format!("{}?id=eq.{}", self.table_url(table), urlencoding::encode(id));
        let response = self
            .request(Method::PATCH, url)
            .json(patch)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// Delete the row matching `id`; absent rows match nothing and succeed
    async fn delete_row(&self, table: &str, id: &str) -> Result<()> {
        let url = format!("{}?id=eq.{}", self.table_url(table), urlencoding::encode(id));
        let response = self.request(Method::DELETE, url).send().await?;

        Self::check(response).await?;
        Ok(())
    }

    /// Fetch all rows matching `query`
    async fn list_rows<R: DeserializeOwned>(&self, table: &str, query: &str) -> Result<Vec<R>> {
        let url = format!("{}?{query}", self.table_url(table));
        let response = self.request(Method::GET, url).send().await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// Create a customer, returning the stored row
    pub async fn create_customer(&self, customer: &Customer) -> Result<Customer> {
        self.insert_row(CUSTOMERS_TABLE, customer).await
    }

    /// All customers, newest first
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.list_rows(CUSTOMERS_TABLE, "select=*&order=created_at.desc")
            .await
    }

    /// Partial update of a customer
    pub async fn update_customer(&self, id: CustomerId, patch: &CustomerPatch) -> Result<()> {
        self.patch_row(CUSTOMERS_TABLE, &id.as_str(), patch).await
    }

    /// Record a khata entry, returning the stored row
    pub async fn create_khata_entry(&self, entry: &KhataEntry) -> Result<KhataEntry> {
        self.insert_row(KHATA_TABLE, entry).await
    }

    /// A customer's ledger, newest entry first
    pub async fn list_khata_entries(&self, customer_id: CustomerId) -> Result<Vec<KhataEntry>> {
        let query = format!(
            "select=*&customer_id=eq.{}&order=created_at.desc",
            urlencoding::encode(&customer_id.as_str())
        );
        self.list_rows(KHATA_TABLE, &query).await
    }
}

impl RemoteStore for SupabaseStore {
    async fn upsert_product(&self, product: &Product) -> Result<()> {
        self.upsert_row(PRODUCTS_TABLE, product).await
    }

    async fn patch_product(&self, id: ProductId, patch: &ProductPatch) -> Result<()> {
        self.patch_row(PRODUCTS_TABLE, &id.as_str(), patch).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.delete_row(PRODUCTS_TABLE, &id.as_str()).await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.list_rows(PRODUCTS_TABLE, "select=*&order=created_at.desc")
            .await
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}
