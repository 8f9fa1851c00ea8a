//! Typed client for the remote `inventory` / `cart` collection store.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{CartItem, InventoryItem, ItemId},
    error::StoreError,
    protocol::{AmountPatch, InventoryRecord, NewCartItem},
};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_STORE_URL: &str = "http://localhost:3000";

#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch_inventory(&self) -> Result<Vec<InventoryItem>, StoreError>;
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, StoreError>;
    async fn create_cart_item(&self, item: NewCartItem) -> Result<CartItem, StoreError>;
    async fn update_cart_item(&self, id: ItemId, amount: u32) -> Result<CartItem, StoreError>;
    /// Deleting a line that is already gone counts as success.
    async fn delete_cart_item(&self, id: ItemId) -> Result<(), StoreError>;

    /// Removes every line the store currently holds, all deletes in flight at once.
    ///
    /// Nothing is rolled back when some deletes fail: the error reports which
    /// ids were removed and which were not.
    async fn checkout(&self) -> Result<(), StoreError> {
        let cart = self.fetch_cart().await?;
        let results = join_all(cart.iter().map(|line| async move {
            (line.id, self.delete_cart_item(line.id).await)
        }))
        .await;

        let mut removed = Vec::with_capacity(results.len());
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => removed.push(id),
                Err(err) => {
                    warn!(item_id = id.0, error = %err, "checkout delete failed");
                    failed.push((id, err.to_string()));
                }
            }
        }

        if failed.is_empty() {
            info!(lines = removed.len(), "checkout complete");
            Ok(())
        } else {
            Err(StoreError::PartialCheckout { removed, failed })
        }
    }
}

pub struct HttpRemoteStore {
    http: Client,
    base_url: String,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::build(base_url, Client::builder())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        Self::build(base_url, Client::builder().timeout(timeout))
    }

    fn build(base_url: &str, builder: reqwest::ClientBuilder) -> Result<Self, StoreError> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|err| StoreError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::InvalidBaseUrl(format!(
                "{base_url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        let http = builder
            .build()
            .map_err(|err| StoreError::network(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        debug!(%method, %url, "store request");
        self.http.request(method, url)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::network(err.to_string())
}

fn ensure_success(res: Response) -> Result<Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        Err(StoreError::network(format!(
            "{} returned HTTP {status}",
            res.url().path()
        )))
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, StoreError> {
    res.json::<T>()
        .await
        .map_err(|err| StoreError::network(format!("malformed store response: {err}")))
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let res = self
            .request(Method::GET, "inventory")
            .send()
            .await
            .map_err(transport)?;
        let records: Vec<InventoryRecord> = decode(ensure_success(res)?).await?;
        Ok(records.into_iter().map(InventoryItem::from).collect())
    }

    async fn fetch_cart(&self) -> Result<Vec<CartItem>, StoreError> {
        let res = self
            .request(Method::GET, "cart")
            .send()
            .await
            .map_err(transport)?;
        decode(ensure_success(res)?).await
    }

    async fn create_cart_item(&self, item: NewCartItem) -> Result<CartItem, StoreError> {
        let res = self
            .request(Method::POST, "cart")
            .json(&item)
            .send()
            .await
            .map_err(transport)?;
        decode(ensure_success(res)?).await
    }

    async fn update_cart_item(&self, id: ItemId, amount: u32) -> Result<CartItem, StoreError> {
        let res = self
            .request(Method::PATCH, &format!("cart/{id}"))
            .json(&AmountPatch { amount })
            .send()
            .await
            .map_err(transport)?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id));
        }
        decode(ensure_success(res)?).await
    }

    async fn delete_cart_item(&self, id: ItemId) -> Result<(), StoreError> {
        let res = self
            .request(Method::DELETE, &format!("cart/{id}"))
            .send()
            .await
            .map_err(transport)?;
        if res.status() == StatusCode::NOT_FOUND {
            debug!(item_id = id.0, "cart line already absent");
            return Ok(());
        }
        ensure_success(res)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
