use crate::client::GumroadClient;
use crate::envelope::RequestOptions;
use crate::error::GumroadError;
use crate::http::HttpMethod;
use crate::params::ProductRef;
use crate::transport::Transport;
use crate::types::{Deleted, Product};

use super::deleted;

impl<T: Transport> GumroadClient<T> {
    /// All products of the authenticated user.
    pub async fn get_user_products(&self) -> Result<Vec<Product>, GumroadError> {
        self.request("/products", RequestOptions::default())
            .await?
            .project("products")
    }

    pub async fn get_product(&self, ids: &ProductRef) -> Result<Product, GumroadError> {
        self.request(&ids.path()?, RequestOptions::default())
            .await?
            .project("product")
    }

    /// Permanently delete a product.
    pub async fn delete_product(&self, ids: &ProductRef) -> Result<Deleted, GumroadError> {
        let envelope = self
            .request(&ids.path()?, RequestOptions::new(HttpMethod::Delete))
            .await?;
        Ok(deleted(envelope))
    }

    pub async fn enable_product(&self, ids: &ProductRef) -> Result<Product, GumroadError> {
        let path = format!("{}/enable", ids.path()?);
        self.request(&path, RequestOptions::new(HttpMethod::Put))
            .await?
            .project("product")
    }

    pub async fn disable_product(&self, ids: &ProductRef) -> Result<Product, GumroadError> {
        let path = format!("{}/disable", ids.path()?);
        self.request(&path, RequestOptions::new(HttpMethod::Put))
            .await?
            .project("product")
    }
}
