use crate::client::GumroadClient;
use crate::envelope::RequestOptions;
use crate::error::GumroadError;
use crate::http::HttpMethod;
use crate::params::{ProductRef, VariantCategoryRef};
use crate::transport::Transport;
use crate::types::{Deleted, VariantCategory, VariantCategoryInput};

use super::deleted;

impl<T: Transport> GumroadClient<T> {
    pub async fn create_variant_category(
        &self,
        ids: &ProductRef,
        input: &VariantCategoryInput,
    ) -> Result<VariantCategory, GumroadError> {
        let path = format!("{}/variant_categories", ids.path()?);
        self.request(&path, RequestOptions::new(HttpMethod::Post).data(input)?)
            .await?
            .project("variant_category")
    }

    pub async fn get_variant_category(
        &self,
        ids: &VariantCategoryRef,
    ) -> Result<VariantCategory, GumroadError> {
        self.request(&ids.path()?, RequestOptions::default())
            .await?
            .project("variant_category")
    }

    pub async fn update_variant_category(
        &self,
        ids: &VariantCategoryRef,
        input: &VariantCategoryInput,
    ) -> Result<VariantCategory, GumroadError> {
        self.request(&ids.path()?, RequestOptions::new(HttpMethod::Put).data(input)?)
            .await?
            .project("variant_category")
    }

    pub async fn delete_variant_category(
        &self,
        ids: &VariantCategoryRef,
    ) -> Result<Deleted, GumroadError> {
        let envelope = self
            .request(&ids.path()?, RequestOptions::new(HttpMethod::Delete))
            .await?;
        Ok(deleted(envelope))
    }

    /// All variant categories of a product.
    pub async fn get_variant_categories(
        &self,
        ids: &ProductRef,
    ) -> Result<Vec<VariantCategory>, GumroadError> {
        let path = format!("{}/variant_categories", ids.path()?);
        self.request(&path, RequestOptions::default())
            .await?
            .project("variant_categories")
    }
}
