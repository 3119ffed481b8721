use crate::client::GumroadClient;
use crate::envelope::RequestOptions;
use crate::error::GumroadError;
use crate::http::HttpMethod;
use crate::params::{VariantCategoryRef, VariantRef};
use crate::transport::Transport;
use crate::types::{Deleted, Variant, VariantInput};

use super::deleted;

impl<T: Transport> GumroadClient<T> {
    pub async fn create_variant(
        &self,
        ids: &VariantCategoryRef,
        input: &VariantInput,
    ) -> Result<Variant, GumroadError> {
        let path = format!("{}/variants", ids.path()?);
        self.request(&path, RequestOptions::new(HttpMethod::Post).data(input)?)
            .await?
            .project("variant")
    }

    pub async fn get_variant(&self, ids: &VariantRef) -> Result<Variant, GumroadError> {
        self.request(&ids.path()?, RequestOptions::default())
            .await?
            .project("variant")
    }

    pub async fn update_variant(
        &self,
        ids: &VariantRef,
        input: &VariantInput,
    ) -> Result<Variant, GumroadError> {
        self.request(&ids.path()?, RequestOptions::new(HttpMethod::Put).data(input)?)
            .await?
            .project("variant")
    }

    pub async fn delete_variant(&self, ids: &VariantRef) -> Result<Deleted, GumroadError> {
        let envelope = self
            .request(&ids.path()?, RequestOptions::new(HttpMethod::Delete))
            .await?;
        Ok(deleted(envelope))
    }

    /// All variants in a variant category.
    pub async fn get_variants(
        &self,
        ids: &VariantCategoryRef,
    ) -> Result<Vec<Variant>, GumroadError> {
        let path = format!("{}/variants", ids.path()?);
        self.request(&path, RequestOptions::default())
            .await?
            .project("variants")
    }
}
