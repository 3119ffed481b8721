use crate::client::GumroadClient;
use crate::envelope::RequestOptions;
use crate::error::GumroadError;
use crate::http::HttpMethod;
use crate::params::{CustomFieldRef, ProductRef};
use crate::transport::Transport;
use crate::types::{CustomField, CustomFieldInput, Deleted};

use super::deleted;

impl<T: Transport> GumroadClient<T> {
    pub async fn get_custom_fields(
        &self,
        ids: &ProductRef,
    ) -> Result<Vec<CustomField>, GumroadError> {
        let path = format!("{}/custom_fields", ids.path()?);
        self.request(&path, RequestOptions::default())
            .await?
            .project("custom_fields")
    }

    pub async fn create_custom_field(
        &self,
        ids: &ProductRef,
        input: &CustomFieldInput,
    ) -> Result<CustomField, GumroadError> {
        let path = format!("{}/custom_fields", ids.path()?);
        self.request(&path, RequestOptions::new(HttpMethod::Post).data(input)?)
            .await?
            .project("custom_field")
    }

    pub async fn update_custom_field(
        &self,
        ids: &CustomFieldRef,
        input: &CustomFieldInput,
    ) -> Result<CustomField, GumroadError> {
        self.request(&ids.path()?, RequestOptions::new(HttpMethod::Put).data(input)?)
            .await?
            .project("custom_field")
    }

    pub async fn delete_custom_field(&self, ids: &CustomFieldRef) -> Result<Deleted, GumroadError> {
        let envelope = self
            .request(&ids.path()?, RequestOptions::new(HttpMethod::Delete))
            .await?;
        Ok(deleted(envelope))
    }
}
