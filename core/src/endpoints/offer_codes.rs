use crate::client::GumroadClient;
use crate::envelope::RequestOptions;
use crate::error::GumroadError;
use crate::http::HttpMethod;
use crate::params::{OfferCodeRef, ProductRef};
use crate::transport::Transport;
use crate::types::{Deleted, OfferCode, OfferCodeInput};

use super::deleted;

impl<T: Transport> GumroadClient<T> {
    /// All offer codes of a product, universal ones included.
    pub async fn get_offer_codes(&self, ids: &ProductRef) -> Result<Vec<OfferCode>, GumroadError> {
        let path = format!("{}/offer_codes", ids.path()?);
        self.request(&path, RequestOptions::default())
            .await?
            .project("offer_codes")
    }

    pub async fn get_offer_code(&self, ids: &OfferCodeRef) -> Result<OfferCode, GumroadError> {
        self.request(&ids.path()?, RequestOptions::default())
            .await?
            .project("offer_code")
    }

    /// Create an offer code. The amount is in cents unless `offer_type` is
    /// [`OfferType::Percent`](crate::types::OfferType::Percent).
    pub async fn create_offer_code(
        &self,
        ids: &ProductRef,
        input: &OfferCodeInput,
    ) -> Result<OfferCode, GumroadError> {
        let path = format!("{}/offer_codes", ids.path()?);
        self.request(&path, RequestOptions::new(HttpMethod::Post).data(input)?)
            .await?
            .project("offer_code")
    }

    pub async fn update_offer_code(
        &self,
        ids: &OfferCodeRef,
        input: &OfferCodeInput,
    ) -> Result<OfferCode, GumroadError> {
        self.request(&ids.path()?, RequestOptions::new(HttpMethod::Put).data(input)?)
            .await?
            .project("offer_code")
    }

    pub async fn delete_offer_code(&self, ids: &OfferCodeRef) -> Result<Deleted, GumroadError> {
        let envelope = self
            .request(&ids.path()?, RequestOptions::new(HttpMethod::Delete))
            .await?;
        Ok(deleted(envelope))
    }
}
