use crate::client::GumroadClient;
use crate::envelope::{Params, RequestOptions};
use crate::error::GumroadError;
use crate::params::{ProductRef, SubscriberRef, SubscribersQuery};
use crate::transport::Transport;
use crate::types::Subscriber;

impl<T: Transport> GumroadClient<T> {
    /// Active subscribers of one of the user's products.
    pub async fn get_product_subscribers(
        &self,
        ids: &ProductRef,
        query: &SubscribersQuery,
    ) -> Result<Vec<Subscriber>, GumroadError> {
        let path = format!("{}/subscribers", ids.path()?);
        let options = RequestOptions::default().params(Params::from_serializable(query)?);
        self.request(&path, options).await?.project("subscribers")
    }

    pub async fn get_subscriber(&self, ids: &SubscriberRef) -> Result<Subscriber, GumroadError> {
        self.request(&ids.path()?, RequestOptions::default())
            .await?
            .project("subscriber")
    }
}
