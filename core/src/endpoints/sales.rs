use crate::client::GumroadClient;
use crate::envelope::{Params, RequestOptions};
use crate::error::GumroadError;
use crate::http::HttpMethod;
use crate::params::{RefundParams, SaleRef, SalesQuery, ShipmentParams};
use crate::transport::Transport;
use crate::types::Sale;

// Sale endpoints need the `view_sales`, `mark_sales_as_shipped` and
// `refund_sales` scopes respectively.
impl<T: Transport> GumroadClient<T> {
    /// Successful sales of the authenticated user, filtered by `query`.
    pub async fn get_sales(&self, query: &SalesQuery) -> Result<Vec<Sale>, GumroadError> {
        let options = RequestOptions::default().params(Params::from_serializable(query)?);
        self.request("/sales", options).await?.project("sales")
    }

    pub async fn get_sale(&self, ids: &SaleRef) -> Result<Sale, GumroadError> {
        self.request(&ids.path()?, RequestOptions::default())
            .await?
            .project("sale")
    }

    pub async fn mark_sale_as_shipped(
        &self,
        ids: &SaleRef,
        params: &ShipmentParams,
    ) -> Result<Sale, GumroadError> {
        let path = format!("{}/mark_as_shipped", ids.path()?);
        let options =
            RequestOptions::new(HttpMethod::Put).params(Params::from_serializable(params)?);
        self.request(&path, options).await?.project("sale")
    }

    pub async fn refund_sale(
        &self,
        ids: &SaleRef,
        params: &RefundParams,
    ) -> Result<Sale, GumroadError> {
        let path = format!("{}/refund", ids.path()?);
        let options =
            RequestOptions::new(HttpMethod::Put).params(Params::from_serializable(params)?);
        self.request(&path, options).await?.project("sale")
    }
}
