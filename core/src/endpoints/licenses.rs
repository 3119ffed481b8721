use crate::client::GumroadClient;
use crate::envelope::RequestOptions;
use crate::error::GumroadError;
use crate::http::HttpMethod;
use crate::params::LicenseParams;
use crate::transport::Transport;
use crate::types::LicenseVerification;

use super::license_verification;

impl<T: Transport> GumroadClient<T> {
    /// Check a license key. Increments the key's use count unless
    /// `increment_uses_count` is `false`.
    pub async fn verify_license(
        &self,
        params: &LicenseParams,
    ) -> Result<LicenseVerification, GumroadError> {
        let options = RequestOptions::new(HttpMethod::Post).params(params.to_params()?);
        license_verification(&self.request("/licenses/verify", options).await?)
    }

    pub async fn enable_license(
        &self,
        params: &LicenseParams,
    ) -> Result<LicenseVerification, GumroadError> {
        let options = RequestOptions::new(HttpMethod::Put).params(params.to_params()?);
        license_verification(&self.request("/licenses/enable", options).await?)
    }

    pub async fn disable_license(
        &self,
        params: &LicenseParams,
    ) -> Result<LicenseVerification, GumroadError> {
        let options = RequestOptions::new(HttpMethod::Put).params(params.to_params()?);
        license_verification(&self.request("/licenses/disable", options).await?)
    }
}
