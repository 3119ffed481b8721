use crate::client::GumroadClient;
use crate::envelope::RequestOptions;
use crate::error::GumroadError;
use crate::transport::Transport;
use crate::types::User;

impl<T: Transport> GumroadClient<T> {
    /// The user the access token belongs to.
    pub async fn get_user(&self) -> Result<User, GumroadError> {
        self.request("/user", RequestOptions::default())
            .await?
            .project("user")
    }
}
