//! `/auth` endpoints.

use tracing::instrument;

use super::{AdminApi, decode_entity};
use crate::api::{ApiError, ApiRequest};
use crate::models::{LoginRequest, LoginResponse};

impl AdminApi {
    /// Exchange credentials for a session. Nothing is cached or stored here.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the credentials are rejected or the response is malformed.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::post(["auth", "login"]).json(credentials)?;
        let body = self.api.request(request).await?;
        decode_entity(body, "data")
    }
}
