//! `/users` endpoints.

use tracing::instrument;

use backoffice_core::UserId;

use super::{AdminApi, DeletableEndpoint, FilterState, ListEndpoint, decode_entity};
use crate::api::{ApiError, ApiRequest};
use crate::cache::Tag;
use crate::config::AdminConfig;
use crate::models::{User, UserPayload};

/// `GET /users` with `page`, `limit`, `search`, `role`, `status`, `sortBy`, `sortOrder`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsersEndpoint;

impl ListEndpoint for UsersEndpoint {
    type Item = User;
    const TAG: Tag = Tag::User;

    fn default_limit(config: &AdminConfig) -> u32 {
        config.page_size
    }

    fn request(&self, filter: &FilterState) -> ApiRequest {
        filter.apply(ApiRequest::get(["users"]))
    }
}

impl DeletableEndpoint for UsersEndpoint {
    type Id = UserId;
    const NOUN: &'static str = "user";
    const DELETE_INVALIDATES: &'static [Tag] = &[Tag::User];

    fn delete_request(&self, id: &UserId) -> ApiRequest {
        ApiRequest::delete(["users", id.as_str()])
    }
}

impl AdminApi {
    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the user does not decode.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &UserId) -> Result<User, ApiError> {
        let body = self
            .cache
            .query(&self.api, Tag::User, ApiRequest::get(["users", id.as_str()]))
            .await?;
        decode_entity(body, "user")
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the user.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn create_user(&self, payload: &UserPayload) -> Result<(), ApiError> {
        let request = ApiRequest::post(["users"]).json(payload)?;
        self.mutate(request, &[Tag::User]).await?;
        tracing::info!("User created");
        Ok(())
    }

    /// Update a user. A `None` password keeps the current one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the update.
    #[instrument(skip(self, payload), fields(user_id = %id))]
    pub async fn update_user(&self, id: &UserId, payload: &UserPayload) -> Result<(), ApiError> {
        let request = ApiRequest::patch(["users", id.as_str()]).json(payload)?;
        self.mutate(request, &[Tag::User]).await?;
        tracing::info!("User updated");
        Ok(())
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the delete.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        self.delete(&UsersEndpoint, id).await
    }
}
