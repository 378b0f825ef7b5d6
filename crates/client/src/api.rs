//! HTTP access to the catalog endpoints.
//!
//! [`CatalogApi`] is the seam the store depends on; [`HttpCatalogApi`]
//! implements it with [`reqwest`], sending create and update requests as
//! `multipart/form-data`.

use async_trait::async_trait;
use heroes_core::pagination::LIST_PATH;
use heroes_core::superhero::{
    MessageBody, Superhero, SuperheroEnvelope, SuperheroPage, FIELD_CATCH_PHRASE, FIELD_IMAGES,
    FIELD_IMAGES_TO_REMOVE, FIELD_NICKNAME, FIELD_ORIGIN_DESCRIPTION, FIELD_REAL_NAME,
    FIELD_SUPERPOWERS,
};
use heroes_core::types::DbId;
use heroes_core::uploads::UploadedFile;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Data submitted by the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperheroInput {
    pub nickname: String,
    pub real_name: String,
    pub origin_description: String,
    pub superpowers: Vec<String>,
    pub catch_phrase: String,
    /// New image files to upload.
    pub images: Vec<UploadedFile>,
    /// Existing image paths to drop (update only).
    pub images_to_remove: Vec<String>,
}

/// Operations the catalog server offers.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn create(&self, input: &SuperheroInput) -> Result<Superhero, ClientError>;

    /// Fetch a page. `page_url` is a link returned by a previous page
    /// (`nextPageUrl` / `prevPageUrl`); `None` fetches the first page.
    async fn list(&self, page_url: Option<&str>) -> Result<SuperheroPage, ClientError>;

    async fn get(&self, id: DbId) -> Result<Superhero, ClientError>;

    async fn update(&self, id: DbId, input: &SuperheroInput) -> Result<Superhero, ClientError>;

    /// Delete a record, returning the id that was deleted.
    async fn delete(&self, id: DbId) -> Result<DbId, ClientError>;
}

/// [`CatalogApi`] over HTTP.
pub struct HttpCatalogApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogApi {
    /// * `base_url` - Server origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decode a success body, or turn an error status into
    /// [`ClientError::Server`] carrying the body's `message`.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<MessageBody>()
            .await
            .ok()
            .map(|body| body.message);
        tracing::debug!(status = status.as_u16(), ?message, "Catalog request failed");
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

/// Build the multipart body shared by create and update.
///
/// Each superpower is sent as its own `superpowers` part. Removals are
/// sent as one JSON-encoded `imagesToRemove` part.
fn superhero_form(input: &SuperheroInput, with_removals: bool) -> Result<Form, ClientError> {
    let mut form = Form::new()
        .text(FIELD_NICKNAME, input.nickname.clone())
        .text(FIELD_REAL_NAME, input.real_name.clone())
        .text(FIELD_ORIGIN_DESCRIPTION, input.origin_description.clone())
        .text(FIELD_CATCH_PHRASE, input.catch_phrase.clone());

    for power in &input.superpowers {
        form = form.text(FIELD_SUPERPOWERS, power.clone());
    }
    for file in &input.images {
        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        form = form.part(FIELD_IMAGES, part);
    }
    if with_removals {
        let encoded = serde_json::to_string(&input.images_to_remove)?;
        form = form.text(FIELD_IMAGES_TO_REMOVE, encoded);
    }
    Ok(form)
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn create(&self, input: &SuperheroInput) -> Result<Superhero, ClientError> {
        let response = self
            .client
            .post(self.url("/superheroes/create"))
            .multipart(superhero_form(input, false)?)
            .send()
            .await?;
        let envelope: SuperheroEnvelope = Self::parse_response(response).await?;
        Ok(envelope.superhero)
    }

    async fn list(&self, page_url: Option<&str>) -> Result<SuperheroPage, ClientError> {
        let response = self
            .client
            .get(self.url(page_url.unwrap_or(LIST_PATH)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get(&self, id: DbId) -> Result<Superhero, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/superheroes/{id}")))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update(&self, id: DbId, input: &SuperheroInput) -> Result<Superhero, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/superheroes/update/{id}")))
            .multipart(superhero_form(input, true)?)
            .send()
            .await?;
        let envelope: SuperheroEnvelope = Self::parse_response(response).await?;
        Ok(envelope.superhero)
    }

    async fn delete(&self, id: DbId) -> Result<DbId, ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/superheroes/delete/{id}")))
            .send()
            .await?;
        let _: MessageBody = Self::parse_response(response).await?;
        Ok(id)
    }
}
