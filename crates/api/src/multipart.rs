//! Reading superhero forms out of `multipart/form-data` bodies.

use axum::extract::Multipart;
use heroes_core::superhero::{SuperheroFields, FIELD_IMAGES, FIELD_IMAGES_TO_REMOVE};
use heroes_core::uploads::UploadedFile;

use crate::error::AppResult;

/// Everything a create or update request can carry.
#[derive(Debug, Default)]
pub struct SuperheroForm {
    pub fields: SuperheroFields,
    /// Non-empty `images` parts, in submission order.
    pub images: Vec<UploadedFile>,
    /// Raw `imagesToRemove` value (a JSON array), if sent.
    pub images_to_remove: Option<String>,
}

impl SuperheroForm {
    /// Drain a multipart body into a form. Unknown fields are ignored.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                FIELD_IMAGES | "images[]" => {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let data = field.bytes().await?;
                    // Browsers send an empty part when no file was picked.
                    if data.is_empty() {
                        continue;
                    }
                    form.images.push(UploadedFile::new(file_name, data.to_vec()));
                }
                FIELD_IMAGES_TO_REMOVE => {
                    form.images_to_remove = Some(field.text().await?);
                }
                _ => {
                    let text = field.text().await?;
                    if !form.fields.set(&name, text) {
                        tracing::debug!(field = %name, "Ignoring unknown form field");
                    }
                }
            }
        }

        Ok(form)
    }
}
