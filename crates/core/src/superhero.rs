//! Superhero records, wire DTOs and the field rules applied on create and
//! update.
//!
//! Field names follow the JSON the API has always spoken: snake_case for
//! the record's own fields, `_id` for the identifier and camelCase for the
//! timestamps and pagination metadata.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::pagination::PageWindow;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Entity name used in not-found errors.
pub const ENTITY: &str = "Superhero";

pub const MSG_ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_ALREADY_EXISTS: &str = "Superhero already exists";
pub const MSG_NO_IMAGES: &str = "No images were uploaded";
pub const MSG_NOT_FOUND: &str = "Superhero not found";
pub const MSG_CREATED: &str = "Superhero created successfully";
pub const MSG_UPDATED: &str = "Superhero updated successfully";
pub const MSG_DELETED: &str = "Superhero and associated images deleted successfully";
pub const MSG_BAD_IMAGES_TO_REMOVE: &str = "imagesToRemove must be a JSON array of strings";

/// Multipart field names accepted for scalar values.
pub const FIELD_NICKNAME: &str = "nickname";
pub const FIELD_REAL_NAME: &str = "real_name";
pub const FIELD_ORIGIN_DESCRIPTION: &str = "origin_description";
pub const FIELD_SUPERPOWERS: &str = "superpowers";
pub const FIELD_CATCH_PHRASE: &str = "catch_phrase";
pub const FIELD_IMAGES: &str = "images";
pub const FIELD_IMAGES_TO_REMOVE: &str = "imagesToRemove";

// ---------------------------------------------------------------------------
// Records and DTOs
// ---------------------------------------------------------------------------

/// A full superhero record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Superhero {
    #[serde(rename = "_id")]
    pub id: DbId,
    pub nickname: String,
    pub real_name: String,
    pub origin_description: String,
    pub superpowers: Vec<String>,
    pub catch_phrase: String,
    /// Public paths under `/uploads`, in display order.
    pub images: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl Superhero {
    /// The list projection of this record.
    pub fn summary(&self) -> SuperheroSummary {
        SuperheroSummary::new(self.id, self.nickname.clone(), &self.images)
    }
}

/// The list projection: identity, nickname and at most the first image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperheroSummary {
    #[serde(rename = "_id")]
    pub id: DbId,
    pub nickname: String,
    pub images: Vec<String>,
}

impl SuperheroSummary {
    /// Build a projection, keeping only the first of `images`.
    pub fn new(id: DbId, nickname: String, images: &[String]) -> Self {
        Self {
            id,
            nickname,
            images: images.first().cloned().into_iter().collect(),
        }
    }

    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Response body of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperheroPage {
    pub superheroes: Vec<SuperheroSummary>,
    pub total_pages: i64,
    pub current_page: i64,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

impl SuperheroPage {
    pub fn new(superheroes: Vec<SuperheroSummary>, window: PageWindow) -> Self {
        Self {
            superheroes,
            total_pages: window.total_pages,
            current_page: window.current_page,
            next_page_url: window.next_page_url,
            prev_page_url: window.prev_page_url,
        }
    }
}

/// Response body of create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperheroEnvelope {
    pub message: String,
    pub superhero: Superhero,
}

/// Response body carrying only a message (delete, errors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Input for inserting a new record. Every field is already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuperhero {
    pub nickname: String,
    pub real_name: String,
    pub origin_description: String,
    pub superpowers: Vec<String>,
    pub catch_phrase: String,
    pub images: Vec<String>,
}

/// Partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperheroChanges {
    pub nickname: Option<String>,
    pub real_name: Option<String>,
    pub origin_description: Option<String>,
    pub superpowers: Option<Vec<String>>,
    pub catch_phrase: Option<String>,
    pub images: Option<Vec<String>>,
}

impl SuperheroChanges {
    /// Apply these changes to an in-memory record. Does not touch timestamps.
    pub fn apply_to(&self, hero: &mut Superhero) {
        if let Some(v) = &self.nickname {
            hero.nickname = v.clone();
        }
        if let Some(v) = &self.real_name {
            hero.real_name = v.clone();
        }
        if let Some(v) = &self.origin_description {
            hero.origin_description = v.clone();
        }
        if let Some(v) = &self.superpowers {
            hero.superpowers = v.clone();
        }
        if let Some(v) = &self.catch_phrase {
            hero.catch_phrase = v.clone();
        }
        if let Some(v) = &self.images {
            hero.images = v.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Submitted fields
// ---------------------------------------------------------------------------

/// Scalar fields as submitted in a multipart form, before validation.
///
/// Values are trimmed; blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperheroFields {
    pub nickname: Option<String>,
    pub real_name: Option<String>,
    pub origin_description: Option<String>,
    /// Raw `superpowers` values; each may itself be comma-separated.
    pub superpowers: Vec<String>,
    pub catch_phrase: Option<String>,
}

/// Scalar fields that passed the required-field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperheroDraft {
    pub nickname: String,
    pub real_name: String,
    pub origin_description: String,
    pub superpowers: Vec<String>,
    pub catch_phrase: String,
}

impl SuperheroFields {
    /// Record a submitted value. Returns `false` for unknown field names.
    ///
    /// `superpowers[]` is accepted as an alias of `superpowers`.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        match name {
            FIELD_NICKNAME => self.nickname = non_blank(value),
            FIELD_REAL_NAME => self.real_name = non_blank(value),
            FIELD_ORIGIN_DESCRIPTION => self.origin_description = non_blank(value),
            FIELD_CATCH_PHRASE => self.catch_phrase = non_blank(value),
            FIELD_SUPERPOWERS | "superpowers[]" => self.superpowers.push(value),
            _ => return false,
        }
        true
    }

    /// Require every scalar field, as on create.
    pub fn require_all(self) -> Result<SuperheroDraft, CoreError> {
        let superpowers = parse_superpowers(&self.superpowers);
        match (
            self.nickname,
            self.real_name,
            self.origin_description,
            self.catch_phrase,
        ) {
            (Some(nickname), Some(real_name), Some(origin_description), Some(catch_phrase))
                if !superpowers.is_empty() =>
            {
                Ok(SuperheroDraft {
                    nickname,
                    real_name,
                    origin_description,
                    superpowers,
                    catch_phrase,
                })
            }
            _ => Err(CoreError::Validation(MSG_ALL_FIELDS_REQUIRED.to_string())),
        }
    }

    /// Turn whatever was provided into a partial update, as on update.
    pub fn into_changes(self) -> SuperheroChanges {
        let superpowers = parse_superpowers(&self.superpowers);
        SuperheroChanges {
            nickname: self.nickname,
            real_name: self.real_name,
            origin_description: self.origin_description,
            superpowers: (!superpowers.is_empty()).then_some(superpowers),
            catch_phrase: self.catch_phrase,
            images: None,
        }
    }
}

impl SuperheroDraft {
    pub fn with_images(self, images: Vec<String>) -> NewSuperhero {
        NewSuperhero {
            nickname: self.nickname,
            real_name: self.real_name,
            origin_description: self.origin_description,
            superpowers: self.superpowers,
            catch_phrase: self.catch_phrase,
            images,
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Flatten submitted superpower values, splitting each on commas.
pub fn parse_superpowers(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the `imagesToRemove` field: a JSON array of path strings.
///
/// A blank value means nothing to remove.
pub fn parse_images_to_remove(raw: &str) -> Result<Vec<String>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|_| CoreError::Validation(MSG_BAD_IMAGES_TO_REMOVE.to_string()))
}

// ---------------------------------------------------------------------------
// Image list editing
// ---------------------------------------------------------------------------

/// Result of editing a record's image list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEdit {
    /// The new image list.
    pub images: Vec<String>,
    /// Distinct paths dropped from the list, whose files should be deleted.
    pub removed: Vec<String>,
}

/// Remove every entry named in `to_remove`, then append `added`.
///
/// Appended paths already present in the list are skipped so a single
/// edit never introduces duplicates.
pub fn edit_images(current: &[String], to_remove: &[String], added: &[String]) -> ImageEdit {
    let mut images = Vec::with_capacity(current.len() + added.len());
    let mut removed: Vec<String> = Vec::new();

    for path in current {
        if to_remove.contains(path) {
            if !removed.contains(path) {
                removed.push(path.clone());
            }
        } else {
            images.push(path.clone());
        }
    }

    for path in added {
        if !images.contains(path) {
            images.push(path.clone());
        }
    }

    ImageEdit { images, removed }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
