//! View models over [`SuperheroState`].
//!
//! Nothing here performs I/O; a UI renders these structs and feeds user
//! input back through the [`crate::store::CatalogStore`].

use std::collections::BTreeMap;

use heroes_core::superhero::{parse_superpowers, Superhero};
use heroes_core::types::DbId;
use heroes_core::uploads::UploadedFile;
use validator::{Validate, ValidationError};

use crate::api::SuperheroInput;
use crate::state::SuperheroState;

pub const EMPTY_LIST_MESSAGE: &str = "No superheroes found";

/// Absolute URL of an image path returned by the server.
pub fn image_url(api_base: &str, path: &str) -> String {
    format!("{}{path}", api_base.trim_end_matches('/'))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperheroCard {
    pub id: DbId,
    pub nickname: String,
    /// First image, if the record has one.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub current_page: Option<i64>,
    pub total_pages: Option<i64>,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub cards: Vec<SuperheroCard>,
    /// Shown instead of cards when the list is empty.
    pub empty_message: Option<&'static str>,
    pub pagination: PaginationControls,
    pub error: Option<String>,
}

impl ListView {
    pub fn from_state(state: &SuperheroState, api_base: &str) -> Self {
        let cards: Vec<SuperheroCard> = state
            .superheroes_list
            .iter()
            .map(|entry| SuperheroCard {
                id: entry.id,
                nickname: entry.nickname.clone(),
                image_url: entry.first_image().map(|path| image_url(api_base, path)),
            })
            .collect();

        let pagination = PaginationControls {
            current_page: state.current_page,
            total_pages: state.total_pages,
            prev_url: state.prev_page_url.clone(),
            next_url: state.next_page_url.clone(),
            prev_disabled: state.prev_page_url.is_none() || state.loading,
            next_disabled: state.next_page_url.is_none() || state.loading,
        };

        Self {
            empty_message: cards.is_empty().then_some(EMPTY_LIST_MESSAGE),
            cards,
            pagination,
            error: state.error.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Detail modal
// ---------------------------------------------------------------------------

/// Images of one record with a selected main image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    pub image_urls: Vec<String>,
    pub selected: usize,
}

impl Gallery {
    pub fn main_image(&self) -> Option<&str> {
        self.image_urls.get(self.selected).map(String::as_str)
    }

    /// Thumbnails are only offered when there is something to switch to.
    pub fn thumbnails(&self) -> &[String] {
        if self.image_urls.len() > 1 {
            &self.image_urls
        } else {
            &[]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Loading,
    NotFound,
    Loaded {
        superhero: Superhero,
        gallery: Gallery,
    },
}

/// The detail modal: which record is open and which image is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailModal {
    pub superhero_id: Option<DbId>,
    selected_image: usize,
}

impl DetailModal {
    /// Open the modal on a record. Returns the id to fetch.
    pub fn open(&mut self, id: DbId) -> DbId {
        self.superhero_id = Some(id);
        self.selected_image = 0;
        id
    }

    pub fn close(&mut self) {
        self.superhero_id = None;
    }

    pub fn is_open(&self) -> bool {
        self.superhero_id.is_some()
    }

    /// Pick a thumbnail. Out-of-range indices are ignored.
    pub fn select_image(&mut self, index: usize, image_count: usize) -> bool {
        if index < image_count {
            self.selected_image = index;
            true
        } else {
            false
        }
    }

    /// What to render, or `None` when the modal is closed.
    pub fn view(&self, state: &SuperheroState, api_base: &str) -> Option<DetailView> {
        let id = self.superhero_id?;
        let Some(superhero) = state
            .current_superhero
            .as_ref()
            .filter(|hero| hero.id == id)
            .cloned()
        else {
            // A get in flight clears the current record, so `loading` here
            // means this modal's fetch has not settled yet.
            return Some(if state.loading {
                DetailView::Loading
            } else {
                DetailView::NotFound
            });
        };

        let image_urls: Vec<String> = superhero
            .images
            .iter()
            .map(|path| image_url(api_base, path))
            .collect();
        let selected = self.selected_image.min(image_urls.len().saturating_sub(1));
        Some(DetailView::Loaded {
            superhero,
            gallery: Gallery {
                image_urls,
                selected,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Required".into()));
    }
    Ok(())
}

/// Text fields of the create/edit form. Superpowers are edited as one
/// comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct SuperheroForm {
    #[validate(
        custom(function = "required"),
        length(min = 2, message = "Nickname must be at least 2 characters")
    )]
    pub nickname: String,

    #[validate(
        custom(function = "required"),
        length(min = 2, message = "Real name must be at least 2 characters")
    )]
    pub real_name: String,

    #[validate(
        custom(function = "required"),
        length(min = 10, message = "Origin description must be at least 10 characters")
    )]
    pub origin_description: String,

    #[validate(
        custom(function = "required"),
        length(min = 1, message = "At least one superpower is required")
    )]
    pub superpowers: String,

    #[validate(
        custom(function = "required"),
        length(min = 5, message = "Catch phrase must be at least 5 characters")
    )]
    pub catch_phrase: String,
}

impl SuperheroForm {
    /// Prefill the form for editing.
    pub fn from_superhero(superhero: &Superhero) -> Self {
        Self {
            nickname: superhero.nickname.clone(),
            real_name: superhero.real_name.clone(),
            origin_description: superhero.origin_description.clone(),
            superpowers: superhero.superpowers.join(", "),
            catch_phrase: superhero.catch_phrase.clone(),
        }
    }

    /// One message per invalid field. A blank field reports "Required"
    /// rather than its length rule.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        let Err(errors) = self.validate() else {
            return BTreeMap::new();
        };

        errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, list)| {
                let chosen = list
                    .iter()
                    .find(|e| e.code == "required")
                    .or_else(|| list.first())?;
                let message = chosen
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| chosen.code.to_string());
                Some((field.to_string(), message))
            })
            .collect()
    }

    /// Build the request input. The superpowers string becomes a list only
    /// here, at submission.
    pub fn submit(&self, images: &ImageManager) -> Result<SuperheroInput, BTreeMap<String, String>> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SuperheroInput {
            nickname: self.nickname.trim().to_string(),
            real_name: self.real_name.trim().to_string(),
            origin_description: self.origin_description.trim().to_string(),
            superpowers: parse_superpowers(std::slice::from_ref(&self.superpowers)),
            catch_phrase: self.catch_phrase.trim().to_string(),
            images: images.new_files.clone(),
            images_to_remove: images.images_to_remove.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Image manager
// ---------------------------------------------------------------------------

/// Existing images marked for removal plus newly picked files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageManager {
    existing: Vec<String>,
    new_files: Vec<UploadedFile>,
    images_to_remove: Vec<String>,
}

impl ImageManager {
    pub fn new(existing: Vec<String>) -> Self {
        Self {
            existing,
            ..Default::default()
        }
    }

    /// Existing images not marked for removal.
    pub fn visible_existing(&self) -> Vec<&str> {
        self.existing
            .iter()
            .filter(|path| !self.images_to_remove.contains(path))
            .map(String::as_str)
            .collect()
    }

    pub fn new_files(&self) -> &[UploadedFile] {
        &self.new_files
    }

    pub fn images_to_remove(&self) -> &[String] {
        &self.images_to_remove
    }

    /// Mark an existing image for removal. Marking twice has no effect.
    pub fn remove_existing(&mut self, path: &str) {
        if !self.images_to_remove.iter().any(|p| p == path) {
            self.images_to_remove.push(path.to_string());
        }
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = UploadedFile>) {
        self.new_files.extend(files);
    }

    pub fn remove_new_file(&mut self, index: usize) -> Option<UploadedFile> {
        (index < self.new_files.len()).then(|| self.new_files.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use heroes_core::superhero::SuperheroSummary;

    use super::*;

    const BASE: &str = "http://localhost:3000";

    fn hero(images: &[&str]) -> Superhero {
        let now = "2026-01-01T00:00:00Z".parse().unwrap();
        Superhero {
            id: 7,
            nickname: "Superman".to_string(),
            real_name: "Clark Kent".to_string(),
            origin_description: "Born on Krypton".to_string(),
            superpowers: vec!["Flight".to_string(), "Strength".to_string()],
            catch_phrase: "Up, up and away".to_string(),
            images: images.iter().map(|s| s.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn valid_form() -> SuperheroForm {
        SuperheroForm::from_superhero(&hero(&[]))
    }

    // -- list ----------------------------------------------------------------

    #[test]
    fn empty_list_shows_message_and_disabled_controls() {
        let view = ListView::from_state(&SuperheroState::default(), BASE);
        assert!(view.cards.is_empty());
        assert_eq!(view.empty_message, Some(EMPTY_LIST_MESSAGE));
        assert!(view.pagination.prev_disabled);
        assert!(view.pagination.next_disabled);
    }

    #[test]
    fn cards_use_first_image_url() {
        let state = SuperheroState {
            superheroes_list: vec![
                SuperheroSummary::new(1, "A".into(), &["/uploads/a.png".to_string()]),
                SuperheroSummary::new(2, "B".into(), &[]),
            ],
            next_page_url: Some("/superheroes/all?page=2&limit=5".into()),
            ..Default::default()
        };

        let view = ListView::from_state(&state, "http://localhost:3000/");
        assert_eq!(view.empty_message, None);
        assert_eq!(
            view.cards[0].image_url.as_deref(),
            Some("http://localhost:3000/uploads/a.png")
        );
        assert_eq!(view.cards[1].image_url, None);
        assert!(!view.pagination.next_disabled);
        assert!(view.pagination.prev_disabled);
    }

    #[test]
    fn controls_disabled_while_loading() {
        let state = SuperheroState {
            next_page_url: Some("/superheroes/all?page=2&limit=5".into()),
            prev_page_url: Some("/superheroes/all?page=1&limit=5".into()),
            loading: true,
            ..Default::default()
        };
        let view = ListView::from_state(&state, BASE);
        assert!(view.pagination.next_disabled);
        assert!(view.pagination.prev_disabled);
    }

    // -- detail --------------------------------------------------------------

    #[test]
    fn detail_states_follow_fetch_outcome() {
        let mut modal = DetailModal::default();
        assert_eq!(modal.view(&SuperheroState::default(), BASE), None);

        modal.open(7);
        let loading = SuperheroState {
            loading: true,
            ..Default::default()
        };
        assert_eq!(modal.view(&loading, BASE), Some(DetailView::Loading));
        assert_eq!(
            modal.view(&SuperheroState::default(), BASE),
            Some(DetailView::NotFound)
        );

        let loaded = SuperheroState {
            current_superhero: Some(hero(&["/uploads/a.png"])),
            ..Default::default()
        };
        let Some(DetailView::Loaded { superhero, gallery }) = modal.view(&loaded, BASE) else {
            panic!("expected a loaded view");
        };
        assert_eq!(superhero.id, 7);
        assert_eq!(gallery.main_image(), Some("http://localhost:3000/uploads/a.png"));
        assert!(gallery.thumbnails().is_empty());
    }

    #[test]
    fn loaded_record_ignores_unrelated_requests() {
        let mut modal = DetailModal::default();
        modal.open(7);
        let state = SuperheroState {
            current_superhero: Some(hero(&["/uploads/a.png"])),
            loading: true,
            ..Default::default()
        };
        assert!(matches!(
            modal.view(&state, BASE),
            Some(DetailView::Loaded { .. })
        ));
    }

    #[test]
    fn other_record_is_never_shown() {
        let mut modal = DetailModal::default();
        modal.open(9);
        let settled = SuperheroState {
            current_superhero: Some(hero(&[])),
            ..Default::default()
        };
        assert_eq!(modal.view(&settled, BASE), Some(DetailView::NotFound));

        let pending = SuperheroState {
            loading: true,
            ..settled
        };
        assert_eq!(modal.view(&pending, BASE), Some(DetailView::Loading));
    }

    #[test]
    fn gallery_selection_resets_on_open() {
        let state = SuperheroState {
            current_superhero: Some(hero(&["/uploads/a.png", "/uploads/b.png"])),
            ..Default::default()
        };
        let mut modal = DetailModal::default();
        modal.open(7);
        assert!(modal.select_image(1, 2));
        assert!(!modal.select_image(5, 2));

        let Some(DetailView::Loaded { gallery, .. }) = modal.view(&state, BASE) else {
            panic!("expected a loaded view");
        };
        assert_eq!(gallery.thumbnails().len(), 2);
        assert_eq!(gallery.main_image(), Some("http://localhost:3000/uploads/b.png"));

        modal.close();
        modal.open(7);
        let Some(DetailView::Loaded { gallery, .. }) = modal.view(&state, BASE) else {
            panic!("expected a loaded view");
        };
        assert_eq!(gallery.selected, 0);
    }

    // -- form ----------------------------------------------------------------

    #[test]
    fn valid_form_has_no_errors() {
        assert!(valid_form().field_errors().is_empty());
    }

    #[test]
    fn blank_fields_report_required() {
        let errors = SuperheroForm::default().field_errors();
        assert_eq!(errors.len(), 5);
        assert!(errors.values().all(|m| m == "Required"));
    }

    #[test]
    fn short_fields_report_length_rules() {
        let form = SuperheroForm {
            nickname: "S".into(),
            origin_description: "Too short".into(),
            catch_phrase: "Hey".into(),
            ..valid_form()
        };
        let errors = form.field_errors();
        assert_eq!(errors["nickname"], "Nickname must be at least 2 characters");
        assert_eq!(
            errors["origin_description"],
            "Origin description must be at least 10 characters"
        );
        assert_eq!(errors["catch_phrase"], "Catch phrase must be at least 5 characters");
        assert!(!errors.contains_key("real_name"));
    }

    #[test]
    fn submit_splits_superpowers() {
        let form = SuperheroForm {
            superpowers: "Flight, , Heat vision ,X-ray".into(),
            ..valid_form()
        };
        let input = form.submit(&ImageManager::default()).unwrap();
        assert_eq!(input.superpowers, vec!["Flight", "Heat vision", "X-ray"]);
    }

    #[test]
    fn submit_refuses_invalid_form() {
        let errors = SuperheroForm::default()
            .submit(&ImageManager::default())
            .unwrap_err();
        assert!(errors.contains_key("nickname"));
    }

    // -- image manager -------------------------------------------------------

    #[test]
    fn image_manager_tracks_removals_and_new_files() {
        let mut images = ImageManager::new(vec!["/uploads/a.png".into(), "/uploads/b.png".into()]);
        images.remove_existing("/uploads/a.png");
        images.remove_existing("/uploads/a.png");
        assert_eq!(images.images_to_remove(), ["/uploads/a.png".to_string()]);
        assert_eq!(images.visible_existing(), vec!["/uploads/b.png"]);

        images.add_files([
            UploadedFile::new("x.png", vec![1]),
            UploadedFile::new("y.png", vec![2]),
        ]);
        assert_eq!(images.remove_new_file(0).map(|f| f.file_name).as_deref(), Some("x.png"));
        assert_eq!(images.remove_new_file(5), None);
        assert_eq!(images.new_files().len(), 1);

        let input = valid_form().submit(&images).unwrap();
        assert_eq!(input.images.len(), 1);
        assert_eq!(input.images_to_remove, vec!["/uploads/a.png"]);
    }
}
