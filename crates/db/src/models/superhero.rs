//! Superhero row models.

use heroes_core::superhero::{Superhero, SuperheroSummary};
use heroes_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A full row from the `superheroes` table.
#[derive(Debug, Clone, FromRow)]
pub struct SuperheroRow {
    pub id: DbId,
    pub nickname: String,
    pub real_name: String,
    pub origin_description: String,
    pub superpowers: Vec<String>,
    pub catch_phrase: String,
    pub images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<SuperheroRow> for Superhero {
    fn from(row: SuperheroRow) -> Self {
        Self {
            id: row.id,
            nickname: row.nickname,
            real_name: row.real_name,
            origin_description: row.origin_description,
            superpowers: row.superpowers,
            catch_phrase: row.catch_phrase,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The list projection as selected by the page query.
///
/// `images` is already sliced to at most one element in SQL.
#[derive(Debug, Clone, FromRow)]
pub struct SuperheroSummaryRow {
    pub id: DbId,
    pub nickname: String,
    pub images: Vec<String>,
}

impl From<SuperheroSummaryRow> for SuperheroSummary {
    fn from(row: SuperheroSummaryRow) -> Self {
        SuperheroSummary::new(row.id, row.nickname, &row.images)
    }
}
