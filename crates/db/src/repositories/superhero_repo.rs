//! Repository for the `superheroes` table.

use heroes_core::superhero::{NewSuperhero, SuperheroChanges};
use heroes_core::types::DbId;
use sqlx::PgPool;

use crate::models::superhero::{SuperheroRow, SuperheroSummaryRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, nickname, real_name, origin_description, superpowers, \
                       catch_phrase, images, created_at, updated_at";

/// Name of the unique constraint on `nickname`.
pub const NICKNAME_CONSTRAINT: &str = "uq_superheroes_nickname";

/// Provides CRUD operations for superheroes.
pub struct SuperheroRepo;

impl SuperheroRepo {
    /// Insert a new superhero, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewSuperhero) -> Result<SuperheroRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO superheroes
                (nickname, real_name, origin_description, superpowers, catch_phrase, images)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SuperheroRow>(&query)
            .bind(&input.nickname)
            .bind(&input.real_name)
            .bind(&input.origin_description)
            .bind(&input.superpowers)
            .bind(&input.catch_phrase)
            .bind(&input.images)
            .fetch_one(pool)
            .await
    }

    /// Find a superhero by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SuperheroRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM superheroes WHERE id = $1");
        sqlx::query_as::<_, SuperheroRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a superhero by exact nickname.
    pub async fn find_by_nickname(
        pool: &PgPool,
        nickname: &str,
    ) -> Result<Option<SuperheroRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM superheroes WHERE nickname = $1");
        sqlx::query_as::<_, SuperheroRow>(&query)
            .bind(nickname)
            .fetch_optional(pool)
            .await
    }

    /// Total number of superheroes.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM superheroes")
            .fetch_one(pool)
            .await
    }

    /// One page of list projections in insertion order.
    ///
    /// Only the first image is selected (`images[1:1]` is `{}` for an
    /// empty array).
    pub async fn list_page(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SuperheroSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, SuperheroSummaryRow>(
            "SELECT id, nickname, COALESCE(images[1:1], '{}') AS images
             FROM superheroes
             ORDER BY id ASC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Update a superhero. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SuperheroChanges,
    ) -> Result<Option<SuperheroRow>, sqlx::Error> {
        let query = format!(
            "UPDATE superheroes SET
                nickname = COALESCE($2, nickname),
                real_name = COALESCE($3, real_name),
                origin_description = COALESCE($4, origin_description),
                superpowers = COALESCE($5, superpowers),
                catch_phrase = COALESCE($6, catch_phrase),
                images = COALESCE($7, images),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SuperheroRow>(&query)
            .bind(id)
            .bind(&input.nickname)
            .bind(&input.real_name)
            .bind(&input.origin_description)
            .bind(&input.superpowers)
            .bind(&input.catch_phrase)
            .bind(&input.images)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a superhero, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<SuperheroRow>, sqlx::Error> {
        let query = format!("DELETE FROM superheroes WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, SuperheroRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
