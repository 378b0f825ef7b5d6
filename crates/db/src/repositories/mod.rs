//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod superhero_repo;

pub use superhero_repo::SuperheroRepo;
