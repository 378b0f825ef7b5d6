//! Row types for the `superheroes` table.
//!
//! Rows are converted into the wire types from `heroes_core::superhero`
//! before they leave this crate.

pub mod superhero;
