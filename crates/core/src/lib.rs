//! Domain types and rules for the superhero catalog.
//!
//! Shared by the database layer, the HTTP API and the client. Nothing in
//! this crate talks to the network or a database; the only I/O is the
//! upload directory in [`uploads`].

pub mod error;
pub mod pagination;
pub mod superhero;
pub mod types;
pub mod uploads;
