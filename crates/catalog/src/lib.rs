//! `frota-catalog` — static landing-page catalog and genre selection.
//!
//! The genre and feature catalogs are fixed at compile time; the only state
//! here is which genre the visitor currently has selected.

pub mod feature;
pub mod genre;

pub use feature::{FEATURES, Feature};
pub use genre::{GENRES, Genre, GenreSelection, Selection};
