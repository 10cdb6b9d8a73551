//! Genre catalog and selection state.

use serde::Serialize;

use frota_core::{DomainError, DomainResult};

/// A selectable game genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: &'static str,
    pub name: &'static str,
    /// Symbolic icon reference resolved by the presentation layer.
    pub icon: &'static str,
    pub description: &'static str,
}

/// The full genre catalog, in display order.
pub const GENRES: [Genre; 4] = [
    Genre {
        id: "strategy",
        name: "Стратегия",
        icon: "Crown",
        description: "Планируй, управляй, побеждай",
    },
    Genre {
        id: "action",
        name: "Экшн",
        icon: "Zap",
        description: "Быстрый геймплей и динамика",
    },
    Genre {
        id: "puzzle",
        name: "Головоломка",
        icon: "Puzzle",
        description: "Логика и смекалка",
    },
    Genre {
        id: "simulator",
        name: "Симулятор",
        icon: "Gamepad2",
        description: "Реалистичный опыт",
    },
];

/// Look a genre up by id.
pub fn find(id: &str) -> Option<&'static Genre> {
    GENRES.iter().find(|g| g.id == id)
}

/// Outcome of a select call, so the caller knows whether to acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The selected genre changed; show the acknowledgement.
    Selected(&'static Genre),
    /// Re-selecting the current genre; visually a no-op.
    Unchanged,
}

/// Tracks "selected genre id or none" for one page view.
///
/// Purely local, ephemeral state: nothing here survives navigation.
#[derive(Debug, Default)]
pub struct GenreSelection {
    selected: Option<&'static str>,
}

impl GenreSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&'static Genre> {
        self.selected.and_then(find)
    }

    /// Select a genre by id. Idempotent: re-selecting the current id
    /// reports `Unchanged`. Unknown ids are rejected.
    pub fn select(&mut self, id: &str) -> DomainResult<Selection> {
        let genre = find(id)
            .ok_or_else(|| DomainError::invalid_id(format!("unknown genre: {id}")))?;
        if self.selected == Some(genre.id) {
            return Ok(Selection::Unchanged);
        }
        self.selected = Some(genre.id);
        Ok(Selection::Selected(genre))
    }
}
