//! Feature-tile catalog for the landing page.

use serde::Serialize;

/// A feature highlight tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Symbolic icon reference resolved by the presentation layer.
    pub icon: &'static str,
    pub title: &'static str,
    pub text: &'static str,
}

/// The full feature catalog, in display order.
pub const FEATURES: [Feature; 4] = [
    Feature {
        icon: "Users",
        title: "Мультиплеер",
        text: "Играй с друзьями онлайн",
    },
    Feature {
        icon: "Trophy",
        title: "Достижения",
        text: "50+ наград за прохождение",
    },
    Feature {
        icon: "Sparkles",
        title: "HD графика",
        text: "Красивая визуализация",
    },
    Feature {
        icon: "Shield",
        title: "Без рекламы",
        text: "Чистый игровой опыт",
    },
];
