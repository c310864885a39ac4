use crate::foundation::error::{StickerError, StickerResult};
use crate::scene::canvas::Canvas;

/// Grouping used by the wallpaper browser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallpaperCategory {
    /// Matches every wallpaper when filtering.
    All,
    /// Landscapes, sea, sky.
    Nature,
    /// Shapes and patterns.
    Abstract,
    /// Color gradients.
    Gradient,
}

impl std::str::FromStr for WallpaperCategory {
    type Err = StickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "nature" => Ok(Self::Nature),
            "abstract" => Ok(Self::Abstract),
            "gradient" => Ok(Self::Gradient),
            other => Err(StickerError::validation(format!(
                "unknown wallpaper category '{other}'"
            ))),
        }
    }
}

/// A preset full-screen wallpaper.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Wallpaper {
    /// Catalog id.
    pub id: String,
    /// Asset name of the image.
    pub image_name: String,
    /// Display title.
    pub title: String,
    /// Short description.
    pub description: String,
    /// Browser category; never [`WallpaperCategory::All`].
    pub category: WallpaperCategory,
}

/// A themed sticker pack with its default background.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StickerTheme {
    /// Catalog id, also the asset directory name under `stick/`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Emoji badge.
    pub emoji: String,
    /// Short description.
    pub description: String,
    /// Asset name of the theme background.
    pub main_image: String,
    /// Asset names of the stickers in this pack.
    pub stickers: Vec<String>,
    /// Where the theme works well.
    pub suitable_scene: String,
}

impl StickerTheme {
    /// Number of stickers in the pack.
    pub fn sticker_count(&self) -> usize {
        self.stickers.len()
    }

    /// Fresh editing canvas that falls back to this theme's background.
    pub fn new_canvas(&self) -> Canvas {
        Canvas::with_theme_background(self.main_image.clone())
    }
}

/// Preset wallpapers and sticker themes.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    /// Wallpapers in display order.
    #[serde(default)]
    pub wallpapers: Vec<Wallpaper>,
    /// Sticker themes in display order.
    #[serde(default)]
    pub themes: Vec<StickerTheme>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(s: &str) -> StickerResult<Self> {
        let cat: Self =
            serde_json::from_str(s).map_err(|e| StickerError::serde(format!("catalog: {e}")))?;
        cat.validate()?;
        Ok(cat)
    }

    /// Check id uniqueness and that every theme has at least one sticker.
    pub fn validate(&self) -> StickerResult<()> {
        for (i, w) in self.wallpapers.iter().enumerate() {
            if w.category == WallpaperCategory::All {
                return Err(StickerError::validation(format!(
                    "wallpaper '{}' cannot use the 'all' category",
                    w.id
                )));
            }
            if self.wallpapers[..i].iter().any(|o| o.id == w.id) {
                return Err(StickerError::validation(format!(
                    "duplicate wallpaper id '{}'",
                    w.id
                )));
            }
        }
        for (i, t) in self.themes.iter().enumerate() {
            if t.stickers.is_empty() {
                return Err(StickerError::validation(format!(
                    "theme '{}' has no stickers",
                    t.id
                )));
            }
            if self.themes[..i].iter().any(|o| o.id == t.id) {
                return Err(StickerError::validation(format!(
                    "duplicate theme id '{}'",
                    t.id
                )));
            }
        }
        Ok(())
    }

    /// Wallpapers in `category`, or all of them for [`WallpaperCategory::All`].
    pub fn wallpapers_in(&self, category: WallpaperCategory) -> impl Iterator<Item = &Wallpaper> {
        self.wallpapers
            .iter()
            .filter(move |w| category == WallpaperCategory::All || w.category == category)
    }

    /// Look up a theme by id.
    pub fn theme(&self, id: &str) -> Option<&StickerTheme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// Look up a wallpaper by id.
    pub fn wallpaper(&self, id: &str) -> Option<&Wallpaper> {
        self.wallpapers.iter().find(|w| w.id == id)
    }

    /// The presets shipped with the app.
    pub fn builtin() -> Self {
        use WallpaperCategory::{Abstract, Gradient, Nature};

        let wallpapers = [
            ("Ocean Waves", "Blue wave gradient with a natural wave edge", Nature),
            ("Sunset Glow", "Warm sunset tones with a soft gradient", Nature),
            ("Cherry Blossoms", "Falling pink petals, full of spring", Nature),
            ("Moonlit Night", "Deep night sky with a bright moon", Nature),
            ("Lightning", "Dynamic lightning strokes", Abstract),
            ("Geometry", "Clean modern geometric shapes", Abstract),
            ("Fluid Art", "Flowing colors", Abstract),
            ("Aurora", "Aurora-like color play", Gradient),
            ("Purple Dream", "Dreamy purple gradient", Gradient),
            ("Orange Sun", "Warm orange, full of sunshine", Gradient),
            ("Fresh Cyan", "Calm and fresh cyan", Gradient),
            ("Rose Gold", "Elegant rose gold tones", Gradient),
            ("Mint", "Cool mint green for summer", Gradient),
            ("Deep Sea", "Deep ocean blue", Nature),
            ("Starry Sky", "A sky full of stars", Nature),
            ("Rainbow", "Rainbow spectrum", Abstract),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (title, description, category))| Wallpaper {
            id: (i + 1).to_string(),
            image_name: format!("pager_{:02}", i + 1),
            title: title.to_string(),
            description: description.to_string(),
            category,
        })
        .collect();

        let themes = [
            ("bear", "Bear", "🐻", "Cute and cozy", "Warm photos, kids style", 3),
            ("cat", "Cat", "🐱", "Playful", "Cat lovers, pet photos", 3),
            ("cloud", "Cloud", "☁️", "Fresh and natural", "Sky and landscapes", 3),
            ("energy", "Energy", "⚡", "Techy and dynamic", "Sports, tech themes", 3),
            ("kite", "Kite", "🪁", "Artsy and light", "Spring, outdoor photos", 3),
            ("mask", "Mask", "🎭", "Mysterious", "Art photos, personal style", 3),
            ("penguin", "Penguin", "🐧", "Silly and cute", "Winter, snow scenes", 3),
            ("pixel", "Pixel", "🎨", "Retro games", "Nostalgic, minimal", 2),
            ("totoro", "Totoro", "🌿", "Healing and warm", "Anime style, green themes", 1),
        ]
        .into_iter()
        .map(|(id, name, emoji, description, scene, count)| StickerTheme {
            id: id.to_string(),
            name: name.to_string(),
            emoji: emoji.to_string(),
            description: description.to_string(),
            main_image: format!("{id}_main"),
            stickers: (1..=count).map(|n| format!("{id}_sticker_{n:02}")).collect(),
            suitable_scene: scene.to_string(),
        })
        .collect();

        Self { wallpapers, themes }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/catalog.rs"]
mod tests;
