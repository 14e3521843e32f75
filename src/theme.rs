//! Presentation themes.
//!
//! A [`ThemeCycle`] holds a caller-supplied, fixed list of themes with exactly
//! one active.  Toggling advances to the next theme and wraps around, so a
//! cycle of N themes returns to its start after N toggles.  Themes only
//! affect presentation.

use crate::{Error, Result};

/// ANSI escape codes a terminal renderer uses for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Style for ordinary text.
    pub text: &'static str,
    /// Style for emphasized spans.
    pub emphasis: &'static str,
    /// Style for the user label.
    pub user_label: &'static str,
    /// Style for the assistant label.
    pub model_label: &'static str,
    /// Style for timestamps and the typing indicator.
    pub muted: &'static str,
    /// Style for errors.
    pub error: &'static str,
}

impl Palette {
    /// Default palette for dark terminals.
    pub const DARK: Palette = Palette {
        text: "",
        emphasis: "\x1b[1m",
        user_label: "\x1b[33m",
        model_label: "\x1b[35m",
        muted: "\x1b[2m",
        error: "\x1b[31m",
    };

    /// Palette for light terminals.
    pub const LIGHT: Palette = Palette {
        text: "\x1b[30m",
        emphasis: "\x1b[1;30m",
        user_label: "\x1b[34m",
        model_label: "\x1b[35m",
        muted: "\x1b[90m",
        error: "\x1b[31m",
    };

    /// Bright, bold palette without dimmed text.
    pub const HIGH_CONTRAST: Palette = Palette {
        text: "\x1b[97m",
        emphasis: "\x1b[1;4;97m",
        user_label: "\x1b[1;93m",
        model_label: "\x1b[1;96m",
        muted: "\x1b[97m",
        error: "\x1b[1;91m",
    };
}

/// One named presentation mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    class: Option<String>,
    palette: Palette,
}

impl Theme {
    /// Creates a theme with an optional presentation class attribute.
    pub fn new(name: impl Into<String>, class: Option<String>, palette: Palette) -> Self {
        Self {
            name: name.into(),
            class,
            palette,
        }
    }

    /// The dark theme; the default, with no class attribute.
    pub fn dark() -> Self {
        Self::new("dark", None, Palette::DARK)
    }

    /// The light theme.
    pub fn light() -> Self {
        Self::new("light", Some("light".to_string()), Palette::LIGHT)
    }

    /// The high-contrast theme.
    pub fn high_contrast() -> Self {
        Self::new(
            "high-contrast",
            Some("high-contrast".to_string()),
            Palette::HIGH_CONTRAST,
        )
    }

    /// Looks up a built-in theme by name.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "high-contrast" | "high_contrast" | "contrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// The theme's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The presentation class attribute applied while this theme is active.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// The terminal palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

/// A fixed cyclic order of themes with one active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCycle {
    variants: Vec<Theme>,
    current: usize,
}

impl ThemeCycle {
    /// Creates a cycle starting at the first variant.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `variants` is empty.
    pub fn new(variants: Vec<Theme>) -> Result<Self> {
        if variants.is_empty() {
            return Err(Error::validation(
                "a theme cycle needs at least one theme",
                Some("themes".to_string()),
            ));
        }
        Ok(Self {
            variants,
            current: 0,
        })
    }

    /// Builds a cycle from built-in theme names.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown name or an empty list.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let variants = names
            .iter()
            .map(|name| {
                Theme::named(name.as_ref()).ok_or_else(|| {
                    Error::validation(
                        format!("unknown theme '{}'", name.as_ref()),
                        Some("themes".to_string()),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(variants)
    }

    /// Two-state cycle: dark and high-contrast.
    pub fn dark_high_contrast() -> Self {
        Self {
            variants: vec![Theme::dark(), Theme::high_contrast()],
            current: 0,
        }
    }

    /// Three-state cycle: light, dark, and high-contrast.
    pub fn light_dark_high_contrast() -> Self {
        Self {
            variants: vec![Theme::light(), Theme::dark(), Theme::high_contrast()],
            current: 0,
        }
    }

    /// The active theme.
    pub fn current(&self) -> &Theme {
        &self.variants[self.current]
    }

    /// Advances to the next theme, wrapping around, and returns it.
    pub fn toggle(&mut self) -> &Theme {
        self.current = (self.current + 1) % self.variants.len();
        self.current()
    }

    /// Makes the theme called `name` active.  Returns false if there is none.
    pub fn select(&mut self, name: &str) -> bool {
        match self.variants.iter().position(|t| t.name() == name) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// Every theme in cycle order.
    pub fn variants(&self) -> &[Theme] {
        &self.variants
    }

    /// Number of themes in the cycle.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false; a cycle has at least one theme.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Default for ThemeCycle {
    fn default() -> Self {
        Self::dark_high_contrast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_state_cycle_returns_after_two_toggles() {
        let mut cycle = ThemeCycle::dark_high_contrast();
        assert_eq!(cycle.current().name(), "dark");
        assert_eq!(cycle.toggle().name(), "high-contrast");
        assert_eq!(cycle.current().class(), Some("high-contrast"));
        assert_eq!(cycle.toggle().name(), "dark");
        assert_eq!(cycle.current().class(), None);
    }

    #[test]
    fn n_state_cycle_returns_after_n_toggles() {
        let mut cycle = ThemeCycle::light_dark_high_contrast();
        let start = cycle.current().clone();
        for _ in 0..cycle.len() - 1 {
            assert_ne!(cycle.toggle(), &start);
        }
        assert_eq!(cycle.toggle(), &start);
    }

    #[test]
    fn single_theme_cycle_is_fixed_point() {
        let mut cycle = ThemeCycle::new(vec![Theme::dark()]).unwrap();
        assert_eq!(cycle.toggle().name(), "dark");
    }

    #[test]
    fn empty_cycle_is_rejected() {
        let err = ThemeCycle::new(Vec::new()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn from_names_builds_in_order() {
        let cycle = ThemeCycle::from_names(&["high-contrast", "light"]).unwrap();
        let names: Vec<_> = cycle.variants().iter().map(Theme::name).collect();
        assert_eq!(names, vec!["high-contrast", "light"]);
        assert!(ThemeCycle::from_names(&["sepia"]).is_err());
    }

    #[test]
    fn select_by_name() {
        let mut cycle = ThemeCycle::light_dark_high_contrast();
        assert!(cycle.select("high-contrast"));
        assert_eq!(cycle.current().palette(), &Palette::HIGH_CONTRAST);
        assert!(!cycle.select("sepia"));
        assert_eq!(cycle.current().name(), "high-contrast");
    }
}
