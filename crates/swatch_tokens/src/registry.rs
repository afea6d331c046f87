//! Validated theme registry
//!
//! The registry is the single source of theme definitions for a controller.
//! Construction validates every theme up front; once built, a registry is
//! never empty and every key matches its theme's declared name.

use indexmap::IndexMap;

use crate::error::RegistryError;
use crate::theme::{ColorScheme, Theme};
use crate::tokens::InvalidToken;

/// Pseudo-theme name meaning "follow the OS color scheme"
///
/// It is never a registry key; controllers accept it when system tracking is
/// enabled.
pub const SYSTEM_THEME: &str = "system";

/// Ordered, validated mapping from theme name to [`Theme`]
#[derive(Clone, Debug)]
pub struct ThemeRegistry {
    themes: IndexMap<String, Theme>,
}

impl ThemeRegistry {
    /// Build a registry from a name-keyed map, preserving its order.
    pub fn new(themes: IndexMap<String, Theme>) -> Result<Self, RegistryError> {
        if themes.is_empty() {
            return Err(RegistryError::Empty);
        }

        for (key, theme) in &themes {
            if key != theme.name() {
                return Err(RegistryError::NameMismatch {
                    key: key.clone(),
                    name: theme.name().to_string(),
                });
            }
            if key == SYSTEM_THEME {
                return Err(RegistryError::ReservedName(key.clone()));
            }
            if let Some((path, issue)) = theme.colors().find_invalid() {
                let theme = key.clone();
                return Err(match issue {
                    InvalidToken::Key => RegistryError::InvalidTokenKey { theme, path },
                    InvalidToken::Value => RegistryError::InvalidTokenValue { theme, path },
                });
            }
        }

        Ok(Self { themes })
    }

    /// Build a registry from themes, keyed by their own names.
    pub fn from_themes(themes: impl IntoIterator<Item = Theme>) -> Result<Self, RegistryError> {
        let mut map = IndexMap::new();
        for theme in themes {
            let name = theme.name().to_string();
            if map.contains_key(&name) {
                return Err(RegistryError::DuplicateName(name));
            }
            map.insert(name, theme);
        }
        Self::new(map)
    }

    /// Parse a TOML document whose top-level tables are themes.
    ///
    /// ```toml
    /// [light]
    /// name = "light"
    /// type = "light"
    ///
    /// [light.colors]
    /// background = "#ffffff"
    /// ```
    pub fn from_toml_str(src: &str) -> Result<Self, RegistryError> {
        let themes: IndexMap<String, Theme> =
            toml::from_str(src).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::new(themes)
    }

    /// Parse a JSON object whose keys are theme names.
    pub fn from_json_str(src: &str) -> Result<Self, RegistryError> {
        let themes: IndexMap<String, Theme> =
            serde_json::from_str(src).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::new(themes)
    }

    pub fn lookup(&self, name: &str) -> Result<&Theme, RegistryError> {
        self.themes
            .get(name)
            .ok_or_else(|| RegistryError::ThemeNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Theme names in declaration order.
    pub fn available_names(&self) -> Vec<&str> {
        self.names().collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.values()
    }

    /// The first declared theme.
    pub fn first(&self) -> &Theme {
        self.themes
            .first()
            .map(|(_, theme)| theme)
            .expect("ThemeRegistry is validated non-empty")
    }

    /// The first declared theme of the given scheme, if any.
    pub fn first_with_scheme(&self, scheme: ColorScheme) -> Option<&Theme> {
        self.themes
            .values()
            .find(|theme| theme.color_scheme() == scheme)
    }

    /// The theme standing in for a color scheme: the first of that scheme,
    /// or the first theme when none matches.
    pub fn theme_for_scheme(&self, scheme: ColorScheme) -> &Theme {
        self.first_with_scheme(scheme)
            .unwrap_or_else(|| self.first())
    }

    /// The name after `current` in declaration order, wrapping around.
    ///
    /// Names outside the registry (including the system sentinel) advance to
    /// the first theme.
    pub fn next_name(&self, current: &str) -> &str {
        let next = match self.themes.get_index_of(current) {
            Some(index) => (index + 1) % self.themes.len(),
            None => 0,
        };
        self.themes
            .get_index(next)
            .map(|(name, _)| name.as_str())
            .unwrap_or_else(|| self.first().name())
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenTree;

    fn theme(name: &str, scheme: ColorScheme) -> Theme {
        Theme::new(name, scheme, TokenTree::new().token("background", "#fff"))
    }

    fn registry() -> ThemeRegistry {
        ThemeRegistry::from_themes([
            theme("light", ColorScheme::Light),
            theme("dark", ColorScheme::Dark),
            theme("ocean", ColorScheme::Dark),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert_eq!(
            ThemeRegistry::new(IndexMap::new()).unwrap_err(),
            RegistryError::Empty
        );
        assert_eq!(
            ThemeRegistry::from_themes(Vec::new()).unwrap_err(),
            RegistryError::Empty
        );
    }

    #[test]
    fn test_name_mismatch_rejected() {
        let mut map = IndexMap::new();
        map.insert("ocean".to_string(), theme("sea", ColorScheme::Dark));
        assert_eq!(
            ThemeRegistry::new(map).unwrap_err(),
            RegistryError::NameMismatch {
                key: "ocean".to_string(),
                name: "sea".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_and_reserved_names_rejected() {
        let dup = ThemeRegistry::from_themes([
            theme("light", ColorScheme::Light),
            theme("light", ColorScheme::Dark),
        ]);
        assert_eq!(
            dup.unwrap_err(),
            RegistryError::DuplicateName("light".to_string())
        );

        let reserved = ThemeRegistry::from_themes([theme(SYSTEM_THEME, ColorScheme::Light)]);
        assert_eq!(
            reserved.unwrap_err(),
            RegistryError::ReservedName(SYSTEM_THEME.to_string())
        );
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        let bad_key = Theme::new(
            "light",
            ColorScheme::Light,
            TokenTree::new().group("primary", TokenTree::new().token("5 00", "#000")),
        );
        assert_eq!(
            ThemeRegistry::from_themes([bad_key]).unwrap_err(),
            RegistryError::InvalidTokenKey {
                theme: "light".to_string(),
                path: "primary.5 00".to_string()
            }
        );

        let bad_value = Theme::new(
            "light",
            ColorScheme::Light,
            TokenTree::new().token("background", "#fff; } body { color: red"),
        );
        assert!(matches!(
            ThemeRegistry::from_themes([bad_value]).unwrap_err(),
            RegistryError::InvalidTokenValue { .. }
        ));
    }

    #[test]
    fn test_lookup() {
        let registry = registry();
        assert_eq!(registry.lookup("ocean").unwrap().name(), "ocean");
        assert_eq!(
            registry.lookup("sepia").unwrap_err(),
            RegistryError::ThemeNotFound("sepia".to_string())
        );
        assert!(registry.contains("dark"));
        assert!(!registry.contains(SYSTEM_THEME));
    }

    #[test]
    fn test_available_names_in_declaration_order() {
        assert_eq!(registry().available_names(), vec!["light", "dark", "ocean"]);
    }

    #[test]
    fn test_next_name_wraps() {
        let registry = registry();
        assert_eq!(registry.next_name("light"), "dark");
        assert_eq!(registry.next_name("dark"), "ocean");
        assert_eq!(registry.next_name("ocean"), "light");
        assert_eq!(registry.next_name(SYSTEM_THEME), "light");
    }

    #[test]
    fn test_theme_for_scheme() {
        let registry = registry();
        assert_eq!(registry.theme_for_scheme(ColorScheme::Dark).name(), "dark");
        assert_eq!(registry.theme_for_scheme(ColorScheme::Light).name(), "light");

        let dark_only = ThemeRegistry::from_themes([theme("ocean", ColorScheme::Dark)]).unwrap();
        assert_eq!(dark_only.theme_for_scheme(ColorScheme::Light).name(), "ocean");
    }

    #[test]
    fn test_from_toml_preserves_order() {
        let registry = ThemeRegistry::from_toml_str(
            r##"
[paper]
name = "paper"
type = "light"

[paper.colors]
background = "#fdf6e3"

[night]
name = "night"
type = "dark"

[night.colors]
background = "#002b36"

[night.colors.primary]
DEFAULT = "#268bd2"
500 = "#268bd2"
"##,
        )
        .unwrap();

        assert_eq!(registry.available_names(), vec!["paper", "night"]);
        assert_eq!(
            registry.lookup("night").unwrap().colors().get_path("primary.500"),
            Some("#268bd2")
        );
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        assert!(matches!(
            ThemeRegistry::from_json_str("{not json").unwrap_err(),
            RegistryError::Parse(_)
        ));
        assert!(matches!(
            ThemeRegistry::from_json_str(r#"{"light": {"name": "light", "type": "sepia", "colors": {}}}"#)
                .unwrap_err(),
            RegistryError::Parse(_)
        ));
    }
}
