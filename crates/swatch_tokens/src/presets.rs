//! Built-in theme presets: `light`, `dark` and `ocean`.

use std::fmt::{Display, Formatter};

use crate::registry::ThemeRegistry;
use crate::theme::{ColorScheme, Theme};
use crate::tokens::TokenTree;

/// Built-in theme preset catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThemePreset {
    /// Slate text on white with a blue primary.
    Light,
    /// Inverted slate palette.
    Dark,
    /// Teal dark theme with a yellow accent.
    Ocean,
}

impl ThemePreset {
    /// Stable preset id, also the theme name.
    pub fn id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Ocean => "ocean",
        }
    }

    /// Full preset list, in registry order.
    pub fn all() -> &'static [ThemePreset] {
        const PRESETS: [ThemePreset; 3] = [ThemePreset::Light, ThemePreset::Dark, ThemePreset::Ocean];
        &PRESETS
    }

    pub fn theme(self) -> Theme {
        match self {
            Self::Light => light(),
            Self::Dark => dark(),
            Self::Ocean => ocean(),
        }
    }
}

impl Display for ThemePreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Registry holding every preset, in `light, dark, ocean` order.
pub fn default_registry() -> ThemeRegistry {
    ThemeRegistry::from_themes(ThemePreset::all().iter().map(|preset| preset.theme()))
        .expect("built-in presets are valid")
}

const SHADES: [&str; 11] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];

fn shades(colors: [&str; 11]) -> TokenTree {
    SHADES
        .iter()
        .zip(colors)
        .fold(TokenTree::new(), |tree, (shade, color)| tree.token(*shade, color))
}

fn pair(default: &str, foreground: &str) -> TokenTree {
    TokenTree::new()
        .token("DEFAULT", default)
        .token("foreground", foreground)
}

fn surface(s50: &str, s100: &str, s200: &str) -> TokenTree {
    TokenTree::new()
        .token("50", s50)
        .token("100", s100)
        .token("200", s200)
}

fn merge(mut base: TokenTree, extra: TokenTree) -> TokenTree {
    for (key, value) in extra.iter() {
        base.insert(key.clone(), value.clone());
    }
    base
}

pub fn light() -> Theme {
    Theme::new(
        "light",
        ColorScheme::Light,
        TokenTree::new()
            .token("background", "#ffffff")
            .token("foreground", "#0f172a")
            .group(
                "primary",
                merge(
                    pair("#3b82f6", "#ffffff"),
                    shades([
                        "#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6",
                        "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a", "#172554",
                    ]),
                ),
            )
            .group("secondary", pair("#64748b", "#ffffff"))
            .group("accent", pair("#f43f5e", "#ffffff"))
            .group("surface", surface("#f8fafc", "#f1f5f9", "#e2e8f0")),
    )
}

pub fn dark() -> Theme {
    Theme::new(
        "dark",
        ColorScheme::Dark,
        TokenTree::new()
            .token("background", "#020617")
            .token("foreground", "#f8fafc")
            .group(
                "primary",
                // Inverted shade ramp
                merge(
                    pair("#60a5fa", "#0f172a"),
                    shades([
                        "#172554", "#1e3a8a", "#1e40af", "#1d4ed8", "#2563eb", "#3b82f6",
                        "#60a5fa", "#93c5fd", "#bfdbfe", "#dbeafe", "#eff6ff",
                    ]),
                ),
            )
            .group("secondary", pair("#94a3b8", "#0f172a"))
            .group("accent", pair("#fb7185", "#0f172a"))
            .group("surface", surface("#0f172a", "#1e293b", "#334155")),
    )
}

pub fn ocean() -> Theme {
    Theme::new(
        "ocean",
        ColorScheme::Dark,
        TokenTree::new()
            .token("background", "#042f2e")
            .token("foreground", "#ccfbf1")
            .group("primary", pair("#2dd4bf", "#042f2e"))
            .group("secondary", pair("#134e4a", "#ccfbf1"))
            .group("accent", pair("#facc15", "#422006"))
            .group("surface", surface("#115e59", "#0f766e", "#0d9488")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_catalog() {
        let ids: Vec<&str> = ThemePreset::all().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["light", "dark", "ocean"]);
    }

    #[test]
    fn test_default_registry_order_and_schemes() {
        let registry = default_registry();
        assert_eq!(registry.available_names(), vec!["light", "dark", "ocean"]);
        assert_eq!(registry.lookup("ocean").unwrap().color_scheme(), ColorScheme::Dark);
    }

    #[test]
    fn test_primary_ramp_follows_default_pair() {
        let theme = light();
        let keys: Vec<&str> = match theme.colors().get("primary") {
            Some(crate::TokenValue::Group(group)) => group.iter().map(|(k, _)| k.as_str()).collect(),
            _ => panic!("primary should be a group"),
        };
        assert_eq!(&keys[..3], &["DEFAULT", "foreground", "50"]);
        assert_eq!(keys.len(), 13);
    }

    #[test]
    fn test_light_and_dark_primary_differ() {
        assert_ne!(
            light().colors().get_path("primary.DEFAULT"),
            dark().colors().get_path("primary.DEFAULT")
        );
    }
}
