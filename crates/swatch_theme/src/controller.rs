//! Theme controller state machine
//!
//! One [`ThemeController`] per provider instance. It owns the selected theme
//! name and the resolved color scheme, and pushes every transition to the
//! host document: the scoped custom property block and the root `dark`
//! marker.
//!
//! The controller itself never calls out to code that could re-enter it.
//! Transitions return whether anything changed; a name to persist is queued
//! as a [`PendingWrite`] because storage backends may notify other
//! instances synchronously. The owner commits it once it no longer holds
//! the controller, then tells observers.

use std::rc::Rc;

use swatch_platform::{
    PersistenceAdapter, PlatformServices, StyleInjector, SystemThemeWatcher,
};
use swatch_tokens::{ColorScheme, CssVariableSerializer, Theme, ThemeRegistry, SYSTEM_THEME};
use tracing::{debug, trace, warn};

use crate::config::ThemeConfig;
use crate::error::ThemeError;

/// Pick the theme a freshly mounted controller starts on.
///
/// In order:
/// 1. storage disabled and a valid default configured: the default
/// 2. storage enabled and a valid persisted name: the persisted name
/// 3. system tracking available: the first theme matching the OS preference
/// 4. a valid default
/// 5. the first declared theme
///
/// `system` is the current OS preference when tracking is enabled and the
/// host can report it. The `system` sentinel counts as valid only then.
pub fn resolve_initial_theme(
    registry: &ThemeRegistry,
    config: &ThemeConfig,
    persisted: Option<&str>,
    system: Option<ColorScheme>,
) -> String {
    let is_valid = |name: &str| {
        registry.contains(name) || (system.is_some() && name == SYSTEM_THEME)
    };

    let default = match config.default_theme.as_deref() {
        Some(name) if is_valid(name) => Some(name),
        Some(name) => {
            warn!("Default theme '{}' not found in configuration.", name);
            None
        }
        None => None,
    };

    if !config.enable_storage {
        if let Some(name) = default {
            return name.to_string();
        }
    } else if let Some(name) = persisted {
        if is_valid(name) {
            return name.to_string();
        }
        warn!("Ignoring persisted theme '{}': not in configuration.", name);
    }

    if let Some(scheme) = system {
        if let Some(theme) = registry.first_with_scheme(scheme) {
            return theme.name().to_string();
        }
    }

    default
        .map(str::to_string)
        .unwrap_or_else(|| registry.first().name().to_string())
}

/// Per-instance theme state and the host services it drives
pub struct ThemeController {
    registry: Rc<ThemeRegistry>,
    config: ThemeConfig,
    serializer: CssVariableSerializer,
    injector: StyleInjector,
    watcher: Option<SystemThemeWatcher>,
    persistence: Option<PersistenceAdapter>,

    /// Selected theme name, a registry key or the `system` sentinel
    theme: String,
    /// Last OS preference seen (light when tracking is off)
    system_scheme: ColorScheme,
    /// Scheme of the theme actually applied
    resolved: ColorScheme,
    /// Name chosen locally and not yet written to storage
    pending_write: Option<String>,
}

/// A theme name waiting to be persisted
#[must_use = "a pending write does nothing until committed"]
#[derive(Debug)]
pub struct PendingWrite {
    persistence: PersistenceAdapter,
    name: String,
}

impl PendingWrite {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write the name. Storage may notify other instances before this returns.
    pub fn commit(self) {
        self.persistence.write(&self.name);
    }
}

impl ThemeController {
    /// Build a controller and resolve its initial theme. Nothing is written
    /// to the host until [`apply`](Self::apply).
    pub fn new(
        registry: Rc<ThemeRegistry>,
        config: ThemeConfig,
        services: &PlatformServices,
    ) -> Result<Self, ThemeError> {
        config.validate()?;

        let watcher = match (&services.color_scheme, config.enable_system) {
            (Some(source), true) => Some(SystemThemeWatcher::new(source.clone())),
            (None, true) => {
                warn!("System theme tracking requested but the host has no color scheme query; disabled");
                None
            }
            _ => None,
        };

        let persistence = match (&services.storage, config.enable_storage) {
            (Some(storage), true) => Some(PersistenceAdapter::new(
                storage.clone(),
                config.storage_key.clone(),
            )),
            (None, true) => {
                warn!("Theme storage requested but the host has no storage; disabled");
                None
            }
            _ => None,
        };

        let system = watcher.as_ref().map(SystemThemeWatcher::current);
        let persisted = persistence.as_ref().and_then(PersistenceAdapter::read);
        let theme = resolve_initial_theme(&registry, &config, persisted.as_deref(), system);

        let mut controller = Self {
            serializer: CssVariableSerializer::new(config.namespace.clone()),
            injector: StyleInjector::new(services.styles.clone()),
            registry,
            config,
            watcher,
            persistence,
            theme,
            system_scheme: system.unwrap_or_default(),
            resolved: ColorScheme::default(),
            pending_write: None,
        };
        controller.resolved = controller.resolve_scheme();
        debug!(
            "ThemeController::new - `{}` starts on '{}' ({})",
            controller.config.style_id, controller.theme, controller.resolved
        );
        Ok(controller)
    }

    // ========== Queries ==========

    /// The selected theme name (possibly `system`).
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// The color scheme of the theme actually applied.
    pub fn resolved_theme(&self) -> ColorScheme {
        self.resolved
    }

    /// Registry theme names, in declaration order.
    pub fn available_themes(&self) -> Vec<String> {
        self.registry
            .available_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// The theme whose tokens are applied. Under `system` this is the first
    /// theme matching the OS preference.
    pub fn active_theme(&self) -> &Theme {
        if self.theme == SYSTEM_THEME {
            return self.registry.theme_for_scheme(self.system_scheme);
        }
        self.registry
            .get(&self.theme)
            .unwrap_or_else(|| self.registry.first())
    }

    /// The custom property block for the current state.
    pub fn css(&self) -> String {
        self.serializer
            .serialize(self.active_theme(), &self.config.selector)
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Rc<ThemeRegistry> {
        &self.registry
    }

    pub fn system_enabled(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn storage_enabled(&self) -> bool {
        self.persistence.is_some()
    }

    pub(crate) fn watcher(&self) -> Option<&SystemThemeWatcher> {
        self.watcher.as_ref()
    }

    pub(crate) fn persistence(&self) -> Option<&PersistenceAdapter> {
        self.persistence.as_ref()
    }

    fn is_selectable(&self, name: &str) -> bool {
        self.registry.contains(name) || (self.system_enabled() && name == SYSTEM_THEME)
    }

    fn resolve_scheme(&self) -> ColorScheme {
        if self.theme == SYSTEM_THEME {
            self.system_scheme
        } else {
            self.active_theme().color_scheme()
        }
    }

    // ========== Transitions ==========

    /// Select `name`. Unknown names are logged and leave everything as is.
    pub fn set_theme(&mut self, name: &str) -> bool {
        if !self.is_selectable(name) {
            warn!("Theme '{}' not found in configuration.", name);
            return false;
        }
        self.transition(name, true);
        true
    }

    /// Advance to the next registry theme, wrapping around. From `system`
    /// this selects the first theme.
    pub fn toggle_theme(&mut self) -> bool {
        let next = self.registry.next_name(&self.theme).to_string();
        self.set_theme(&next)
    }

    /// React to an OS preference change. Only re-applies while `system` is
    /// selected; a concrete theme ignores the OS.
    pub fn handle_system_change(&mut self, scheme: ColorScheme) -> bool {
        self.system_scheme = scheme;
        if self.theme != SYSTEM_THEME {
            trace!(
                "ThemeController - system is now {}, '{}' stays",
                scheme,
                self.theme
            );
            return false;
        }
        debug!("ThemeController - system preference changed to {}", scheme);
        self.resolved = scheme;
        self.apply();
        true
    }

    /// Adopt a theme name written to storage by another context.
    ///
    /// Applied like [`set_theme`](Self::set_theme) but not written back.
    /// Removals and unknown names are ignored.
    pub fn handle_external_change(&mut self, value: Option<&str>) -> bool {
        let Some(name) = value else {
            debug!(
                "ThemeController - `{}` cleared by another context; keeping '{}'",
                self.config.storage_key, self.theme
            );
            return false;
        };
        if !self.is_selectable(name) {
            warn!(
                "Ignoring theme '{}' from another context: not in configuration.",
                name
            );
            return false;
        }
        if name == self.theme {
            return false;
        }
        self.transition(name, false);
        true
    }

    fn transition(&mut self, name: &str, persist: bool) {
        debug!(
            "ThemeController - switching from '{}' to '{}'",
            self.theme, name
        );
        self.theme = name.to_string();
        self.resolved = self.resolve_scheme();
        self.apply();
        if persist && self.persistence.is_some() {
            self.pending_write = Some(name.to_string());
        }
    }

    /// Take the name queued by the last local transition, if storage is on.
    pub fn take_pending_write(&mut self) -> Option<PendingWrite> {
        let name = self.pending_write.take()?;
        let persistence = self.persistence.clone()?;
        Some(PendingWrite { persistence, name })
    }

    // ========== Host ==========

    /// Write the current state to the host: the style node, then the root
    /// marker. Host failures are logged.
    pub fn apply(&self) {
        let css = self.css();
        if let Err(err) = self.injector.upsert(&self.config.style_id, &css) {
            warn!(
                "ThemeController - failed to inject `{}`: {}",
                self.config.style_id, err
            );
        }
        if let Err(err) = self.injector.mark_scheme(&self.config.selector, self.resolved) {
            warn!("ThemeController - failed to update the root marker: {}", err);
        }
    }

    /// Remove everything this controller put into the host.
    pub fn teardown(&self) {
        if let Err(err) = self.injector.remove(&self.config.style_id) {
            warn!(
                "ThemeController - failed to remove `{}`: {}",
                self.config.style_id, err
            );
        }
        if let Err(err) = self.injector.clear_scheme_marker(&self.config.selector) {
            warn!("ThemeController - failed to clear the root marker: {}", err);
        }
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("theme", &self.theme)
            .field("resolved", &self.resolved)
            .field("style_id", &self.config.style_id)
            .field("selector", &self.config.selector)
            .field("system_enabled", &self.system_enabled())
            .field("storage_enabled", &self.storage_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swatch_platform::{HeadlessDocument, ManualColorScheme, SharedStorage, DARK_CLASS};
    use swatch_tokens::default_registry;

    fn registry() -> ThemeRegistry {
        default_registry()
    }

    #[test]
    fn test_initial_default_without_storage() {
        let config = ThemeConfig::new().with_default_theme("ocean");
        assert_eq!(
            resolve_initial_theme(&registry(), &config, Some("dark"), None),
            "ocean"
        );
    }

    #[test]
    fn test_initial_persisted_wins_with_storage() {
        let config = ThemeConfig::new()
            .with_default_theme("ocean")
            .with_storage(true);
        assert_eq!(
            resolve_initial_theme(&registry(), &config, Some("dark"), Some(ColorScheme::Light)),
            "dark"
        );
    }

    #[test]
    fn test_initial_invalid_persisted_falls_through() {
        let config = ThemeConfig::new()
            .with_default_theme("ocean")
            .with_storage(true);
        assert_eq!(
            resolve_initial_theme(&registry(), &config, Some("sepia"), None),
            "ocean"
        );
        assert_eq!(
            resolve_initial_theme(&registry(), &config, Some("system"), None),
            "ocean"
        );
    }

    #[test]
    fn test_initial_follows_system_preference() {
        let config = ThemeConfig::new().with_storage(true).with_system(true);
        assert_eq!(
            resolve_initial_theme(&registry(), &config, None, Some(ColorScheme::Dark)),
            "dark"
        );
        assert_eq!(
            resolve_initial_theme(&registry(), &config, None, Some(ColorScheme::Light)),
            "light"
        );
    }

    #[test]
    fn test_initial_falls_back_to_first() {
        let config = ThemeConfig::new().with_default_theme("sepia");
        assert_eq!(
            resolve_initial_theme(&registry(), &config, None, None),
            "light"
        );
    }

    #[test]
    fn test_unknown_name_is_a_noop() {
        let doc = Rc::new(HeadlessDocument::new());
        let services = PlatformServices::new(doc.clone());
        let mut controller =
            ThemeController::new(Rc::new(registry()), ThemeConfig::new(), &services).unwrap();
        controller.apply();
        let before = doc.mutation_count();

        assert!(!controller.set_theme("sepia"));
        assert!(!controller.set_theme(SYSTEM_THEME));
        assert_eq!(controller.theme(), "light");
        assert_eq!(doc.mutation_count(), before);
    }

    #[test]
    fn test_concrete_theme_ignores_system() {
        let doc = Rc::new(HeadlessDocument::new());
        let os = Rc::new(ManualColorScheme::new(ColorScheme::Light));
        let services = PlatformServices::new(doc.clone()).with_color_scheme(os);
        let config = ThemeConfig::new().with_system(true);
        let mut controller = ThemeController::new(Rc::new(registry()), config, &services).unwrap();
        controller.apply();

        assert_eq!(controller.theme(), "light");
        assert!(!controller.handle_system_change(ColorScheme::Dark));
        assert_eq!(controller.resolved_theme(), ColorScheme::Light);
        assert!(!doc.has_root_class(DARK_CLASS));

        assert!(controller.set_theme(SYSTEM_THEME));
        assert_eq!(controller.resolved_theme(), ColorScheme::Dark);
        assert_eq!(controller.active_theme().name(), "dark");
        assert!(doc.has_root_class(DARK_CLASS));
    }

    #[test]
    fn test_external_change_is_not_written_back() {
        let doc = Rc::new(HeadlessDocument::new());
        let storage = SharedStorage::new();
        let services =
            PlatformServices::new(doc.clone()).with_storage(Rc::new(storage.context()));
        let config = ThemeConfig::new().with_storage(true);
        let mut controller = ThemeController::new(Rc::new(registry()), config, &services).unwrap();

        assert!(controller.handle_external_change(Some("ocean")));
        assert_eq!(controller.theme(), "ocean");
        assert_eq!(storage.get("swatch-theme"), None);

        assert!(!controller.handle_external_change(None));
        assert!(!controller.handle_external_change(Some("sepia")));
        assert_eq!(controller.theme(), "ocean");
    }

    #[test]
    fn test_local_change_is_queued_until_committed() {
        let storage = SharedStorage::new();
        let services = PlatformServices::new(Rc::new(HeadlessDocument::new()))
            .with_storage(Rc::new(storage.context()));
        let config = ThemeConfig::new().with_storage(true);
        let mut controller = ThemeController::new(Rc::new(registry()), config, &services).unwrap();

        assert!(controller.set_theme("dark"));
        assert!(controller.set_theme("ocean"));
        assert_eq!(storage.get("swatch-theme"), None);

        let pending = controller.take_pending_write().unwrap();
        assert_eq!(pending.name(), "ocean");
        pending.commit();
        assert_eq!(storage.get("swatch-theme").as_deref(), Some("ocean"));
        assert!(controller.take_pending_write().is_none());
    }

    #[test]
    fn test_teardown_clears_host() {
        let doc = Rc::new(HeadlessDocument::new());
        let services = PlatformServices::new(doc.clone());
        let config = ThemeConfig::new().with_default_theme("dark");
        let controller = ThemeController::new(Rc::new(registry()), config, &services).unwrap();
        controller.apply();
        assert_eq!(doc.style_count(), 1);
        assert!(doc.has_root_class(DARK_CLASS));

        controller.teardown();
        assert_eq!(doc.style_count(), 0);
        assert!(!doc.has_root_class(DARK_CLASS));
    }
}
