//! Mounted theme instances and the handles consumers use to reach them
//!
//! A [`ThemeProvider`] owns one [`ThemeController`] for as long as it is
//! mounted. Consumers get cheap [`ThemeHandle`]s; a handle never keeps its
//! provider alive, and using one after unmount fails loudly.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use swatch_platform::{Listeners, PlatformServices, Subscription};
use swatch_tokens::{ColorScheme, Theme, ThemeRegistry};
use tracing::debug;

use crate::config::ThemeConfig;
use crate::controller::ThemeController;
use crate::error::ThemeError;

/// Observable state of a mounted provider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeSnapshot {
    /// Selected theme name (possibly `system`)
    pub theme: String,
    /// Scheme of the theme actually applied
    pub resolved: ColorScheme,
    /// Registry theme names, in declaration order
    pub themes: Vec<String>,
}

struct ProviderShared {
    controller: RefCell<ThemeController>,
    observers: Listeners<ThemeSnapshot>,
    subscriptions: RefCell<Vec<Subscription>>,
    mounted: Cell<bool>,
}

impl ProviderShared {
    fn snapshot(&self) -> ThemeSnapshot {
        let controller = self.controller.borrow();
        ThemeSnapshot {
            theme: controller.theme().to_string(),
            resolved: controller.resolved_theme(),
            themes: controller.available_themes(),
        }
    }

    /// Run a transition, then persist and notify observers once the
    /// controller borrow is released. Both may re-enter this provider: a
    /// storage write synchronously reaches other instances, whose observers
    /// can read or drive this one.
    fn dispatch(&self, transition: impl FnOnce(&mut ThemeController) -> bool) -> bool {
        let (changed, pending) = {
            let mut controller = self.controller.borrow_mut();
            let changed = transition(&mut controller);
            (changed, controller.take_pending_write())
        };
        if let Some(pending) = pending {
            pending.commit();
        }
        if changed {
            let snapshot = self.snapshot();
            self.observers.emit(&snapshot);
        }
        changed
    }

    fn teardown(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        // Dropping the subscriptions detaches from the OS and storage events.
        self.subscriptions.borrow_mut().clear();
        self.observers.clear();
        let controller = self.controller.borrow();
        controller.teardown();
        debug!("ThemeProvider - unmounted `{}`", controller.config().style_id);
    }
}

/// One mounted theme instance
///
/// Mounting injects the initial theme and starts listening to the host.
/// Dropping the provider (or calling [`unmount`](Self::unmount)) removes the
/// style node, clears the root marker, and releases every host listener.
pub struct ThemeProvider {
    shared: Rc<ProviderShared>,
}

impl ThemeProvider {
    pub fn mount(
        registry: Rc<ThemeRegistry>,
        config: ThemeConfig,
        services: PlatformServices,
    ) -> Result<Self, ThemeError> {
        let controller = ThemeController::new(registry, config, &services)?;
        let shared = Rc::new(ProviderShared {
            controller: RefCell::new(controller),
            observers: Listeners::new(),
            subscriptions: RefCell::new(Vec::new()),
            mounted: Cell::new(true),
        });

        let mut subscriptions = Vec::new();
        {
            let controller = shared.controller.borrow();
            if let Some(watcher) = controller.watcher() {
                let weak = Rc::downgrade(&shared);
                subscriptions.push(watcher.subscribe(move |scheme| {
                    if let Some(shared) = weak.upgrade() {
                        shared.dispatch(|c| c.handle_system_change(scheme));
                    }
                }));
            }
            if let Some(persistence) = controller.persistence() {
                let weak = Rc::downgrade(&shared);
                subscriptions.push(persistence.subscribe_external(move |value| {
                    if let Some(shared) = weak.upgrade() {
                        shared.dispatch(|c| c.handle_external_change(value));
                    }
                }));
            }
            controller.apply();
            debug!(
                "ThemeProvider - mounted `{}` on '{}'",
                controller.config().style_id,
                controller.theme()
            );
        }
        *shared.subscriptions.borrow_mut() = subscriptions;

        Ok(Self { shared })
    }

    /// Mount with the built-in presets.
    pub fn mount_default(
        config: ThemeConfig,
        services: PlatformServices,
    ) -> Result<Self, ThemeError> {
        Self::mount(Rc::new(swatch_tokens::default_registry()), config, services)
    }

    /// A handle for consumers of this instance.
    pub fn handle(&self) -> ThemeHandle {
        ThemeHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// The custom property block currently injected.
    pub fn css(&self) -> String {
        self.shared.controller.borrow().css()
    }

    pub fn config(&self) -> ThemeConfig {
        self.shared.controller.borrow().config().clone()
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for ThemeProvider {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl std::fmt::Debug for ThemeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeProvider")
            .field("controller", &*self.shared.controller.borrow())
            .field("observers", &self.shared.observers.len())
            .finish()
    }
}

/// Consumer access to a mounted [`ThemeProvider`]
///
/// The plain accessors panic when the provider is gone: a handle used
/// outside its provider is a programming error. The `try_` variants return
/// [`ThemeError::Detached`] instead.
#[derive(Clone)]
pub struct ThemeHandle {
    shared: Weak<ProviderShared>,
}

impl ThemeHandle {
    fn try_shared(&self) -> Result<Rc<ProviderShared>, ThemeError> {
        self.shared
            .upgrade()
            .filter(|shared| shared.mounted.get())
            .ok_or(ThemeError::Detached)
    }

    fn shared(&self) -> Rc<ProviderShared> {
        self.try_shared()
            .expect("ThemeHandle used outside an active ThemeProvider. Keep the provider mounted while its handles are in use.")
    }

    pub fn is_mounted(&self) -> bool {
        self.try_shared().is_ok()
    }

    /// The selected theme name (possibly `system`).
    pub fn theme(&self) -> String {
        self.shared().controller.borrow().theme().to_string()
    }

    pub fn resolved_theme(&self) -> ColorScheme {
        self.shared().controller.borrow().resolved_theme()
    }

    /// Registry theme names, in declaration order. Never includes `system`.
    pub fn themes(&self) -> Vec<String> {
        self.shared().controller.borrow().available_themes()
    }

    /// The theme whose tokens are applied.
    pub fn active_theme(&self) -> Theme {
        self.shared().controller.borrow().active_theme().clone()
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        self.shared().snapshot()
    }

    /// Select `name`. Unknown names are logged and change nothing; returns
    /// whether the selection was applied.
    pub fn set_theme(&self, name: &str) -> bool {
        self.shared().dispatch(|c| c.set_theme(name))
    }

    /// Advance to the next theme in declaration order, wrapping around.
    pub fn toggle_theme(&self) -> bool {
        self.shared().dispatch(ThemeController::toggle_theme)
    }

    /// Observe every applied change, including ones driven by the OS or by
    /// another context.
    pub fn subscribe(&self, callback: impl Fn(&ThemeSnapshot) + 'static) -> Subscription {
        self.shared().observers.subscribe(callback)
    }

    pub fn try_snapshot(&self) -> Result<ThemeSnapshot, ThemeError> {
        Ok(self.try_shared()?.snapshot())
    }

    pub fn try_set_theme(&self, name: &str) -> Result<bool, ThemeError> {
        Ok(self.try_shared()?.dispatch(|c| c.set_theme(name)))
    }

    pub fn try_toggle_theme(&self) -> Result<bool, ThemeError> {
        Ok(self.try_shared()?.dispatch(ThemeController::toggle_theme))
    }
}

impl std::fmt::Debug for ThemeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeHandle")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
