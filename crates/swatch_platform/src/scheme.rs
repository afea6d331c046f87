//! System color scheme watching

use std::cell::Cell;
use std::rc::Rc;

use swatch_tokens::ColorScheme;

use crate::listeners::Subscription;

/// Backend reporting the OS light/dark preference
/// (`prefers-color-scheme` in a browser)
pub trait ColorSchemeSource {
    fn current(&self) -> ColorScheme;

    /// Register for preference changes.
    fn subscribe(&self, callback: Box<dyn Fn(ColorScheme)>) -> Subscription;
}

/// Watches a [`ColorSchemeSource`] on behalf of one controller
///
/// Subscribers see at most one notification per actual change: repeated
/// reports of the same scheme from the backend are filtered out, per
/// subscription. Nothing is emitted for the state at subscription time.
#[derive(Clone)]
pub struct SystemThemeWatcher {
    source: Rc<dyn ColorSchemeSource>,
}

impl SystemThemeWatcher {
    pub fn new(source: Rc<dyn ColorSchemeSource>) -> Self {
        Self { source }
    }

    pub fn current(&self) -> ColorScheme {
        self.source.current()
    }

    pub fn subscribe(&self, callback: impl Fn(ColorScheme) + 'static) -> Subscription {
        let last = Cell::new(self.source.current());
        self.source.subscribe(Box::new(move |scheme| {
            if last.replace(scheme) != scheme {
                callback(scheme);
            }
        }))
    }
}

impl std::fmt::Debug for SystemThemeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemThemeWatcher")
            .field("current", &self.current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::Listeners;
    use std::cell::RefCell;

    /// Source that forwards every report, even repeated ones
    struct NoisySource {
        current: Cell<ColorScheme>,
        listeners: Listeners<ColorScheme>,
    }

    impl NoisySource {
        fn report(&self, scheme: ColorScheme) {
            self.current.set(scheme);
            self.listeners.emit(&scheme);
        }
    }

    impl ColorSchemeSource for NoisySource {
        fn current(&self) -> ColorScheme {
            self.current.get()
        }

        fn subscribe(&self, callback: Box<dyn Fn(ColorScheme)>) -> Subscription {
            self.listeners.subscribe(move |scheme| callback(*scheme))
        }
    }

    #[test]
    fn test_duplicate_reports_are_filtered() {
        let source = Rc::new(NoisySource {
            current: Cell::new(ColorScheme::Light),
            listeners: Listeners::new(),
        });
        let watcher = SystemThemeWatcher::new(source.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        let _sub = watcher.subscribe(move |scheme| s.borrow_mut().push(scheme));

        source.report(ColorScheme::Light);
        source.report(ColorScheme::Dark);
        source.report(ColorScheme::Dark);
        source.report(ColorScheme::Light);

        assert_eq!(*seen.borrow(), vec![ColorScheme::Dark, ColorScheme::Light]);
    }

    #[test]
    fn test_each_subscriber_filters_independently() {
        let source = Rc::new(NoisySource {
            current: Cell::new(ColorScheme::Light),
            listeners: Listeners::new(),
        });
        let watcher = SystemThemeWatcher::new(source.clone());
        let count = Rc::new(Cell::new(0));

        let a = count.clone();
        let _first = watcher.subscribe(move |_| a.set(a.get() + 1));
        let b = count.clone();
        let _second = watcher.subscribe(move |_| b.set(b.get() + 1));

        source.report(ColorScheme::Dark);
        assert_eq!(count.get(), 2);
    }
}
