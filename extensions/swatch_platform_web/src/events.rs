//! Filtering of `storage` events down to the watched key

/// What a `storage` event means for one watched `localStorage` key.
///
/// `None` when the event is irrelevant: it came from another storage area
/// (`sessionStorage` fires the same event) or touched another key.
/// Otherwise the key's new value, `None` when it was removed or the whole
/// area was cleared.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn storage_event_value<'a>(
    same_area: bool,
    changed_key: Option<&str>,
    key: &str,
    new_value: Option<&'a str>,
) -> Option<Option<&'a str>> {
    if !same_area {
        return None;
    }
    match changed_key {
        Some(changed) if changed == key => Some(new_value),
        Some(_) => None,
        // `clear()` in another tab
        None => Some(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watched_key() {
        assert_eq!(
            storage_event_value(true, Some("swatch-theme"), "swatch-theme", Some("ocean")),
            Some(Some("ocean"))
        );
        assert_eq!(
            storage_event_value(true, Some("swatch-theme"), "swatch-theme", None),
            Some(None)
        );
    }

    #[test]
    fn test_other_key_ignored() {
        assert_eq!(
            storage_event_value(true, Some("other"), "swatch-theme", Some("ocean")),
            None
        );
    }

    #[test]
    fn test_clear_reports_removal() {
        assert_eq!(storage_event_value(true, None, "swatch-theme", None), Some(None));
    }

    #[test]
    fn test_other_storage_area_ignored() {
        assert_eq!(
            storage_event_value(false, Some("swatch-theme"), "swatch-theme", Some("ocean")),
            None
        );
        assert_eq!(storage_event_value(false, None, "swatch-theme", None), None);
    }
}
