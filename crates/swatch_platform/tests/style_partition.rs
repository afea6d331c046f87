use std::rc::Rc;

use swatch_platform::{HeadlessDocument, StyleInjector, DARK_CLASS};
use swatch_tokens::ColorScheme;

#[test]
fn distinct_ids_do_not_interfere() {
    let doc = Rc::new(HeadlessDocument::new());
    let page = StyleInjector::new(doc.clone());
    let preview = StyleInjector::new(doc.clone());

    page.upsert("page-theme", ":root {\n  --color-background: #fff;\n}\n")
        .unwrap();
    preview
        .upsert("preview-theme", ".preview {\n  --color-background: #000;\n}\n")
        .unwrap();
    page.upsert("page-theme", ":root {\n  --color-background: #eee;\n}\n")
        .unwrap();

    assert_eq!(doc.style_count(), 2);
    assert_eq!(
        doc.style("preview-theme").as_deref(),
        Some(".preview {\n  --color-background: #000;\n}\n")
    );

    preview.remove("preview-theme").unwrap();
    assert_eq!(doc.style_ids(), vec!["page-theme".to_string()]);
}

#[test]
fn shared_id_is_last_writer_wins() {
    let doc = Rc::new(HeadlessDocument::new());
    let first = StyleInjector::new(doc.clone());
    let second = StyleInjector::new(doc.clone());

    first.upsert("theme", "a {\n}\n").unwrap();
    second.upsert("theme", "b {\n}\n").unwrap();

    assert_eq!(doc.style_count(), 1);
    assert_eq!(doc.style("theme").as_deref(), Some("b {\n}\n"));
}

#[test]
fn only_root_instances_own_the_dark_marker() {
    let doc = Rc::new(HeadlessDocument::new());
    let injector = StyleInjector::new(doc.clone());

    injector.mark_scheme("html", ColorScheme::Dark).unwrap();
    injector.mark_scheme(".preview", ColorScheme::Light).unwrap();
    assert!(doc.has_root_class(DARK_CLASS));

    injector.clear_scheme_marker(".preview").unwrap();
    assert!(doc.has_root_class(DARK_CLASS));

    injector.clear_scheme_marker(":root").unwrap();
    assert!(!doc.has_root_class(DARK_CLASS));
}
