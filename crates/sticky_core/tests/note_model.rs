use std::collections::HashSet;
use sticky_core::{Note, Settings, Style, Tag};

fn custom_settings() -> Settings {
    Settings {
        default_style: Style::Purple,
        default_width: 410,
        default_height: 220,
        confirm_delete: false,
    }
}

#[test]
fn generate_takes_defaults_from_settings() {
    let before = chrono::Utc::now().timestamp();
    let note = Note::generate(&custom_settings());
    let after = chrono::Utc::now().timestamp();

    assert_eq!(note.version(), 1);
    assert_eq!(note.style(), Style::Purple);
    assert_eq!(note.width(), 410);
    assert_eq!(note.height(), 220);
    assert!(note.content().is_empty());
    assert!(note.list_tags().is_empty());
    assert!((before..=after).contains(&note.modified_secs()));
}

#[test]
fn generated_ids_do_not_collide() {
    let settings = Settings::default();
    let ids: HashSet<String> = (0..10_000)
        .map(|_| Note::generate(&settings).id().to_string())
        .collect();
    assert_eq!(ids.len(), 10_000);
}

#[test]
fn copy_is_equal_but_owns_its_tags() {
    let mut original = Note::generate(&Settings::default());
    original.set_content("see #plan");
    original.replace_tags(vec![Tag::new("hashtag", 4, 9).unwrap()]);

    let mut copy = original.copy();
    assert_eq!(copy, original);
    assert_eq!(copy.id(), original.id());
    assert_eq!(copy.list_tags(), original.list_tags());

    copy.replace_tags(vec![Tag::named("other")]);
    assert_eq!(original.list_tags(), vec![Tag::new("hashtag", 4, 9).unwrap()]);
    assert_ne!(copy.list_tags(), original.list_tags());
}

#[test]
fn list_tags_returns_independent_snapshot() {
    let mut note = Note::generate(&Settings::default());
    note.replace_tags(vec![Tag::named("a")]);

    let mut snapshot = note.list_tags();
    snapshot.push(Tag::named("b"));
    assert_eq!(note.tag_count(), 1);
}
