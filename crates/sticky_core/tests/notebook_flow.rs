use std::cell::RefCell;
use std::rc::Rc;
use sticky_core::settings::{KEY_CONFIRM_DELETE, KEY_DEFAULT_WIDTH};
use sticky_core::{
    ConfirmDialog, DialogOutcome, DialogPresenter, MemorySettingsStore, NoteId, NoteStore,
    Notebook, NotebookError, SettingsAccessor, Style, Tag,
};

#[derive(Default)]
struct ScriptedPresenter {
    dialogs: Vec<ConfirmDialog>,
    pending: Option<Box<dyn FnOnce(DialogOutcome)>>,
}

impl DialogPresenter for ScriptedPresenter {
    fn present(&mut self, dialog: ConfirmDialog, on_outcome: Box<dyn FnOnce(DialogOutcome)>) {
        self.dialogs.push(dialog);
        self.pending = Some(on_outcome);
    }
}

impl ScriptedPresenter {
    fn answer(&mut self, outcome: DialogOutcome) {
        (self.pending.take().unwrap())(outcome);
    }
}

#[test]
fn notebook_persists_created_and_edited_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let settings_store = Rc::new(MemorySettingsStore::new());
    let settings = SettingsAccessor::bind(Rc::clone(&settings_store)).unwrap();

    let book = Notebook::open(NoteStore::new(&path));
    assert!(book.is_empty());

    settings_store.set_int(KEY_DEFAULT_WIDTH, 512);
    let id = book.create(&settings.current());
    book.set_content(&id, "call @sam").unwrap();
    assert!(book.retag(&id).unwrap());
    book.set_style(&id, Style::Blue).unwrap();
    book.save().unwrap();

    let reopened = Notebook::open(NoteStore::new(&path));
    let note = reopened.get(&id).unwrap();
    assert_eq!(note.width(), 512);
    assert_eq!(note.style(), Style::Blue);
    assert_eq!(note.content(), "call @sam");
    assert_eq!(note.tags()[0].span_in(note.content()), Some("@sam"));
}

#[test]
fn confirmed_delete_removes_note_and_reports_it() {
    let dir = tempfile::tempdir().unwrap();
    let store = Rc::new(MemorySettingsStore::new());
    let settings = SettingsAccessor::bind(Rc::clone(&store)).unwrap();
    let book = Notebook::open(NoteStore::new(dir.path().join("notes.json")));
    let id = book.create(&settings.current());

    let removed = Rc::new(RefCell::new(Vec::<NoteId>::new()));
    let sink = Rc::clone(&removed);
    book.connect_removed(move |id| sink.borrow_mut().push(id.clone()));

    let mut presenter = ScriptedPresenter::default();
    book.request_delete(&id, &settings.current(), &mut presenter)
        .unwrap();
    assert_eq!(presenter.dialogs.len(), 1);
    assert!(book.contains(&id));

    presenter.answer(DialogOutcome::Response("delete".to_string()));
    assert!(!book.contains(&id));
    assert_eq!(*removed.borrow(), vec![id]);
}

#[test]
fn dismissed_delete_keeps_note() {
    let dir = tempfile::tempdir().unwrap();
    let book = Notebook::open(NoteStore::new(dir.path().join("notes.json")));
    let store = Rc::new(MemorySettingsStore::new());
    let settings = SettingsAccessor::bind(Rc::clone(&store)).unwrap();
    let id = book.create(&settings.current());

    let mut presenter = ScriptedPresenter::default();
    book.request_delete(&id, &settings.current(), &mut presenter)
        .unwrap();
    presenter.answer(DialogOutcome::Dismissed);
    assert!(book.contains(&id));
}

#[test]
fn delete_without_confirmation_is_immediate() {
    let dir = tempfile::tempdir().unwrap();
    let store = Rc::new(MemorySettingsStore::new());
    let settings = SettingsAccessor::bind(Rc::clone(&store)).unwrap();
    store.set_boolean(KEY_CONFIRM_DELETE, false);

    let book = Notebook::open(NoteStore::new(dir.path().join("notes.json")));
    let id = book.create(&settings.current());

    let mut presenter = ScriptedPresenter::default();
    book.request_delete(&id, &settings.current(), &mut presenter)
        .unwrap();
    assert!(presenter.dialogs.is_empty());
    assert!(book.is_empty());
}

#[test]
fn delete_of_unknown_note_fails_without_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let book = Notebook::open(NoteStore::new(dir.path().join("notes.json")));
    let mut presenter = ScriptedPresenter::default();

    let err = book
        .request_delete(
            &NoteId::from("ghost"),
            &sticky_core::Settings::default(),
            &mut presenter,
        )
        .unwrap_err();
    assert!(matches!(err, NotebookError::NoteNotFound(_)));
    assert!(presenter.dialogs.is_empty());
}

#[test]
fn duplicated_note_survives_save_with_distinct_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let book = Notebook::open(NoteStore::new(&path));
    let id = book.create(&sticky_core::Settings::default());
    book.set_content(&id, "original").unwrap();
    let copy = book.duplicate(&id).unwrap();
    book.save().unwrap();

    let reopened = Notebook::open(NoteStore::new(&path));
    assert_eq!(reopened.len(), 2);
    assert!(!reopened.has_duplicate_ids());
    assert_eq!(reopened.get(&copy).unwrap().content(), "original");
}

#[test]
fn caller_tags_survive_content_edit_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let book = Notebook::open(NoteStore::new(&path));
    let id = book.create(&sticky_core::Settings::default());
    let pinned = vec![Tag::named("pinned"), Tag::new("link", 0, 3).unwrap()];
    book.replace_tags(&id, pinned.clone()).unwrap();

    book.set_content(&id, "see @ana at #standup").unwrap();
    assert_eq!(book.get(&id).unwrap().tags(), pinned.as_slice());
    book.save().unwrap();

    let reopened = Notebook::open(NoteStore::new(&path));
    let note = reopened.get(&id).unwrap();
    assert_eq!(note.content(), "see @ana at #standup");
    assert_eq!(note.tags(), pinned.as_slice());
}

#[test]
fn open_reports_repeated_ids_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let record = |content: &str| {
        serde_json::json!({
            "v": 1,
            "uuid": "same",
            "content": content,
            "style": 1,
            "tags": [],
            "modified": "2024-01-01T00:00:00Z",
            "width": 1,
            "height": 1
        })
    };
    let document = serde_json::json!([record("first"), record("second")]);
    std::fs::write(&path, document.to_string()).unwrap();

    let book = Notebook::open(NoteStore::new(&path));
    assert_eq!(book.len(), 2);
    assert!(book.has_duplicate_ids());
    assert_eq!(book.duplicate_ids(), vec![NoteId::from("same")]);
}
