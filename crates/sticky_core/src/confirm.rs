//! Delete confirmation prompt.
//!
//! # Responsibility
//! - Describe the modal yes/no dialog that gates note deletion.
//! - Run the deletion callback only on an explicit "delete" answer.
//!
//! # Invariants
//! - With confirmation disabled the callback runs exactly once, synchronously.
//! - Dismissing the dialog is the same as choosing "cancel".

use crate::settings::Settings;
use log::debug;

pub const RESPONSE_CANCEL: &str = "cancel";
pub const RESPONSE_DELETE: &str = "delete";

const DELETE_HEADING: &str = "Are you sure you want to delete this note?";
const DELETE_BODY: &str =
    "This action cannot be undone. If you want to hide the note, you can close it instead.";

/// Visual treatment of one dialog button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseAppearance {
    #[default]
    Default,
    Suggested,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogResponse {
    pub id: &'static str,
    pub label: &'static str,
    pub appearance: ResponseAppearance,
}

/// Toolkit-independent description of a modal message dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub heading: &'static str,
    pub body: &'static str,
    pub responses: Vec<DialogResponse>,
    /// Activated by Enter.
    pub default_response: &'static str,
    /// Reported when the dialog is closed without choosing.
    pub close_response: &'static str,
}

impl ConfirmDialog {
    /// The note deletion dialog.
    pub fn delete_note() -> Self {
        Self {
            heading: DELETE_HEADING,
            body: DELETE_BODY,
            responses: vec![
                DialogResponse {
                    id: RESPONSE_CANCEL,
                    label: "Cancel",
                    appearance: ResponseAppearance::Default,
                },
                DialogResponse {
                    id: RESPONSE_DELETE,
                    label: "Delete",
                    appearance: ResponseAppearance::Destructive,
                },
            ],
            default_response: RESPONSE_CANCEL,
            close_response: RESPONSE_CANCEL,
        }
    }

    pub fn response(&self, id: &str) -> Option<&DialogResponse> {
        self.responses.iter().find(|response| response.id == id)
    }
}

/// How the user left the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Response(String),
    Dismissed,
}

impl DialogOutcome {
    /// Maps the outcome to a response id, using the close response for dismissal.
    pub fn resolve<'a>(&'a self, dialog: &'a ConfirmDialog) -> &'a str {
        match self {
            Self::Response(id) => id.as_str(),
            Self::Dismissed => dialog.close_response,
        }
    }
}

pub type OutcomeCallback = Box<dyn FnOnce(DialogOutcome)>;

/// UI seam that shows a dialog and reports the outcome later.
///
/// Implementations keep the callback until the user answers; there is no
/// timeout.
pub trait DialogPresenter {
    fn present(&mut self, dialog: ConfirmDialog, on_outcome: OutcomeCallback);
}

/// Runs `on_delete` directly, or after the user confirms when
/// `settings.confirm_delete` is set.
pub fn confirm_delete<P, F>(settings: &Settings, presenter: &mut P, on_delete: F)
where
    P: DialogPresenter + ?Sized,
    F: FnOnce() + 'static,
{
    if !settings.confirm_delete {
        on_delete();
        return;
    }

    let dialog = ConfirmDialog::delete_note();
    let shown = dialog.clone();
    presenter.present(
        dialog,
        Box::new(move |outcome| {
            let response = outcome.resolve(&shown);
            debug!("event=delete_confirm module=confirm status=ok response={response}");
            if response == RESPONSE_DELETE {
                on_delete();
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::{
        confirm_delete, ConfirmDialog, DialogOutcome, DialogPresenter, OutcomeCallback,
        ResponseAppearance, RESPONSE_CANCEL, RESPONSE_DELETE,
    };
    use crate::settings::Settings;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct PendingPresenter {
        shown: Vec<ConfirmDialog>,
        pending: Option<OutcomeCallback>,
    }

    impl DialogPresenter for PendingPresenter {
        fn present(&mut self, dialog: ConfirmDialog, on_outcome: OutcomeCallback) {
            self.shown.push(dialog);
            self.pending = Some(on_outcome);
        }
    }

    impl PendingPresenter {
        fn answer(&mut self, outcome: DialogOutcome) {
            let callback = self.pending.take().expect("dialog should be pending");
            callback(outcome);
        }
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move || handle.set(handle.get() + 1))
    }

    fn settings(confirm_delete: bool) -> Settings {
        Settings {
            confirm_delete,
            ..Settings::default()
        }
    }

    #[test]
    fn disabled_confirmation_runs_callback_once_without_dialog() {
        let mut presenter = PendingPresenter::default();
        let (count, on_delete) = counter();
        confirm_delete(&settings(false), &mut presenter, on_delete);
        assert_eq!(count.get(), 1);
        assert!(presenter.shown.is_empty());
    }

    #[test]
    fn delete_response_runs_callback_after_answer() {
        let mut presenter = PendingPresenter::default();
        let (count, on_delete) = counter();
        confirm_delete(&settings(true), &mut presenter, on_delete);
        assert_eq!(count.get(), 0);

        presenter.answer(DialogOutcome::Response(RESPONSE_DELETE.to_string()));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn cancel_and_dismiss_never_run_callback() {
        for outcome in [
            DialogOutcome::Response(RESPONSE_CANCEL.to_string()),
            DialogOutcome::Dismissed,
        ] {
            let mut presenter = PendingPresenter::default();
            let (count, on_delete) = counter();
            confirm_delete(&settings(true), &mut presenter, on_delete);
            presenter.answer(outcome);
            assert_eq!(count.get(), 0);
        }
    }

    #[test]
    fn delete_dialog_marks_delete_destructive_and_defaults_to_cancel() {
        let dialog = ConfirmDialog::delete_note();
        assert_eq!(dialog.default_response, RESPONSE_CANCEL);
        assert_eq!(dialog.close_response, RESPONSE_CANCEL);
        assert_eq!(
            dialog.response(RESPONSE_DELETE).unwrap().appearance,
            ResponseAppearance::Destructive
        );
        assert_eq!(DialogOutcome::Dismissed.resolve(&dialog), RESPONSE_CANCEL);
    }
}
