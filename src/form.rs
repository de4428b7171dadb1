//! Create/edit forms and delete confirmations.
//!
//! A form holds the user's draft while a mutation is being prepared. It is
//! closed only by a successful submit (or `cancel`); a failed submit keeps it
//! open with the draft intact so the user can correct and retry.

use crate::gateway::MutationError;
use crate::record::HasId;
use crate::validate::{Validate, ValidationErrors};

/// What submitting the form will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
    Delete { id: String },
}

#[derive(Debug, Clone)]
pub struct Form<R> {
    mode: FormMode,
    draft: R,
    original: Option<R>,
    open: bool,
    errors: ValidationErrors,
    error: Option<String>,
}

impl<R: HasId + Clone> Form<R> {
    fn with_mode(mode: FormMode, draft: R, original: Option<R>) -> Self {
        Self {
            mode,
            draft,
            original,
            open: true,
            errors: ValidationErrors::new(),
            error: None,
        }
    }

    /// A create form seeded with default values.
    pub fn create(draft: R) -> Self {
        Self::with_mode(FormMode::Create, draft, None)
    }

    /// An edit form; the draft starts as a copy of `record`.
    pub fn edit(record: &R) -> Self {
        let mode = FormMode::Edit {
            id: record.id().to_string(),
        };
        Self::with_mode(mode, record.clone(), Some(record.clone()))
    }

    /// A delete confirmation for `record`.
    pub fn confirm_delete(record: &R) -> Self {
        let mode = FormMode::Delete {
            id: record.id().to_string(),
        };
        Self::with_mode(mode, record.clone(), Some(record.clone()))
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &R {
        &self.draft
    }

    /// Edit the draft. Clears the error message of the last failed submit.
    pub fn draft_mut(&mut self) -> &mut R {
        self.error = None;
        &mut self.draft
    }

    /// The record as it was when the form opened (edit and delete only).
    pub fn original(&self) -> Option<&R> {
        self.original.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Field errors from the last validation or failed submit.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Message of the last failed submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Close without submitting.
    pub fn cancel(&mut self) {
        self.open = false;
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
        self.errors = ValidationErrors::new();
        self.error = None;
    }

    pub(crate) fn fail(&mut self, err: &MutationError) {
        self.open = true;
        match err.validation_errors() {
            Some(errors) => {
                self.errors = errors.clone();
                self.error = None;
            }
            None => {
                self.errors = ValidationErrors::new();
                self.error = Some(err.user_message());
            }
        }
    }
}

impl<R: HasId + Clone + Validate> Form<R> {
    /// Validate the draft and record its field errors on the form.
    pub fn validate(&mut self) -> bool {
        self.errors = match self.draft.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Customer;
    use crate::store::StoreError;

    #[test]
    fn edit_form_keeps_original() {
        let customer = Customer::new("Ada", "Lovelace", "ada@example.com").with_id("c1");
        let mut form = Form::edit(&customer);
        form.draft_mut().first_name = "Augusta".into();

        assert_eq!(form.mode(), &FormMode::Edit { id: "c1".into() });
        assert_eq!(form.original().unwrap().first_name, "Ada");
        assert_eq!(form.draft().first_name, "Augusta");
    }

    #[test]
    fn validate_records_field_errors() {
        let mut form = Form::create(Customer::new("", "Lovelace", "ada@example.com"));
        assert!(!form.validate());
        assert!(form.errors().has("firstName"));

        form.draft_mut().first_name = "Ada".into();
        assert!(form.validate());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn failed_submit_keeps_form_open_with_message() {
        let mut form = Form::create(Customer::new("Ada", "Lovelace", "ada@example.com"));
        form.fail(&MutationError::Store(StoreError::Transient("timeout".into())));

        assert!(form.is_open());
        assert_eq!(form.error(), Some("Could not reach the server, please try again"));
        assert_eq!(form.draft().email, "ada@example.com");

        form.close();
        assert!(!form.is_open());
        assert_eq!(form.error(), None);
    }
}
