//! Create/edit user dialog state.

use thiserror::Error;

use crate::models::{CreateUser, UpdateUser, UserId, UserRecord};
use crate::validation::{validate, FieldErrors, FormField, FormSchema, FormValues};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit(UserRecord),
}

/// Request the dialog wants sent once validation passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(CreateUser),
    Update { id: UserId, body: UpdateUser },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DialogError {
    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Validation failed")]
    Invalid(FieldErrors),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDialog {
    mode: DialogMode,
    values: FormValues,
    errors: FieldErrors,
    pending: bool,
    show_password: bool,
    show_confirm: bool,
}

impl UserDialog {
    pub fn create() -> Self {
        Self::with_mode(DialogMode::Create, FormValues::default())
    }

    /// Dialog pre-filled with the user's current username
    pub fn edit(user: UserRecord) -> Self {
        let values = FormValues::username(user.username.clone());
        Self::with_mode(DialogMode::Edit(user), values)
    }

    fn with_mode(mode: DialogMode, values: FormValues) -> Self {
        Self {
            mode,
            values,
            errors: FieldErrors::new(),
            pending: false,
            show_password: false,
            show_confirm: false,
        }
    }

    pub fn mode(&self) -> &DialogMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DialogMode::Edit(_))
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit user"
        } else {
            "New user"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Update"
        } else {
            "Create"
        }
    }

    /// Fields rendered for the current mode, in display order
    pub fn visible_fields(&self) -> &'static [FormField] {
        if self.is_edit() {
            &[FormField::Username]
        } else {
            &[
                FormField::Username,
                FormField::Password,
                FormField::ConfirmPassword,
            ]
        }
    }

    /// Values currently shown (initial values or the last submitted ones)
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether every field and button is disabled
    pub fn is_disabled(&self) -> bool {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether `field` is shown in clear text
    pub fn is_revealed(&self, field: FormField) -> bool {
        match field {
            FormField::Username => true,
            FormField::Password => self.show_password,
            FormField::ConfirmPassword => self.show_confirm,
        }
    }

    /// Flip masking of one password field; the other keeps its state
    pub fn toggle_visibility(&mut self, field: FormField) {
        match field {
            FormField::Username => {}
            FormField::Password => self.show_password = !self.show_password,
            FormField::ConfirmPassword => self.show_confirm = !self.show_confirm,
        }
    }

    /// Validate `values` and, if they pass, mark the dialog pending and
    /// return the request to send.
    ///
    /// Submitted values are kept either way so a re-render shows them.
    pub fn begin_submit(&mut self, values: FormValues) -> Result<Submission, DialogError> {
        if self.pending {
            return Err(DialogError::SubmissionInFlight);
        }

        let schema = if self.is_edit() {
            FormSchema::Edit
        } else {
            FormSchema::Create
        };

        let outcome = validate(schema, &values);
        self.values = values;

        if let Err(errors) = outcome {
            self.errors = errors.clone();
            return Err(DialogError::Invalid(errors));
        }

        self.errors = FieldErrors::new();
        self.pending = true;

        let submission = match &self.mode {
            DialogMode::Create => Submission::Create(CreateUser {
                username: self.values.username.clone(),
                password: self.values.password.clone(),
            }),
            DialogMode::Edit(user) => Submission::Update {
                id: user.id.clone(),
                body: UpdateUser {
                    username: self.values.username.clone(),
                },
            },
        };
        Ok(submission)
    }

    /// End the in-flight submission, attaching backend field errors if any
    pub fn finish_submit(&mut self, errors: Option<FieldErrors>) {
        self.pending = false;
        if let Some(errors) = errors {
            self.errors = errors;
        }
    }
}
