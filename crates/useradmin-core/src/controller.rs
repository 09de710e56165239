//! Page controller for the user administration screen.
//!
//! `UsersPage` owns all screen state (filters, pagination, sort, rows, the
//! open dialog) and is the only thing that mutates it. Views read the state
//! and call back into the controller; every change that affects the list
//! triggers exactly one fetch, and every mutation refetches afterwards.

use crate::dialog::{DialogError, Submission, UserDialog};
use crate::error::{AdminError, Result};
use crate::models::*;
use crate::traits::UserDirectory;
use crate::validation::{FieldErrors, FormValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Asks the user to confirm a destructive or state-changing action
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a row action or dialog submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Backend accepted the change and the list was refetched
    Done,
    /// User declined the confirmation; nothing was sent
    Declined,
    /// Client-side validation failed; nothing was sent
    Invalid,
    /// A submission is already in flight, or no dialog is open
    Busy,
    /// Backend call failed; state left as it was
    Failed,
}

/// Sequence number of a list request. Responses carrying an older ticket
/// than the latest issued one are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

pub const TOGGLE_PROMPT: &str = "Are you sure you want to change this user's status?";
pub const DELETE_PROMPT: &str = "Delete user?";

#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub filter: FilterState,
    pub pagination: PaginationState,
    pub sort: SortState,
    pub rows: Vec<UserRecord>,
    pub total: u64,
    pub dialog: Option<UserDialog>,
    latest_ticket: u64,
}

impl PageState {
    pub fn query(&self) -> ListQuery {
        ListQuery {
            filter: self.filter.clone(),
            pagination: self.pagination,
            sort: self.sort,
        }
    }
}

pub struct UsersPage<'a> {
    directory: &'a dyn UserDirectory,
    state: PageState,
    notices: Vec<Notice>,
}

impl<'a> UsersPage<'a> {
    pub fn new(directory: &'a dyn UserDirectory) -> Self {
        Self {
            directory,
            state: PageState::default(),
            notices: Vec::new(),
        }
    }

    /// Start from explicit filter, pagination and sort without fetching
    pub fn with_query(directory: &'a dyn UserDirectory, query: ListQuery) -> Self {
        let mut page = Self::new(directory);
        page.state.filter = query.filter;
        page.state.pagination = query.pagination;
        page.state.sort = query.sort;
        page
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn row(&self, id: &UserId) -> Option<&UserRecord> {
        self.state.rows.iter().find(|u| u.id.same_as(id))
    }

    /// Take queued notices, oldest first
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify_success(&mut self, message: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        });
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        });
    }

    // ========== List fetching ==========

    /// Issue a ticket for a new list request built from the current state
    pub fn begin_fetch(&mut self) -> (FetchTicket, ListQuery) {
        self.state.latest_ticket += 1;
        (FetchTicket(self.state.latest_ticket), self.state.query())
    }

    /// Apply a list response. Returns whether it was applied; stale or
    /// failed responses leave rows and total untouched.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: Result<UserPage>) -> bool {
        if ticket.0 != self.state.latest_ticket {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.state.latest_ticket,
                "dropping stale list response"
            );
            return false;
        }

        match result {
            Ok(page) => {
                self.state.rows = page.users;
                self.state.total = page.total;
                true
            }
            Err(e) => {
                self.notify_error(e.to_string());
                false
            }
        }
    }

    /// Refetch the list for the current state
    pub fn refresh(&mut self) -> bool {
        let (ticket, query) = self.begin_fetch();
        let result = self.directory.list_users(&query);
        self.finish_fetch(ticket, result)
    }

    // ========== State setters ==========

    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        if self.state.filter.search == search {
            return false;
        }
        self.state.filter.search = search;
        self.state.pagination.page_index = 0;
        self.refresh();
        true
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) -> bool {
        if self.state.filter.status == status {
            return false;
        }
        self.state.filter.status = status;
        self.state.pagination.page_index = 0;
        self.refresh();
        true
    }

    pub fn set_pagination(&mut self, pagination: PaginationState) -> bool {
        if pagination.page_size == 0 {
            self.notify_error(
                AdminError::InvalidInput("page size must be greater than zero".to_string())
                    .to_string(),
            );
            return false;
        }
        if self.state.pagination == pagination {
            return false;
        }
        self.state.pagination = pagination;
        self.refresh();
        true
    }

    pub fn set_sort(&mut self, sort: SortState) -> bool {
        if self.state.sort == sort {
            return false;
        }
        self.state.sort = sort;
        self.refresh();
        true
    }

    // ========== Dialog ==========

    pub fn open_create(&mut self) {
        self.state.dialog = Some(UserDialog::create());
    }

    pub fn open_edit(&mut self, user: &UserRecord) {
        self.state.dialog = Some(UserDialog::edit(user.clone()));
    }

    pub fn close_dialog(&mut self) {
        self.state.dialog = None;
    }

    pub fn dialog(&self) -> Option<&UserDialog> {
        self.state.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut UserDialog> {
        self.state.dialog.as_mut()
    }

    /// Validate and send the open dialog's form.
    ///
    /// On success the list is refetched and the dialog closed. On failure the
    /// dialog stays open with the submitted values and any field errors.
    pub fn submit_dialog(&mut self, values: FormValues) -> ActionOutcome {
        let Some(dialog) = self.state.dialog.as_mut() else {
            return ActionOutcome::Busy;
        };

        let submission = match dialog.begin_submit(values) {
            Ok(submission) => submission,
            Err(DialogError::SubmissionInFlight) => return ActionOutcome::Busy,
            Err(DialogError::Invalid(_)) => {
                self.notify_error("Validation failed");
                return ActionOutcome::Invalid;
            }
        };

        let (result, success) = match &submission {
            Submission::Create(user) => (self.directory.create_user(user), "User created"),
            Submission::Update { id, body } => {
                (self.directory.update_user(id, body), "User updated")
            }
        };

        match result {
            Ok(()) => {
                self.notify_success(success);
                self.refresh();
                self.state.dialog = None;
                ActionOutcome::Done
            }
            Err(e) => {
                let field_errors = match &e {
                    AdminError::Validation { fields, .. } => Some(FieldErrors::from_backend(fields)),
                    _ => None,
                };
                self.notify_error(e.to_string());
                if let Some(dialog) = self.state.dialog.as_mut() {
                    dialog.finish_submit(field_errors);
                }
                ActionOutcome::Failed
            }
        }
    }

    // ========== Row actions ==========

    /// Flip `current` after confirmation, probing the backend's status
    /// conventions. Local rows only change through the refetch.
    pub fn toggle_status(
        &mut self,
        id: &UserId,
        current: UserStatus,
        confirmation: &dyn Confirmation,
    ) -> ActionOutcome {
        if !confirmation.confirm(TOGGLE_PROMPT) {
            return ActionOutcome::Declined;
        }

        let next = current.toggled();
        match self.directory.set_status(id, next) {
            Ok(()) => {
                self.notify_success("User updated");
                self.refresh();
                ActionOutcome::Done
            }
            Err(e) => {
                self.notify_error(e.to_string());
                ActionOutcome::Failed
            }
        }
    }

    pub fn delete_user(&mut self, id: &UserId, confirmation: &dyn Confirmation) -> ActionOutcome {
        if !confirmation.confirm(DELETE_PROMPT) {
            return ActionOutcome::Declined;
        }

        match self.directory.delete_user(id) {
            Ok(()) => {
                self.notify_success("User deleted");
                self.refresh();
                ActionOutcome::Done
            }
            Err(e) => {
                self.notify_error(e.to_string());
                ActionOutcome::Failed
            }
        }
    }
}
