pub mod controller;
pub mod dialog;
pub mod error;
pub mod filter_bar;
pub mod models;
pub mod toggle;
pub mod traits;
pub mod validation;

pub use controller::{ActionOutcome, Confirmation, Notice, NoticeLevel, UsersPage};
pub use dialog::{DialogMode, Submission, UserDialog};
pub use error::{AdminError, Result};
pub use filter_bar::{Debouncer, FilterBar, SEARCH_DEBOUNCE};
pub use models::*;
pub use toggle::{try_in_order, StatusAttempt, STATUS_ATTEMPTS};
pub use traits::UserDirectory;
pub use validation::{FieldErrors, FormField, FormValues};
