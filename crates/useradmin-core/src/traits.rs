use crate::error::Result;
use crate::models::*;

/// Common trait for all user directory backends
///
/// The page controller only talks to the backend through this trait, so a
/// REST client, an in-memory fake or any other store can sit behind it.
pub trait UserDirectory: Send + Sync {
    /// Fetch one page of users for the given filter, pagination and sort
    fn list_users(&self, query: &ListQuery) -> Result<UserPage>;

    /// Create a new user account
    fn create_user(&self, user: &CreateUser) -> Result<()>;

    /// Update an existing user (username only)
    fn update_user(&self, id: &UserId, update: &UpdateUser) -> Result<()>;

    /// Delete a user
    fn delete_user(&self, id: &UserId) -> Result<()>;

    /// Set the account status to `next`.
    ///
    /// Backends whose contract is uncertain may try several request
    /// shapes; only the final outcome is reported.
    fn set_status(&self, id: &UserId, next: UserStatus) -> Result<()>;
}
