//! Implementation of useradmin-core traits for RestClient

use useradmin_core::{
    AdminError, CreateUser, ListQuery, Result, UpdateUser, UserDirectory, UserId, UserPage,
    UserStatus,
};

use crate::client::RestClient;

impl UserDirectory for RestClient {
    fn list_users(&self, query: &ListQuery) -> Result<UserPage> {
        self.list_users(query).map_err(AdminError::from)
    }

    fn create_user(&self, user: &CreateUser) -> Result<()> {
        self.create_user(user).map(|_| ()).map_err(AdminError::from)
    }

    fn update_user(&self, id: &UserId, update: &UpdateUser) -> Result<()> {
        self.update_user(id, update)
            .map(|_| ())
            .map_err(AdminError::from)
    }

    fn delete_user(&self, id: &UserId) -> Result<()> {
        self.delete_user(id).map_err(AdminError::from)
    }

    fn set_status(&self, id: &UserId, next: UserStatus) -> Result<()> {
        self.set_status(id, next)
            .map(|_| ())
            .map_err(AdminError::from)
    }
}
