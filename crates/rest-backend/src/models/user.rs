use serde::Deserialize;
use serde_json::Value;

/// User row as sent by the backend.
///
/// Field names and types vary between deployments, so every field is kept
/// as a loose JSON value and only interpreted during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendUserRaw {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<Value>,
    #[serde(default, rename = "_id")]
    pub object_id: Option<Value>,
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    /// `"active"`/`"inactive"` in some deployments
    #[serde(default)]
    pub status: Option<Value>,
    /// Boolean flag in others
    #[serde(default)]
    pub active: Option<Value>,
}

impl BackendUserRaw {
    /// Id candidates in lookup order: `id`, `userId`, `_id`
    pub fn id_candidates(&self) -> [Option<&Value>; 3] {
        [
            self.id.as_ref(),
            self.user_id.as_ref(),
            self.object_id.as_ref(),
        ]
    }

    /// Username candidates in lookup order: `username`, `name`, `email`
    pub fn username_candidates(&self) -> [Option<&Value>; 3] {
        [
            self.username.as_ref(),
            self.name.as_ref(),
            self.email.as_ref(),
        ]
    }

    /// Status candidates in lookup order: `status`, `active`
    pub fn status_candidates(&self) -> [Option<&Value>; 2] {
        [self.status.as_ref(), self.active.as_ref()]
    }
}
