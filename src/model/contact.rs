use crate::model::{patch, ContactLogWithNames, CrossCaseRole, Id, Patch};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: Id,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContactSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub contact: Contact,
    pub case_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilter {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContact {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "patch")]
    pub email: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub phone: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub address: Patch<String>,
    #[serde(default, deserialize_with = "patch")]
    pub notes: Patch<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.notes.is_none()
    }
}

/// A contact with every case role and every logged interaction.
#[derive(Debug, Clone, Serialize)]
pub struct ContactDetail {
    pub contact: Contact,
    pub roles: Vec<CrossCaseRole>,
    pub interactions: Vec<ContactLogWithNames>,
}
