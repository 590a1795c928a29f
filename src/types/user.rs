use serde::{Deserialize, Serialize};

/// A single record in the store. `id` is the lookup key by convention only.
/// Missing fields fall back to empty/zero values.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub email: String,
    pub age: i64,
}
