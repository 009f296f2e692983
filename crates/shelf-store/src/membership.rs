//! Registered users.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shelf_types::{EntityKind, UserId};

use crate::error::{StoreError, StoreResult};

/// Registered users, keyed by id, mapped to their display name.
///
/// Users are never edited or removed. Serializes as the `users.json`
/// object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Membership {
    users: BTreeMap<UserId, String>,
}

impl Membership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Fails with [`StoreError::DuplicateKey`] if `id` is taken.
    pub fn add_user(&mut self, id: UserId, name: impl Into<String>) -> StoreResult<()> {
        if self.users.contains_key(&id) {
            return Err(StoreError::DuplicateKey {
                kind: EntityKind::User,
                id: id.into_inner(),
            });
        }
        self.users.insert(id, name.into());
        Ok(())
    }

    pub fn name_of(&self, id: &UserId) -> Option<&str> {
        self.users.get(id).map(String::as_str)
    }

    /// Like [`Membership::name_of`], but a missing id is an error.
    pub fn require(&self, id: &UserId) -> StoreResult<&str> {
        self.name_of(id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::User,
            id: id.to_string(),
        })
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.users.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// All users, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &str)> {
        self.users.iter().map(|(id, name)| (id, name.as_str()))
    }
}
