use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Which collection an identifier refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Book,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Book => f.write_str("book"),
            EntityKind::User => f.write_str("user"),
        }
    }
}

/// Trim `value` and reject it if nothing is left.
///
/// `field` names the input in the resulting error, e.g. `"book title"`.
pub fn non_blank(field: &'static str, value: &str) -> Result<String, TypeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeError::Blank { field });
    }
    Ok(trimmed.to_string())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap raw input as an identifier, kept byte for byte.
            ///
            /// Only the empty string is rejected, so ids typed in match
            /// ids read back from disk exactly, padding included.
            pub fn parse(raw: &str) -> Result<Self, TypeError> {
                if raw.is_empty() {
                    return Err(TypeError::Blank { field: $field });
                }
                Ok(Self(raw.to_string()))
            }

            /// The identifier as it is stored on disk.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a book in the catalog. Unique and immutable once added.
    BookId,
    "book id"
);

string_id!(
    /// Identifier of a registered user. Unique and immutable once added.
    UserId,
    "user id"
);
