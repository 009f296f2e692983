use std::fmt;

use serde::{Deserialize, Serialize};

/// The two state-changing actions a ledger row can record.
///
/// Serialized as the bare strings `"Issued"` and `"Returned"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Issued,
    Returned,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Issued => "Issued",
            Action::Returned => "Returned",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&Action::Issued).unwrap(), "\"Issued\"");
        assert_eq!(
            serde_json::from_str::<Action>("\"Returned\"").unwrap(),
            Action::Returned
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(serde_json::from_str::<Action>("\"Renewed\"").is_err());
    }
}
