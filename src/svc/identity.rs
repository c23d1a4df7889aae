//! # Identity module
//!
//! This module derives the local identifier of association resources. The
//! remote api does not assign any identifier to a membership or a queue to
//! fleet link, so the identifier is the ordered parent identifiers joined
//! with [`SEPARATOR`].

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Constants

pub const SEPARATOR: &str = "-";

// -----------------------------------------------------------------------------
// Error enumeration

#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum Error {
    #[error("failed to synthesize identifier, member at position {0} is empty")]
    EmptyMember(usize),
    #[error("failed to decompose identifier '{id}', expected {expected} members separated by '-' but found {found}")]
    Ambiguous {
        id: String,
        expected: usize,
        found: usize,
    },
}

// -----------------------------------------------------------------------------
// AssociationKey structure

/// ordered tuple of parent identifiers, kept exactly as supplied
#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct AssociationKey(Vec<String>);

impl Display for AssociationKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0.join(SEPARATOR))
    }
}

impl AssociationKey {
    pub fn new<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self(members.into_iter().map(Into::into).collect())
    }

    pub fn members(&self) -> &[String] {
        &self.0
    }

    /// every member must be non-empty to be part of an identifier
    pub fn validate(&self) -> Result<(), Error> {
        match self.0.iter().position(String::is_empty) {
            Some(idx) => Err(Error::EmptyMember(idx)),
            None => Ok(()),
        }
    }

    /// returns the composite identifier, identical keys always yield the
    /// same identifier
    #[cfg_attr(feature = "trace", tracing::instrument)]
    pub fn synthesize(&self) -> Result<String, Error> {
        self.validate()?;
        Ok(self.to_string())
    }

    /// split a composite identifier back into its members. The split is only
    /// trusted when it yields exactly `arity` non-empty members, an id whose
    /// members contain the separator themselves cannot be decomposed.
    #[cfg_attr(feature = "trace", tracing::instrument)]
    pub fn decompose(id: &str, arity: usize) -> Result<Self, Error> {
        let members: Vec<&str> = id.split(SEPARATOR).collect();

        if members.len() != arity || members.iter().any(|member| member.is_empty()) {
            return Err(Error::Ambiguous {
                id: id.to_string(),
                expected: arity,
                found: members.len(),
            });
        }

        Ok(Self::new(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesize_joins_members_in_order() {
        let key = AssociationKey::new(["f", "p", "d"]);
        assert_eq!(Ok("f-p-d".to_string()), key.synthesize());
        assert_eq!(key.synthesize(), key.synthesize());
    }

    #[test]
    fn synthesize_keeps_members_verbatim() {
        let key = AssociationKey::new(["f-1", "p-1", "d-1"]);
        assert_eq!(Ok("f-1-p-1-d-1".to_string()), key.synthesize());

        let key = AssociationKey::new(["Farm", "ABC"]);
        assert_eq!(Ok("Farm-ABC".to_string()), key.synthesize());
    }

    #[test]
    fn synthesize_is_injective_without_separator_in_members() {
        let keys = [
            AssociationKey::new(["farm1", "fleet1", "queue1"]),
            AssociationKey::new(["farm1", "fleet1", "queue2"]),
            AssociationKey::new(["farm1", "fleet2", "queue1"]),
            AssociationKey::new(["farm2", "fleet1", "queue1"]),
        ];

        let ids: std::collections::BTreeSet<String> = keys
            .iter()
            .map(|key| key.synthesize().expect("key to be valid"))
            .collect();

        assert_eq!(keys.len(), ids.len());
    }

    #[test]
    fn synthesize_rejects_empty_member() {
        let key = AssociationKey::new(["farm1", "", "queue1"]);
        assert_eq!(Err(Error::EmptyMember(1)), key.synthesize());
    }

    #[test]
    fn decompose_inverts_synthesize() {
        let key = AssociationKey::new(["farm1", "user1", "store1"]);
        let id = key.synthesize().expect("key to be valid");

        assert_eq!(Ok(key), AssociationKey::decompose(&id, 3));
    }

    #[test]
    fn decompose_rejects_ambiguous_identifier() {
        // members that carry the separator cannot be told apart
        let result = AssociationKey::decompose("f-1-p-1-d-1", 3);
        assert_eq!(
            Err(Error::Ambiguous {
                id: "f-1-p-1-d-1".to_string(),
                expected: 3,
                found: 6
            }),
            result
        );

        assert!(AssociationKey::decompose("farm1--store1", 3).is_err());
        assert!(AssociationKey::decompose("farm1-fleet1", 3).is_err());
    }
}
