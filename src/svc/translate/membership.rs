//! # Membership translation
//!
//! Principal type and membership level are strict, the api rejects any
//! other value so they are checked before the association is requested.

use crate::svc::{
    deadline::model::{MembershipLevel, PrincipalType},
    translate::Error,
};

pub fn principal_type(value: &str) -> Result<PrincipalType, Error> {
    value.parse().map_err(Error::invalid("principal_type"))
}

pub fn membership_level(value: &str) -> Result<MembershipLevel, Error> {
    value.parse().map_err(Error::invalid("membership_level"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_type_is_strict() {
        assert_eq!(Ok(PrincipalType::User), principal_type("USER"));
        assert_eq!(Ok(PrincipalType::Group), principal_type("GROUP"));
        assert!(principal_type("user").is_err());
        assert!(principal_type("ROLE").is_err());
    }

    #[test]
    fn membership_level_is_strict() {
        assert_eq!(Ok(MembershipLevel::Viewer), membership_level("VIEWER"));
        assert_eq!(Ok(MembershipLevel::Contributor), membership_level("CONTRIBUTOR"));
        assert_eq!(Ok(MembershipLevel::Owner), membership_level("OWNER"));
        assert_eq!(Ok(MembershipLevel::Manager), membership_level("MANAGER"));
        assert!(matches!(
            membership_level(""),
            Err(Error::InvalidChoice {
                field: "membership_level",
                ..
            })
        ));
    }
}
