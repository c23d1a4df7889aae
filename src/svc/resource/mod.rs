//! # Resource module
//!
//! This module provide one reconciler per resource kind and the tagged
//! unions of declared and observed resources exchanged with the
//! provisioning host.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::svc::engine::Kind;

pub mod farm;
pub mod fleet;
pub mod fleet_membership;
pub mod license_endpoint;
pub mod membership;
pub mod queue;
pub mod queue_environment;
pub mod queue_fleet;
pub mod storage_profile;

// -----------------------------------------------------------------------------
// DeclaredResource enumeration

/// the operator's intended state for one resource instance
#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DeclaredResource {
    Farm(farm::Spec),
    Fleet(fleet::Spec),
    Queue(queue::Spec),
    QueueEnvironment(queue_environment::Spec),
    StorageProfile(storage_profile::Spec),
    LicenseEndpoint(license_endpoint::Spec),
    MembershipAssociation(membership::Spec),
    FleetMembershipAssociation(fleet_membership::Spec),
    QueueFleetAssociation(queue_fleet::Spec),
}

// -----------------------------------------------------------------------------
// ObservedResource enumeration

/// the last known remote state of one resource instance
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ObservedResource {
    Farm(farm::Observed),
    Fleet(fleet::Observed),
    Queue(queue::Observed),
    QueueEnvironment(queue_environment::Observed),
    StorageProfile(storage_profile::Observed),
    LicenseEndpoint(license_endpoint::Observed),
    MembershipAssociation(membership::Observed),
    FleetMembershipAssociation(fleet_membership::Observed),
    QueueFleetAssociation(queue_fleet::Observed),
}

macro_rules! variants {
    ($($variant:ident => $module:ident),* $(,)?) => {
        impl DeclaredResource {
            pub fn kind(&self) -> Kind {
                match self {
                    $(Self::$variant(_) => Kind::$variant,)*
                }
            }
        }

        impl ObservedResource {
            pub fn kind(&self) -> Kind {
                match self {
                    $(Self::$variant(_) => Kind::$variant,)*
                }
            }

            pub fn id(&self) -> String {
                use crate::svc::engine::Reconciler;

                match self {
                    $(Self::$variant(observed) => $module::Reconciler::id(observed),)*
                }
            }
        }

        $(
            impl From<$module::Spec> for DeclaredResource {
                fn from(spec: $module::Spec) -> Self {
                    Self::$variant(spec)
                }
            }

            impl From<$module::Observed> for ObservedResource {
                fn from(observed: $module::Observed) -> Self {
                    Self::$variant(observed)
                }
            }
        )*
    };
}

variants! {
    Farm => farm,
    Fleet => fleet,
    Queue => queue,
    QueueEnvironment => queue_environment,
    StorageProfile => storage_profile,
    LicenseEndpoint => license_endpoint,
    MembershipAssociation => membership,
    FleetMembershipAssociation => fleet_membership,
    QueueFleetAssociation => queue_fleet,
}

// -----------------------------------------------------------------------------
// Dispatch macros

/// evaluates the body with the declared resource bound to `$spec` and
/// the reconciler of its kind aliased as `$reconciler`
macro_rules! on_declared {
    ($declared:expr, $spec:ident, $reconciler:ident => $body:expr) => {{
        use $crate::svc::resource::{self as resource, DeclaredResource};

        match $declared {
            DeclaredResource::Farm($spec) => {
                type $reconciler = resource::farm::Reconciler;
                $body
            }
            DeclaredResource::Fleet($spec) => {
                type $reconciler = resource::fleet::Reconciler;
                $body
            }
            DeclaredResource::Queue($spec) => {
                type $reconciler = resource::queue::Reconciler;
                $body
            }
            DeclaredResource::QueueEnvironment($spec) => {
                type $reconciler = resource::queue_environment::Reconciler;
                $body
            }
            DeclaredResource::StorageProfile($spec) => {
                type $reconciler = resource::storage_profile::Reconciler;
                $body
            }
            DeclaredResource::LicenseEndpoint($spec) => {
                type $reconciler = resource::license_endpoint::Reconciler;
                $body
            }
            DeclaredResource::MembershipAssociation($spec) => {
                type $reconciler = resource::membership::Reconciler;
                $body
            }
            DeclaredResource::FleetMembershipAssociation($spec) => {
                type $reconciler = resource::fleet_membership::Reconciler;
                $body
            }
            DeclaredResource::QueueFleetAssociation($spec) => {
                type $reconciler = resource::queue_fleet::Reconciler;
                $body
            }
        }
    }};
}

/// evaluates the body with the observed record bound to `$observed`
macro_rules! on_observed {
    ($value:expr, $observed:ident, $reconciler:ident => $body:expr) => {{
        use $crate::svc::resource::{self as resource, ObservedResource};

        match $value {
            ObservedResource::Farm($observed) => {
                type $reconciler = resource::farm::Reconciler;
                $body
            }
            ObservedResource::Fleet($observed) => {
                type $reconciler = resource::fleet::Reconciler;
                $body
            }
            ObservedResource::Queue($observed) => {
                type $reconciler = resource::queue::Reconciler;
                $body
            }
            ObservedResource::QueueEnvironment($observed) => {
                type $reconciler = resource::queue_environment::Reconciler;
                $body
            }
            ObservedResource::StorageProfile($observed) => {
                type $reconciler = resource::storage_profile::Reconciler;
                $body
            }
            ObservedResource::LicenseEndpoint($observed) => {
                type $reconciler = resource::license_endpoint::Reconciler;
                $body
            }
            ObservedResource::MembershipAssociation($observed) => {
                type $reconciler = resource::membership::Reconciler;
                $body
            }
            ObservedResource::FleetMembershipAssociation($observed) => {
                type $reconciler = resource::fleet_membership::Reconciler;
                $body
            }
            ObservedResource::QueueFleetAssociation($observed) => {
                type $reconciler = resource::queue_fleet::Reconciler;
                $body
            }
        }
    }};
}

/// evaluates the body with both records bound when their kinds match,
/// returns a kind mismatch error otherwise
macro_rules! on_pair {
    ($declared:expr, $value:expr, $spec:ident, $observed:ident, $reconciler:ident => $body:expr) => {{
        use $crate::svc::{
            engine::Error as EngineError,
            resource::{self as resource, DeclaredResource, ObservedResource},
        };

        match ($declared, $value) {
            (DeclaredResource::Farm($spec), ObservedResource::Farm($observed)) => {
                type $reconciler = resource::farm::Reconciler;
                $body
            }
            (DeclaredResource::Fleet($spec), ObservedResource::Fleet($observed)) => {
                type $reconciler = resource::fleet::Reconciler;
                $body
            }
            (DeclaredResource::Queue($spec), ObservedResource::Queue($observed)) => {
                type $reconciler = resource::queue::Reconciler;
                $body
            }
            (
                DeclaredResource::QueueEnvironment($spec),
                ObservedResource::QueueEnvironment($observed),
            ) => {
                type $reconciler = resource::queue_environment::Reconciler;
                $body
            }
            (DeclaredResource::StorageProfile($spec), ObservedResource::StorageProfile($observed)) => {
                type $reconciler = resource::storage_profile::Reconciler;
                $body
            }
            (
                DeclaredResource::LicenseEndpoint($spec),
                ObservedResource::LicenseEndpoint($observed),
            ) => {
                type $reconciler = resource::license_endpoint::Reconciler;
                $body
            }
            (
                DeclaredResource::MembershipAssociation($spec),
                ObservedResource::MembershipAssociation($observed),
            ) => {
                type $reconciler = resource::membership::Reconciler;
                $body
            }
            (
                DeclaredResource::FleetMembershipAssociation($spec),
                ObservedResource::FleetMembershipAssociation($observed),
            ) => {
                type $reconciler = resource::fleet_membership::Reconciler;
                $body
            }
            (
                DeclaredResource::QueueFleetAssociation($spec),
                ObservedResource::QueueFleetAssociation($observed),
            ) => {
                type $reconciler = resource::queue_fleet::Reconciler;
                $body
            }
            (declared, observed) => Err(EngineError::KindMismatch {
                declared: declared.kind(),
                observed: observed.kind(),
            }),
        }
    }};
}

/// evaluates the body with the reconciler of the kind
macro_rules! on_kind {
    ($kind:expr, $reconciler:ident => $body:expr) => {{
        use $crate::svc::{engine::Kind, resource};

        match $kind {
            Kind::Farm => {
                type $reconciler = resource::farm::Reconciler;
                $body
            }
            Kind::Fleet => {
                type $reconciler = resource::fleet::Reconciler;
                $body
            }
            Kind::Queue => {
                type $reconciler = resource::queue::Reconciler;
                $body
            }
            Kind::QueueEnvironment => {
                type $reconciler = resource::queue_environment::Reconciler;
                $body
            }
            Kind::StorageProfile => {
                type $reconciler = resource::storage_profile::Reconciler;
                $body
            }
            Kind::LicenseEndpoint => {
                type $reconciler = resource::license_endpoint::Reconciler;
                $body
            }
            Kind::MembershipAssociation => {
                type $reconciler = resource::membership::Reconciler;
                $body
            }
            Kind::FleetMembershipAssociation => {
                type $reconciler = resource::fleet_membership::Reconciler;
                $body
            }
            Kind::QueueFleetAssociation => {
                type $reconciler = resource::queue_fleet::Reconciler;
                $body
            }
        }
    }};
}

pub(crate) use on_declared;
pub(crate) use on_kind;
pub(crate) use on_observed;
pub(crate) use on_pair;

// -----------------------------------------------------------------------------
// Helpers functions

/// splits the import identifier of a nested resource, parent identifiers
/// come first and are separated by a slash, e.g. `farm-1/queue-1`
pub fn split_import_id(id: &str, arity: usize) -> Option<Vec<String>> {
    let members: Vec<String> = id.split('/').map(String::from).collect();

    if members.len() != arity || members.iter().any(String::is_empty) {
        return None;
    }

    Some(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_resource_is_tagged_by_kind() {
        let declared: DeclaredResource = serde_yaml::from_str(
            "kind: farm\ndisplay_name: render-1\n",
        )
        .expect("declaration to deserialize");

        assert_eq!(Kind::Farm, declared.kind());
        assert_eq!(
            DeclaredResource::Farm(farm::Spec {
                display_name: "render-1".to_string(),
                description: None,
            }),
            declared
        );
    }

    #[test]
    fn kind_tags_match_kind_display() {
        let declared: DeclaredResource = serde_yaml::from_str(
            "kind: queue-fleet-association\nfarm_id: farm-1\nfleet_id: fleet-1\nqueue_id: queue-1\n",
        )
        .expect("declaration to deserialize");

        assert_eq!("queue-fleet-association", declared.kind().to_string());
    }

    #[test]
    fn split_import_id_requires_exact_arity() {
        assert_eq!(
            Some(vec!["farm-1".to_string(), "queue-1".to_string()]),
            split_import_id("farm-1/queue-1", 2)
        );
        assert_eq!(None, split_import_id("queue-1", 2));
        assert_eq!(None, split_import_id("farm-1//queue-1", 2));
    }
}
