//! # Instance module
//!
//! This module provide the lifecycle state of one resource instance.
//! `Creating`, `Updating` and `Deleting` are transient, a failed transition
//! goes back to the stable phase it started from.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::svc::{
    engine::{Error, Kind, Operation},
    resource::ObservedResource,
};

// -----------------------------------------------------------------------------
// Phase enumeration

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum Phase {
    #[default]
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "Absent"),
            Self::Creating => write!(f, "Creating"),
            Self::Present => write!(f, "Present"),
            Self::Updating => write!(f, "Updating"),
            Self::Deleting => write!(f, "Deleting"),
        }
    }
}

impl Phase {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Creating | Self::Updating | Self::Deleting)
    }
}

// -----------------------------------------------------------------------------
// Instance structure

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct Instance {
    #[serde(rename = "phase")]
    phase: Phase,
    #[serde(rename = "observed", skip_serializing_if = "Option::is_none")]
    observed: Option<ObservedResource>,
}

impl From<ObservedResource> for Instance {
    fn from(observed: ObservedResource) -> Self {
        Self {
            phase: Phase::Present,
            observed: Some(observed),
        }
    }
}

impl Instance {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn observed(&self) -> Option<&ObservedResource> {
        self.observed.as_ref()
    }

    /// enters the transient phase of the operation and returns the phase to
    /// go back to if the operation fails
    pub fn begin(&mut self, operation: Operation, kind: Kind) -> Result<Phase, Error> {
        let prior = self.phase;
        let next = match (operation, prior) {
            (Operation::Create, Phase::Absent) => Phase::Creating,
            (Operation::Update, Phase::Present) => Phase::Updating,
            (Operation::Delete, Phase::Present) => Phase::Deleting,
            (Operation::Delete, Phase::Absent) => {
                return Err(Error::NotFound {
                    operation,
                    kind,
                    id: String::new(),
                    message: "instance is already absent".to_string(),
                })
            }
            (operation, phase) => {
                return Err(Error::InvalidPhase {
                    operation,
                    kind,
                    phase,
                })
            }
        };

        self.phase = next;
        Ok(prior)
    }

    /// terminates the transition, the instance is present when an observed
    /// record is given and absent otherwise
    pub fn settle(&mut self, observed: Option<ObservedResource>) {
        self.phase = match observed {
            Some(_) => Phase::Present,
            None => Phase::Absent,
        };
        self.observed = observed;
    }

    pub fn abort(&mut self, prior: Phase) {
        self.phase = prior;
    }

    /// replaces the observed record of a present instance
    pub fn refresh(&mut self, observed: ObservedResource) {
        if self.phase == Phase::Present {
            self.observed = Some(observed);
        }
    }

    /// drops the observed record without any remote call
    pub fn forget(&mut self) {
        self.phase = Phase::Absent;
        self.observed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svc::resource::farm;

    fn observed() -> ObservedResource {
        ObservedResource::Farm(farm::Observed {
            id: "farm-1".to_string(),
            display_name: "render-1".to_string(),
            description: None,
        })
    }

    #[test]
    fn create_then_settle() {
        let mut instance = Instance::absent();

        let prior = instance
            .begin(Operation::Create, Kind::Farm)
            .expect("create to be allowed");
        assert_eq!(Phase::Absent, prior);
        assert_eq!(Phase::Creating, instance.phase());

        instance.settle(Some(observed()));
        assert_eq!(Phase::Present, instance.phase());
        assert_eq!(Some(&observed()), instance.observed());
    }

    #[test]
    fn abort_restores_prior_phase() {
        let mut instance = Instance::from(observed());

        let prior = instance
            .begin(Operation::Update, Kind::Farm)
            .expect("update to be allowed");
        assert_eq!(Phase::Updating, instance.phase());

        instance.abort(prior);
        assert_eq!(Phase::Present, instance.phase());
        assert_eq!(Some(&observed()), instance.observed());
    }

    #[test]
    fn delete_of_absent_instance_is_not_found() {
        let mut instance = Instance::absent();

        assert!(matches!(
            instance.begin(Operation::Delete, Kind::Farm),
            Err(Error::NotFound { .. })
        ));
        assert_eq!(Phase::Absent, instance.phase());
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut instance = Instance::from(observed());
        assert!(matches!(
            instance.begin(Operation::Create, Kind::Farm),
            Err(Error::InvalidPhase {
                phase: Phase::Present,
                ..
            })
        ));

        let mut instance = Instance::absent();
        assert!(matches!(
            instance.begin(Operation::Update, Kind::Farm),
            Err(Error::InvalidPhase {
                phase: Phase::Absent,
                ..
            })
        ));
    }

    #[test]
    fn forget_drops_observed_record() {
        let mut instance = Instance::from(observed());
        instance.forget();

        assert_eq!(Phase::Absent, instance.phase());
        assert_eq!(None, instance.observed());
    }
}
