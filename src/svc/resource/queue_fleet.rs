//! # Queue fleet association resource
//!
//! This module provide the reconciler linking a queue to a fleet so that the
//! fleet workers pick up the queue jobs.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::QueueFleetAssociationRequest,
    engine::{self, Context, Error, Kind, Operation},
    identity::AssociationKey,
};

pub const ARITY: usize = 3;

// -----------------------------------------------------------------------------
// Spec structure

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Spec {
    #[serde(rename = "farm_id")]
    pub farm_id: String,
    #[serde(rename = "fleet_id")]
    pub fleet_id: String,
    #[serde(rename = "queue_id")]
    pub queue_id: String,
}

impl Spec {
    pub fn key(&self) -> AssociationKey {
        AssociationKey::new([
            self.farm_id.as_str(),
            self.fleet_id.as_str(),
            self.queue_id.as_str(),
        ])
    }
}

#[allow(clippy::from_over_into)]
impl Into<QueueFleetAssociationRequest> for &Spec {
    fn into(self) -> QueueFleetAssociationRequest {
        QueueFleetAssociationRequest {
            farm_id: self.farm_id.to_owned(),
            fleet_id: self.fleet_id.to_owned(),
            queue_id: self.queue_id.to_owned(),
        }
    }
}

// -----------------------------------------------------------------------------
// Observed structure

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Observed {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "farm_id")]
    pub farm_id: String,
    #[serde(rename = "fleet_id")]
    pub fleet_id: String,
    #[serde(rename = "queue_id")]
    pub queue_id: String,
}

#[allow(clippy::from_over_into)]
impl Into<QueueFleetAssociationRequest> for &Observed {
    fn into(self) -> QueueFleetAssociationRequest {
        QueueFleetAssociationRequest {
            farm_id: self.farm_id.to_owned(),
            fleet_id: self.fleet_id.to_owned(),
            queue_id: self.queue_id.to_owned(),
        }
    }
}

// -----------------------------------------------------------------------------
// Reconciler structure

#[derive(Clone, Default, Debug)]
pub struct Reconciler {}

#[async_trait]
impl engine::Reconciler for Reconciler {
    type Declared = Spec;
    type Observed = Observed;

    const KIND: Kind = Kind::QueueFleetAssociation;
    const ASSOCIATION: bool = true;

    fn id(observed: &Observed) -> String {
        observed.id.to_owned()
    }

    fn key(declared: &Spec) -> Option<AssociationKey> {
        Some(declared.key())
    }

    fn preview(declared: &Spec) -> Result<Value, Error> {
        let request: QueueFleetAssociationRequest = declared.into();
        serde_json::to_value(request).map_err(|err| Error::diff(Self::KIND, err))
    }

    async fn create(ctx: Arc<Context>, declared: &Spec) -> Result<Observed, Error> {
        let id = declared
            .key()
            .synthesize()
            .map_err(|err| Error::configuration(Operation::Create, Self::KIND, err))?;

        let request: QueueFleetAssociationRequest = declared.into();

        debug!(kind = %Self::KIND, id = &id, "Associate queue to fleet");
        ctx.client
            .create_queue_fleet_association(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, &id, err))?;

        Ok(Observed {
            id,
            farm_id: request.farm_id,
            fleet_id: request.fleet_id,
            queue_id: request.queue_id,
        })
    }

    async fn read(_ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        Ok(observed.to_owned())
    }

    async fn update(_ctx: Arc<Context>, _declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        Err(Error::replacement(
            Self::KIND,
            &observed.id,
            "queue fleet association cannot be modified in place",
        ))
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        let request: QueueFleetAssociationRequest = observed.into();

        debug!(kind = %Self::KIND, id = &observed.id, "Dissociate queue from fleet");
        ctx.client
            .delete_queue_fleet_association(&request)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    async fn import(_ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        let key = AssociationKey::decompose(id, ARITY)
            .map_err(|err| Error::configuration(Operation::Import, Self::KIND, err))?;

        match key.members() {
            [farm_id, fleet_id, queue_id] => Ok(Observed {
                id: id.to_string(),
                farm_id: farm_id.to_owned(),
                fleet_id: fleet_id.to_owned(),
                queue_id: queue_id.to_owned(),
            }),
            members => Err(Error::configuration(
                Operation::Import,
                Self::KIND,
                format!("expected {} members, found {}", ARITY, members.len()),
            )),
        }
    }
}
