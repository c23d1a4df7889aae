//! # Fleet membership association resource
//!
//! This module provide the fleet membership reconciler, the fleet identifier
//! is part of the synthesized identifier: `farm-fleet-principal-store`.
//!
//! Other deadline providers key this association on `farm-principal-store`,
//! which collides when a principal joins two fleets of the same farm.
//! Identifiers stored in that three member format do not decompose here and
//! are rejected on import.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::{
        AssociateMemberToFleetRequest, DisassociateMemberFromFleetRequest, MembershipLevel,
        PrincipalType,
    },
    engine::{self, Context, Error, Kind, Operation, Plan},
    identity::AssociationKey,
    translate,
};

pub const ARITY: usize = 4;

// -----------------------------------------------------------------------------
// Spec structure

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Spec {
    #[serde(rename = "farm_id")]
    pub farm_id: String,
    #[serde(rename = "fleet_id")]
    pub fleet_id: String,
    #[serde(rename = "principal_id")]
    pub principal_id: String,
    #[serde(rename = "identity_store_id")]
    pub identity_store_id: String,
    #[serde(rename = "principal_type")]
    pub principal_type: String,
    #[serde(rename = "membership_level")]
    pub membership_level: String,
}

impl Spec {
    pub fn key(&self) -> AssociationKey {
        AssociationKey::new([
            self.farm_id.as_str(),
            self.fleet_id.as_str(),
            self.principal_id.as_str(),
            self.identity_store_id.as_str(),
        ])
    }

    fn request(&self) -> Result<AssociateMemberToFleetRequest, translate::Error> {
        Ok(AssociateMemberToFleetRequest {
            farm_id: self.farm_id.to_owned(),
            fleet_id: self.fleet_id.to_owned(),
            principal_id: self.principal_id.to_owned(),
            identity_store_id: self.identity_store_id.to_owned(),
            principal_type: translate::membership::principal_type(&self.principal_type)?,
            membership_level: translate::membership::membership_level(&self.membership_level)?,
        })
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
    #[serde(rename = "principal_id")]
    pub principal_id: String,
    #[serde(rename = "identity_store_id")]
    pub identity_store_id: String,
    #[serde(rename = "principal_type", default, skip_serializing_if = "Option::is_none")]
    pub principal_type: Option<PrincipalType>,
    #[serde(rename = "membership_level", default, skip_serializing_if = "Option::is_none")]
    pub membership_level: Option<MembershipLevel>,
}

// -----------------------------------------------------------------------------
// Reconciler structure

#[derive(Clone, Default, Debug)]
pub struct Reconciler {}

#[async_trait]
impl engine::Reconciler for Reconciler {
    type Declared = Spec;
    type Observed = Observed;

    const KIND: Kind = Kind::FleetMembershipAssociation;
    const ASSOCIATION: bool = true;

    fn id(observed: &Observed) -> String {
        observed.id.to_owned()
    }

    fn key(declared: &Spec) -> Option<AssociationKey> {
        Some(declared.key())
    }

    fn preview(declared: &Spec) -> Result<Value, Error> {
        let request = declared
            .request()
            .map_err(|err| Error::configuration(Operation::Create, Self::KIND, err))?;

        serde_json::to_value(request).map_err(|err| Error::diff(Self::KIND, err))
    }

    /// members are compared one by one, type and level only when known
    fn plan(declared: &Spec, observed: &Observed) -> Result<Plan, Error> {
        let mut fields: Vec<String> = [
            ("farm_id", declared.farm_id == observed.farm_id),
            ("fleet_id", declared.fleet_id == observed.fleet_id),
            ("identity_store_id", declared.identity_store_id == observed.identity_store_id),
            (
                "membership_level",
                observed
                    .membership_level
                    .map_or(true, |level| declared.membership_level == level.to_string()),
            ),
            ("principal_id", declared.principal_id == observed.principal_id),
            (
                "principal_type",
                observed
                    .principal_type
                    .map_or(true, |kind| declared.principal_type == kind.to_string()),
            ),
        ]
        .iter()
        .filter(|(_, same)| !same)
        .map(|(field, _)| field.to_string())
        .collect();

        if fields.is_empty() {
            return Ok(Plan::NoOp);
        }

        fields.sort();
        Ok(Plan::Replace { fields })
    }

    async fn create(ctx: Arc<Context>, declared: &Spec) -> Result<Observed, Error> {
        let id = declared
            .key()
            .synthesize()
            .map_err(|err| Error::configuration(Operation::Create, Self::KIND, err))?;

        let request = declared
            .request()
            .map_err(|err| Error::configuration(Operation::Create, Self::KIND, err))?;

        debug!(kind = %Self::KIND, id = &id, level = %request.membership_level, "Associate member to fleet");
        ctx.client
            .associate_member_to_fleet(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, &id, err))?;

        Ok(Observed {
            id,
            farm_id: request.farm_id,
            fleet_id: request.fleet_id,
            principal_id: request.principal_id,
            identity_store_id: request.identity_store_id,
            principal_type: Some(request.principal_type),
            membership_level: Some(request.membership_level),
        })
    }

    async fn read(_ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        Ok(observed.to_owned())
    }

    async fn update(_ctx: Arc<Context>, _declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        Err(Error::replacement(
            Self::KIND,
            &observed.id,
            "fleet membership cannot be modified in place",
        ))
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        let request = DisassociateMemberFromFleetRequest {
            farm_id: observed.farm_id.to_owned(),
            fleet_id: observed.fleet_id.to_owned(),
            principal_id: observed.principal_id.to_owned(),
            identity_store_id: observed.identity_store_id.to_owned(),
        };

        debug!(kind = %Self::KIND, id = &observed.id, "Disassociate member from fleet");
        ctx.client
            .disassociate_member_from_fleet(&request)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    async fn import(_ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        let key = AssociationKey::decompose(id, ARITY)
            .map_err(|err| Error::configuration(Operation::Import, Self::KIND, err))?;

        match key.members() {
            [farm_id, fleet_id, principal_id, identity_store_id] => Ok(Observed {
                id: id.to_string(),
                farm_id: farm_id.to_owned(),
                fleet_id: fleet_id.to_owned(),
                principal_id: principal_id.to_owned(),
                identity_store_id: identity_store_id.to_owned(),
                principal_type: None,
                membership_level: None,
            }),
            members => Err(Error::configuration(
                Operation::Import,
                Self::KIND,
                format!("expected {} members, found {}", ARITY, members.len()),
            )),
        }
    }
}
