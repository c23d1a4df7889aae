//! # Membership association resource
//!
//! This module provide the farm membership reconciler. The api assigns no
//! identifier to a membership, the local identifier is synthesized from the
//! farm, the principal and the identity store.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::{
        AssociateMemberToFarmRequest, DisassociateMemberFromFarmRequest, MembershipLevel,
        PrincipalType,
    },
    engine::{self, Context, Error, Kind, Operation, Plan},
    identity::AssociationKey,
    translate,
};

pub const ARITY: usize = 3;

// -----------------------------------------------------------------------------
// Spec structure

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Spec {
    #[serde(rename = "farm_id")]
    pub farm_id: String,
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
            self.principal_id.as_str(),
            self.identity_store_id.as_str(),
        ])
    }

    fn request(&self) -> Result<AssociateMemberToFarmRequest, translate::Error> {
        Ok(AssociateMemberToFarmRequest {
            farm_id: self.farm_id.to_owned(),
            principal_id: self.principal_id.to_owned(),
            identity_store_id: self.identity_store_id.to_owned(),
            principal_type: translate::membership::principal_type(&self.principal_type)?,
            membership_level: translate::membership::membership_level(&self.membership_level)?,
        })
    }
}

// -----------------------------------------------------------------------------
// Observed structure

/// principal type and membership level are unknown after an import, the api
/// does not expose them
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Observed {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "farm_id")]
    pub farm_id: String,
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

    const KIND: Kind = Kind::MembershipAssociation;
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

    fn plan(declared: &Spec, observed: &Observed) -> Result<Plan, Error> {
        let mut fields = vec![];
        if declared.farm_id != observed.farm_id {
            fields.push("farm_id".to_string());
        }
        if declared.identity_store_id != observed.identity_store_id {
            fields.push("identity_store_id".to_string());
        }
        if let Some(level) = observed.membership_level {
            if declared.membership_level != level.to_string() {
                fields.push("membership_level".to_string());
            }
        }
        if declared.principal_id != observed.principal_id {
            fields.push("principal_id".to_string());
        }
        if let Some(kind) = observed.principal_type {
            if declared.principal_type != kind.to_string() {
                fields.push("principal_type".to_string());
            }
        }

        if fields.is_empty() {
            return Ok(Plan::NoOp);
        }

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

        debug!(kind = %Self::KIND, id = &id, level = %request.membership_level, "Associate member to farm");
        ctx.client
            .associate_member_to_farm(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, &id, err))?;

        Ok(Observed {
            id,
            farm_id: request.farm_id,
            principal_id: request.principal_id,
            identity_store_id: request.identity_store_id,
            principal_type: Some(request.principal_type),
            membership_level: Some(request.membership_level),
        })
    }

    /// the api offers no way to read a membership back
    async fn read(_ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        Ok(observed.to_owned())
    }

    async fn update(_ctx: Arc<Context>, _declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        Err(Error::replacement(
            Self::KIND,
            &observed.id,
            "membership cannot be modified in place",
        ))
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        let request = DisassociateMemberFromFarmRequest {
            farm_id: observed.farm_id.to_owned(),
            principal_id: observed.principal_id.to_owned(),
            identity_store_id: observed.identity_store_id.to_owned(),
        };

        debug!(kind = %Self::KIND, id = &observed.id, "Disassociate member from farm");
        ctx.client
            .disassociate_member_from_farm(&request)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    /// the identifier is the synthesized one, `<farm_id>-<principal_id>-<identity_store_id>`
    async fn import(_ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        let key = AssociationKey::decompose(id, ARITY)
            .map_err(|err| Error::configuration(Operation::Import, Self::KIND, err))?;

        match key.members() {
            [farm_id, principal_id, identity_store_id] => Ok(Observed {
                id: id.to_string(),
                farm_id: farm_id.to_owned(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svc::{
        cfg::Configuration,
        deadline::{self, memory::Memory},
        engine::Reconciler as _,
    };

    fn context() -> (Arc<Memory>, Arc<Context>) {
        let memory = Arc::new(Memory::default());
        let ctx = Context::new(memory.to_owned(), Arc::new(Configuration::default()));

        (memory, Arc::new(ctx))
    }

    fn spec() -> Spec {
        Spec {
            farm_id: "f-1".to_string(),
            principal_id: "p-1".to_string(),
            identity_store_id: "d-1".to_string(),
            principal_type: "USER".to_string(),
            membership_level: "VIEWER".to_string(),
        }
    }

    #[tokio::test]
    async fn create_synthesizes_identifier() {
        let (memory, ctx) = context();

        let created = Reconciler::create(ctx, &spec())
            .await
            .expect("membership to be created");

        assert_eq!("f-1-p-1-d-1", created.id);
        assert_eq!(Some(MembershipLevel::Viewer), created.membership_level);
        assert!(memory.farm_members().contains(&(
            "f-1".to_string(),
            "p-1".to_string(),
            "d-1".to_string()
        )));
    }

    #[tokio::test]
    async fn create_rejects_invalid_level_before_any_call() {
        let (memory, ctx) = context();
        let mut declared = spec();
        declared.membership_level = "ADMIN".to_string();

        assert!(matches!(
            Reconciler::create(ctx, &declared).await,
            Err(Error::Configuration { .. })
        ));
        assert!(memory.calls().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_empty_member() {
        let (memory, ctx) = context();
        let mut declared = spec();
        declared.principal_id = String::new();

        assert!(matches!(
            Reconciler::create(ctx, &declared).await,
            Err(Error::Configuration { message, .. }) if message.contains("position 1")
        ));
        assert!(memory.calls().is_empty());
    }

    #[tokio::test]
    async fn read_returns_cached_record() {
        let (memory, ctx) = context();
        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("membership to be created");

        memory.reset_calls();
        let read = Reconciler::read(ctx, &created).await;

        assert_eq!(Ok(created), read);
        assert!(memory.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_sends_every_member() {
        let (memory, ctx) = context();
        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("membership to be created");

        Reconciler::delete(ctx.to_owned(), &created)
            .await
            .expect("membership to be deleted");
        assert!(memory.farm_members().is_empty());

        memory.fail(
            "disassociate_member_from_farm",
            deadline::Error::Provider("access denied".to_string()),
        );
        assert!(matches!(
            Reconciler::delete(ctx, &created).await,
            Err(Error::RemoteCall { id, .. }) if id == "f-1-p-1-d-1"
        ));
    }

    #[tokio::test]
    async fn import_decomposes_identifier() {
        let (_, ctx) = context();

        let imported = Reconciler::import(ctx.to_owned(), "farm1-user1-store1")
            .await
            .expect("membership to be imported");
        assert_eq!("user1", imported.principal_id);
        assert_eq!(None, imported.membership_level);

        let mut declared = spec();
        declared.farm_id = "farm1".to_string();
        declared.principal_id = "user1".to_string();
        declared.identity_store_id = "store1".to_string();
        assert_eq!(Ok(Plan::NoOp), Reconciler::plan(&declared, &imported));

        assert!(matches!(
            Reconciler::import(ctx, "f-1-p-1-d-1").await,
            Err(Error::Configuration { operation: Operation::Import, .. })
        ));
    }

    #[test]
    fn any_change_is_a_replacement() {
        let observed = Observed {
            id: "f-1-p-1-d-1".to_string(),
            farm_id: "f-1".to_string(),
            principal_id: "p-1".to_string(),
            identity_store_id: "d-1".to_string(),
            principal_type: Some(PrincipalType::User),
            membership_level: Some(MembershipLevel::Viewer),
        };
        assert_eq!(Ok(Plan::NoOp), Reconciler::plan(&spec(), &observed));

        let mut declared = spec();
        declared.membership_level = "OWNER".to_string();
        assert_eq!(
            Ok(Plan::Replace {
                fields: vec!["membership_level".to_string()]
            }),
            Reconciler::plan(&declared, &observed)
        );
    }
}
