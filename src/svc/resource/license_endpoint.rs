//! # License endpoint resource
//!
//! This module provide the license endpoint reconciler. The api offers no
//! update operation, any change replaces the endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::{CreateLicenseEndpointRequest, LicenseEndpoint},
    engine::{self, Context, Error, Kind, Operation},
};

// -----------------------------------------------------------------------------
// Spec structure

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Spec {
    #[serde(rename = "vpc_id")]
    pub vpc_id: String,
    #[serde(rename = "subnet_ids")]
    pub subnet_ids: Vec<String>,
    #[serde(rename = "security_group_ids")]
    pub security_group_ids: Vec<String>,
}

#[allow(clippy::from_over_into)]
impl Into<CreateLicenseEndpointRequest> for &Spec {
    fn into(self) -> CreateLicenseEndpointRequest {
        CreateLicenseEndpointRequest {
            vpc_id: self.vpc_id.to_owned(),
            subnet_ids: self.subnet_ids.to_owned(),
            security_group_ids: self.security_group_ids.to_owned(),
        }
    }
}

// -----------------------------------------------------------------------------
// Observed structure

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Observed {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "vpc_id")]
    pub vpc_id: String,
    #[serde(rename = "subnet_ids")]
    pub subnet_ids: Vec<String>,
    #[serde(rename = "security_group_ids")]
    pub security_group_ids: Vec<String>,
    #[serde(rename = "dns_name", default, skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    #[serde(rename = "status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<LicenseEndpoint> for Observed {
    fn from(endpoint: LicenseEndpoint) -> Self {
        Self {
            id: endpoint.license_endpoint_id,
            vpc_id: endpoint.vpc_id,
            subnet_ids: endpoint.subnet_ids,
            security_group_ids: endpoint.security_group_ids,
            dns_name: endpoint.dns_name,
            status: endpoint.status,
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

    const KIND: Kind = Kind::LicenseEndpoint;

    fn id(observed: &Observed) -> String {
        observed.id.to_owned()
    }

    fn immutable() -> &'static [&'static str] {
        &["vpc_id", "subnet_ids", "security_group_ids"]
    }

    fn preview(declared: &Spec) -> Result<Value, Error> {
        let request: CreateLicenseEndpointRequest = declared.into();
        serde_json::to_value(request).map_err(|err| Error::diff(Self::KIND, err))
    }

    async fn create(ctx: Arc<Context>, declared: &Spec) -> Result<Observed, Error> {
        let request: CreateLicenseEndpointRequest = declared.into();

        debug!(kind = %Self::KIND, vpc = &declared.vpc_id, "Create license endpoint");
        let response = ctx
            .client
            .create_license_endpoint(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, "", err))?;

        if response.license_endpoint_id.is_empty() {
            return Err(Error::empty_identifier(Self::KIND));
        }

        // dns name and status are only known once the endpoint is read
        Ok(Observed {
            id: response.license_endpoint_id,
            vpc_id: request.vpc_id,
            subnet_ids: request.subnet_ids,
            security_group_ids: request.security_group_ids,
            dns_name: None,
            status: None,
        })
    }

    async fn read(ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        ctx.client
            .get_license_endpoint(&observed.id)
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Read, Self::KIND, &observed.id, err))
    }

    async fn update(_ctx: Arc<Context>, _declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        Err(Error::replacement(
            Self::KIND,
            &observed.id,
            "license endpoint cannot be modified in place",
        ))
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        ctx.client
            .delete_license_endpoint(&observed.id)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    async fn import(ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        ctx.client
            .get_license_endpoint(id)
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Import, Self::KIND, id, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svc::{
        cfg::Configuration,
        deadline::memory::Memory,
        engine::{Plan, Reconciler as _},
    };

    fn context() -> (Arc<Memory>, Arc<Context>) {
        let memory = Arc::new(Memory::default());
        let ctx = Context::new(memory.to_owned(), Arc::new(Configuration::default()));

        (memory, Arc::new(ctx))
    }

    fn spec() -> Spec {
        Spec {
            vpc_id: "vpc-1".to_string(),
            subnet_ids: vec!["subnet-1".to_string()],
            security_group_ids: vec!["sg-1".to_string()],
        }
    }

    #[tokio::test]
    async fn read_exposes_dns_name() {
        let (_, ctx) = context();

        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("license endpoint to be created");
        assert_eq!(None, created.dns_name);

        let read = Reconciler::read(ctx, &created)
            .await
            .expect("license endpoint to be read");
        assert_eq!(Some("le-1.deadline.internal".to_string()), read.dns_name);
        assert_eq!(Ok(Plan::NoOp), Reconciler::plan(&spec(), &read));
    }

    #[tokio::test]
    async fn any_change_is_a_replacement() {
        let (memory, ctx) = context();
        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("license endpoint to be created");

        let mut declared = spec();
        declared.subnet_ids.push("subnet-2".to_string());
        assert_eq!(
            Ok(Plan::Replace {
                fields: vec!["subnet_ids".to_string()]
            }),
            Reconciler::plan(&declared, &created)
        );

        memory.reset_calls();
        assert!(matches!(
            Reconciler::update(ctx, &declared, &created).await,
            Err(Error::ReplacementRequired { .. })
        ));
        assert!(memory.calls().is_empty());
    }
}
