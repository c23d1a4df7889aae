//! # Fleet resource
//!
//! This module provide the fleet reconciler. The capacity configuration is
//! translated into the api configuration union before every mutating call,
//! and plans compare the translated configuration with the remote one.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::{
        CreateFleetRequest, DeleteFleetRequest, Fleet, FleetConfiguration as ApiFleetConfiguration,
        UpdateFleetRequest,
    },
    engine::{self, prune, Context, Error, Kind, Operation},
    resource::split_import_id,
    translate::{
        self,
        fleet::{ConfigurationBlock, FleetConfiguration},
    },
};

// -----------------------------------------------------------------------------
// Spec structure

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Spec {
    #[serde(rename = "farm_id")]
    pub farm_id: String,
    #[serde(rename = "display_name")]
    pub display_name: String,
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "role_arn")]
    pub role_arn: String,
    #[serde(rename = "min_worker_count", default)]
    pub min_worker_count: i32,
    #[serde(rename = "max_worker_count")]
    pub max_worker_count: i32,
    #[schemars(with = "Option<ConfigurationBlock>")]
    #[serde(rename = "configuration", default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<FleetConfiguration>,
}

impl Spec {
    fn request(&self) -> Result<CreateFleetRequest, translate::Error> {
        Ok(CreateFleetRequest {
            farm_id: self.farm_id.to_owned(),
            display_name: self.display_name.to_owned(),
            description: self.description.to_owned(),
            role_arn: self.role_arn.to_owned(),
            min_worker_count: self.min_worker_count,
            max_worker_count: self.max_worker_count,
            configuration: translate::fleet::translate(self.configuration.as_ref())?,
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
    #[serde(rename = "display_name")]
    pub display_name: String,
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "role_arn")]
    pub role_arn: String,
    #[serde(rename = "min_worker_count")]
    pub min_worker_count: i32,
    #[serde(rename = "max_worker_count")]
    pub max_worker_count: i32,
    #[serde(rename = "configuration")]
    pub configuration: ApiFleetConfiguration,
    #[serde(rename = "status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<Fleet> for Observed {
    fn from(fleet: Fleet) -> Self {
        Self {
            id: fleet.fleet_id,
            farm_id: fleet.farm_id,
            display_name: fleet.display_name,
            description: fleet.description,
            role_arn: fleet.role_arn,
            min_worker_count: fleet.min_worker_count,
            max_worker_count: fleet.max_worker_count,
            configuration: fleet.configuration,
            status: fleet.status,
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

    const KIND: Kind = Kind::Fleet;

    fn id(observed: &Observed) -> String {
        observed.id.to_owned()
    }

    fn immutable() -> &'static [&'static str] {
        &["farm_id"]
    }

    fn desired(declared: &Spec) -> Result<Value, Error> {
        let mut desired = serde_json::to_value(declared)
            .map(prune)
            .map_err(|err| Error::diff(Self::KIND, err))?;

        if let Some(configuration) = &declared.configuration {
            let configuration = translate::fleet::translate(Some(configuration))
                .map_err(|err| Error::configuration(Operation::Update, Self::KIND, err))?;

            desired["configuration"] =
                serde_json::to_value(configuration).map_err(|err| Error::diff(Self::KIND, err))?;
        }

        Ok(desired)
    }

    fn preview(declared: &Spec) -> Result<Value, Error> {
        let request = declared
            .request()
            .map_err(|err| Error::configuration(Operation::Create, Self::KIND, err))?;

        serde_json::to_value(request).map_err(|err| Error::diff(Self::KIND, err))
    }

    async fn create(ctx: Arc<Context>, declared: &Spec) -> Result<Observed, Error> {
        let request = declared
            .request()
            .map_err(|err| Error::configuration(Operation::Create, Self::KIND, err))?;

        debug!(kind = %Self::KIND, farm = &declared.farm_id, display_name = &declared.display_name, "Create fleet");
        let response = ctx
            .client
            .create_fleet(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, "", err))?;

        if response.fleet_id.is_empty() {
            return Err(Error::empty_identifier(Self::KIND));
        }

        Ok(Observed {
            id: response.fleet_id,
            farm_id: request.farm_id,
            display_name: request.display_name,
            description: request.description,
            role_arn: request.role_arn,
            min_worker_count: request.min_worker_count,
            max_worker_count: request.max_worker_count,
            configuration: request.configuration,
            status: None,
        })
    }

    async fn read(ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        ctx.client
            .get_fleet(&observed.farm_id, &observed.id)
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Read, Self::KIND, &observed.id, err))
    }

    async fn update(ctx: Arc<Context>, declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        if declared.farm_id != observed.farm_id {
            return Err(Error::replacement(
                Self::KIND,
                &observed.id,
                "fleet cannot be moved to another farm",
            ));
        }

        let configuration = match &declared.configuration {
            Some(configuration) => Some(
                translate::fleet::translate(Some(configuration))
                    .map_err(|err| Error::configuration(Operation::Update, Self::KIND, err))?,
            ),
            None => None,
        };

        let request = UpdateFleetRequest {
            farm_id: observed.farm_id.to_owned(),
            fleet_id: observed.id.to_owned(),
            display_name: Some(declared.display_name.to_owned()),
            description: declared.description.to_owned(),
            role_arn: Some(declared.role_arn.to_owned()),
            min_worker_count: Some(declared.min_worker_count),
            max_worker_count: Some(declared.max_worker_count),
            configuration: configuration.to_owned(),
        };

        ctx.client
            .update_fleet(&request)
            .await
            .map_err(|err| Error::remote(Operation::Update, Self::KIND, &observed.id, err))?;

        Ok(Observed {
            id: observed.id.to_owned(),
            farm_id: observed.farm_id.to_owned(),
            display_name: declared.display_name.to_owned(),
            description: declared
                .description
                .to_owned()
                .or_else(|| observed.description.to_owned()),
            role_arn: declared.role_arn.to_owned(),
            min_worker_count: declared.min_worker_count,
            max_worker_count: declared.max_worker_count,
            configuration: configuration.unwrap_or_else(|| observed.configuration.to_owned()),
            status: observed.status.to_owned(),
        })
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        let request = DeleteFleetRequest {
            farm_id: observed.farm_id.to_owned(),
            fleet_id: observed.id.to_owned(),
        };

        ctx.client
            .delete_fleet(&request)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    /// the identifier is `<farm_id>/<fleet_id>`
    async fn import(ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        let members = split_import_id(id, 2).ok_or_else(|| {
            Error::configuration(
                Operation::Import,
                Self::KIND,
                format!("identifier '{}' must be formatted as '<farm_id>/<fleet_id>'", id),
            )
        })?;

        ctx.client
            .get_fleet(&members[0], &members[1])
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Import, Self::KIND, id, err))
    }
}
