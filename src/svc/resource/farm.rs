//! # Farm resource
//!
//! This module provide the farm reconciler. A farm is the root of every
//! other resource of the topology.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::{CreateFarmRequest, Farm, UpdateFarmRequest},
    engine::{self, Context, Error, Kind, Operation},
};

// -----------------------------------------------------------------------------
// Spec structure

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Spec {
    #[serde(rename = "display_name")]
    pub display_name: String,
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[allow(clippy::from_over_into)]
impl Into<CreateFarmRequest> for &Spec {
    fn into(self) -> CreateFarmRequest {
        CreateFarmRequest {
            display_name: self.display_name.to_owned(),
            description: self.description.to_owned(),
        }
    }
}

// -----------------------------------------------------------------------------
// Observed structure

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Observed {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "display_name")]
    pub display_name: String,
    #[serde(rename = "description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<Farm> for Observed {
    fn from(farm: Farm) -> Self {
        Self {
            id: farm.farm_id,
            display_name: farm.display_name,
            description: farm.description,
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

    const KIND: Kind = Kind::Farm;

    fn id(observed: &Observed) -> String {
        observed.id.to_owned()
    }

    fn preview(declared: &Spec) -> Result<Value, Error> {
        let request: CreateFarmRequest = declared.into();
        serde_json::to_value(request).map_err(|err| Error::diff(Self::KIND, err))
    }

    async fn create(ctx: Arc<Context>, declared: &Spec) -> Result<Observed, Error> {
        let request: CreateFarmRequest = declared.into();

        debug!(kind = %Self::KIND, display_name = &declared.display_name, "Create farm");
        let response = ctx
            .client
            .create_farm(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, "", err))?;

        if response.farm_id.is_empty() {
            return Err(Error::empty_identifier(Self::KIND));
        }

        Ok(Observed {
            id: response.farm_id,
            display_name: request.display_name,
            description: request.description,
        })
    }

    async fn read(ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        ctx.client
            .get_farm(&observed.id)
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Read, Self::KIND, &observed.id, err))
    }

    async fn update(ctx: Arc<Context>, declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        let request = UpdateFarmRequest {
            farm_id: observed.id.to_owned(),
            display_name: Some(declared.display_name.to_owned()),
            description: declared.description.to_owned(),
        };

        ctx.client
            .update_farm(&request)
            .await
            .map_err(|err| Error::remote(Operation::Update, Self::KIND, &observed.id, err))?;

        Ok(Observed {
            id: observed.id.to_owned(),
            display_name: declared.display_name.to_owned(),
            description: declared
                .description
                .to_owned()
                .or_else(|| observed.description.to_owned()),
        })
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        ctx.client
            .delete_farm(&observed.id)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    async fn import(ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        ctx.client
            .get_farm(id)
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Import, Self::KIND, id, err))
    }
}
