//! # Schema module
//!
//! This module provides the command line interface printing the json schema of
//! resource declarations

use std::sync::Arc;

use async_trait::async_trait;
use clap::Subcommand;
use schemars::{schema::RootSchema, schema_for};

use crate::{
    cmd::Executor,
    svc::{
        cfg::Configuration,
        engine::{Kind, Reconciler},
        resource::{on_kind, DeclaredResource},
    },
};

// -----------------------------------------------------------------------------
// Error enum

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to serialize schema, {0}")]
    Serialize(serde_yaml::Error),
}

// -----------------------------------------------------------------------------
// Schema enum

#[derive(Subcommand, Clone, Debug)]
pub enum Schema {
    /// View the schema of declarations, all kinds are combined if none is given
    #[clap(name = "view", aliases = &["v"])]
    View {
        #[clap(name = "kind")]
        kind: Option<Kind>,
    },
}

#[async_trait]
impl Executor for Schema {
    type Error = Error;

    #[cfg_attr(feature = "trace", tracing::instrument(skip(config)))]
    async fn execute(&self, config: Arc<Configuration>) -> Result<(), Self::Error> {
        match self {
            Self::View { kind } => view(config, kind).await,
        }
    }
}

// -----------------------------------------------------------------------------
// helpers

pub fn schema(kind: &Option<Kind>) -> RootSchema {
    match kind {
        Some(kind) => on_kind!(kind, R => schema_for!(<R as Reconciler>::Declared)),
        None => schema_for!(DeclaredResource),
    }
}

// -----------------------------------------------------------------------------
// view function

#[cfg_attr(feature = "trace", tracing::instrument(skip(_config)))]
pub async fn view(_config: Arc<Configuration>, kind: &Option<Kind>) -> Result<(), Error> {
    let schema = serde_yaml::to_string(&schema(kind)).map_err(Error::Serialize)?;

    print!("{}", schema);
    Ok(())
}
