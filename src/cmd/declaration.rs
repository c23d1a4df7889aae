//! # Declaration module
//!
//! This module provides the command line interface validating a file of
//! resource declarations and printing what would be sent to the api, without
//! any remote call

use std::{io, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use clap::Subcommand;
use tracing::{debug, info};

use crate::{
    cmd::Executor,
    svc::{
        cfg::Configuration,
        engine::{self, Preview},
        resource::DeclaredResource,
    },
};

// -----------------------------------------------------------------------------
// Error enum

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read declarations from '{0:?}', {1}")]
    Read(PathBuf, io::Error),
    #[error("failed to parse declarations from '{0:?}', {1}")]
    Parse(PathBuf, serde_yaml::Error),
    #[error("failed to translate declaration at position {0}, {1}")]
    Translate(usize, engine::Error),
    #[error("failed to serialize translated requests, {0}")]
    Serialize(serde_yaml::Error),
}

// -----------------------------------------------------------------------------
// Declaration enum

#[derive(Subcommand, Clone, Debug)]
pub enum Declaration {
    /// Translate declarations into the requests sent to create them
    #[clap(name = "translate", aliases = &["t"])]
    Translate {
        #[clap(name = "file")]
        file: PathBuf,
    },
}

#[async_trait]
impl Executor for Declaration {
    type Error = Error;

    #[cfg_attr(feature = "trace", tracing::instrument(skip(config)))]
    async fn execute(&self, config: Arc<Configuration>) -> Result<(), Self::Error> {
        match self {
            Self::Translate { file } => translate(config, file).await,
        }
    }
}

// -----------------------------------------------------------------------------
// helpers

/// parses a yaml list of declarations
pub fn parse(path: &PathBuf, content: &str) -> Result<Vec<DeclaredResource>, Error> {
    serde_yaml::from_str(content).map_err(|err| Error::Parse(path.to_owned(), err))
}

/// returns the preview of every declaration, stops at the first invalid one
pub fn previews(declarations: &[DeclaredResource]) -> Result<Vec<Preview>, Error> {
    declarations
        .iter()
        .enumerate()
        .map(|(idx, declared)| {
            debug!(kind = %declared.kind(), position = idx, "Translate declaration");
            engine::preview(declared).map_err(|err| Error::Translate(idx, err))
        })
        .collect()
}

// -----------------------------------------------------------------------------
// translate function

#[cfg_attr(feature = "trace", tracing::instrument(skip(_config)))]
pub async fn translate(_config: Arc<Configuration>, file: &PathBuf) -> Result<(), Error> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|err| Error::Read(file.to_owned(), err))?;

    let declarations = parse(file, &content)?;
    let previews = previews(&declarations)?;

    info!(count = previews.len(), "Translated declarations");
    print!(
        "{}",
        serde_yaml::to_string(&previews).map_err(Error::Serialize)?
    );

    Ok(())
}
