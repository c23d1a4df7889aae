//! # Storage profile resource
//!
//! This module provide the storage profile reconciler. File system locations
//! cannot be modified in place, changing them replaces the profile.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::{
        CreateStorageProfileRequest, DeleteStorageProfileRequest, FileSystemLocation,
        StorageProfile, StorageProfileOperatingSystemFamily, UpdateStorageProfileRequest,
    },
    engine::{self, prune, Context, Error, Kind, Operation},
    resource::split_import_id,
    translate::{
        self,
        storage::{resolve_os_family, FileSystemLocationBlock},
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
    #[serde(rename = "os_family", default, skip_serializing_if = "Option::is_none")]
    pub os_family: Option<String>,
    #[serde(rename = "file_system_locations", default)]
    pub file_system_locations: Vec<FileSystemLocationBlock>,
}

impl Spec {
    fn request(&self) -> Result<CreateStorageProfileRequest, translate::Error> {
        Ok(CreateStorageProfileRequest {
            farm_id: self.farm_id.to_owned(),
            display_name: self.display_name.to_owned(),
            os_family: resolve_os_family(self.os_family.as_deref()),
            file_system_locations: translate::storage::file_system_locations(
                &self.file_system_locations,
            )?,
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
    #[serde(rename = "os_family")]
    pub os_family: StorageProfileOperatingSystemFamily,
    #[serde(rename = "file_system_locations")]
    pub file_system_locations: Vec<FileSystemLocation>,
}

impl From<StorageProfile> for Observed {
    fn from(profile: StorageProfile) -> Self {
        Self {
            id: profile.storage_profile_id,
            farm_id: profile.farm_id,
            display_name: profile.display_name,
            os_family: profile.os_family,
            file_system_locations: profile.file_system_locations,
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

    const KIND: Kind = Kind::StorageProfile;

    fn id(observed: &Observed) -> String {
        observed.id.to_owned()
    }

    fn immutable() -> &'static [&'static str] {
        &["farm_id", "file_system_locations"]
    }

    fn desired(declared: &Spec) -> Result<Value, Error> {
        let request = declared
            .request()
            .map_err(|err| Error::configuration(Operation::Update, Self::KIND, err))?;

        let desired = serde_json::json!({
            "farm_id": request.farm_id,
            "display_name": request.display_name,
            "os_family": request.os_family,
            "file_system_locations": request.file_system_locations,
        });

        Ok(prune(desired))
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

        debug!(kind = %Self::KIND, farm = &declared.farm_id, locations = request.file_system_locations.len(), "Create storage profile");
        let response = ctx
            .client
            .create_storage_profile(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, "", err))?;

        if response.storage_profile_id.is_empty() {
            return Err(Error::empty_identifier(Self::KIND));
        }

        Ok(Observed {
            id: response.storage_profile_id,
            farm_id: request.farm_id,
            display_name: request.display_name,
            os_family: request.os_family,
            file_system_locations: request.file_system_locations,
        })
    }

    async fn read(ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        ctx.client
            .get_storage_profile(&observed.farm_id, &observed.id)
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Read, Self::KIND, &observed.id, err))
    }

    async fn update(ctx: Arc<Context>, declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        let desired = declared
            .request()
            .map_err(|err| Error::configuration(Operation::Update, Self::KIND, err))?;

        if desired.farm_id != observed.farm_id {
            return Err(Error::replacement(
                Self::KIND,
                &observed.id,
                "storage profile cannot be moved to another farm",
            ));
        }

        if desired.file_system_locations != observed.file_system_locations {
            return Err(Error::replacement(
                Self::KIND,
                &observed.id,
                "file system locations cannot be modified in place",
            ));
        }

        let request = UpdateStorageProfileRequest {
            farm_id: observed.farm_id.to_owned(),
            storage_profile_id: observed.id.to_owned(),
            display_name: Some(desired.display_name.to_owned()),
            os_family: Some(desired.os_family),
        };

        ctx.client
            .update_storage_profile(&request)
            .await
            .map_err(|err| Error::remote(Operation::Update, Self::KIND, &observed.id, err))?;

        Ok(Observed {
            id: observed.id.to_owned(),
            farm_id: observed.farm_id.to_owned(),
            display_name: desired.display_name,
            os_family: desired.os_family,
            file_system_locations: observed.file_system_locations.to_owned(),
        })
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        let request = DeleteStorageProfileRequest {
            farm_id: observed.farm_id.to_owned(),
            storage_profile_id: observed.id.to_owned(),
        };

        ctx.client
            .delete_storage_profile(&request)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    /// the identifier is `<farm_id>/<storage_profile_id>`
    async fn import(ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        let members = split_import_id(id, 2).ok_or_else(|| {
            Error::configuration(
                Operation::Import,
                Self::KIND,
                format!(
                    "identifier '{}' must be formatted as '<farm_id>/<storage_profile_id>'",
                    id
                ),
            )
        })?;

        ctx.client
            .get_storage_profile(&members[0], &members[1])
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
        deadline::{memory::Memory, model::FileSystemLocationType},
        engine::{Plan, Reconciler as _},
    };

    fn context() -> (Arc<Memory>, Arc<Context>) {
        let memory = Arc::new(Memory::default());
        let ctx = Context::new(memory.to_owned(), Arc::new(Configuration::default()));

        (memory, Arc::new(ctx))
    }

    fn location(name: &str, kind: &str) -> FileSystemLocationBlock {
        FileSystemLocationBlock {
            name: name.to_string(),
            path: format!("/mnt/{}", name),
            kind: kind.to_string(),
        }
    }

    fn spec() -> Spec {
        Spec {
            farm_id: "farm-1".to_string(),
            display_name: "linux workers".to_string(),
            os_family: Some("linux".to_string()),
            file_system_locations: vec![location("assets", "shared")],
        }
    }

    #[tokio::test]
    async fn create_translates_locations() {
        let (_, ctx) = context();

        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("storage profile to be created");
        assert_eq!(StorageProfileOperatingSystemFamily::Linux, created.os_family);
        assert_eq!(
            vec![FileSystemLocation {
                name: "assets".to_string(),
                path: "/mnt/assets".to_string(),
                kind: FileSystemLocationType::Shared,
            }],
            created.file_system_locations
        );

        let read = Reconciler::read(ctx, &created)
            .await
            .expect("storage profile to be read");
        assert_eq!(created, read);
        assert_eq!(Ok(Plan::NoOp), Reconciler::plan(&spec(), &read));
    }

    #[tokio::test]
    async fn create_requires_a_location() {
        let (memory, ctx) = context();
        let mut declared = spec();
        declared.file_system_locations = vec![];

        assert!(matches!(
            Reconciler::create(ctx, &declared).await,
            Err(Error::Configuration { operation: Operation::Create, .. })
        ));
        assert!(memory.calls().is_empty());
    }

    #[tokio::test]
    async fn update_renames_in_place() {
        let (_, ctx) = context();
        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("storage profile to be created");

        let mut declared = spec();
        declared.display_name = "render nodes".to_string();
        assert_eq!(
            Ok(Plan::Update {
                fields: vec!["display_name".to_string()]
            }),
            Reconciler::plan(&declared, &created)
        );

        let updated = Reconciler::update(ctx.to_owned(), &declared, &created)
            .await
            .expect("storage profile to be updated");
        let read = Reconciler::read(ctx, &updated)
            .await
            .expect("storage profile to be read");
        assert_eq!(updated, read);
    }

    #[tokio::test]
    async fn location_change_requires_replacement() {
        let (_, ctx) = context();
        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("storage profile to be created");

        let mut declared = spec();
        declared.file_system_locations.push(location("cache", "local"));
        assert_eq!(
            Ok(Plan::Replace {
                fields: vec!["file_system_locations".to_string()]
            }),
            Reconciler::plan(&declared, &created)
        );

        assert!(matches!(
            Reconciler::update(ctx, &declared, &created).await,
            Err(Error::ReplacementRequired { .. })
        ));
    }
}
