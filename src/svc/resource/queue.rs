//! # Queue resource
//!
//! This module provide the queue reconciler.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::{
        CreateQueueRequest, DefaultQueueBudgetAction, DeleteQueueRequest, JobAttachmentSettings,
        JobRunAsUser, Queue, UpdateQueueRequest,
    },
    engine::{self, prune, Context, Error, Kind, Operation},
    resource::split_import_id,
    translate::{
        self, changes,
        queue::{JobAttachmentSettingsBlock, JobRunAsUserBlock},
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
    #[serde(rename = "role_arn", default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(
        rename = "default_budget_action",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_budget_action: Option<String>,
    #[serde(
        rename = "job_attachment_settings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub job_attachment_settings: Option<JobAttachmentSettingsBlock>,
    #[serde(rename = "job_run_as_user", default, skip_serializing_if = "Option::is_none")]
    pub job_run_as_user: Option<JobRunAsUserBlock>,
    #[serde(
        rename = "allowed_storage_profile_ids",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_storage_profile_ids: Option<Vec<String>>,
    #[serde(
        rename = "required_file_system_location_names",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub required_file_system_location_names: Option<Vec<String>>,
}

/// translated blocks of a queue declaration
struct Translated {
    default_budget_action: Option<DefaultQueueBudgetAction>,
    job_attachment_settings: Option<JobAttachmentSettings>,
    job_run_as_user: Option<JobRunAsUser>,
}

impl Spec {
    fn translate(&self) -> Result<Translated, translate::Error> {
        Ok(Translated {
            default_budget_action: translate::queue::default_budget_action(
                self.default_budget_action.as_ref(),
            )?,
            job_attachment_settings: translate::queue::job_attachment_settings(
                self.job_attachment_settings.as_ref(),
            ),
            job_run_as_user: translate::queue::job_run_as_user(self.job_run_as_user.as_ref())?,
        })
    }

    fn request(&self) -> Result<CreateQueueRequest, translate::Error> {
        let translated = self.translate()?;

        Ok(CreateQueueRequest {
            farm_id: self.farm_id.to_owned(),
            display_name: self.display_name.to_owned(),
            description: self.description.to_owned(),
            role_arn: self.role_arn.to_owned(),
            default_budget_action: translated.default_budget_action,
            job_attachment_settings: translated.job_attachment_settings,
            job_run_as_user: translated.job_run_as_user,
            allowed_storage_profile_ids: self.allowed_storage_profile_ids.to_owned().unwrap_or_default(),
            required_file_system_location_names: self
                .required_file_system_location_names
                .to_owned()
                .unwrap_or_default(),
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
    #[serde(rename = "role_arn", default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(
        rename = "default_budget_action",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_budget_action: Option<DefaultQueueBudgetAction>,
    #[serde(
        rename = "job_attachment_settings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub job_attachment_settings: Option<JobAttachmentSettings>,
    #[serde(rename = "job_run_as_user", default, skip_serializing_if = "Option::is_none")]
    pub job_run_as_user: Option<JobRunAsUser>,
    #[serde(rename = "allowed_storage_profile_ids", default)]
    pub allowed_storage_profile_ids: Vec<String>,
    #[serde(rename = "required_file_system_location_names", default)]
    pub required_file_system_location_names: Vec<String>,
    #[serde(rename = "status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<Queue> for Observed {
    fn from(queue: Queue) -> Self {
        Self {
            id: queue.queue_id,
            farm_id: queue.farm_id,
            display_name: queue.display_name,
            description: queue.description,
            role_arn: queue.role_arn,
            default_budget_action: queue.default_budget_action,
            job_attachment_settings: queue.job_attachment_settings,
            job_run_as_user: queue.job_run_as_user,
            allowed_storage_profile_ids: queue.allowed_storage_profile_ids,
            required_file_system_location_names: queue.required_file_system_location_names,
            status: queue.status,
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

    const KIND: Kind = Kind::Queue;

    fn id(observed: &Observed) -> String {
        observed.id.to_owned()
    }

    fn immutable() -> &'static [&'static str] {
        &["farm_id"]
    }

    fn desired(declared: &Spec) -> Result<Value, Error> {
        let translated = declared
            .translate()
            .map_err(|err| Error::configuration(Operation::Update, Self::KIND, err))?;

        let mut desired = serde_json::to_value(declared)
            .map(prune)
            .map_err(|err| Error::diff(Self::KIND, err))?;

        desired["default_budget_action"] = serde_json::to_value(translated.default_budget_action)
            .map_err(|err| Error::diff(Self::KIND, err))?;
        desired["job_attachment_settings"] = serde_json::to_value(translated.job_attachment_settings)
            .map_err(|err| Error::diff(Self::KIND, err))?;
        desired["job_run_as_user"] = serde_json::to_value(translated.job_run_as_user)
            .map_err(|err| Error::diff(Self::KIND, err))?;

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

        debug!(kind = %Self::KIND, farm = &declared.farm_id, display_name = &declared.display_name, "Create queue");
        let response = ctx
            .client
            .create_queue(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, "", err))?;

        if response.queue_id.is_empty() {
            return Err(Error::empty_identifier(Self::KIND));
        }

        Ok(Observed {
            id: response.queue_id,
            farm_id: request.farm_id,
            display_name: request.display_name,
            description: request.description,
            role_arn: request.role_arn,
            default_budget_action: request.default_budget_action,
            job_attachment_settings: request.job_attachment_settings,
            job_run_as_user: request.job_run_as_user,
            allowed_storage_profile_ids: request.allowed_storage_profile_ids,
            required_file_system_location_names: request.required_file_system_location_names,
            status: None,
        })
    }

    async fn read(ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        ctx.client
            .get_queue(&observed.farm_id, &observed.id)
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Read, Self::KIND, &observed.id, err))
    }

    async fn update(ctx: Arc<Context>, declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        if declared.farm_id != observed.farm_id {
            return Err(Error::replacement(
                Self::KIND,
                &observed.id,
                "queue cannot be moved to another farm",
            ));
        }

        let translated = declared
            .translate()
            .map_err(|err| Error::configuration(Operation::Update, Self::KIND, err))?;

        let (profiles_to_add, profiles_to_remove) = match &declared.allowed_storage_profile_ids {
            Some(ids) => changes(&observed.allowed_storage_profile_ids, ids),
            None => (vec![], vec![]),
        };

        let (locations_to_add, locations_to_remove) =
            match &declared.required_file_system_location_names {
                Some(names) => changes(&observed.required_file_system_location_names, names),
                None => (vec![], vec![]),
            };

        let request = UpdateQueueRequest {
            farm_id: observed.farm_id.to_owned(),
            queue_id: observed.id.to_owned(),
            display_name: Some(declared.display_name.to_owned()),
            description: declared.description.to_owned(),
            role_arn: declared.role_arn.to_owned(),
            default_budget_action: translated.default_budget_action,
            job_attachment_settings: translated.job_attachment_settings.to_owned(),
            job_run_as_user: translated.job_run_as_user.to_owned(),
            allowed_storage_profile_ids_to_add: profiles_to_add,
            allowed_storage_profile_ids_to_remove: profiles_to_remove,
            required_file_system_location_names_to_add: locations_to_add,
            required_file_system_location_names_to_remove: locations_to_remove,
        };

        ctx.client
            .update_queue(&request)
            .await
            .map_err(|err| Error::remote(Operation::Update, Self::KIND, &observed.id, err))?;

        Ok(Observed {
            id: observed.id.to_owned(),
            farm_id: observed.farm_id.to_owned(),
            display_name: declared.display_name.to_owned(),
            description: request.description.or_else(|| observed.description.to_owned()),
            role_arn: request.role_arn.or_else(|| observed.role_arn.to_owned()),
            default_budget_action: translated
                .default_budget_action
                .or(observed.default_budget_action),
            job_attachment_settings: translated
                .job_attachment_settings
                .or_else(|| observed.job_attachment_settings.to_owned()),
            job_run_as_user: translated
                .job_run_as_user
                .or_else(|| observed.job_run_as_user.to_owned()),
            allowed_storage_profile_ids: declared
                .allowed_storage_profile_ids
                .to_owned()
                .unwrap_or_else(|| observed.allowed_storage_profile_ids.to_owned()),
            required_file_system_location_names: declared
                .required_file_system_location_names
                .to_owned()
                .unwrap_or_else(|| observed.required_file_system_location_names.to_owned()),
            status: observed.status.to_owned(),
        })
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        let request = DeleteQueueRequest {
            farm_id: observed.farm_id.to_owned(),
            queue_id: observed.id.to_owned(),
        };

        ctx.client
            .delete_queue(&request)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    /// the identifier is `<farm_id>/<queue_id>`
    async fn import(ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        let members = split_import_id(id, 2).ok_or_else(|| {
            Error::configuration(
                Operation::Import,
                Self::KIND,
                format!("identifier '{}' must be formatted as '<farm_id>/<queue_id>'", id),
            )
        })?;

        ctx.client
            .get_queue(&members[0], &members[1])
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Import, Self::KIND, id, err))
    }
}
