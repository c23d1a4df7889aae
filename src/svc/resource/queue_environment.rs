//! # Queue environment resource
//!
//! This module provide the queue environment reconciler. The environment
//! name is assigned by the api from the template.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::svc::{
    deadline::model::{
        CreateQueueEnvironmentRequest, DeleteQueueEnvironmentRequest, EnvironmentTemplateType,
        QueueEnvironment, UpdateQueueEnvironmentRequest,
    },
    engine::{self, prune, Context, Error, Kind, Operation},
    resource::split_import_id,
    translate::queue::resolve_template_type,
};

// -----------------------------------------------------------------------------
// Spec structure

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Spec {
    #[serde(rename = "farm_id")]
    pub farm_id: String,
    #[serde(rename = "queue_id")]
    pub queue_id: String,
    #[serde(rename = "priority")]
    pub priority: i32,
    #[serde(rename = "template_type", default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    #[serde(rename = "template")]
    pub template: String,
}

#[allow(clippy::from_over_into)]
impl Into<CreateQueueEnvironmentRequest> for &Spec {
    fn into(self) -> CreateQueueEnvironmentRequest {
        CreateQueueEnvironmentRequest {
            farm_id: self.farm_id.to_owned(),
            queue_id: self.queue_id.to_owned(),
            priority: self.priority,
            template_type: resolve_template_type(self.template_type.as_deref()),
            template: self.template.to_owned(),
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
    #[serde(rename = "queue_id")]
    pub queue_id: String,
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "priority")]
    pub priority: i32,
    #[serde(rename = "template_type")]
    pub template_type: EnvironmentTemplateType,
    #[serde(rename = "template")]
    pub template: String,
}

impl From<QueueEnvironment> for Observed {
    fn from(environment: QueueEnvironment) -> Self {
        Self {
            id: environment.queue_environment_id,
            farm_id: environment.farm_id,
            queue_id: environment.queue_id,
            name: Some(environment.name),
            priority: environment.priority,
            template_type: environment.template_type,
            template: environment.template,
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

    const KIND: Kind = Kind::QueueEnvironment;

    fn id(observed: &Observed) -> String {
        observed.id.to_owned()
    }

    fn immutable() -> &'static [&'static str] {
        &["farm_id", "queue_id"]
    }

    fn desired(declared: &Spec) -> Result<Value, Error> {
        let mut desired = serde_json::to_value(declared)
            .map(prune)
            .map_err(|err| Error::diff(Self::KIND, err))?;

        desired["template_type"] =
            serde_json::to_value(resolve_template_type(declared.template_type.as_deref()))
                .map_err(|err| Error::diff(Self::KIND, err))?;

        Ok(desired)
    }

    fn preview(declared: &Spec) -> Result<Value, Error> {
        let request: CreateQueueEnvironmentRequest = declared.into();
        serde_json::to_value(request).map_err(|err| Error::diff(Self::KIND, err))
    }

    async fn create(ctx: Arc<Context>, declared: &Spec) -> Result<Observed, Error> {
        let request: CreateQueueEnvironmentRequest = declared.into();

        debug!(kind = %Self::KIND, farm = &declared.farm_id, queue = &declared.queue_id, priority = declared.priority, "Create queue environment");
        let response = ctx
            .client
            .create_queue_environment(&request)
            .await
            .map_err(|err| Error::remote(Operation::Create, Self::KIND, "", err))?;

        if response.queue_environment_id.is_empty() {
            return Err(Error::empty_identifier(Self::KIND));
        }

        Ok(Observed {
            id: response.queue_environment_id,
            farm_id: request.farm_id,
            queue_id: request.queue_id,
            name: None,
            priority: request.priority,
            template_type: request.template_type,
            template: request.template,
        })
    }

    async fn read(ctx: Arc<Context>, observed: &Observed) -> Result<Observed, Error> {
        ctx.client
            .get_queue_environment(&observed.farm_id, &observed.queue_id, &observed.id)
            .await
            .map(Observed::from)
            .map_err(|err| Error::remote(Operation::Read, Self::KIND, &observed.id, err))
    }

    async fn update(ctx: Arc<Context>, declared: &Spec, observed: &Observed) -> Result<Observed, Error> {
        if declared.farm_id != observed.farm_id || declared.queue_id != observed.queue_id {
            return Err(Error::replacement(
                Self::KIND,
                &observed.id,
                "queue environment cannot be moved to another queue",
            ));
        }

        let template_type = resolve_template_type(declared.template_type.as_deref());
        let request = UpdateQueueEnvironmentRequest {
            farm_id: observed.farm_id.to_owned(),
            queue_id: observed.queue_id.to_owned(),
            queue_environment_id: observed.id.to_owned(),
            priority: Some(declared.priority),
            template_type: Some(template_type),
            template: Some(declared.template.to_owned()),
        };

        ctx.client
            .update_queue_environment(&request)
            .await
            .map_err(|err| Error::remote(Operation::Update, Self::KIND, &observed.id, err))?;

        Ok(Observed {
            id: observed.id.to_owned(),
            farm_id: observed.farm_id.to_owned(),
            queue_id: observed.queue_id.to_owned(),
            name: observed.name.to_owned(),
            priority: declared.priority,
            template_type,
            template: declared.template.to_owned(),
        })
    }

    async fn delete(ctx: Arc<Context>, observed: &Observed) -> Result<(), Error> {
        let request = DeleteQueueEnvironmentRequest {
            farm_id: observed.farm_id.to_owned(),
            queue_id: observed.queue_id.to_owned(),
            queue_environment_id: observed.id.to_owned(),
        };

        ctx.client
            .delete_queue_environment(&request)
            .await
            .map_err(|err| Error::remote(Operation::Delete, Self::KIND, &observed.id, err))
    }

    /// the identifier is `<farm_id>/<queue_id>/<queue_environment_id>`
    async fn import(ctx: Arc<Context>, id: &str) -> Result<Observed, Error> {
        let members = split_import_id(id, 3).ok_or_else(|| {
            Error::configuration(
                Operation::Import,
                Self::KIND,
                format!(
                    "identifier '{}' must be formatted as '<farm_id>/<queue_id>/<queue_environment_id>'",
                    id
                ),
            )
        })?;

        ctx.client
            .get_queue_environment(&members[0], &members[1], &members[2])
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
            farm_id: "farm-1".to_string(),
            queue_id: "queue-1".to_string(),
            priority: 1,
            template_type: Some("yaml".to_string()),
            template: "specificationVersion: environment-2023-09\n".to_string(),
        }
    }

    #[tokio::test]
    async fn create_resolves_template_type() {
        let (_, ctx) = context();

        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("queue environment to be created");
        assert_eq!(EnvironmentTemplateType::Yaml, created.template_type);
        assert_eq!(None, created.name);

        let read = Reconciler::read(ctx, &created)
            .await
            .expect("queue environment to be read");
        assert!(read.name.is_some());
        assert_eq!(Ok(Plan::NoOp), Reconciler::plan(&spec(), &read));
    }

    #[tokio::test]
    async fn update_changes_priority() {
        let (_, ctx) = context();
        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("queue environment to be created");

        let mut declared = spec();
        declared.priority = 5;
        assert_eq!(
            Ok(Plan::Update {
                fields: vec!["priority".to_string()]
            }),
            Reconciler::plan(&declared, &created)
        );

        let updated = Reconciler::update(ctx.to_owned(), &declared, &created)
            .await
            .expect("queue environment to be updated");
        let read = Reconciler::read(ctx, &updated)
            .await
            .expect("queue environment to be read");

        assert_eq!(5, read.priority);
    }

    #[test]
    fn moving_to_another_queue_is_a_replacement() {
        let observed = Observed {
            id: "queueenv-1".to_string(),
            farm_id: "farm-1".to_string(),
            queue_id: "queue-1".to_string(),
            name: Some("environment 1".to_string()),
            priority: 1,
            template_type: EnvironmentTemplateType::Yaml,
            template: spec().template,
        };

        let mut declared = spec();
        declared.queue_id = "queue-2".to_string();

        assert_eq!(
            Ok(Plan::Replace {
                fields: vec!["queue_id".to_string()]
            }),
            Reconciler::plan(&declared, &observed)
        );
    }

    #[tokio::test]
    async fn import_requires_three_members() {
        let (_, ctx) = context();
        let created = Reconciler::create(ctx.to_owned(), &spec())
            .await
            .expect("queue environment to be created");

        let imported = Reconciler::import(ctx.to_owned(), "farm-1/queue-1/queueenv-1")
            .await
            .expect("queue environment to be imported");
        assert_eq!(created.id, imported.id);

        assert!(matches!(
            Reconciler::import(ctx, "farm-1/queueenv-1").await,
            Err(Error::Configuration { operation: Operation::Import, .. })
        ));
    }
}
