//! # Engine module
//!
//! This module provide the reconciliation engine. Every resource kind
//! implements the [`Reconciler`] trait, the [`Engine`] dispatches declared and
//! observed resources to the right implementation and drives one
//! reconciliation pass per resource instance.

use std::{
    collections::BTreeSet,
    fmt::{self, Debug, Display, Formatter},
    future::Future,
    str::FromStr,
    sync::Arc,
};

use async_trait::async_trait;
#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use prometheus::{opts, register_counter_vec, CounterVec};
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, info_span, trace, Instrument};

use crate::svc::{
    cfg::Configuration,
    deadline::{self, Client},
    identity::AssociationKey,
    resource::{on_declared, on_kind, on_observed, on_pair, DeclaredResource, ObservedResource},
};

pub mod instance;

pub use instance::{Instance, Phase};

// -----------------------------------------------------------------------------
// Telemetry

#[cfg(feature = "metrics")]
static RECONCILIATION_SUCCESS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        opts!(
            "deadline_provisioner_reconciliation_success",
            "number of successful operation on resources"
        ),
        &["kind", "operation"]
    )
    .expect("metrics 'deadline_provisioner_reconciliation_success' to not be already registered")
});

#[cfg(feature = "metrics")]
static RECONCILIATION_FAILED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        opts!(
            "deadline_provisioner_reconciliation_failed",
            "number of failed operation on resources"
        ),
        &["kind", "operation"]
    )
    .expect("metrics 'deadline_provisioner_reconciliation_failed' to not be already registered")
});

#[cfg(feature = "metrics")]
static RECONCILIATION_EVENT: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        opts!(
            "deadline_provisioner_reconciliation_event",
            "number of reconciliation pass per outcome"
        ),
        &["kind", "event"]
    )
    .expect("metrics 'deadline_provisioner_reconciliation_event' to not be already registered")
});

// -----------------------------------------------------------------------------
// Kind enumeration

#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    Farm,
    Fleet,
    Queue,
    QueueEnvironment,
    StorageProfile,
    LicenseEndpoint,
    MembershipAssociation,
    FleetMembershipAssociation,
    QueueFleetAssociation,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Farm => write!(f, "farm"),
            Self::Fleet => write!(f, "fleet"),
            Self::Queue => write!(f, "queue"),
            Self::QueueEnvironment => write!(f, "queue-environment"),
            Self::StorageProfile => write!(f, "storage-profile"),
            Self::LicenseEndpoint => write!(f, "license-endpoint"),
            Self::MembershipAssociation => write!(f, "membership-association"),
            Self::FleetMembershipAssociation => write!(f, "fleet-membership-association"),
            Self::QueueFleetAssociation => write!(f, "queue-fleet-association"),
        }
    }
}

impl FromStr for Kind {
    type Err = Box<dyn std::error::Error + Send + Sync>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|kind| kind.to_string() == s)
            .copied()
            .ok_or_else(|| {
                format!(
                    "failed to parse '{}', available options are: {}",
                    s,
                    Self::all()
                        .iter()
                        .map(|kind| format!("'{}'", kind))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
                .into()
            })
    }
}

impl Kind {
    pub const fn all() -> &'static [Kind] {
        &[
            Self::Farm,
            Self::Fleet,
            Self::Queue,
            Self::QueueEnvironment,
            Self::StorageProfile,
            Self::LicenseEndpoint,
            Self::MembershipAssociation,
            Self::FleetMembershipAssociation,
            Self::QueueFleetAssociation,
        ]
    }

    /// returns the resource type name exposed to the provisioning host
    pub fn type_name(&self) -> String {
        format!("deadline_{}", self.to_string().replace('-', "_"))
    }
}

// -----------------------------------------------------------------------------
// Operation enumeration

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Read => write!(f, "read"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Import => write!(f, "import"),
        }
    }
}

// -----------------------------------------------------------------------------
// Error enumeration

#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum Error {
    #[error("failed to {operation} {kind}, {message}")]
    Configuration {
        operation: Operation,
        kind: Kind,
        message: String,
    },
    #[error("failed to {operation} {kind} '{id}', {message}")]
    RemoteCall {
        operation: Operation,
        kind: Kind,
        id: String,
        message: String,
    },
    #[error("failed to {operation} {kind} '{id}', resource not found, {message}")]
    NotFound {
        operation: Operation,
        kind: Kind,
        id: String,
        message: String,
    },
    #[error("failed to {operation} {kind} '{id}', replacement is required, {reason}")]
    ReplacementRequired {
        operation: Operation,
        kind: Kind,
        id: String,
        reason: String,
    },
    #[error("failed to {operation} {kind}, instance is {phase}")]
    InvalidPhase {
        operation: Operation,
        kind: Kind,
        phase: Phase,
    },
    #[error("failed to reconcile, declared kind '{declared}' does not match observed kind '{observed}'")]
    KindMismatch { declared: Kind, observed: Kind },
    #[error("failed to compute difference between desired and observed {kind}, {message}")]
    Diff { kind: Kind, message: String },
}

impl Error {
    /// maps an error of the remote api, a missing entity becomes
    /// [`Error::NotFound`]
    pub fn remote(operation: Operation, kind: Kind, id: &str, err: deadline::Error) -> Self {
        match err {
            deadline::Error::NotFound(message) => Self::NotFound {
                operation,
                kind,
                id: id.to_string(),
                message,
            },
            deadline::Error::Provider(message) => Self::RemoteCall {
                operation,
                kind,
                id: id.to_string(),
                message,
            },
        }
    }

    pub fn configuration<E>(operation: Operation, kind: Kind, err: E) -> Self
    where
        E: Display,
    {
        Self::Configuration {
            operation,
            kind,
            message: err.to_string(),
        }
    }

    pub fn replacement<R>(kind: Kind, id: &str, reason: R) -> Self
    where
        R: Into<String>,
    {
        Self::ReplacementRequired {
            operation: Operation::Update,
            kind,
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn diff(kind: Kind, err: serde_json::Error) -> Self {
        Self::Diff {
            kind,
            message: err.to_string(),
        }
    }

    /// the remote api answered without any identifier
    pub fn empty_identifier(kind: Kind) -> Self {
        Self::RemoteCall {
            operation: Operation::Create,
            kind,
            id: String::new(),
            message: "empty identifier".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// -----------------------------------------------------------------------------
// Context structure

/// contains the client to interact with the deadline cloud api and the
/// configuration
#[derive(Clone)]
pub struct Context {
    pub client: Arc<dyn Client>,
    pub config: Arc<Configuration>,
}

impl From<(Arc<dyn Client>, Arc<Configuration>)> for Context {
    fn from((client, config): (Arc<dyn Client>, Arc<Configuration>)) -> Self {
        Self { client, config }
    }
}

impl Context {
    pub fn new(client: Arc<dyn Client>, config: Arc<Configuration>) -> Self {
        Self::from((client, config))
    }
}

// -----------------------------------------------------------------------------
// Plan enumeration

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub enum Plan {
    NoOp,
    Update { fields: Vec<String> },
    Replace { fields: Vec<String> },
}

// -----------------------------------------------------------------------------
// Action enumeration

/// mutation that a reconciliation pass performs, or would perform in dry-run
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Action {
    Create,
    Update,
    Replace,
    Delete,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Create => write!(f, "Create"),
            Self::Update => write!(f, "Update"),
            Self::Replace => write!(f, "Replace"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

// -----------------------------------------------------------------------------
// Outcome enumeration

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub enum Outcome {
    Created,
    /// the remote entity vanished and has been created again
    Recreated,
    Unchanged,
    Updated { fields: Vec<String> },
    Replaced { fields: Vec<String> },
    Deleted,
    Absent,
    /// dry-run, the action is not performed
    Pending(Action),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Recreated => write!(f, "recreated"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Updated { .. } => write!(f, "updated"),
            Self::Replaced { .. } => write!(f, "replaced"),
            Self::Deleted => write!(f, "deleted"),
            Self::Absent => write!(f, "absent"),
            Self::Pending(_) => write!(f, "pending"),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers functions

/// removes null values, they stand for absent fields
pub fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key, prune(value)))
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(prune).collect()),
        value => value,
    }
}

/// returns the top-level fields that differ between the observed and the
/// desired state. Removing a top-level key means the desired state does not
/// declare it, which is not a change. Below a declared field any difference
/// counts, removals included.
pub fn changed_fields(observed: &Value, desired: &Value) -> Result<Vec<String>, serde_json::Error> {
    let mut fields = BTreeSet::new();

    for operation in json_patch::diff(observed, desired).0 {
        let operation = serde_json::to_value(&operation)?;
        let op = operation.get("op").and_then(Value::as_str).unwrap_or_default();
        let path = operation
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let segments: Vec<String> = path
            .split('/')
            .skip(1)
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .collect();

        let field = match segments.first() {
            Some(field) => field,
            None => continue,
        };

        if op == "remove" && segments.len() == 1 {
            trace!(path = path, "Skip removal of undeclared field");
            continue;
        }

        fields.insert(field.to_owned());
    }

    Ok(fields.into_iter().collect())
}

// -----------------------------------------------------------------------------
// Reconciler trait

/// lifecycle contract implemented by every resource kind
#[async_trait]
pub trait Reconciler {
    type Declared: JsonSchema + Serialize + DeserializeOwned + Debug + Clone + Send + Sync;
    type Observed: Serialize + DeserializeOwned + Debug + Clone + Send + Sync;

    const KIND: Kind;

    /// association kinds have no identifier assigned by the api and cannot
    /// be updated in place
    const ASSOCIATION: bool = false;

    fn id(observed: &Self::Observed) -> String;

    /// top-level fields that cannot be changed without replacing the resource
    fn immutable() -> &'static [&'static str] {
        &[]
    }

    /// returns the desired state in the shape of the observed record
    fn desired(declared: &Self::Declared) -> Result<Value, Error> {
        serde_json::to_value(declared)
            .map(prune)
            .map_err(|err| Error::diff(Self::KIND, err))
    }

    /// returns the association key of the declared resource, if any
    fn key(_declared: &Self::Declared) -> Option<AssociationKey> {
        None
    }

    /// returns the create request that would be sent for the declaration
    fn preview(declared: &Self::Declared) -> Result<Value, Error>;

    /// compare the declaration with the observed record
    fn plan(declared: &Self::Declared, observed: &Self::Observed) -> Result<Plan, Error> {
        let desired = Self::desired(declared).map(prune)?;
        let current = serde_json::to_value(observed)
            .map(prune)
            .map_err(|err| Error::diff(Self::KIND, err))?;
        let fields = changed_fields(&current, &desired).map_err(|err| Error::diff(Self::KIND, err))?;

        if fields.is_empty() {
            return Ok(Plan::NoOp);
        }

        if Self::ASSOCIATION
            || fields
                .iter()
                .any(|field| Self::immutable().contains(&field.as_str()))
        {
            return Ok(Plan::Replace { fields });
        }

        Ok(Plan::Update { fields })
    }

    async fn create(ctx: Arc<Context>, declared: &Self::Declared) -> Result<Self::Observed, Error>;

    async fn read(ctx: Arc<Context>, observed: &Self::Observed) -> Result<Self::Observed, Error>;

    async fn update(
        ctx: Arc<Context>,
        declared: &Self::Declared,
        observed: &Self::Observed,
    ) -> Result<Self::Observed, Error>;

    async fn delete(ctx: Arc<Context>, observed: &Self::Observed) -> Result<(), Error>;

    async fn import(ctx: Arc<Context>, id: &str) -> Result<Self::Observed, Error>;
}

// -----------------------------------------------------------------------------
// Preview structure

/// what would be sent to the api to create a declared resource
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
pub struct Preview {
    #[serde(rename = "kind")]
    pub kind: Kind,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "request")]
    pub request: Value,
}

// -----------------------------------------------------------------------------
// Engine structure

#[derive(Clone)]
pub struct Engine {
    ctx: Arc<Context>,
}

impl From<Context> for Engine {
    fn from(ctx: Context) -> Self {
        Self { ctx: Arc::new(ctx) }
    }
}

/// wraps an operation in a span, logs and counts its result
async fn observe<T, F>(kind: Kind, operation: Operation, future: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    let span = info_span!("reconciler", kind = %kind, operation = %operation);

    async move {
        debug!(kind = %kind, operation = %operation, "Execute operation on resource");
        let result = future.await;

        match &result {
            Ok(_) => {
                #[cfg(feature = "metrics")]
                RECONCILIATION_SUCCESS
                    .with_label_values(&[&kind.to_string(), &operation.to_string()])
                    .inc();
            }
            Err(err) => {
                #[cfg(feature = "metrics")]
                RECONCILIATION_FAILED
                    .with_label_values(&[&kind.to_string(), &operation.to_string()])
                    .inc();

                error!(kind = %kind, operation = %operation, error = err.to_string(), "Could not execute operation on resource");
            }
        }

        result
    }
    .instrument(span)
    .await
}

impl Engine {
    pub fn new(ctx: Context) -> Self {
        Self::from(ctx)
    }

    pub fn dry_run(&self) -> bool {
        self.ctx.config.reconciler.dry_run
    }

    pub async fn create(&self, declared: &DeclaredResource) -> Result<ObservedResource, Error> {
        on_declared!(declared, spec, R => {
            let observed = observe(R::KIND, Operation::Create, R::create(self.ctx.to_owned(), spec)).await?;
            info!(kind = %R::KIND, id = R::id(&observed), "Created resource");
            Ok(ObservedResource::from(observed))
        })
    }

    pub async fn read(&self, observed: &ObservedResource) -> Result<ObservedResource, Error> {
        on_observed!(observed, current, R => {
            observe(R::KIND, Operation::Read, R::read(self.ctx.to_owned(), current))
                .await
                .map(ObservedResource::from)
        })
    }

    pub async fn update(
        &self,
        declared: &DeclaredResource,
        observed: &ObservedResource,
    ) -> Result<ObservedResource, Error> {
        on_pair!(declared, observed, spec, current, R => {
            let modified = observe(R::KIND, Operation::Update, R::update(self.ctx.to_owned(), spec, current)).await?;
            info!(kind = %R::KIND, id = R::id(&modified), "Updated resource");
            Ok(ObservedResource::from(modified))
        })
    }

    pub async fn delete(&self, observed: &ObservedResource) -> Result<(), Error> {
        on_observed!(observed, current, R => {
            observe(R::KIND, Operation::Delete, R::delete(self.ctx.to_owned(), current)).await?;
            info!(kind = %R::KIND, id = R::id(current), "Deleted resource");
            Ok(())
        })
    }

    pub async fn import(&self, kind: Kind, id: &str) -> Result<ObservedResource, Error> {
        on_kind!(kind, R => {
            observe(R::KIND, Operation::Import, R::import(self.ctx.to_owned(), id))
                .await
                .map(ObservedResource::from)
        })
    }

    pub fn plan(
        &self,
        declared: &DeclaredResource,
        observed: &ObservedResource,
    ) -> Result<Plan, Error> {
        plan(declared, observed)
    }

    // -------------------------------------------------------------------------
    // Instance transitions

    pub async fn create_instance(
        &self,
        declared: &DeclaredResource,
        instance: &mut Instance,
    ) -> Result<(), Error> {
        let prior = instance.begin(Operation::Create, declared.kind())?;

        match self.create(declared).await {
            Ok(observed) => {
                instance.settle(Some(observed));
                Ok(())
            }
            Err(err) => {
                instance.abort(prior);
                Err(err)
            }
        }
    }

    pub async fn update_instance(
        &self,
        declared: &DeclaredResource,
        instance: &mut Instance,
    ) -> Result<(), Error> {
        let prior = instance.begin(Operation::Update, declared.kind())?;
        let result = match instance.observed() {
            Some(observed) => self.update(declared, observed).await,
            None => Err(Error::InvalidPhase {
                operation: Operation::Update,
                kind: declared.kind(),
                phase: Phase::Absent,
            }),
        };

        match result {
            Ok(observed) => {
                instance.settle(Some(observed));
                Ok(())
            }
            Err(err) => {
                instance.abort(prior);
                Err(err)
            }
        }
    }

    pub async fn delete_instance(&self, kind: Kind, instance: &mut Instance) -> Result<(), Error> {
        let prior = instance.begin(Operation::Delete, kind)?;
        let result = match instance.observed() {
            Some(observed) => self.delete(observed).await,
            None => Err(Error::InvalidPhase {
                operation: Operation::Delete,
                kind,
                phase: Phase::Absent,
            }),
        };

        match result {
            Ok(()) => {
                instance.settle(None);
                Ok(())
            }
            Err(err) => {
                instance.abort(prior);
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Reconciliation

    /// performs one reconciliation pass for one resource instance, a missing
    /// declaration means the resource should not exist anymore
    pub async fn reconcile(
        &self,
        declared: Option<&DeclaredResource>,
        instance: &mut Instance,
    ) -> Result<Outcome, Error> {
        let kind = match (declared, instance.observed()) {
            (Some(declared), _) => declared.kind(),
            (None, Some(observed)) => observed.kind(),
            (None, None) => return Ok(Outcome::Absent),
        };

        let span = info_span!("reconcile", kind = %kind);
        let outcome = self.reconcile_instance(kind, declared, instance).instrument(span).await?;

        info!(kind = %kind, outcome = %outcome, "Reconciled resource");

        #[cfg(feature = "metrics")]
        RECONCILIATION_EVENT
            .with_label_values(&[&kind.to_string(), &outcome.to_string()])
            .inc();

        Ok(outcome)
    }

    async fn reconcile_instance(
        &self,
        kind: Kind,
        declared: Option<&DeclaredResource>,
        instance: &mut Instance,
    ) -> Result<Outcome, Error> {
        let declared = match (declared, instance.phase()) {
            (_, phase @ (Phase::Creating | Phase::Updating | Phase::Deleting)) => {
                return Err(Error::InvalidPhase {
                    operation: Operation::Read,
                    kind,
                    phase,
                })
            }
            (None, Phase::Absent) => return Ok(Outcome::Absent),
            (None, Phase::Present) => {
                if self.dry_run() {
                    return Ok(Outcome::Pending(Action::Delete));
                }

                self.delete_instance(kind, instance).await?;
                return Ok(Outcome::Deleted);
            }
            (Some(declared), Phase::Absent) => {
                if self.dry_run() {
                    return Ok(Outcome::Pending(Action::Create));
                }

                self.create_instance(declared, instance).await?;
                return Ok(Outcome::Created);
            }
            (Some(declared), Phase::Present) => declared,
        };

        // ---------------------------------------------------------------------
        // Step 1: refresh the observed record

        let observed = match instance.observed() {
            Some(observed) => observed.to_owned(),
            None => {
                return Err(Error::InvalidPhase {
                    operation: Operation::Read,
                    kind,
                    phase: instance.phase(),
                })
            }
        };

        if observed.kind() != declared.kind() {
            return Err(Error::KindMismatch {
                declared: declared.kind(),
                observed: observed.kind(),
            });
        }

        match self.read(&observed).await {
            Ok(observed) => instance.refresh(observed),
            Err(err) if err.is_not_found() => {
                info!(kind = %kind, "Remote resource vanished, forget observed record");
                instance.forget();

                if self.dry_run() {
                    return Ok(Outcome::Pending(Action::Create));
                }

                self.create_instance(declared, instance).await?;
                return Ok(Outcome::Recreated);
            }
            Err(err) => return Err(err),
        }

        // ---------------------------------------------------------------------
        // Step 2: compute and apply the plan

        let plan = match instance.observed() {
            Some(observed) => self.plan(declared, observed)?,
            None => Plan::NoOp,
        };

        debug!(kind = %kind, plan = ?plan, "Computed plan for resource");
        match plan {
            Plan::NoOp => Ok(Outcome::Unchanged),
            Plan::Update { fields } => {
                if self.dry_run() {
                    return Ok(Outcome::Pending(Action::Update));
                }

                self.update_instance(declared, instance).await?;
                Ok(Outcome::Updated { fields })
            }
            Plan::Replace { fields } => {
                if self.dry_run() {
                    return Ok(Outcome::Pending(Action::Replace));
                }

                info!(kind = %kind, fields = ?fields, "Replace resource");
                self.delete_instance(kind, instance).await?;
                self.create_instance(declared, instance).await?;
                Ok(Outcome::Replaced { fields })
            }
        }
    }
}

/// computes the plan without any remote call
pub fn plan(declared: &DeclaredResource, observed: &ObservedResource) -> Result<Plan, Error> {
    on_pair!(declared, observed, spec, current, R => R::plan(spec, current))
}

/// returns the create request and the synthesized identifier of a declared
/// resource without any remote call
pub fn preview(declared: &DeclaredResource) -> Result<Preview, Error> {
    on_declared!(declared, spec, R => {
        let id = match R::key(spec) {
            Some(key) => Some(
                key.synthesize()
                    .map_err(|err| Error::configuration(Operation::Create, R::KIND, err))?,
            ),
            None => None,
        };

        Ok(Preview {
            kind: R::KIND,
            id,
            request: R::preview(spec)?,
        })
    })
}
