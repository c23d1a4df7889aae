//! # Queue translation
//!
//! This module provide the queue blocks as declared by the operator (job run
//! as user, job attachment settings, budget action and environment template
//! type) and their translation into api records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::svc::{
    deadline::model::{
        DefaultQueueBudgetAction, EnvironmentTemplateType, JobAttachmentSettings, JobRunAsUser,
        PosixUser, RunAs, WindowsUser,
    },
    translate::{non_empty, Error},
};

// -----------------------------------------------------------------------------
// Declared blocks

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct PosixUserBlock {
    #[serde(rename = "user", default)]
    pub user: String,
    #[serde(rename = "group", default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct WindowsUserBlock {
    #[serde(rename = "user", default)]
    pub user: String,
    #[serde(rename = "password_arn", default, skip_serializing_if = "Option::is_none")]
    pub password_arn: Option<String>,
}

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct JobRunAsUserBlock {
    #[serde(rename = "posix_user", default, skip_serializing_if = "Option::is_none")]
    pub posix_user: Option<PosixUserBlock>,
    #[serde(rename = "windows_user", default, skip_serializing_if = "Option::is_none")]
    pub windows_user: Option<WindowsUserBlock>,
    #[serde(rename = "run_as", default, skip_serializing_if = "Option::is_none")]
    pub run_as: Option<String>,
}

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct JobAttachmentSettingsBlock {
    #[serde(rename = "root_prefix", default, skip_serializing_if = "Option::is_none")]
    pub root_prefix: Option<String>,
    #[serde(rename = "s3_bucket_name", default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket_name: Option<String>,
}

// -----------------------------------------------------------------------------
// Resolve functions

/// `yaml` selects a yaml template, any other value selects json
pub fn resolve_template_type(value: Option<&str>) -> EnvironmentTemplateType {
    match value {
        Some("yaml") | Some("YAML") => EnvironmentTemplateType::Yaml,
        _ => EnvironmentTemplateType::Json,
    }
}

// -----------------------------------------------------------------------------
// Translation

/// returns the user jobs run as. A windows user takes precedence over a posix
/// one, and a declared user without any `run_as` runs as the queue
/// configured user.
#[cfg_attr(feature = "trace", tracing::instrument)]
pub fn job_run_as_user(block: Option<&JobRunAsUserBlock>) -> Result<Option<JobRunAsUser>, Error> {
    let block = match block {
        Some(block) => block,
        None => return Ok(None),
    };

    let run_as = match non_empty(block.run_as.as_ref()) {
        Some(run_as) => Some(run_as.parse::<RunAs>().map_err(Error::invalid("run_as"))?),
        None => None,
    };

    let posix = block
        .posix_user
        .as_ref()
        .filter(|posix| !posix.user.is_empty())
        .map(|posix| PosixUser {
            user: posix.user.to_owned(),
            group: posix.group.to_owned(),
        });

    let windows = block
        .windows_user
        .as_ref()
        .filter(|windows| !windows.user.is_empty())
        .map(|windows| WindowsUser {
            user: windows.user.to_owned(),
            password_arn: windows.password_arn.to_owned(),
        });

    let (posix, windows) = match windows {
        Some(windows) => (None, Some(windows)),
        None => (posix, None),
    };

    if posix.is_none() && windows.is_none() && run_as.is_none() {
        return Ok(None);
    }

    Ok(Some(JobRunAsUser {
        run_as: run_as.unwrap_or(RunAs::QueueConfiguredUser),
        posix,
        windows,
    }))
}

/// settings are only sent when both the bucket and the root prefix are set
pub fn job_attachment_settings(
    block: Option<&JobAttachmentSettingsBlock>,
) -> Option<JobAttachmentSettings> {
    let block = block?;

    Some(JobAttachmentSettings {
        s3_bucket_name: non_empty(block.s3_bucket_name.as_ref())?,
        root_prefix: non_empty(block.root_prefix.as_ref())?,
    })
}

pub fn default_budget_action(
    value: Option<&String>,
) -> Result<Option<DefaultQueueBudgetAction>, Error> {
    match non_empty(value) {
        Some(action) => action
            .parse()
            .map(Some)
            .map_err(Error::invalid("default_budget_action")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posix() -> PosixUserBlock {
        PosixUserBlock {
            user: "render".to_string(),
            group: Some("render".to_string()),
        }
    }

    fn windows() -> WindowsUserBlock {
        WindowsUserBlock {
            user: "Administrator".to_string(),
            password_arn: Some("arn:aws:secretsmanager:eu-west-1:1:secret:pw".to_string()),
        }
    }

    #[test]
    fn resolve_template_type_fallbacks() {
        assert_eq!(EnvironmentTemplateType::Yaml, resolve_template_type(Some("yaml")));
        assert_eq!(EnvironmentTemplateType::Json, resolve_template_type(Some("json")));
        assert_eq!(EnvironmentTemplateType::Json, resolve_template_type(Some("toml")));
        assert_eq!(EnvironmentTemplateType::Json, resolve_template_type(None));
    }

    #[test]
    fn run_as_user_absent_block() {
        assert_eq!(Ok(None), job_run_as_user(None));
        assert_eq!(Ok(None), job_run_as_user(Some(&JobRunAsUserBlock::default())));
    }

    #[test]
    fn run_as_user_defaults_to_queue_configured_user() {
        let block = JobRunAsUserBlock {
            posix_user: Some(posix()),
            ..Default::default()
        };

        assert_eq!(
            Ok(Some(JobRunAsUser {
                run_as: RunAs::QueueConfiguredUser,
                posix: Some(PosixUser {
                    user: "render".to_string(),
                    group: Some("render".to_string()),
                }),
                windows: None,
            })),
            job_run_as_user(Some(&block))
        );
    }

    #[test]
    fn run_as_user_prefers_windows() {
        let block = JobRunAsUserBlock {
            posix_user: Some(posix()),
            windows_user: Some(windows()),
            run_as: Some("WORKER_AGENT_USER".to_string()),
        };

        let user = job_run_as_user(Some(&block))
            .expect("block to be valid")
            .expect("user to be set");

        assert_eq!(RunAs::WorkerAgentUser, user.run_as);
        assert_eq!(None, user.posix);
        assert_eq!(
            Some("Administrator".to_string()),
            user.windows.map(|windows| windows.user)
        );
    }

    #[test]
    fn run_as_user_ignores_empty_user() {
        let block = JobRunAsUserBlock {
            posix_user: Some(PosixUserBlock::default()),
            run_as: Some("WORKER_AGENT_USER".to_string()),
            ..Default::default()
        };

        assert_eq!(
            Ok(Some(JobRunAsUser {
                run_as: RunAs::WorkerAgentUser,
                posix: None,
                windows: None,
            })),
            job_run_as_user(Some(&block))
        );
    }

    #[test]
    fn run_as_user_rejects_unknown_run_as() {
        let block = JobRunAsUserBlock {
            posix_user: Some(posix()),
            run_as: Some("ROOT".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            job_run_as_user(Some(&block)),
            Err(Error::InvalidChoice { field: "run_as", .. })
        ));
    }

    #[test]
    fn attachment_settings_require_both_values() {
        let complete = JobAttachmentSettingsBlock {
            root_prefix: Some("jobs".to_string()),
            s3_bucket_name: Some("render-bucket".to_string()),
        };
        assert_eq!(
            Some(JobAttachmentSettings {
                s3_bucket_name: "render-bucket".to_string(),
                root_prefix: "jobs".to_string(),
            }),
            job_attachment_settings(Some(&complete))
        );

        let partial = JobAttachmentSettingsBlock {
            root_prefix: Some("".to_string()),
            s3_bucket_name: Some("render-bucket".to_string()),
        };
        assert_eq!(None, job_attachment_settings(Some(&partial)));
        assert_eq!(None, job_attachment_settings(None));
    }

    #[test]
    fn budget_action_is_strict() {
        assert_eq!(Ok(None), default_budget_action(None));
        assert_eq!(
            Ok(Some(DefaultQueueBudgetAction::StopSchedulingAndCancelTasks)),
            default_budget_action(Some(&"STOP_SCHEDULING_AND_CANCEL_TASKS".to_string()))
        );
        assert!(default_budget_action(Some(&"stop".to_string())).is_err());
    }
}
