//! # Model module
//!
//! This module provide request and response structures exchanged with the
//! deadline cloud management api. Field names follow the api wire format.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// ParseError structure

/// returned by strict enumerations when the given value is not one of the
/// accepted choices
#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
#[error("failed to parse '{value}', available options are {expected}")]
pub struct ParseError {
    pub value: String,
    pub expected: &'static str,
}

// -----------------------------------------------------------------------------
// Farm structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateFarmRequest {
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateFarmResponse {
    #[serde(rename = "farmId")]
    pub farm_id: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Farm {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct UpdateFarmRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// -----------------------------------------------------------------------------
// Fleet configuration structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum CpuArchitectureType {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "arm64")]
    Arm64,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum ServiceManagedFleetOperatingSystemFamily {
    #[serde(rename = "WINDOWS")]
    Windows,
    #[serde(rename = "LINUX")]
    Linux,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Ec2MarketType {
    #[serde(rename = "on-demand")]
    OnDemand,
    #[serde(rename = "spot")]
    Spot,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AutoScalingMode {
    #[serde(rename = "EVENT_BASED_AUTO_SCALING")]
    EventBasedAutoScaling,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct VCpuCountRange {
    #[serde(rename = "min")]
    pub min: i32,
    #[serde(rename = "max", skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct MemoryMiBRange {
    #[serde(rename = "min")]
    pub min: i32,
    #[serde(rename = "max", skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct AcceleratorSelection {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "runtime", skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct AcceleratorCountRange {
    #[serde(rename = "min")]
    pub min: i32,
    #[serde(rename = "max", skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct AcceleratorCapabilities {
    #[serde(rename = "selections")]
    pub selections: Vec<AcceleratorSelection>,
    #[serde(rename = "count", skip_serializing_if = "Option::is_none")]
    pub count: Option<AcceleratorCountRange>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Ec2EbsVolume {
    #[serde(rename = "iops", skip_serializing_if = "Option::is_none")]
    pub iops: Option<i32>,
    #[serde(rename = "sizeGiB", skip_serializing_if = "Option::is_none")]
    pub size_gib: Option<i32>,
    #[serde(rename = "throughputMiB", skip_serializing_if = "Option::is_none")]
    pub throughput_mib: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct ServiceManagedEc2InstanceCapabilities {
    #[serde(rename = "cpuArchitectureType")]
    pub cpu_architecture_type: CpuArchitectureType,
    #[serde(rename = "osFamily")]
    pub os_family: ServiceManagedFleetOperatingSystemFamily,
    #[serde(rename = "vCpuCount")]
    pub vcpu_count: VCpuCountRange,
    #[serde(rename = "memoryMiB")]
    pub memory_mib: MemoryMiBRange,
    #[serde(rename = "allowedInstanceTypes", skip_serializing_if = "Option::is_none")]
    pub allowed_instance_types: Option<Vec<String>>,
    #[serde(rename = "excludedInstanceTypes", skip_serializing_if = "Option::is_none")]
    pub excluded_instance_types: Option<Vec<String>>,
    #[serde(rename = "acceleratorCapabilities", skip_serializing_if = "Option::is_none")]
    pub accelerator_capabilities: Option<AcceleratorCapabilities>,
    #[serde(rename = "rootEbsVolume", skip_serializing_if = "Option::is_none")]
    pub root_ebs_volume: Option<Ec2EbsVolume>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct ServiceManagedEc2InstanceMarketOptions {
    #[serde(rename = "type")]
    pub kind: Ec2MarketType,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct ServiceManagedEc2FleetConfiguration {
    #[serde(rename = "instanceCapabilities")]
    pub instance_capabilities: ServiceManagedEc2InstanceCapabilities,
    #[serde(rename = "instanceMarketOptions")]
    pub instance_market_options: ServiceManagedEc2InstanceMarketOptions,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CustomerManagedFleetConfiguration {
    #[serde(rename = "mode")]
    pub mode: AutoScalingMode,
}

/// the fleet configuration union, exactly one member is sent to the api
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub enum FleetConfiguration {
    #[serde(rename = "serviceManagedEc2")]
    ServiceManagedEc2(ServiceManagedEc2FleetConfiguration),
    #[serde(rename = "customerManaged")]
    CustomerManaged(CustomerManagedFleetConfiguration),
}

// -----------------------------------------------------------------------------
// Fleet structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateFleetRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "roleArn")]
    pub role_arn: String,
    #[serde(rename = "minWorkerCount")]
    pub min_worker_count: i32,
    #[serde(rename = "maxWorkerCount")]
    pub max_worker_count: i32,
    #[serde(rename = "configuration")]
    pub configuration: FleetConfiguration,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateFleetResponse {
    #[serde(rename = "fleetId")]
    pub fleet_id: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Fleet {
    #[serde(rename = "fleetId")]
    pub fleet_id: String,
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "roleArn")]
    pub role_arn: String,
    #[serde(rename = "minWorkerCount")]
    pub min_worker_count: i32,
    #[serde(rename = "maxWorkerCount")]
    pub max_worker_count: i32,
    #[serde(rename = "configuration")]
    pub configuration: FleetConfiguration,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct UpdateFleetRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "fleetId")]
    pub fleet_id: String,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "roleArn", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(rename = "minWorkerCount", skip_serializing_if = "Option::is_none")]
    pub min_worker_count: Option<i32>,
    #[serde(rename = "maxWorkerCount", skip_serializing_if = "Option::is_none")]
    pub max_worker_count: Option<i32>,
    #[serde(rename = "configuration", skip_serializing_if = "Option::is_none")]
    pub configuration: Option<FleetConfiguration>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct DeleteFleetRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "fleetId")]
    pub fleet_id: String,
}

// -----------------------------------------------------------------------------
// Queue structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum DefaultQueueBudgetAction {
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "STOP_SCHEDULING_AND_COMPLETE_TASKS")]
    StopSchedulingAndCompleteTasks,
    #[serde(rename = "STOP_SCHEDULING_AND_CANCEL_TASKS")]
    StopSchedulingAndCancelTasks,
}

impl FromStr for DefaultQueueBudgetAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "STOP_SCHEDULING_AND_COMPLETE_TASKS" => Ok(Self::StopSchedulingAndCompleteTasks),
            "STOP_SCHEDULING_AND_CANCEL_TASKS" => Ok(Self::StopSchedulingAndCancelTasks),
            _ => Err(ParseError {
                value: s.to_string(),
                expected: "'NONE', 'STOP_SCHEDULING_AND_COMPLETE_TASKS' or 'STOP_SCHEDULING_AND_CANCEL_TASKS'",
            }),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum RunAs {
    #[serde(rename = "QUEUE_CONFIGURED_USER")]
    QueueConfiguredUser,
    #[serde(rename = "WORKER_AGENT_USER")]
    WorkerAgentUser,
}

impl FromStr for RunAs {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUEUE_CONFIGURED_USER" => Ok(Self::QueueConfiguredUser),
            "WORKER_AGENT_USER" => Ok(Self::WorkerAgentUser),
            _ => Err(ParseError {
                value: s.to_string(),
                expected: "'QUEUE_CONFIGURED_USER' or 'WORKER_AGENT_USER'",
            }),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct PosixUser {
    #[serde(rename = "user")]
    pub user: String,
    #[serde(rename = "group", skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct WindowsUser {
    #[serde(rename = "user")]
    pub user: String,
    #[serde(rename = "passwordArn", skip_serializing_if = "Option::is_none")]
    pub password_arn: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct JobRunAsUser {
    #[serde(rename = "runAs")]
    pub run_as: RunAs,
    #[serde(rename = "posix", skip_serializing_if = "Option::is_none")]
    pub posix: Option<PosixUser>,
    #[serde(rename = "windows", skip_serializing_if = "Option::is_none")]
    pub windows: Option<WindowsUser>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct JobAttachmentSettings {
    #[serde(rename = "s3BucketName")]
    pub s3_bucket_name: String,
    #[serde(rename = "rootPrefix")]
    pub root_prefix: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateQueueRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "roleArn", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(rename = "defaultBudgetAction", skip_serializing_if = "Option::is_none")]
    pub default_budget_action: Option<DefaultQueueBudgetAction>,
    #[serde(rename = "jobAttachmentSettings", skip_serializing_if = "Option::is_none")]
    pub job_attachment_settings: Option<JobAttachmentSettings>,
    #[serde(rename = "jobRunAsUser", skip_serializing_if = "Option::is_none")]
    pub job_run_as_user: Option<JobRunAsUser>,
    #[serde(rename = "allowedStorageProfileIds", skip_serializing_if = "Vec::is_empty")]
    pub allowed_storage_profile_ids: Vec<String>,
    #[serde(
        rename = "requiredFileSystemLocationNames",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required_file_system_location_names: Vec<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateQueueResponse {
    #[serde(rename = "queueId")]
    pub queue_id: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Queue {
    #[serde(rename = "queueId")]
    pub queue_id: String,
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "roleArn", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(rename = "defaultBudgetAction", skip_serializing_if = "Option::is_none")]
    pub default_budget_action: Option<DefaultQueueBudgetAction>,
    #[serde(rename = "jobAttachmentSettings", skip_serializing_if = "Option::is_none")]
    pub job_attachment_settings: Option<JobAttachmentSettings>,
    #[serde(rename = "jobRunAsUser", skip_serializing_if = "Option::is_none")]
    pub job_run_as_user: Option<JobRunAsUser>,
    #[serde(rename = "allowedStorageProfileIds", default)]
    pub allowed_storage_profile_ids: Vec<String>,
    #[serde(rename = "requiredFileSystemLocationNames", default)]
    pub required_file_system_location_names: Vec<String>,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct UpdateQueueRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "queueId")]
    pub queue_id: String,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "roleArn", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(rename = "defaultBudgetAction", skip_serializing_if = "Option::is_none")]
    pub default_budget_action: Option<DefaultQueueBudgetAction>,
    #[serde(rename = "jobAttachmentSettings", skip_serializing_if = "Option::is_none")]
    pub job_attachment_settings: Option<JobAttachmentSettings>,
    #[serde(rename = "jobRunAsUser", skip_serializing_if = "Option::is_none")]
    pub job_run_as_user: Option<JobRunAsUser>,
    #[serde(
        rename = "allowedStorageProfileIdsToAdd",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub allowed_storage_profile_ids_to_add: Vec<String>,
    #[serde(
        rename = "allowedStorageProfileIdsToRemove",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub allowed_storage_profile_ids_to_remove: Vec<String>,
    #[serde(
        rename = "requiredFileSystemLocationNamesToAdd",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required_file_system_location_names_to_add: Vec<String>,
    #[serde(
        rename = "requiredFileSystemLocationNamesToRemove",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required_file_system_location_names_to_remove: Vec<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct DeleteQueueRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "queueId")]
    pub queue_id: String,
}

// -----------------------------------------------------------------------------
// Queue environment structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum EnvironmentTemplateType {
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "YAML")]
    Yaml,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateQueueEnvironmentRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "queueId")]
    pub queue_id: String,
    #[serde(rename = "priority")]
    pub priority: i32,
    #[serde(rename = "templateType")]
    pub template_type: EnvironmentTemplateType,
    #[serde(rename = "template")]
    pub template: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateQueueEnvironmentResponse {
    #[serde(rename = "queueEnvironmentId")]
    pub queue_environment_id: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct QueueEnvironment {
    #[serde(rename = "queueEnvironmentId")]
    pub queue_environment_id: String,
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "queueId")]
    pub queue_id: String,
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "priority")]
    pub priority: i32,
    #[serde(rename = "templateType")]
    pub template_type: EnvironmentTemplateType,
    #[serde(rename = "template")]
    pub template: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct UpdateQueueEnvironmentRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "queueId")]
    pub queue_id: String,
    #[serde(rename = "queueEnvironmentId")]
    pub queue_environment_id: String,
    #[serde(rename = "priority", skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(rename = "templateType", skip_serializing_if = "Option::is_none")]
    pub template_type: Option<EnvironmentTemplateType>,
    #[serde(rename = "template", skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct DeleteQueueEnvironmentRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "queueId")]
    pub queue_id: String,
    #[serde(rename = "queueEnvironmentId")]
    pub queue_environment_id: String,
}

// -----------------------------------------------------------------------------
// Storage profile structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum StorageProfileOperatingSystemFamily {
    #[serde(rename = "WINDOWS")]
    Windows,
    #[serde(rename = "LINUX")]
    Linux,
    #[serde(rename = "MACOS")]
    Macos,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum FileSystemLocationType {
    #[serde(rename = "LOCAL")]
    Local,
    #[serde(rename = "SHARED")]
    Shared,
}

impl FromStr for FileSystemLocationType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "shared" => Ok(Self::Shared),
            _ => Err(ParseError {
                value: s.to_string(),
                expected: "'local' or 'shared'",
            }),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct FileSystemLocation {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "path")]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileSystemLocationType,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateStorageProfileRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "osFamily")]
    pub os_family: StorageProfileOperatingSystemFamily,
    #[serde(rename = "fileSystemLocations")]
    pub file_system_locations: Vec<FileSystemLocation>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateStorageProfileResponse {
    #[serde(rename = "storageProfileId")]
    pub storage_profile_id: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct StorageProfile {
    #[serde(rename = "storageProfileId")]
    pub storage_profile_id: String,
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "osFamily")]
    pub os_family: StorageProfileOperatingSystemFamily,
    #[serde(rename = "fileSystemLocations", default)]
    pub file_system_locations: Vec<FileSystemLocation>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct UpdateStorageProfileRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "storageProfileId")]
    pub storage_profile_id: String,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "osFamily", skip_serializing_if = "Option::is_none")]
    pub os_family: Option<StorageProfileOperatingSystemFamily>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct DeleteStorageProfileRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "storageProfileId")]
    pub storage_profile_id: String,
}

// -----------------------------------------------------------------------------
// License endpoint structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateLicenseEndpointRequest {
    #[serde(rename = "vpcId")]
    pub vpc_id: String,
    #[serde(rename = "subnetIds")]
    pub subnet_ids: Vec<String>,
    #[serde(rename = "securityGroupIds")]
    pub security_group_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct CreateLicenseEndpointResponse {
    #[serde(rename = "licenseEndpointId")]
    pub license_endpoint_id: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct LicenseEndpoint {
    #[serde(rename = "licenseEndpointId")]
    pub license_endpoint_id: String,
    #[serde(rename = "vpcId")]
    pub vpc_id: String,
    #[serde(rename = "subnetIds", default)]
    pub subnet_ids: Vec<String>,
    #[serde(rename = "securityGroupIds", default)]
    pub security_group_ids: Vec<String>,
    #[serde(rename = "dnsName", skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// -----------------------------------------------------------------------------
// Membership structures

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum PrincipalType {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "GROUP")]
    Group,
}

impl FromStr for PrincipalType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "GROUP" => Ok(Self::Group),
            _ => Err(ParseError {
                value: s.to_string(),
                expected: "'USER' or 'GROUP'",
            }),
        }
    }
}

impl Display for PrincipalType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Group => write!(f, "GROUP"),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum MembershipLevel {
    #[serde(rename = "VIEWER")]
    Viewer,
    #[serde(rename = "CONTRIBUTOR")]
    Contributor,
    #[serde(rename = "OWNER")]
    Owner,
    #[serde(rename = "MANAGER")]
    Manager,
}

impl FromStr for MembershipLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VIEWER" => Ok(Self::Viewer),
            "CONTRIBUTOR" => Ok(Self::Contributor),
            "OWNER" => Ok(Self::Owner),
            "MANAGER" => Ok(Self::Manager),
            _ => Err(ParseError {
                value: s.to_string(),
                expected: "'VIEWER', 'CONTRIBUTOR', 'OWNER' or 'MANAGER'",
            }),
        }
    }
}

impl Display for MembershipLevel {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Viewer => write!(f, "VIEWER"),
            Self::Contributor => write!(f, "CONTRIBUTOR"),
            Self::Owner => write!(f, "OWNER"),
            Self::Manager => write!(f, "MANAGER"),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct AssociateMemberToFarmRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "identityStoreId")]
    pub identity_store_id: String,
    #[serde(rename = "principalType")]
    pub principal_type: PrincipalType,
    #[serde(rename = "membershipLevel")]
    pub membership_level: MembershipLevel,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct DisassociateMemberFromFarmRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "identityStoreId")]
    pub identity_store_id: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct AssociateMemberToFleetRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "fleetId")]
    pub fleet_id: String,
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "identityStoreId")]
    pub identity_store_id: String,
    #[serde(rename = "principalType")]
    pub principal_type: PrincipalType,
    #[serde(rename = "membershipLevel")]
    pub membership_level: MembershipLevel,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct DisassociateMemberFromFleetRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "fleetId")]
    pub fleet_id: String,
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "identityStoreId")]
    pub identity_store_id: String,
}

// -----------------------------------------------------------------------------
// Queue fleet association structures

/// used by both the create and the delete operation, the api takes the same
/// members for both
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct QueueFleetAssociationRequest {
    #[serde(rename = "farmId")]
    pub farm_id: String,
    #[serde(rename = "fleetId")]
    pub fleet_id: String,
    #[serde(rename = "queueId")]
    pub queue_id: String,
}
