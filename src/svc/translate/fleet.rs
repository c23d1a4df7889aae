//! # Fleet translation
//!
//! This module provide the fleet capacity configuration as declared by the
//! operator and its translation into the api configuration union.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::svc::{
    deadline::model::{
        AcceleratorCapabilities, AcceleratorCountRange, AcceleratorSelection, AutoScalingMode,
        CpuArchitectureType, CustomerManagedFleetConfiguration, Ec2EbsVolume, Ec2MarketType,
        FleetConfiguration as ApiFleetConfiguration, MemoryMiBRange,
        ServiceManagedEc2FleetConfiguration, ServiceManagedEc2InstanceCapabilities,
        ServiceManagedEc2InstanceMarketOptions, ServiceManagedFleetOperatingSystemFamily,
        VCpuCountRange,
    },
    translate::Error,
};

// -----------------------------------------------------------------------------
// Constants

pub const MODE_CUSTOMER_MANAGED: &str = "customer_managed";
pub const MODE_SERVICE_MANAGED: &str = "service_managed";

const CONTEXT: &str = "service managed fleet configuration";

// -----------------------------------------------------------------------------
// Declared blocks

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct RangeBlock {
    #[serde(rename = "min", default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(rename = "max", default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct AcceleratorSelectionBlock {
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "runtime", default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
}

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct AcceleratorCapabilitiesBlock {
    #[serde(rename = "selections", default)]
    pub selections: Vec<AcceleratorSelectionBlock>,
    #[serde(rename = "count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<RangeBlock>,
}

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct RootEbsVolumeBlock {
    #[serde(rename = "iops", default, skip_serializing_if = "Option::is_none")]
    pub iops: Option<i32>,
    #[serde(rename = "size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
    #[serde(rename = "throughput", default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<i32>,
}

#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct InstanceCapabilitiesBlock {
    #[serde(rename = "cpu_architecture", default, skip_serializing_if = "Option::is_none")]
    pub cpu_architecture: Option<String>,
    #[serde(rename = "min_cpu_count", default, skip_serializing_if = "Option::is_none")]
    pub min_cpu_count: Option<i32>,
    #[serde(rename = "max_cpu_count", default, skip_serializing_if = "Option::is_none")]
    pub max_cpu_count: Option<i32>,
    #[serde(rename = "memory_mib_range", default, skip_serializing_if = "Option::is_none")]
    pub memory_mib_range: Option<RangeBlock>,
    #[serde(rename = "os_family", default, skip_serializing_if = "Option::is_none")]
    pub os_family: Option<String>,
    #[serde(
        rename = "allowed_instance_types",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_instance_types: Option<Vec<String>>,
    #[serde(
        rename = "exclude_instance_types",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exclude_instance_types: Option<Vec<String>>,
    #[serde(
        rename = "accelerator_capabilities",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub accelerator_capabilities: Option<AcceleratorCapabilitiesBlock>,
    #[serde(rename = "root_ebs_volume", default, skip_serializing_if = "Option::is_none")]
    pub root_ebs_volume: Option<RootEbsVolumeBlock>,
}

/// the configuration block as written by the operator, a `mode` selector
/// plus the fields of every mode
#[derive(JsonSchema, Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct ConfigurationBlock {
    #[serde(rename = "mode", default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(rename = "ec2_market_type", default, skip_serializing_if = "Option::is_none")]
    pub ec2_market_type: Option<String>,
    #[serde(
        rename = "ec2_instance_capabilities",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ec2_instance_capabilities: Option<InstanceCapabilitiesBlock>,
}

// -----------------------------------------------------------------------------
// FleetConfiguration enum

/// the declared configuration once the mode selector has been resolved, the
/// fields of the unselected mode are gone
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
#[serde(from = "ConfigurationBlock", into = "ConfigurationBlock")]
pub enum FleetConfiguration {
    ServiceManaged {
        market_type: Option<String>,
        capabilities: Option<InstanceCapabilitiesBlock>,
    },
    CustomerManaged,
}

impl From<ConfigurationBlock> for FleetConfiguration {
    fn from(block: ConfigurationBlock) -> Self {
        match block.mode.as_deref() {
            Some("customer_managed") | Some("customer-managed") => Self::CustomerManaged,
            _ => Self::ServiceManaged {
                market_type: block.ec2_market_type,
                capabilities: block.ec2_instance_capabilities,
            },
        }
    }
}

impl From<FleetConfiguration> for ConfigurationBlock {
    fn from(configuration: FleetConfiguration) -> Self {
        match configuration {
            FleetConfiguration::CustomerManaged => Self {
                mode: Some(MODE_CUSTOMER_MANAGED.to_string()),
                ..Default::default()
            },
            FleetConfiguration::ServiceManaged {
                market_type,
                capabilities,
            } => Self {
                mode: Some(MODE_SERVICE_MANAGED.to_string()),
                ec2_market_type: market_type,
                ec2_instance_capabilities: capabilities,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Resolve functions

/// `arm64` selects the arm variant, every other value including typos
/// selects x86_64
pub fn resolve_cpu_architecture(value: Option<&str>) -> CpuArchitectureType {
    match value {
        Some("arm64") => CpuArchitectureType::Arm64,
        _ => CpuArchitectureType::X86_64,
    }
}

/// `linux` selects linux, `windows` and any other value select windows
pub fn resolve_os_family(value: Option<&str>) -> ServiceManagedFleetOperatingSystemFamily {
    match value {
        Some("linux") => ServiceManagedFleetOperatingSystemFamily::Linux,
        _ => ServiceManagedFleetOperatingSystemFamily::Windows,
    }
}

/// `spot` selects spot instances, any other value selects on-demand
pub fn resolve_market_type(value: Option<&str>) -> Ec2MarketType {
    match value {
        Some("spot") => Ec2MarketType::Spot,
        _ => Ec2MarketType::OnDemand,
    }
}

// -----------------------------------------------------------------------------
// Translation

#[cfg_attr(feature = "trace", tracing::instrument)]
pub fn translate(
    configuration: Option<&FleetConfiguration>,
) -> Result<ApiFleetConfiguration, Error> {
    match configuration.ok_or(Error::MissingConfiguration)? {
        FleetConfiguration::CustomerManaged => Ok(ApiFleetConfiguration::CustomerManaged(
            CustomerManagedFleetConfiguration {
                mode: AutoScalingMode::EventBasedAutoScaling,
            },
        )),
        FleetConfiguration::ServiceManaged {
            market_type,
            capabilities,
        } => {
            let capabilities = capabilities
                .as_ref()
                .ok_or_else(|| Error::missing("ec2_instance_capabilities", CONTEXT))?;

            Ok(ApiFleetConfiguration::ServiceManagedEc2(
                ServiceManagedEc2FleetConfiguration {
                    instance_capabilities: instance_capabilities(capabilities)?,
                    instance_market_options: ServiceManagedEc2InstanceMarketOptions {
                        kind: resolve_market_type(market_type.as_deref()),
                    },
                },
            ))
        }
    }
}

fn instance_capabilities(
    block: &InstanceCapabilitiesBlock,
) -> Result<ServiceManagedEc2InstanceCapabilities, Error> {
    let vcpu_count = VCpuCountRange {
        min: block
            .min_cpu_count
            .ok_or_else(|| Error::missing("min_cpu_count", CONTEXT))?,
        max: block.max_cpu_count,
    };

    let memory = block
        .memory_mib_range
        .as_ref()
        .ok_or_else(|| Error::missing("memory_mib_range", CONTEXT))?;

    let memory_mib = MemoryMiBRange {
        min: memory
            .min
            .ok_or_else(|| Error::missing("memory_mib_range.min", CONTEXT))?,
        max: memory.max,
    };

    let accelerator_capabilities = match &block.accelerator_capabilities {
        None => None,
        Some(accelerators) => Some(AcceleratorCapabilities {
            selections: accelerators
                .selections
                .iter()
                .map(|selection| AcceleratorSelection {
                    name: selection.name.to_owned(),
                    runtime: selection.runtime.to_owned(),
                })
                .collect(),
            count: match &accelerators.count {
                None => None,
                Some(count) => Some(AcceleratorCountRange {
                    min: count.min.ok_or_else(|| {
                        Error::missing("accelerator_capabilities.count.min", CONTEXT)
                    })?,
                    max: count.max,
                }),
            },
        }),
    };

    let root_ebs_volume = block.root_ebs_volume.as_ref().map(|volume| Ec2EbsVolume {
        iops: volume.iops,
        size_gib: volume.size,
        throughput_mib: volume.throughput,
    });

    Ok(ServiceManagedEc2InstanceCapabilities {
        cpu_architecture_type: resolve_cpu_architecture(block.cpu_architecture.as_deref()),
        os_family: resolve_os_family(block.os_family.as_deref()),
        vcpu_count,
        memory_mib,
        allowed_instance_types: block.allowed_instance_types.to_owned(),
        excluded_instance_types: block.exclude_instance_types.to_owned(),
        accelerator_capabilities,
        root_ebs_volume,
    })
}
