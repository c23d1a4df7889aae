//! # Deadline module
//!
//! This module provide the client boundary to the deadline cloud management
//! api. The transport is supplied by the embedding host through the
//! [`Client`] trait, this crate only describes the requests and responses.

use async_trait::async_trait;

use crate::svc::deadline::model::{
    AssociateMemberToFarmRequest, AssociateMemberToFleetRequest, CreateFarmRequest,
    CreateFarmResponse, CreateFleetRequest, CreateFleetResponse, CreateLicenseEndpointRequest,
    CreateLicenseEndpointResponse, CreateQueueEnvironmentRequest, CreateQueueEnvironmentResponse,
    CreateQueueRequest, CreateQueueResponse, CreateStorageProfileRequest,
    CreateStorageProfileResponse, DeleteFleetRequest, DeleteQueueEnvironmentRequest,
    DeleteQueueRequest, DeleteStorageProfileRequest, DisassociateMemberFromFarmRequest,
    DisassociateMemberFromFleetRequest, Farm, Fleet, LicenseEndpoint, Queue, QueueEnvironment,
    QueueFleetAssociationRequest, StorageProfile, UpdateFarmRequest, UpdateFleetRequest,
    UpdateQueueEnvironmentRequest, UpdateQueueRequest, UpdateStorageProfileRequest,
};

#[cfg(test)]
pub mod memory;
pub mod model;

// -----------------------------------------------------------------------------
// Error enumeration

/// errors reported by the remote api, the provider distinguishes missing
/// entities from any other failure
#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum Error {
    #[error("resource not found, {0}")]
    NotFound(String),
    #[error("failed to execute request on deadline cloud api, {0}")]
    Provider(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg) | Self::Provider(msg) => msg,
        }
    }
}

// -----------------------------------------------------------------------------
// Client trait

/// one asynchronous method per remote operation, each performing exactly one
/// request against the management api
#[async_trait]
pub trait Client: Send + Sync {
    // farm
    async fn create_farm(&self, req: &CreateFarmRequest) -> Result<CreateFarmResponse, Error>;
    async fn get_farm(&self, farm_id: &str) -> Result<Farm, Error>;
    async fn update_farm(&self, req: &UpdateFarmRequest) -> Result<(), Error>;
    async fn delete_farm(&self, farm_id: &str) -> Result<(), Error>;

    // fleet
    async fn create_fleet(&self, req: &CreateFleetRequest) -> Result<CreateFleetResponse, Error>;
    async fn get_fleet(&self, farm_id: &str, fleet_id: &str) -> Result<Fleet, Error>;
    async fn update_fleet(&self, req: &UpdateFleetRequest) -> Result<(), Error>;
    async fn delete_fleet(&self, req: &DeleteFleetRequest) -> Result<(), Error>;

    // queue
    async fn create_queue(&self, req: &CreateQueueRequest) -> Result<CreateQueueResponse, Error>;
    async fn get_queue(&self, farm_id: &str, queue_id: &str) -> Result<Queue, Error>;
    async fn update_queue(&self, req: &UpdateQueueRequest) -> Result<(), Error>;
    async fn delete_queue(&self, req: &DeleteQueueRequest) -> Result<(), Error>;

    // queue environment
    async fn create_queue_environment(
        &self,
        req: &CreateQueueEnvironmentRequest,
    ) -> Result<CreateQueueEnvironmentResponse, Error>;
    async fn get_queue_environment(
        &self,
        farm_id: &str,
        queue_id: &str,
        queue_environment_id: &str,
    ) -> Result<QueueEnvironment, Error>;
    async fn update_queue_environment(
        &self,
        req: &UpdateQueueEnvironmentRequest,
    ) -> Result<(), Error>;
    async fn delete_queue_environment(
        &self,
        req: &DeleteQueueEnvironmentRequest,
    ) -> Result<(), Error>;

    // storage profile
    async fn create_storage_profile(
        &self,
        req: &CreateStorageProfileRequest,
    ) -> Result<CreateStorageProfileResponse, Error>;
    async fn get_storage_profile(
        &self,
        farm_id: &str,
        storage_profile_id: &str,
    ) -> Result<StorageProfile, Error>;
    async fn update_storage_profile(&self, req: &UpdateStorageProfileRequest)
        -> Result<(), Error>;
    async fn delete_storage_profile(&self, req: &DeleteStorageProfileRequest)
        -> Result<(), Error>;

    // license endpoint, the api does not offer any update operation
    async fn create_license_endpoint(
        &self,
        req: &CreateLicenseEndpointRequest,
    ) -> Result<CreateLicenseEndpointResponse, Error>;
    async fn get_license_endpoint(&self, license_endpoint_id: &str)
        -> Result<LicenseEndpoint, Error>;
    async fn delete_license_endpoint(&self, license_endpoint_id: &str) -> Result<(), Error>;

    // memberships
    async fn associate_member_to_farm(&self, req: &AssociateMemberToFarmRequest)
        -> Result<(), Error>;
    async fn disassociate_member_from_farm(
        &self,
        req: &DisassociateMemberFromFarmRequest,
    ) -> Result<(), Error>;
    async fn associate_member_to_fleet(
        &self,
        req: &AssociateMemberToFleetRequest,
    ) -> Result<(), Error>;
    async fn disassociate_member_from_fleet(
        &self,
        req: &DisassociateMemberFromFleetRequest,
    ) -> Result<(), Error>;

    // queue fleet association
    async fn create_queue_fleet_association(
        &self,
        req: &QueueFleetAssociationRequest,
    ) -> Result<(), Error>;
    async fn delete_queue_fleet_association(
        &self,
        req: &QueueFleetAssociationRequest,
    ) -> Result<(), Error>;
}
