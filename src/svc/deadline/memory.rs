//! # Memory module
//!
//! In-memory implementation of the [`Client`] trait used by tests. It keeps
//! the entities in maps, records every call and can be told to fail a given
//! operation.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;

use crate::svc::deadline::{
    model::{
        AssociateMemberToFarmRequest, AssociateMemberToFleetRequest, CreateFarmRequest,
        CreateFarmResponse, CreateFleetRequest, CreateFleetResponse, CreateLicenseEndpointRequest,
        CreateLicenseEndpointResponse, CreateQueueEnvironmentRequest,
        CreateQueueEnvironmentResponse, CreateQueueRequest, CreateQueueResponse,
        CreateStorageProfileRequest, CreateStorageProfileResponse, DeleteFleetRequest,
        DeleteQueueEnvironmentRequest, DeleteQueueRequest, DeleteStorageProfileRequest,
        DisassociateMemberFromFarmRequest, DisassociateMemberFromFleetRequest, Farm, Fleet,
        LicenseEndpoint, Queue, QueueEnvironment, QueueFleetAssociationRequest, StorageProfile,
        UpdateFarmRequest, UpdateFleetRequest, UpdateQueueEnvironmentRequest, UpdateQueueRequest,
        UpdateStorageProfileRequest,
    },
    Client, Error,
};

// -----------------------------------------------------------------------------
// Store structure

#[derive(Default, Debug)]
struct Store {
    sequence: u64,
    empty_ids: bool,
    calls: Vec<String>,
    failures: BTreeMap<String, Error>,
    farms: BTreeMap<String, Farm>,
    fleets: BTreeMap<String, Fleet>,
    queues: BTreeMap<String, Queue>,
    environments: BTreeMap<String, QueueEnvironment>,
    storage_profiles: BTreeMap<String, StorageProfile>,
    license_endpoints: BTreeMap<String, LicenseEndpoint>,
    farm_members: BTreeSet<(String, String, String)>,
    fleet_members: BTreeSet<(String, String, String, String)>,
    queue_fleets: BTreeSet<(String, String, String)>,
}

impl Store {
    fn record(&mut self, operation: &str) -> Result<(), Error> {
        self.calls.push(operation.to_string());
        match self.failures.remove(operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        if self.empty_ids {
            return String::new();
        }

        self.sequence += 1;
        format!("{}-{}", prefix, self.sequence)
    }
}

fn not_found(what: &str, id: &str) -> Error {
    Error::NotFound(format!("{} '{}' does not exist", what, id))
}

// -----------------------------------------------------------------------------
// Memory structure

#[derive(Default, Debug)]
pub struct Memory {
    store: Mutex<Store>,
}

impl Memory {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().expect("memory store lock to not be poisoned")
    }

    /// make the next call of the given operation fail with the given error
    pub fn fail(&self, operation: &str, err: Error) {
        self.lock().failures.insert(operation.to_string(), err);
    }

    /// make create operations answer with an empty identifier
    pub fn answer_empty_ids(&self) {
        self.lock().empty_ids = true;
    }

    /// returns the operations called so far
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.to_owned()
    }

    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }

    /// remove a farm behind the back of the engine
    pub fn vanish_farm(&self, farm_id: &str) {
        self.lock().farms.remove(farm_id);
    }

    pub fn farm_members(&self) -> BTreeSet<(String, String, String)> {
        self.lock().farm_members.to_owned()
    }

    pub fn fleet_members(&self) -> BTreeSet<(String, String, String, String)> {
        self.lock().fleet_members.to_owned()
    }

    pub fn queue_fleets(&self) -> BTreeSet<(String, String, String)> {
        self.lock().queue_fleets.to_owned()
    }
}

#[async_trait]
impl Client for Memory {
    async fn create_farm(&self, req: &CreateFarmRequest) -> Result<CreateFarmResponse, Error> {
        let mut store = self.lock();
        store.record("create_farm")?;

        let farm_id = store.next_id("farm");
        store.farms.insert(
            farm_id.to_owned(),
            Farm {
                farm_id: farm_id.to_owned(),
                display_name: req.display_name.to_owned(),
                description: req.description.to_owned(),
            },
        );

        Ok(CreateFarmResponse { farm_id })
    }

    async fn get_farm(&self, farm_id: &str) -> Result<Farm, Error> {
        let mut store = self.lock();
        store.record("get_farm")?;
        store
            .farms
            .get(farm_id)
            .cloned()
            .ok_or_else(|| not_found("farm", farm_id))
    }

    async fn update_farm(&self, req: &UpdateFarmRequest) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("update_farm")?;

        let farm = store
            .farms
            .get_mut(&req.farm_id)
            .ok_or_else(|| not_found("farm", &req.farm_id))?;

        if let Some(display_name) = &req.display_name {
            farm.display_name = display_name.to_owned();
        }
        if let Some(description) = &req.description {
            farm.description = Some(description.to_owned());
        }

        Ok(())
    }

    async fn delete_farm(&self, farm_id: &str) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("delete_farm")?;
        store
            .farms
            .remove(farm_id)
            .map(|_| ())
            .ok_or_else(|| not_found("farm", farm_id))
    }

    async fn create_fleet(&self, req: &CreateFleetRequest) -> Result<CreateFleetResponse, Error> {
        let mut store = self.lock();
        store.record("create_fleet")?;

        let fleet_id = store.next_id("fleet");
        store.fleets.insert(
            fleet_id.to_owned(),
            Fleet {
                fleet_id: fleet_id.to_owned(),
                farm_id: req.farm_id.to_owned(),
                display_name: req.display_name.to_owned(),
                description: req.description.to_owned(),
                role_arn: req.role_arn.to_owned(),
                min_worker_count: req.min_worker_count,
                max_worker_count: req.max_worker_count,
                configuration: req.configuration.to_owned(),
                status: Some("ACTIVE".to_string()),
            },
        );

        Ok(CreateFleetResponse { fleet_id })
    }

    async fn get_fleet(&self, farm_id: &str, fleet_id: &str) -> Result<Fleet, Error> {
        let mut store = self.lock();
        store.record("get_fleet")?;
        store
            .fleets
            .get(fleet_id)
            .filter(|fleet| fleet.farm_id == farm_id)
            .cloned()
            .ok_or_else(|| not_found("fleet", fleet_id))
    }

    async fn update_fleet(&self, req: &UpdateFleetRequest) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("update_fleet")?;

        let fleet = store
            .fleets
            .get_mut(&req.fleet_id)
            .ok_or_else(|| not_found("fleet", &req.fleet_id))?;

        if let Some(display_name) = &req.display_name {
            fleet.display_name = display_name.to_owned();
        }
        if let Some(description) = &req.description {
            fleet.description = Some(description.to_owned());
        }
        if let Some(role_arn) = &req.role_arn {
            fleet.role_arn = role_arn.to_owned();
        }
        if let Some(count) = req.min_worker_count {
            fleet.min_worker_count = count;
        }
        if let Some(count) = req.max_worker_count {
            fleet.max_worker_count = count;
        }
        if let Some(configuration) = &req.configuration {
            fleet.configuration = configuration.to_owned();
        }

        Ok(())
    }

    async fn delete_fleet(&self, req: &DeleteFleetRequest) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("delete_fleet")?;
        store
            .fleets
            .remove(&req.fleet_id)
            .map(|_| ())
            .ok_or_else(|| not_found("fleet", &req.fleet_id))
    }

    async fn create_queue(&self, req: &CreateQueueRequest) -> Result<CreateQueueResponse, Error> {
        let mut store = self.lock();
        store.record("create_queue")?;

        let queue_id = store.next_id("queue");
        store.queues.insert(
            queue_id.to_owned(),
            Queue {
                queue_id: queue_id.to_owned(),
                farm_id: req.farm_id.to_owned(),
                display_name: req.display_name.to_owned(),
                description: req.description.to_owned(),
                role_arn: req.role_arn.to_owned(),
                default_budget_action: req.default_budget_action,
                job_attachment_settings: req.job_attachment_settings.to_owned(),
                job_run_as_user: req.job_run_as_user.to_owned(),
                allowed_storage_profile_ids: req.allowed_storage_profile_ids.to_owned(),
                required_file_system_location_names: req
                    .required_file_system_location_names
                    .to_owned(),
                status: Some("IDLE".to_string()),
            },
        );

        Ok(CreateQueueResponse { queue_id })
    }

    async fn get_queue(&self, farm_id: &str, queue_id: &str) -> Result<Queue, Error> {
        let mut store = self.lock();
        store.record("get_queue")?;
        store
            .queues
            .get(queue_id)
            .filter(|queue| queue.farm_id == farm_id)
            .cloned()
            .ok_or_else(|| not_found("queue", queue_id))
    }

    async fn update_queue(&self, req: &UpdateQueueRequest) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("update_queue")?;

        let queue = store
            .queues
            .get_mut(&req.queue_id)
            .ok_or_else(|| not_found("queue", &req.queue_id))?;

        if let Some(display_name) = &req.display_name {
            queue.display_name = display_name.to_owned();
        }
        if let Some(description) = &req.description {
            queue.description = Some(description.to_owned());
        }
        if let Some(role_arn) = &req.role_arn {
            queue.role_arn = Some(role_arn.to_owned());
        }
        if let Some(action) = req.default_budget_action {
            queue.default_budget_action = Some(action);
        }
        if let Some(settings) = &req.job_attachment_settings {
            queue.job_attachment_settings = Some(settings.to_owned());
        }
        if let Some(user) = &req.job_run_as_user {
            queue.job_run_as_user = Some(user.to_owned());
        }

        queue
            .allowed_storage_profile_ids
            .retain(|id| !req.allowed_storage_profile_ids_to_remove.contains(id));
        queue
            .allowed_storage_profile_ids
            .extend(req.allowed_storage_profile_ids_to_add.iter().cloned());
        queue
            .required_file_system_location_names
            .retain(|name| !req.required_file_system_location_names_to_remove.contains(name));
        queue
            .required_file_system_location_names
            .extend(req.required_file_system_location_names_to_add.iter().cloned());

        Ok(())
    }

    async fn delete_queue(&self, req: &DeleteQueueRequest) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("delete_queue")?;
        store
            .queues
            .remove(&req.queue_id)
            .map(|_| ())
            .ok_or_else(|| not_found("queue", &req.queue_id))
    }

    async fn create_queue_environment(
        &self,
        req: &CreateQueueEnvironmentRequest,
    ) -> Result<CreateQueueEnvironmentResponse, Error> {
        let mut store = self.lock();
        store.record("create_queue_environment")?;

        let queue_environment_id = store.next_id("queueenv");
        let name = format!("environment {}", store.sequence);
        store.environments.insert(
            queue_environment_id.to_owned(),
            QueueEnvironment {
                queue_environment_id: queue_environment_id.to_owned(),
                farm_id: req.farm_id.to_owned(),
                queue_id: req.queue_id.to_owned(),
                name,
                priority: req.priority,
                template_type: req.template_type,
                template: req.template.to_owned(),
            },
        );

        Ok(CreateQueueEnvironmentResponse {
            queue_environment_id,
        })
    }

    async fn get_queue_environment(
        &self,
        farm_id: &str,
        queue_id: &str,
        queue_environment_id: &str,
    ) -> Result<QueueEnvironment, Error> {
        let mut store = self.lock();
        store.record("get_queue_environment")?;
        store
            .environments
            .get(queue_environment_id)
            .filter(|env| env.farm_id == farm_id && env.queue_id == queue_id)
            .cloned()
            .ok_or_else(|| not_found("queue environment", queue_environment_id))
    }

    async fn update_queue_environment(
        &self,
        req: &UpdateQueueEnvironmentRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("update_queue_environment")?;

        let env = store
            .environments
            .get_mut(&req.queue_environment_id)
            .ok_or_else(|| not_found("queue environment", &req.queue_environment_id))?;

        if let Some(priority) = req.priority {
            env.priority = priority;
        }
        if let Some(template_type) = req.template_type {
            env.template_type = template_type;
        }
        if let Some(template) = &req.template {
            env.template = template.to_owned();
        }

        Ok(())
    }

    async fn delete_queue_environment(
        &self,
        req: &DeleteQueueEnvironmentRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("delete_queue_environment")?;
        store
            .environments
            .remove(&req.queue_environment_id)
            .map(|_| ())
            .ok_or_else(|| not_found("queue environment", &req.queue_environment_id))
    }

    async fn create_storage_profile(
        &self,
        req: &CreateStorageProfileRequest,
    ) -> Result<CreateStorageProfileResponse, Error> {
        let mut store = self.lock();
        store.record("create_storage_profile")?;

        let storage_profile_id = store.next_id("sp");
        store.storage_profiles.insert(
            storage_profile_id.to_owned(),
            StorageProfile {
                storage_profile_id: storage_profile_id.to_owned(),
                farm_id: req.farm_id.to_owned(),
                display_name: req.display_name.to_owned(),
                os_family: req.os_family,
                file_system_locations: req.file_system_locations.to_owned(),
            },
        );

        Ok(CreateStorageProfileResponse { storage_profile_id })
    }

    async fn get_storage_profile(
        &self,
        farm_id: &str,
        storage_profile_id: &str,
    ) -> Result<StorageProfile, Error> {
        let mut store = self.lock();
        store.record("get_storage_profile")?;
        store
            .storage_profiles
            .get(storage_profile_id)
            .filter(|profile| profile.farm_id == farm_id)
            .cloned()
            .ok_or_else(|| not_found("storage profile", storage_profile_id))
    }

    async fn update_storage_profile(
        &self,
        req: &UpdateStorageProfileRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("update_storage_profile")?;

        let profile = store
            .storage_profiles
            .get_mut(&req.storage_profile_id)
            .ok_or_else(|| not_found("storage profile", &req.storage_profile_id))?;

        if let Some(display_name) = &req.display_name {
            profile.display_name = display_name.to_owned();
        }
        if let Some(os_family) = req.os_family {
            profile.os_family = os_family;
        }

        Ok(())
    }

    async fn delete_storage_profile(
        &self,
        req: &DeleteStorageProfileRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("delete_storage_profile")?;
        store
            .storage_profiles
            .remove(&req.storage_profile_id)
            .map(|_| ())
            .ok_or_else(|| not_found("storage profile", &req.storage_profile_id))
    }

    async fn create_license_endpoint(
        &self,
        req: &CreateLicenseEndpointRequest,
    ) -> Result<CreateLicenseEndpointResponse, Error> {
        let mut store = self.lock();
        store.record("create_license_endpoint")?;

        let license_endpoint_id = store.next_id("le");
        store.license_endpoints.insert(
            license_endpoint_id.to_owned(),
            LicenseEndpoint {
                license_endpoint_id: license_endpoint_id.to_owned(),
                vpc_id: req.vpc_id.to_owned(),
                subnet_ids: req.subnet_ids.to_owned(),
                security_group_ids: req.security_group_ids.to_owned(),
                dns_name: Some(format!("{}.deadline.internal", license_endpoint_id)),
                status: Some("READY".to_string()),
            },
        );

        Ok(CreateLicenseEndpointResponse {
            license_endpoint_id,
        })
    }

    async fn get_license_endpoint(
        &self,
        license_endpoint_id: &str,
    ) -> Result<LicenseEndpoint, Error> {
        let mut store = self.lock();
        store.record("get_license_endpoint")?;
        store
            .license_endpoints
            .get(license_endpoint_id)
            .cloned()
            .ok_or_else(|| not_found("license endpoint", license_endpoint_id))
    }

    async fn delete_license_endpoint(&self, license_endpoint_id: &str) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("delete_license_endpoint")?;
        store
            .license_endpoints
            .remove(license_endpoint_id)
            .map(|_| ())
            .ok_or_else(|| not_found("license endpoint", license_endpoint_id))
    }

    async fn associate_member_to_farm(
        &self,
        req: &AssociateMemberToFarmRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("associate_member_to_farm")?;
        store.farm_members.insert((
            req.farm_id.to_owned(),
            req.principal_id.to_owned(),
            req.identity_store_id.to_owned(),
        ));

        Ok(())
    }

    async fn disassociate_member_from_farm(
        &self,
        req: &DisassociateMemberFromFarmRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("disassociate_member_from_farm")?;

        let key = (
            req.farm_id.to_owned(),
            req.principal_id.to_owned(),
            req.identity_store_id.to_owned(),
        );

        if store.farm_members.remove(&key) {
            Ok(())
        } else {
            Err(not_found("farm member", &req.principal_id))
        }
    }

    async fn associate_member_to_fleet(
        &self,
        req: &AssociateMemberToFleetRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("associate_member_to_fleet")?;
        store.fleet_members.insert((
            req.farm_id.to_owned(),
            req.fleet_id.to_owned(),
            req.principal_id.to_owned(),
            req.identity_store_id.to_owned(),
        ));

        Ok(())
    }

    async fn disassociate_member_from_fleet(
        &self,
        req: &DisassociateMemberFromFleetRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("disassociate_member_from_fleet")?;

        let key = (
            req.farm_id.to_owned(),
            req.fleet_id.to_owned(),
            req.principal_id.to_owned(),
            req.identity_store_id.to_owned(),
        );

        if store.fleet_members.remove(&key) {
            Ok(())
        } else {
            Err(not_found("fleet member", &req.principal_id))
        }
    }

    async fn create_queue_fleet_association(
        &self,
        req: &QueueFleetAssociationRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("create_queue_fleet_association")?;
        store.queue_fleets.insert((
            req.farm_id.to_owned(),
            req.fleet_id.to_owned(),
            req.queue_id.to_owned(),
        ));

        Ok(())
    }

    async fn delete_queue_fleet_association(
        &self,
        req: &QueueFleetAssociationRequest,
    ) -> Result<(), Error> {
        let mut store = self.lock();
        store.record("delete_queue_fleet_association")?;

        let key = (
            req.farm_id.to_owned(),
            req.fleet_id.to_owned(),
            req.queue_id.to_owned(),
        );

        if store.queue_fleets.remove(&key) {
            Ok(())
        } else {
            Err(not_found("queue fleet association", &req.queue_id))
        }
    }
}
