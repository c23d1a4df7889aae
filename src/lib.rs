//! # Deadline provisioner
//!
//! A reconciliation engine that provisions render farm topologies on
//! deadline cloud: farms, fleets, queues, queue environments, storage
//! profiles, license endpoints and the associations between them.

pub mod cmd;
pub mod logging;
pub mod svc;
