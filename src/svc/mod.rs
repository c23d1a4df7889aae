//! # Services module
//!
//! This module provide the reconciliation engine, the resource reconcilers,
//! the translation of declared configuration blocks and the client boundary
//! to the deadline cloud api.
pub mod cfg;
pub mod deadline;
pub mod engine;
pub mod identity;
pub mod resource;
pub mod translate;
