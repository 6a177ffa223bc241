//! Domain layer: authority resolution and the authentication flows.
//!
//! The domain depends on `authority_sdk` for contract types and on the
//! ports in [`repo`]; it never reaches into `infra` or `api`.

pub mod aggregator;
pub mod error;
pub mod org_unit;
pub mod repo;
pub mod resolver;
pub mod service;
