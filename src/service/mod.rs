//! Service layer: action orchestration over the object store abstraction

pub mod action_service;
pub mod output;

#[cfg(test)]
mod comprehensive_test;

pub use action_service::ActionService;
