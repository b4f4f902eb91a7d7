pub mod config;
pub mod error;
pub mod manifest;
pub mod platform;
pub mod proposal;
pub mod report;
pub mod repository;
pub mod template;
pub mod workflow;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;
