pub mod client;
mod mapper;

pub use client::GitHubPlatform;
