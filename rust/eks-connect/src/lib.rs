#![warn(missing_docs)]

//! # EKS Connect
//!
//! Builds connection profiles for Kubernetes clusters hosted on EKS. A
//! profile carries everything a client needs to talk to the cluster's API
//! server with its IAM identity:
//!
//! - the API server endpoint, resolved through a [`ClusterRegistry`]
//! - the decoded certificate authority to trust
//! - a bearer token minted by [`TokenGenerator`](eks_credentials::TokenGenerator)
//!
//! Both collaborators are traits, so tests and embedders can substitute the
//! EKS API and STS signing with [`MemoryRegistry`] and the stand-ins in
//! `eks_credentials::helpers`.
//!
//! ## Usage
//!
//! The `eks-connect` binary resolves credentials and region from the usual
//! `AWS_*` variables:
//!
//! ```bash
//! eks-connect token --cluster-id production
//! eks-connect --region eu-west-1 profile --cluster production > kubeconfig.json
//! ```

mod cli;
mod config;
mod error;
mod exec;
mod kubeconfig;
mod profile;
mod registry;

pub use cli::*;
pub use config::*;
pub use error::*;
pub use exec::*;
pub use kubeconfig::*;
pub use profile::*;
pub use registry::*;
