//! Command line arguments of the `eks-connect` binary.

use clap::{Parser, Subcommand};
use eks_credentials::ClusterId;

/// Command line interface of the `eks-connect` binary.
#[derive(Debug, Parser)]
#[command(name = "eks-connect")]
#[command(bin_name = "eks-connect")]
#[command(version, about = "IAM-authenticated access to EKS clusters", long_about = None)]
pub struct EksConnectCli {
    /// Region to sign for
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Give up after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Operations of the `eks-connect` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print an ExecCredential for kubectl's exec credential plugin
    Token {
        /// Cluster the token is minted for
        #[arg(long, value_name = "ID")]
        cluster_id: ClusterId,
    },
    /// Print a kubeconfig for a cluster
    Profile {
        /// Cluster to connect to
        #[arg(long, value_name = "NAME")]
        cluster: ClusterId,
    },
}
