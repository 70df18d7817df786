/// Deployment steps
pub mod sequence;

pub use sequence::{deploy_package, DeployOutcome};
