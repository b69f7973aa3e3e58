//! Skyaudit AWS Probes
//!
//! Concrete [`Probe`](skyaudit_probe::Probe) implementations backed by the
//! AWS SDK, plus region discovery via EC2 `DescribeRegions`. Each probe
//! issues the service's list/describe call in the requested region and
//! maps the responses into open [`ResourceRecord`]s; SDK failures are
//! classified into the probe error taxonomy so the engine can attribute
//! them (denied vs. unavailable vs. transient) without knowing AWS.

mod client;
pub mod dynamodb;
pub mod ec2;
pub mod rds;
pub mod regions;
pub mod s3;

pub use dynamodb::DynamoDbProbe;
pub use ec2::Ec2Probe;
pub use rds::RdsProbe;
pub use regions::discover_regions;
pub use s3::S3Probe;

use aws_config::SdkConfig;
use skyaudit_probe::ProbeRegistry;
use std::sync::Arc;

/// Register the full built-in probe set against one SDK config
pub fn register_default_probes(registry: &mut ProbeRegistry, config: &SdkConfig) {
    registry.register(Arc::new(Ec2Probe::new(config)));
    registry.register(Arc::new(S3Probe::new(config)));
    registry.register(Arc::new(RdsProbe::new(config)));
    registry.register(Arc::new(DynamoDbProbe::new(config)));
}
