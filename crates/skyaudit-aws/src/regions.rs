//! Region discovery
//!
//! Builds the run's region catalog from EC2 `DescribeRegions`, so the
//! known-valid set matches what the account can actually reach. Callers
//! fall back to [`RegionCatalog::builtin`] when discovery fails (no
//! credentials, air-gapped, ...).

use crate::client::classify_sdk_error;
use aws_config::SdkConfig;
use skyaudit_probe::{RegionCatalog, Result};

/// Discover the regions enabled for the account
pub async fn discover_regions(config: &SdkConfig) -> Result<RegionCatalog> {
    let client = aws_sdk_ec2::Client::new(config);
    let resp = client
        .describe_regions()
        .send()
        .await
        .map_err(|e| classify_sdk_error("DescribeRegions", e))?;

    let regions: Vec<String> = resp
        .regions()
        .iter()
        .filter_map(|r| r.region_name().map(|n| n.to_string()))
        .collect();
    tracing::debug!("Discovered {} enabled regions", regions.len());
    Ok(RegionCatalog::from_regions(regions))
}
