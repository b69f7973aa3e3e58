//! S3 bucket probe
//!
//! `ListBuckets` is account-wide, so the probe resolves each bucket's
//! owning region with `GetBucketLocation` and keeps only the buckets that
//! belong to the probed region. That keeps S3 on the uniform
//! region × service grid without duplicating every bucket into every
//! region's results.

use crate::client::{classify_sdk_error, region_config};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::types::BucketLocationConstraint;
use skyaudit_probe::record::{KEY_NAME, KEY_REGION};
use skyaudit_probe::{Probe, ResourceRecord, Result};

/// Lists S3 buckets owned by the account in the probed region
pub struct S3Probe {
    config: SdkConfig,
}

impl S3Probe {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

/// Map a location constraint to a region identifier
///
/// A missing or empty constraint means us-east-1; "EU" is the legacy alias
/// for eu-west-1.
fn bucket_region(constraint: Option<&BucketLocationConstraint>) -> String {
    match constraint.map(|c| c.as_str()) {
        None | Some("") => "us-east-1".to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}

#[async_trait]
impl Probe for S3Probe {
    fn service(&self) -> &str {
        "s3"
    }

    fn display_name(&self) -> &str {
        "S3 Buckets"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>> {
        let client = aws_sdk_s3::Client::new(&region_config(&self.config, region));
        let resp = client
            .list_buckets()
            .send()
            .await
            .map_err(|e| classify_sdk_error("ListBuckets", e))?;

        let mut records = Vec::new();
        for bucket in resp.buckets() {
            let Some(name) = bucket.name() else { continue };

            let owning_region = match client.get_bucket_location().bucket(name).send().await {
                Ok(out) => bucket_region(out.location_constraint()),
                Err(e) => {
                    // Location lookup can fail on buckets the credentials
                    // cannot read; skip those rather than fail the region.
                    tracing::debug!(
                        "GetBucketLocation failed for '{}', skipping: {}",
                        name,
                        classify_sdk_error("GetBucketLocation", e)
                    );
                    continue;
                }
            };
            if owning_region != region {
                continue;
            }

            records.push(
                ResourceRecord::new("bucket", name)
                    .with(KEY_NAME, name)
                    .with(KEY_REGION, region)
                    .with_opt("created_epoch", bucket.creation_date().map(|d| d.secs())),
            );
        }

        tracing::debug!("s3/{}: {} buckets", region, records.len());
        Ok(records)
    }
}
