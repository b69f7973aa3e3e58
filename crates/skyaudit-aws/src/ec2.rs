//! EC2 instance probe

use crate::client::{classify_sdk_error, region_config};
use async_trait::async_trait;
use aws_config::SdkConfig;
use skyaudit_probe::record::{KEY_NAME, KEY_REGION};
use skyaudit_probe::{Probe, ResourceRecord, Result};

/// Lists EC2 instances via `DescribeInstances`
pub struct Ec2Probe {
    config: SdkConfig,
}

impl Ec2Probe {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Probe for Ec2Probe {
    fn service(&self) -> &str {
        "ec2"
    }

    fn display_name(&self) -> &str {
        "EC2 Instances"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>> {
        let client = aws_sdk_ec2::Client::new(&region_config(&self.config, region));
        let mut records = Vec::new();

        let mut pages = client.describe_instances().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error("DescribeInstances", e))?;
            for reservation in page.reservations() {
                for instance in reservation.instances() {
                    let name = instance
                        .tags()
                        .iter()
                        .find(|t| t.key() == Some("Name"))
                        .and_then(|t| t.value());
                    records.push(
                        ResourceRecord::new("instance", instance.instance_id().unwrap_or_default())
                            .with(KEY_REGION, region)
                            .with_opt(KEY_NAME, name)
                            .with_opt(
                                "instance_type",
                                instance.instance_type().map(|t| t.as_str()),
                            )
                            .with_opt(
                                "state",
                                instance.state().and_then(|s| s.name()).map(|n| n.as_str()),
                            )
                            .with_opt(
                                "availability_zone",
                                instance.placement().and_then(|p| p.availability_zone()),
                            ),
                    );
                }
            }
        }

        tracing::debug!("ec2/{}: {} instances", region, records.len());
        Ok(records)
    }
}
