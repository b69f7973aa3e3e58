//! RDS instance probe

use crate::client::{classify_sdk_error, region_config};
use async_trait::async_trait;
use aws_config::SdkConfig;
use skyaudit_probe::record::KEY_REGION;
use skyaudit_probe::{Probe, ResourceRecord, Result};

/// Lists RDS database instances via `DescribeDBInstances`
pub struct RdsProbe {
    config: SdkConfig,
}

impl RdsProbe {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Probe for RdsProbe {
    fn service(&self) -> &str {
        "rds"
    }

    fn display_name(&self) -> &str {
        "RDS Instances"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>> {
        let client = aws_sdk_rds::Client::new(&region_config(&self.config, region));
        let mut records = Vec::new();

        let mut pages = client.describe_db_instances().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error("DescribeDBInstances", e))?;
            for db in page.db_instances() {
                records.push(
                    ResourceRecord::new(
                        "db_instance",
                        db.db_instance_identifier().unwrap_or_default(),
                    )
                    .with(KEY_REGION, region)
                    .with_opt("engine", db.engine())
                    .with_opt("engine_version", db.engine_version())
                    .with_opt("instance_class", db.db_instance_class())
                    .with_opt("status", db.db_instance_status()),
                );
            }
        }

        tracing::debug!("rds/{}: {} instances", region, records.len());
        Ok(records)
    }
}
