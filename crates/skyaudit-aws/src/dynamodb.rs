//! DynamoDB table probe

use crate::client::{classify_sdk_error, region_config};
use async_trait::async_trait;
use aws_config::SdkConfig;
use skyaudit_probe::record::{KEY_NAME, KEY_REGION};
use skyaudit_probe::{Probe, ResourceRecord, Result};

/// Lists DynamoDB tables via `ListTables`
pub struct DynamoDbProbe {
    config: SdkConfig,
}

impl DynamoDbProbe {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Probe for DynamoDbProbe {
    fn service(&self) -> &str {
        "dynamodb"
    }

    fn display_name(&self) -> &str {
        "DynamoDB Tables"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>> {
        let client = aws_sdk_dynamodb::Client::new(&region_config(&self.config, region));
        let mut records = Vec::new();

        let mut names = client.list_tables().into_paginator().items().send();
        while let Some(name) = names.next().await {
            let name = name.map_err(|e| classify_sdk_error("ListTables", e))?;
            records.push(
                ResourceRecord::new("table", name.clone())
                    .with(KEY_NAME, name)
                    .with(KEY_REGION, region),
            );
        }

        tracing::debug!("dynamodb/{}: {} tables", region, records.len());
        Ok(records)
    }
}
