//! Probe trait definition and registry

use crate::error::Result;
use crate::record::ResourceRecord;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-service resource collector
///
/// A probe lists one kind of resource in one region. Implementations must
/// not share mutable state with each other: the scheduler runs probes
/// concurrently and relies on task failures staying isolated.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Service identifier used in selections and reports (e.g. "ec2")
    fn service(&self) -> &str;

    /// Display name for console output (e.g. "EC2 Instances")
    fn display_name(&self) -> &str;

    /// List all resources of this service visible in the given region
    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>>;
}

/// Registry mapping service names to probes
///
/// Backed by a `BTreeMap` so `service_names()` is alphabetical, which is
/// what makes "all services" selections resolve deterministically.
#[derive(Default)]
pub struct ProbeRegistry {
    probes: BTreeMap<String, Arc<dyn Probe>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a probe under its own service name
    ///
    /// Re-registering a name replaces the previous probe.
    pub fn register(&mut self, probe: Arc<dyn Probe>) {
        let name = probe.service().to_string();
        if self.probes.insert(name.clone(), probe).is_some() {
            tracing::warn!("Probe '{}' registered twice, keeping the newer one", name);
        }
    }

    pub fn get(&self, service: &str) -> Option<Arc<dyn Probe>> {
        self.probes.get(service).cloned()
    }

    pub fn contains(&self, service: &str) -> bool {
        self.probes.contains_key(service)
    }

    /// All registered service names, alphabetically
    pub fn service_names(&self) -> Vec<String> {
        self.probes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
