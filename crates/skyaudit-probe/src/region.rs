//! Region catalog
//!
//! Tracks the set of region identifiers considered valid for a run. The
//! catalog is either discovered from the provider (EC2 `DescribeRegions`)
//! or falls back to the builtin list. An identifier outside the catalog is
//! a data error the planner reports, never a crash.

use std::collections::BTreeSet;

/// Builtin AWS commercial regions, used when discovery is unavailable
const BUILTIN_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

/// Classification of a region identifier against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionStatus {
    /// Identifier is in the known-valid set
    Known,
    /// Identifier is not in the set, but the catalog admits it anyway
    Unverified,
    /// Identifier is not in the set and the catalog rejects it
    Unknown,
}

/// Known-valid region set for one run
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    known: BTreeSet<String>,
    allow_unverified: bool,
}

impl RegionCatalog {
    /// Catalog over the builtin region list
    pub fn builtin() -> Self {
        Self::from_regions(BUILTIN_REGIONS.iter().map(|r| r.to_string()))
    }

    /// Catalog over a discovered/explicit region list
    pub fn from_regions(regions: impl IntoIterator<Item = String>) -> Self {
        Self {
            known: regions.into_iter().collect(),
            allow_unverified: false,
        }
    }

    /// Admit identifiers outside the known set as `Unverified`
    pub fn permissive(mut self) -> Self {
        self.allow_unverified = true;
        self
    }

    pub fn status(&self, region: &str) -> RegionStatus {
        if self.known.contains(region) {
            RegionStatus::Known
        } else if self.allow_unverified {
            RegionStatus::Unverified
        } else {
            RegionStatus::Unknown
        }
    }

    /// All known regions, alphabetically
    pub fn regions(&self) -> Vec<String> {
        self.known.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}
