//! Task planning
//!
//! Expands a (regions, services) selection into the ordered, duplicate-free
//! cartesian product of audit tasks. Resolution is deterministic: both axes
//! are alphabetical, tasks are region-major, so identical inputs always
//! produce identically ordered task lists and reproducible reports.
//!
//! Bad selection entries never abort planning. An unknown region or service
//! becomes a [`SelectionIssue`] attached to the plan and the valid
//! remainder is still audited.

use crate::task::{AuditTask, IssueKind, SelectionIssue};
use skyaudit_probe::{ProbeRegistry, RegionCatalog, RegionStatus};
use std::collections::BTreeSet;

/// Selection of one axis of the audit grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The sentinel "all": every known region / every registered service
    All,
    /// An explicit list of identifiers; duplicates are ignored
    Names(Vec<String>),
}

impl Selection {
    /// Parse a CLI-style argument: `all` (case-insensitive) or a
    /// comma-separated list
    pub fn parse(arg: &str) -> Self {
        if arg.trim().eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Names(
                arg.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            )
        }
    }
}

/// Planned task grid for one run
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPlan {
    /// Resolved regions, alphabetical
    pub regions: Vec<String>,
    /// Resolved services, alphabetical
    pub services: Vec<String>,
    /// `regions × services`, region-major
    pub tasks: Vec<AuditTask>,
    /// Selection entries that were dropped or flagged
    pub issues: Vec<SelectionIssue>,
}

/// Resolve a selection into the ordered task grid
pub fn plan(
    regions: &Selection,
    services: &Selection,
    catalog: &RegionCatalog,
    registry: &ProbeRegistry,
) -> TaskPlan {
    let mut issues = Vec::new();

    let regions = resolve_regions(regions, catalog, &mut issues);
    let services = resolve_services(services, registry, &mut issues);

    let mut tasks = Vec::with_capacity(regions.len() * services.len());
    for region in &regions {
        for service in &services {
            tasks.push(AuditTask::new(region.clone(), service.clone()));
        }
    }

    tracing::debug!(
        "Planned {} tasks over {} regions x {} services ({} selection issues)",
        tasks.len(),
        regions.len(),
        services.len(),
        issues.len()
    );

    TaskPlan {
        regions,
        services,
        tasks,
        issues,
    }
}

fn resolve_regions(
    selection: &Selection,
    catalog: &RegionCatalog,
    issues: &mut Vec<SelectionIssue>,
) -> Vec<String> {
    match selection {
        Selection::All => catalog.regions(),
        Selection::Names(names) => {
            // BTreeSet dedupes and sorts in one go
            let unique: BTreeSet<&String> = names.iter().collect();
            let mut resolved = Vec::with_capacity(unique.len());
            for name in unique {
                match catalog.status(name) {
                    RegionStatus::Known => resolved.push(name.clone()),
                    RegionStatus::Unverified => {
                        issues.push(SelectionIssue::new(
                            IssueKind::UnverifiedRegion,
                            name,
                            format!("region '{}' is not in the catalog, auditing anyway", name),
                        ));
                        resolved.push(name.clone());
                    }
                    RegionStatus::Unknown => {
                        tracing::warn!("Skipping unknown region '{}'", name);
                        issues.push(SelectionIssue::new(
                            IssueKind::UnknownRegion,
                            name,
                            format!("region '{}' is not a known region", name),
                        ));
                    }
                }
            }
            resolved
        }
    }
}

fn resolve_services(
    selection: &Selection,
    registry: &ProbeRegistry,
    issues: &mut Vec<SelectionIssue>,
) -> Vec<String> {
    match selection {
        Selection::All => registry.service_names(),
        Selection::Names(names) => {
            let unique: BTreeSet<&String> = names.iter().collect();
            let mut resolved = Vec::with_capacity(unique.len());
            for name in unique {
                if registry.contains(name) {
                    resolved.push(name.clone());
                } else {
                    tracing::warn!("Skipping unknown service '{}'", name);
                    issues.push(SelectionIssue::new(
                        IssueKind::UnknownService,
                        name,
                        format!("no probe registered for service '{}'", name),
                    ));
                }
            }
            resolved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skyaudit_probe::{Probe, ResourceRecord};
    use std::sync::Arc;

    struct NullProbe(&'static str);

    #[async_trait]
    impl Probe for NullProbe {
        fn service(&self) -> &str {
            self.0
        }

        fn display_name(&self) -> &str {
            self.0
        }

        async fn collect(&self, _region: &str) -> skyaudit_probe::Result<Vec<ResourceRecord>> {
            Ok(Vec::new())
        }
    }

    fn registry(services: &[&'static str]) -> ProbeRegistry {
        let mut registry = ProbeRegistry::new();
        for s in services {
            registry.register(Arc::new(NullProbe(s)));
        }
        registry
    }

    fn catalog(regions: &[&str]) -> RegionCatalog {
        RegionCatalog::from_regions(regions.iter().map(|r| r.to_string()))
    }

    #[test]
    fn test_cartesian_product_region_major() {
        let plan = plan(
            &Selection::Names(vec!["us-west-2".into(), "us-east-1".into()]),
            &Selection::Names(vec!["rds".into(), "ec2".into()]),
            &catalog(&["us-east-1", "us-west-2"]),
            &registry(&["ec2", "rds"]),
        );

        assert_eq!(plan.tasks.len(), 4);
        assert!(plan.issues.is_empty());
        assert_eq!(
            plan.tasks,
            vec![
                AuditTask::new("us-east-1", "ec2"),
                AuditTask::new("us-east-1", "rds"),
                AuditTask::new("us-west-2", "ec2"),
                AuditTask::new("us-west-2", "rds"),
            ]
        );
    }

    #[test]
    fn test_all_sentinel_resolves_alphabetically() {
        let plan = plan(
            &Selection::All,
            &Selection::All,
            &catalog(&["us-west-2", "eu-west-1"]),
            &registry(&["s3", "ec2"]),
        );

        assert_eq!(plan.regions, vec!["eu-west-1", "us-west-2"]);
        assert_eq!(plan.services, vec!["ec2", "s3"]);
        assert_eq!(plan.tasks.len(), 4);
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let plan = plan(
            &Selection::Names(vec![
                "us-east-1".into(),
                "us-east-1".into(),
                "us-east-1".into(),
            ]),
            &Selection::Names(vec!["ec2".into(), "ec2".into()]),
            &catalog(&["us-east-1"]),
            &registry(&["ec2"]),
        );
        assert_eq!(plan.tasks.len(), 1);
    }

    #[test]
    fn test_unknown_region_becomes_issue_not_abort() {
        let plan = plan(
            &Selection::Names(vec!["xx-fake-1".into(), "us-east-1".into()]),
            &Selection::Names(vec!["ec2".into()]),
            &catalog(&["us-east-1"]),
            &registry(&["ec2"]),
        );

        // Valid region still gets its task; the bad one yields zero tasks
        assert_eq!(plan.tasks, vec![AuditTask::new("us-east-1", "ec2")]);
        assert_eq!(plan.issues.len(), 1);
        assert_eq!(plan.issues[0].kind, IssueKind::UnknownRegion);
        assert_eq!(plan.issues[0].name, "xx-fake-1");
    }

    #[test]
    fn test_unknown_service_becomes_issue() {
        let plan = plan(
            &Selection::Names(vec!["us-east-1".into()]),
            &Selection::Names(vec!["ec2".into(), "glacier".into()]),
            &catalog(&["us-east-1"]),
            &registry(&["ec2"]),
        );
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.issues.len(), 1);
        assert_eq!(plan.issues[0].kind, IssueKind::UnknownService);
    }

    #[test]
    fn test_permissive_catalog_flags_unverified() {
        let plan = plan(
            &Selection::Names(vec!["xx-lab-1".into()]),
            &Selection::Names(vec!["ec2".into()]),
            &catalog(&["us-east-1"]).permissive(),
            &registry(&["ec2"]),
        );
        // Unverified regions are audited but flagged
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.issues.len(), 1);
        assert_eq!(plan.issues[0].kind, IssueKind::UnverifiedRegion);
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::parse("ALL"), Selection::All);
        assert_eq!(
            Selection::parse("ec2, rds,,s3"),
            Selection::Names(vec!["ec2".into(), "rds".into(), "s3".into()])
        );
    }

    #[test]
    fn test_identical_inputs_identical_plans() {
        let catalog = catalog(&["us-east-1", "us-west-2"]);
        let registry = registry(&["ec2", "rds", "s3"]);
        let a = plan(&Selection::All, &Selection::All, &catalog, &registry);
        let b = plan(&Selection::All, &Selection::All, &catalog, &registry);
        assert_eq!(a, b);
    }
}
