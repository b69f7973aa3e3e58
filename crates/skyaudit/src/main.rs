mod render;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use skyaudit_core::{AuditConfig, DEFAULT_WORKER_BUDGET, Scheduler, Selection, aggregate, plan};
use skyaudit_probe::{ProbeRegistry, RegionCatalog};
use skyaudit_report::{Report, write_json_report};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "skyaudit", version)]
#[command(about = "Inventory AWS resources across regions and services")]
struct Cli {
    /// AWS profile to use
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Regions to audit: comma-separated list, or "all" enabled regions
    #[arg(long, default_value = "all")]
    regions: String,

    /// Services to audit: comma-separated list, or "all" registered probes
    #[arg(long, default_value = "all")]
    services: String,

    /// Maximum number of probe calls in flight at once
    #[arg(long, default_value_t = DEFAULT_WORKER_BUDGET)]
    workers: usize,

    /// Overall run deadline in seconds; unfinished tasks report as timed out
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Directory for the JSON report
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt::init();

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        // Default region for the bootstrap calls (DescribeRegions)
        .region(aws_config::Region::new("us-east-1"));
    if let Some(profile) = &cli.profile {
        loader = loader.profile_name(profile);
    }
    let sdk_config = loader.load().await;

    let mut registry = ProbeRegistry::new();
    skyaudit_aws::register_default_probes(&mut registry, &sdk_config);
    let registry = Arc::new(registry);

    let catalog = match skyaudit_aws::discover_regions(&sdk_config).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("Region discovery failed ({}), using builtin catalog", e);
            RegionCatalog::builtin()
        }
    };

    let task_plan = plan(
        &Selection::parse(&cli.regions),
        &Selection::parse(&cli.services),
        &catalog,
        &registry,
    );

    let service_labels: Vec<String> = task_plan
        .services
        .iter()
        .filter_map(|s| registry.get(s).map(|p| p.display_name().to_string()))
        .collect();
    println!(
        "Auditing {} regions x {} services ({} tasks, {} workers)",
        task_plan.regions.len().to_string().cyan(),
        task_plan.services.len().to_string().cyan(),
        task_plan.tasks.len(),
        cli.workers
    );
    println!("Services: {}", service_labels.join(", ").cyan());

    let config = AuditConfig {
        worker_budget: cli.workers,
        run_timeout: cli.timeout_secs.map(Duration::from_secs),
    };
    let run = Scheduler::new(registry, config)
        .run(task_plan)
        .await
        .context("audit run failed")?;
    let summary = aggregate(&run).context("aggregation failed")?;

    render::print_summary(&run, &summary);

    let report = Report::new(run, summary);
    let path = write_json_report(&report, &cli.output_dir)
        .await
        .context("failed to write report")?;
    println!();
    println!("Report saved to {}", path.display().to_string().green());

    Ok(())
}
