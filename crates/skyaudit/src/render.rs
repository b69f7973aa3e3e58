//! Console summary rendering

use colored::Colorize;
use skyaudit_core::{RunResult, ServiceTotal, Summary, UsageCell};

pub fn print_summary(run: &RunResult, summary: &Summary) {
    if !run.issues.is_empty() {
        println!();
        println!("{}", "Selection issues:".yellow().bold());
        for issue in &run.issues {
            println!("  {} {}", "!".yellow(), issue.message);
        }
    }

    println!();
    println!("{}", "Resources by region:".bold());
    for (region, stats) in &summary.region_summary {
        let failures = if stats.failed_tasks.is_empty() {
            String::new()
        } else {
            format!(" ({} failed probes)", stats.failed_tasks.len())
                .red()
                .to_string()
        };
        println!(
            "  {:<20} {}{}",
            region.cyan(),
            stats.resources,
            failures
        );
        for failed in &stats.failed_tasks {
            println!(
                "      {} {}: {}",
                "x".red(),
                failed.service,
                failed.kind
            );
        }
    }

    println!();
    println!("{}", "Resources by service:".bold());
    for (service, total) in &summary.service_counts {
        match total {
            ServiceTotal::Count(n) => println!("  {:<20} {}", service.cyan(), n),
            ServiceTotal::Unavailable => {
                println!("  {:<20} {}", service.cyan(), "unavailable".red())
            }
        }
    }

    println!();
    println!("{}", "Usage by region:".bold());
    for (region, row) in &summary.usage_matrix {
        let cells: Vec<String> = row
            .iter()
            .map(|(service, cell)| match cell {
                UsageCell::Count(0) => format!("{}:-", service),
                UsageCell::Count(n) => format!("{}:{}", service, n).green().to_string(),
                UsageCell::Unavailable(_) => format!("{}:!", service).red().to_string(),
            })
            .collect();
        println!("  {:<20} {}", region.cyan(), cells.join("  "));
    }

    println!();
    println!(
        "{} tasks: {} ok, {} failed, {} resources total",
        run.task_count(),
        run.succeeded_count().to_string().green(),
        run.failed_count().to_string().red(),
        run.resource_count()
    );
}
