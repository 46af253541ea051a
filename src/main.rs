//! premstat - Summarize premium request usage exports and estimate monthly overage

use premstat::{
    aggregation::Aggregator,
    cli::{Cli, Command},
    cost_calculator::CostCalculator,
    csv_export::write_report_tables,
    data_loader::{DataLoader, LoadedEvents},
    error::{PremstatError, Result},
    filters::{QuotaThresholdFilter, UpgradeCandidateFilter},
    output::get_formatter,
    report::UsageReport,
    timezone::TimezoneConfig,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Load the export named on the command line
fn load_events(cli: &Cli, tz_config: &TimezoneConfig) -> Result<LoadedEvents> {
    let mut loader = DataLoader::new()
        .with_timezone(tz_config.clone())
        .with_delimiter(cli.delimiter);
    if let Some(column) = &cli.quota_column {
        loader = loader.with_quota_column(column);
    }

    let loaded = loader.load_file(&cli.input)?;
    info!(
        "Loaded {} premium requests from {} ({} unlimited-quota rows excluded)",
        loaded.events.len(),
        cli.input.display(),
        loaded.excluded_unlimited
    );
    Ok(loaded)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::new("premstat=debug,premstat_core=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("premstat=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.no_color || cli.json || !is_terminal::is_terminal(std::io::stdout()) {
        colored::control::set_override(false);
    }

    let tz_config = TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.local)?;
    info!("Using timezone: {}", tz_config.display_name());

    let calculator = CostCalculator::new(cli.unit_cost)?;
    let formatter = get_formatter(cli.json);
    let loaded = load_events(&cli, &tz_config)?;

    match cli.command() {
        Command::Report => {
            // Build everything before touching the output directory
            let report = UsageReport::build(&loaded.events, &calculator);
            let written = write_report_tables(&report, &cli.output_dir)?;
            for path in &written {
                info!("Wrote {}", path.display());
            }
            println!("{}", formatter.format_report(&report));
        }
        Command::NearQuota {
            threshold,
            estimated,
        } => {
            let filter = QuotaThresholdFilter::new(threshold)?;
            let report = UsageReport::build(&loaded.events, &calculator);
            let users = if estimated {
                filter.apply(&report.estimated)
            } else {
                filter.apply(&report.per_user)
            };
            println!(
                "{}",
                formatter.format_near_quota(&users, filter.threshold_percent(), estimated)
            );
        }
        Command::UpgradeCandidates {
            estimated,
            plan_quota,
            min_requests,
        } => {
            if !plan_quota.is_finite() || plan_quota < 0.0 {
                return Err(PremstatError::InvalidArgument(format!(
                    "plan quota must be a non-negative number, got {plan_quota}"
                )));
            }
            let filter = UpgradeCandidateFilter::new(plan_quota, min_requests);
            let report = UsageReport::build(&loaded.events, &calculator);
            let users = if estimated {
                filter.apply(&report.estimated)
            } else {
                filter.apply(&report.per_user)
            };
            println!("{}", formatter.format_upgrade_candidates(&users, estimated));
        }
        Command::Daily => {
            let aggregator = Aggregator::new(tz_config);
            let days = aggregator.requests_per_day(&loaded.events);
            println!("{}", formatter.format_daily(&days));
        }
    }

    Ok(())
}
