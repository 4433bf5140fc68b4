use colored::*;
use formd::{
    core::config::{HarvestConfig, Overrides},
    edgar::{self, harvest::CikFailureKind, EdgarClient, ReportType},
    ProgressTracker,
};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "formd-cli",
    about = "Collect Form D filings from the SEC EDGAR submissions API"
)]
struct Opt {
    /// CIK to query; repeat the flag or separate with commas. Overrides FORMD_CIKS.
    #[structopt(short, long = "cik")]
    ciks: Vec<String>,

    /// Output JSON file. Overrides FORMD_OUTPUT.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds. Overrides FORMD_TIMEOUT_SECS.
    #[structopt(long)]
    timeout_secs: Option<u64>,

    /// User-Agent sent to EDGAR. Overrides USER_AGENT.
    #[structopt(long)]
    user_agent: Option<String>,

    /// Form type to collect; repeatable. Defaults to D.
    #[structopt(long = "form")]
    forms: Vec<String>,

    /// Show a progress bar.
    #[structopt(long)]
    progress: bool,

    /// Print the known form types and exit.
    #[structopt(long)]
    list_forms: bool,
}

fn describe(kind: &CikFailureKind) -> &'static str {
    match kind {
        CikFailureKind::Fetch(edgar::FetchError::Status { .. }) => "upstream status",
        CikFailureKind::Fetch(_) => "transport",
        CikFailureKind::Extract(_) => "misaligned filings table",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opt = Opt::from_args();

    if opt.list_forms {
        println!("{}", ReportType::list_types());
        return Ok(());
    }

    let config = HarvestConfig::from_env()?.with_overrides(Overrides {
        ciks: opt.ciks,
        output_path: opt.output,
        timeout_secs: opt.timeout_secs,
        user_agent: opt.user_agent,
        forms: opt.forms,
    })?;
    config.validate()?;
    log::debug!("Harvest config: {:?}", config);

    let client = EdgarClient::new(&config)?;
    let progress = ProgressTracker::new(opt.progress, config.ciks.len() as u64)?;

    let report = edgar::harvest(&client, &config, &progress).await;

    for failure in &report.failures {
        eprintln!(
            "{} CIK {} ({}): {}",
            "failed".red().bold(),
            failure.cik,
            describe(&failure.error),
            failure.error
        );
    }

    edgar::save(&config, &report)?;

    println!(
        "{} {} filing(s) from {} of {} CIK(s) to {}",
        "Saved".green().bold(),
        report.records.len(),
        report.processed.len(),
        config.ciks.len(),
        config.output_path.display().to_string().blue()
    );

    Ok(())
}
