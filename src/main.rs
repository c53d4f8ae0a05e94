// Review harvester CLI
//
// Builds a scrape job from command-line arguments, runs it on the
// background runner, and polls progress snapshots until the job reaches a
// terminal status.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use std::path::Path;
use std::time::Duration;

use review_harvester::{
    ChromiumFactory, JobRunner, JobStatus, Pacing, ProgressState, ScrapeJob,
    config::DEFAULT_MAX_ITERATIONS, harvester,
};

const USAGE: &str = "\
Usage: review-harvester --from YYYY-MM-DD --to YYYY-MM-DD \
[--max-iterations N] [--output-dir DIR] [--headed] URL [URL ...]

Harvests Flipkart product reviews within the inclusive date range into
output/reviews_<timestamp>.csv and .xlsx.";

struct CliArgs {
    from: NaiveDate,
    to: NaiveDate,
    max_iterations: u32,
    output_dir: Option<String>,
    headless: bool,
    urls: Vec<String>,
}

fn parse_args() -> Result<CliArgs> {
    let mut from = None;
    let mut to = None;
    let mut max_iterations = DEFAULT_MAX_ITERATIONS;
    let mut output_dir = None;
    let mut headless = true;
    let mut urls = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--from" => {
                let value = args.next().context("--from requires a date")?;
                from = Some(parse_date(&value)?);
            }
            "--to" => {
                let value = args.next().context("--to requires a date")?;
                to = Some(parse_date(&value)?);
            }
            "--max-iterations" => {
                let value = args.next().context("--max-iterations requires a number")?;
                max_iterations = value
                    .parse()
                    .with_context(|| format!("invalid iteration count: {value}"))?;
            }
            "--output-dir" => {
                output_dir = Some(args.next().context("--output-dir requires a path")?);
            }
            "--headed" => headless = false,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ => urls.push(arg),
        }
    }

    let (Some(from), Some(to)) = (from, to) else {
        bail!("--from and --to are required\n\n{USAGE}");
    };
    if urls.is_empty() {
        bail!("at least one product URL is required\n\n{USAGE}");
    }

    Ok(CliArgs {
        from,
        to,
        max_iterations,
        output_dir,
        headless,
        urls,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // One global subscriber: the browser layer emits tracing events, the
    // pipeline uses log macros, and tracing-subscriber's log bridge carries
    // both. Installing a separate log logger alongside it would make this
    // init fail.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;

    let mut builder = ScrapeJob::builder().max_iterations(args.max_iterations);
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir);
    }
    let job = builder
        .product_urls(&args.urls.join("\n"))
        .date_range(args.from, args.to)
        .build()?;

    let csv_path = job.csv_path().to_path_buf();
    let xlsx_path = job.xlsx_path().to_path_buf();

    let runner = JobRunner::with_pacing(ChromiumFactory::new(args.headless), Pacing::DEFAULT);
    runner.start(job)?;

    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let status = runner.status();
        log::info!(
            "status={:?} iteration={} reviews={}",
            status.status,
            status.current_iteration,
            status.total_reviews
        );
        match status.status {
            JobStatus::Completed => {
                for err in &status.product_errors {
                    log::warn!("skipped: {err}");
                }
                println!("{}", completion_summary(&status, &csv_path, &xlsx_path));
                return Ok(());
            }
            JobStatus::Error => {
                bail!(
                    "job failed: {}",
                    status.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }
            JobStatus::Idle | JobStatus::Running => {}
        }
    }
}

/// Terminal summary for a completed job. Per-product errors are logged
/// separately; whenever anything was collected the counts and output paths
/// are reported.
fn completion_summary(status: &ProgressState, csv_path: &Path, xlsx_path: &Path) -> String {
    if status.total_reviews > 0 {
        format!(
            "Collected {} reviews\n  dataset:     {}\n  spreadsheet: {}",
            status.total_reviews,
            csv_path.display(),
            xlsx_path.display()
        )
    } else {
        status
            .error
            .clone()
            .unwrap_or_else(|| harvester::NO_REVIEWS_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(total: usize, error: Option<&str>, product_errors: &[&str]) -> ProgressState {
        ProgressState {
            total_reviews: total,
            status: JobStatus::Completed,
            error: error.map(ToString::to_string),
            product_errors: product_errors.iter().map(ToString::to_string).collect(),
            ..ProgressState::default()
        }
    }

    #[test]
    fn summary_reports_counts_despite_product_errors() {
        let status = completed(4, Some("product 2: connection refused"), &[
            "product 2: connection refused",
        ]);
        let summary = completion_summary(
            &status,
            Path::new("out/reviews.csv"),
            Path::new("out/reviews.xlsx"),
        );
        assert!(summary.starts_with("Collected 4 reviews"));
        assert!(summary.contains("out/reviews.csv"));
        assert!(summary.contains("out/reviews.xlsx"));
    }

    #[test]
    fn summary_shows_message_only_for_empty_results() {
        let status = completed(0, Some("No reviews found"), &[]);
        let summary = completion_summary(
            &status,
            Path::new("out/reviews.csv"),
            Path::new("out/reviews.xlsx"),
        );
        assert_eq!(summary, "No reviews found");
    }
}
