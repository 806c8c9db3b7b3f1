// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use congreso_scraper::application::use_cases::current_page::{
    members_per_group, CurrentPageUseCase,
};
use congreso_scraper::application::use_cases::scrape_periods::ScrapePeriodsUseCase;
use congreso_scraper::config::settings::Settings;
use congreso_scraper::domain::models::member::CongressMember;
use congreso_scraper::domain::models::period::PeriodIdentifier;
use congreso_scraper::domain::repositories::page_store::PageStore;
use congreso_scraper::domain::services::current_page_cache::CurrentPageCache;
use congreso_scraper::domain::services::period_fetch_cache::PeriodFetchCache;
use congreso_scraper::engines::chromium_session::ChromiumSessionFactory;
use congreso_scraper::engines::http_fetcher::HttpPageFetcher;
use congreso_scraper::infrastructure::database::connection;
use congreso_scraper::infrastructure::export::write_members;
use congreso_scraper::infrastructure::metrics::init_metrics;
use congreso_scraper::infrastructure::repositories::memory_page_store::MemoryPageStore;
use congreso_scraper::infrastructure::repositories::page_store_impl::PageStoreImpl;
use congreso_scraper::utils::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "congreso-scraper")]
#[command(about = "Period-aware scraper for the Peruvian Congress member listing", long_about = None)]
struct Cli {
    /// Keep fetched pages in memory instead of the configured database
    #[arg(long, global = true)]
    memory_store: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the parliamentary periods offered by the period dropdown
    Periods,
    /// Export the members of the page shown by default
    Current {
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Fetch one or more periods through the browser and export their members
    Fetch {
        /// Period labels exactly as shown in the dropdown
        periods: Vec<String>,
        /// Fetch every period listed in the dropdown
        #[arg(long, conflicts_with = "periods")]
        all: bool,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Retries per period for timeouts and transient transport failures
        #[arg(long, default_value_t = 2)]
        retries: u32,
    },
}

/// 主函数
///
/// 初始化日志、配置、存储，然后执行子命令
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.json_logs);
    let settings = Settings::new()?;
    init_metrics(&settings.metrics)?;

    let store: Arc<dyn PageStore> = if cli.memory_store {
        info!("Using in-memory page store");
        Arc::new(MemoryPageStore::new())
    } else {
        let db = connection::connect_and_migrate(&settings.database).await?;
        Arc::new(PageStoreImpl::new(Arc::new(db)))
    };

    let fetcher = Arc::new(HttpPageFetcher::new(
        &settings.scraper.user_agent,
        settings.scraper.http_timeout(),
    )?);
    let current = CurrentPageUseCase::new(
        Arc::new(CurrentPageCache::new(
            fetcher,
            store.clone(),
            settings.scraper.base_url.clone(),
            settings.scraper.freshness(),
        )),
        settings.scraper.period_selector.clone(),
    );
    let default_output = PathBuf::from(&settings.output.directory);

    match cli.command {
        Commands::Periods => {
            let periods = current.periods().await?;
            println!("Found {} parliamentary periods:", periods.len());
            for period in periods {
                let years = match (period.start_year, period.end_year) {
                    (Some(start), Some(end)) => format!("{} - {}", start, end),
                    _ => "-".to_string(),
                };
                println!("  {:<35} {}", period.id, years);
            }
        }
        Commands::Current { output_dir } => {
            let members = current.members().await?;
            let dir = output_dir.unwrap_or(default_output);
            let (json_path, csv_path) = write_members(&dir, "congress_members", &members).await?;
            println!(
                "Wrote {} members to {} and {}",
                members.len(),
                json_path.display(),
                csv_path.display()
            );
            print_group_summary(&members);
        }
        Commands::Fetch {
            periods,
            all,
            output_dir,
            retries,
        } => {
            let periods: Vec<PeriodIdentifier> = if all {
                current.periods().await?.into_iter().map(|p| p.id).collect()
            } else {
                periods
                    .iter()
                    .map(PeriodIdentifier::new)
                    .collect::<Result<_, _>>()?
            };
            if periods.is_empty() {
                bail!("no periods given; pass period labels or --all");
            }

            let sessions = Arc::new(ChromiumSessionFactory::new(
                &settings.browser,
                settings.scraper.user_agent.clone(),
            ));
            let cache = Arc::new(PeriodFetchCache::new(
                sessions,
                store,
                settings.scraper.fetch_options(),
            ));
            let scrape = ScrapePeriodsUseCase::new(cache, output_dir.unwrap_or(default_output))
                .with_retries(retries, Duration::from_secs(2));

            let report = scrape.execute(&periods).await;
            for entry in &report.periods {
                match &entry.outcome {
                    Ok(summary) => println!(
                        "  {:<35} {:>4} members ({:?}) -> {}",
                        entry.period,
                        summary.members.len(),
                        summary.source,
                        summary.json_path.display()
                    ),
                    Err(e) => println!("  {:<35} FAILED: {}", entry.period, e),
                }
            }
            println!(
                "Fetched: {}, cached: {}, failed: {}",
                report.fetched(),
                report.cached(),
                report.failed()
            );
            if report.failed() > 0 {
                bail!("{} period(s) failed", report.failed());
            }
        }
    }

    Ok(())
}

fn print_group_summary(members: &[CongressMember]) {
    println!("Members per parliamentary group:");
    for (group, count) in members_per_group(members) {
        println!("  {:<50} {}", group, count);
    }
}
