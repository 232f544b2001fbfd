mod actions;
mod api_client;
mod table;
mod views;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reeltrack_core::{AddPostRequest, SortMode};
use tracing_subscriber::EnvFilter;

use crate::actions::{ActionOutcome, AssumeYes, Confirm, StdinConfirm};
use crate::api_client::ApiClient;
use crate::views::{CampaignView, DashboardView};

#[derive(Debug, Parser)]
#[command(name = "reeltrack-cli")]
#[command(about = "Instagram engagement tracker command line client")]
struct Cli {
    /// Base URL of the reeltrack server
    #[arg(
        long,
        global = true,
        env = "APP_BASE_URL",
        default_value = "http://localhost:8000"
    )]
    base_url: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show totals, campaign summaries and every tracked post
    Dashboard {
        /// Order posts by views: asc or desc
        #[arg(long, default_value_t = SortMode::Desc)]
        sort: SortMode,
    },
    /// Show the read-only share view for one campaign
    Campaign {
        campaign_id: i64,
        #[arg(long, default_value_t = SortMode::Desc)]
        sort: SortMode,
    },
    /// Track a single reel or post
    Add {
        #[arg(long)]
        campaign: String,
        /// Creator handle, with or without a leading @
        #[arg(long)]
        handle: String,
        /// Instagram /reel/ or /p/ link
        #[arg(long)]
        url: String,
        #[arg(long)]
        followers: Option<String>,
        /// Creator display name
        #[arg(long)]
        name: Option<String>,
    },
    /// Track many posts from tab-separated rows (Name, Profile Link, Followers, Live Link)
    BulkAdd {
        #[arg(long)]
        campaign: String,
        /// File with the rows, or `-` for stdin
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a creator with all of their posts and snapshots
    DeleteCreator {
        creator_id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete every campaign, creator, post and snapshot
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Fetch fresh metrics now, for one post or all active posts
    PollNow {
        #[arg(long)]
        post_id: Option<i64>,
    },
    /// Run the daily poll through the cron endpoint
    TriggerDaily {
        #[arg(long, env = "CRON_SECRET", hide_env_values = true)]
        cron_secret: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(&cli.base_url)?;

    match cli.command {
        None => show_dashboard(api, SortMode::Desc).await,
        Some(Commands::Dashboard { sort }) => show_dashboard(api, sort).await,
        Some(Commands::Campaign { campaign_id, sort }) => {
            show_campaign(api, campaign_id, sort).await
        }
        Some(Commands::Add {
            campaign,
            handle,
            url,
            followers,
            name,
        }) => {
            let mut view = DashboardView::new(api);
            let outcome = view
                .add_post(AddPostRequest {
                    campaign_name: campaign,
                    creator_handle: handle,
                    post_url: url,
                    followers_text: followers,
                    creator_name: name,
                })
                .await;
            report(&view, &outcome)
        }
        Some(Commands::BulkAdd { campaign, file }) => {
            let rows = read_rows(&file)?;
            let mut view = DashboardView::new(api);
            let outcome = view.bulk_add(&campaign, &rows).await;
            report(&view, &outcome)
        }
        Some(Commands::DeleteCreator { creator_id, yes }) => {
            let mut view = DashboardView::new(api);
            if let Err(e) = view.refresh().await {
                anyhow::bail!(e.user_message());
            }
            let handle = view
                .creator_handle(creator_id)
                .map_or_else(|| format!("creator-{creator_id}"), str::to_string);
            let outcome = view
                .delete_creator(creator_id, &handle, confirmer(yes).as_mut())
                .await;
            report(&view, &outcome)
        }
        Some(Commands::DeleteAll { yes }) => {
            let mut view = DashboardView::new(api);
            let outcome = view.delete_all(confirmer(yes).as_mut()).await;
            report(&view, &outcome)
        }
        Some(Commands::PollNow { post_id }) => {
            let mut view = DashboardView::new(api);
            let outcome = view.poll_now(post_id).await;
            report(&view, &outcome)
        }
        Some(Commands::TriggerDaily { cron_secret }) => match api.trigger_daily(&cron_secret).await {
            Ok(resp) => {
                println!("Polled {} post(s) at {}.", resp.polled, resp.ran_at);
                Ok(())
            }
            Err(e) => anyhow::bail!(e.user_message()),
        },
    }
}

fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    }
}

fn read_rows(file: &Path) -> anyhow::Result<String> {
    let mut rows = String::new();
    if file.as_os_str() == "-" {
        std::io::stdin().read_to_string(&mut rows)?;
    } else {
        rows = std::fs::read_to_string(file)?;
    }
    Ok(rows)
}

async fn show_dashboard(api: ApiClient, sort: SortMode) -> anyhow::Result<()> {
    let mut view = DashboardView::new(api);
    if let Err(e) = view.refresh().await {
        anyhow::bail!(e.user_message());
    }
    view.set_sort(sort);
    print!("{}", table::dashboard_text(&view.render(), view.sort()));
    Ok(())
}

async fn show_campaign(api: ApiClient, campaign_id: i64, sort: SortMode) -> anyhow::Result<()> {
    let mut view = CampaignView::new(api, campaign_id);
    if let Err(e) = view.refresh().await {
        anyhow::bail!(e.user_message());
    }
    view.set_sort(sort);
    if let Some(render) = view.render() {
        print!("{}", table::campaign_text(&render, sort));
    }
    Ok(())
}

/// Prints the action notice, then the re-fetched dashboard after a success.
fn report(view: &DashboardView, outcome: &ActionOutcome) -> anyhow::Result<()> {
    match outcome {
        ActionOutcome::Completed(notice) => {
            println!("{notice}");
            println!();
            print!("{}", table::dashboard_text(&view.render(), view.sort()));
            Ok(())
        }
        ActionOutcome::Failed(notice) => anyhow::bail!(notice.text.clone()),
        ActionOutcome::Cancelled => {
            println!("Cancelled; nothing was deleted.");
            Ok(())
        }
        ActionOutcome::Busy => anyhow::bail!("another request for this action is still running"),
    }
}
