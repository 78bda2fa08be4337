//! casebrowse: command-line browser for case records.

mod command;
mod logging;
mod render;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use casebrowse_client::{ClientConfig, HttpCaseSource};
use casebrowse_core::{CaseSource, FacetLists, PageInfo, QueryState};
use casebrowse_session::{BrowseSession, SessionConfig, SessionEvent};

use crate::command::{BrowseCommand, HELP};

#[derive(Parser)]
#[command(name = "casebrowse")]
#[command(author, version, about = "Search, filter and page through case records")]
#[command(propagate_version = true)]
struct Cli {
    /// API base URL (overrides CASEBROWSE_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of matching cases
    List {
        /// Free-text search
        #[arg(short, long)]
        q: Option<String>,

        /// Center code
        #[arg(long)]
        center: Option<String>,

        /// Category
        #[arg(long)]
        category: Option<String>,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u64,

        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the available filter options
    Facets {
        /// Print normalized options as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every field of one case
    Show {
        /// Case identifier
        case_id: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive browsing from stdin
    Browse,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init();

    let cli = Cli::parse();

    let mut client_config = ClientConfig::load().context("Failed to load client config")?;
    if let Some(url) = cli.api_url {
        client_config.base_url = url;
    }
    if let Some(secs) = cli.timeout {
        client_config.timeout_seconds = secs;
    }
    let source: Arc<dyn CaseSource> = Arc::new(HttpCaseSource::new(client_config)?);
    let session_config = SessionConfig::from_env();

    match cli.command {
        Commands::List {
            q,
            center,
            category,
            page,
            json,
        } => {
            let mut query = QueryState::new(session_config.page_limit);
            query.set_text(q.unwrap_or_default());
            query.set_center(center.unwrap_or_default());
            query.set_category(category.unwrap_or_default());
            cmd_list(source.as_ref(), query, page, json).await
        }
        Commands::Facets { json } => cmd_facets(source.as_ref(), json).await,
        Commands::Show { case_id, json } => cmd_show(source.as_ref(), &case_id, json).await,
        Commands::Browse => cmd_browse(source, session_config).await,
    }
}

async fn cmd_list(
    source: &dyn CaseSource,
    mut query: QueryState,
    page: u64,
    json: bool,
) -> anyhow::Result<()> {
    query.set_offset(page.saturating_sub(1).saturating_mul(query.limit()));
    let mut list = source.list_cases(&query.to_request()).await?;

    // Past the end: show the last page instead.
    let info = PageInfo::compute(list.total, query.limit(), query.offset());
    if query.offset() > info.last_offset() {
        debug!(requested = query.offset(), "Page out of range, clamping");
        query.set_offset(info.last_offset());
        list = source.list_cases(&query.to_request()).await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let info = PageInfo::compute(list.total, query.limit(), query.offset());
    let state = casebrowse_core::ResultState {
        items: list.items,
        total: list.total,
        loading: false,
        errored: false,
        query: Some(query),
    };
    println!("{}", render::results(&state, &info));
    Ok(())
}

async fn cmd_facets(source: &dyn CaseSource, json: bool) -> anyhow::Result<()> {
    let catalog = source.list_facets().await?;
    let lists = FacetLists::from(&catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
    } else {
        print_facets(&lists);
    }
    Ok(())
}

async fn cmd_show(source: &dyn CaseSource, case_id: &str, json: bool) -> anyhow::Result<()> {
    let detail = source.get_case(case_id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print!("{}", render::detail(&detail));
    }
    Ok(())
}

fn print_facets(lists: &FacetLists) {
    print!("{}", render::facet_list("Centers", &lists.centers));
    print!("{}", render::facet_list("Categories", &lists.categories));
}

async fn cmd_browse(source: Arc<dyn CaseSource>, config: SessionConfig) -> anyhow::Result<()> {
    let session = BrowseSession::start(source, config);
    let mut events = session.events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                match BrowseCommand::parse(&line) {
                    Ok(BrowseCommand::Quit) => break,
                    Ok(cmd) => {
                        if let Some(msg) = apply(&session, cmd) {
                            println!("{}", msg);
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            event = events.recv() => match event {
                Ok(SessionEvent::Resolved { .. }) => {
                    println!("{}", render::results(&session.results(), &session.page_info()));
                }
                Ok(SessionEvent::Notification(notice)) => eprintln!("{}", notice),
                Ok(SessionEvent::Stopped) | Err(RecvError::Closed) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Session event stream lagged");
                }
            },
        }
    }

    session.shutdown().await?;
    Ok(())
}

/// Apply one browse command. Returns a message for the user when the
/// command had nothing to do.
fn apply(session: &BrowseSession, cmd: BrowseCommand) -> Option<String> {
    let changed = match cmd {
        BrowseCommand::Next | BrowseCommand::Prev | BrowseCommand::Page(_)
            if !session.results().describes(&session.query()) =>
        {
            return Some("Results for these filters are still loading.".into());
        }
        BrowseCommand::Search(text) => session.set_text(text),
        BrowseCommand::Center(code) => session.set_center(code),
        BrowseCommand::Category(code) => session.set_category(code),
        BrowseCommand::Next => {
            if !session.next_page() {
                return Some("Already on the last page.".into());
            }
            true
        }
        BrowseCommand::Prev => {
            if !session.prev_page() {
                return Some("Already on the first page.".into());
            }
            true
        }
        BrowseCommand::Page(page) => session.go_to_page(page),
        BrowseCommand::Clear => session.clear_all(),
        BrowseCommand::Facets => {
            let lists = session.facets();
            let mut out = render::facet_list("Centers", &lists.centers);
            out.push_str(&render::facet_list("Categories", &lists.categories));
            return Some(out.trim_end().to_string());
        }
        BrowseCommand::Help => return Some(HELP.to_string()),
        BrowseCommand::Quit => false,
    };

    (!changed).then(|| "Nothing changed.".to_string())
}
