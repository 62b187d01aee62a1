mod api;
mod config;
mod export;
mod form;
mod logging;
mod models;
mod runtime;
mod state;
mod tui;
mod update;

use anyhow::{Context, Result, bail};
use api::ApiClient;
use clap::{Args, Parser, Subcommand};
use config::Config;
use form::CreateForm;
use logging::LogDestination;
use models::{Application, LinkFilter, ListQuery, SortOrder, Status, total_pages};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "applyintel")]
#[command(about = "Track job applications against an ApplyIntel API server")]
struct Cli {
    /// API base URL (overrides config file and APPLYINTEL_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to a config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,

    /// List one page of applications
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Add an application
    Add {
        /// Company name
        company: String,

        /// Role title
        role: String,

        /// Status (saved, applied, interview, offer, rejected)
        #[arg(short, long, default_value = "applied")]
        status: String,

        /// Date applied (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Location
        #[arg(short, long)]
        location: Option<String>,

        /// Posting URL
        #[arg(short, long)]
        url: Option<String>,

        /// Next action date (YYYY-MM-DD)
        #[arg(long)]
        next_action: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Change an application's status
    Status {
        /// Application ID
        id: i64,

        /// New status (saved, applied, interview, offer, rejected)
        status: String,
    },

    /// Soft-delete an application
    Delete {
        /// Application ID
        id: i64,
    },

    /// Restore a deleted application
    Restore {
        /// Application ID
        id: i64,
    },

    /// Show pipeline statistics
    Stats,

    /// Export one page of applications to CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (defaults to jobtrackr_export.csv in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the API server is reachable
    Health,
}

#[derive(Args)]
struct FilterArgs {
    /// Search company or role
    #[arg(short, long)]
    query: Option<String>,

    /// Filter by status (saved, applied, interview, offer, rejected)
    #[arg(short, long)]
    status: Option<String>,

    /// Only applications with a posting URL
    #[arg(long, conflicts_with = "missing_link")]
    has_link: bool,

    /// Only applications without a posting URL
    #[arg(long)]
    missing_link: bool,

    /// Oldest first
    #[arg(long)]
    asc: bool,

    /// Page number (10 per page)
    #[arg(short, long, default_value = "1")]
    page: u32,
}

impl FilterArgs {
    fn to_query(&self) -> Result<ListQuery> {
        let status = match &self.status {
            Some(s) => Some(s.parse::<Status>()?),
            None => None,
        };
        let link = if self.has_link {
            LinkFilter::HasLink
        } else if self.missing_link {
            LinkFilter::MissingLink
        } else {
            LinkFilter::Any
        };
        Ok(ListQuery {
            q: self
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from),
            status,
            has_link: link.as_param(),
            sort_order: if self.asc {
                SortOrder::Asc
            } else {
                SortOrder::Desc
            },
            ..ListQuery::page(self.page.max(1))
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.set_api_url(url);
    }

    let destination = match command {
        Commands::Dashboard => LogDestination::File,
        _ => LogDestination::Stderr,
    };
    logging::initialize(destination, cli.verbose).context("Failed to initialize logging")?;
    log::debug!("Using API at {}", config.api_url);

    let client = ApiClient::new(&config.api_url, config.request_timeout())
        .with_context(|| format!("Invalid API URL: {}", config.api_url))?;

    match command {
        Commands::Dashboard => {
            tui::run_dashboard(client, config.export_dir.clone()).await?;
        }

        Commands::List { filters } => {
            let query = filters.to_query()?;
            let list = client
                .list_applications(&query)
                .await
                .context("Failed to list applications")?;
            print_applications(&list.items);
            println!();
            println!(
                "Page {} of {} \u{00b7} {} records",
                filters.page.max(1),
                total_pages(list.total),
                list.total
            );
        }

        Commands::Add {
            company,
            role,
            status,
            date,
            location,
            url,
            next_action,
            notes,
        } => {
            let form = CreateForm {
                company,
                role,
                location: location.unwrap_or_default(),
                url: url.unwrap_or_default(),
                status: status.parse()?,
                next_action_date: next_action.unwrap_or_default(),
                notes: notes.unwrap_or_default(),
                ..match date {
                    Some(date) => CreateForm::with_date_applied(date),
                    None => CreateForm::new(chrono::Local::now().date_naive()),
                }
            };
            let payload = form.to_payload()?;
            let app = client
                .create_application(&payload)
                .await
                .context("Failed to create application")?;
            println!("Added application #{}: {} at {}", app.id, app.role, app.company);
        }

        Commands::Status { id, status } => {
            let status: Status = status.parse()?;
            let app = client
                .update_status(id, status)
                .await
                .with_context(|| format!("Failed to update application #{}", id))?;
            println!("Application #{} ({}) is now {}", app.id, app.company, app.status);
        }

        Commands::Delete { id } => {
            let app = client
                .delete_application(id)
                .await
                .with_context(|| format!("Failed to delete application #{}", id))?;
            println!("Deleted application #{} ({})", app.id, app.company);
            println!("Undo with: applyintel restore {}", app.id);
        }

        Commands::Restore { id } => {
            let app = client
                .restore_application(id)
                .await
                .with_context(|| format!("Failed to restore application #{}", id))?;
            println!("Restored application #{} ({})", app.id, app.company);
        }

        Commands::Stats => {
            let stats = client.fetch_stats().await.context("Failed to load stats")?;
            println!("Total applications: {}", stats.total);
            println!("Interviews:         {}", stats.interviews);
            println!("Offers:             {}", stats.count(Status::Offer));
            println!("Response rate:      {}%", stats.response_rate_percent());
            println!();
            println!("{:<12} {:>6}", "STATUS", "COUNT");
            println!("{}", "-".repeat(19));
            for status in Status::ALL {
                println!("{:<12} {:>6}", status, stats.count(status));
            }
            println!();
            println!("Follow-up queue");
            println!("  Due today:  {}", stats.due_today);
            println!("  Saved jobs: {}", stats.saved_jobs);
            println!("  Interviews: {}", stats.interviews);
        }

        Commands::Export { filters, output } => {
            let query = filters.to_query()?;
            let list = client
                .list_applications(&query)
                .await
                .context("Failed to load applications for export")?;
            let path = match output {
                Some(path) => {
                    export::export_to_file(&path, &list.items)?;
                    path
                }
                None => export::export_to_dir(&config.export_dir, &list.items)?,
            };
            println!("Exported {} rows to {}", list.items.len(), path.display());
        }

        Commands::Health => {
            let ok = client
                .health()
                .await
                .with_context(|| format!("API at {} is unreachable", client.base_url()))?;
            if !ok {
                bail!("API at {} reported unhealthy", client.base_url());
            }
            println!("API at {} is healthy", client.base_url());
        }
    }

    Ok(())
}

fn print_applications(apps: &[Application]) {
    if apps.is_empty() {
        println!("No applications found.");
        return;
    }
    println!(
        "{:<6} {:<20} {:<24} {:<10} {:<12} {:<12}",
        "ID", "COMPANY", "ROLE", "STATUS", "APPLIED", "NEXT ACTION"
    );
    println!("{}", "-".repeat(89));
    for app in apps {
        println!(
            "{:<6} {:<20} {:<24} {:<10} {:<12} {:<12}",
            app.id,
            truncate(&app.company, 18),
            truncate(&app.role, 22),
            app.status,
            app.date_applied,
            app.next_action_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Acme", 10), "Acme");
        assert_eq!(truncate("Initech Corporation", 10), "Initech...");
        assert_eq!(truncate("Café Société", 7), "Café...");
    }

    #[test]
    fn test_filter_args_to_query() {
        let cli = Cli::parse_from([
            "applyintel",
            "list",
            "--query",
            " rust ",
            "--status",
            "Interview",
            "--missing-link",
            "--asc",
            "--page",
            "3",
        ]);
        let Some(Commands::List { filters }) = cli.command else {
            panic!("expected list command");
        };
        let query = filters.to_query().unwrap();
        assert_eq!(query.q.as_deref(), Some("rust"));
        assert_eq!(query.status, Some(Status::Interview));
        assert_eq!(query.has_link, Some(false));
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert_eq!(query.offset, 20);
    }

    #[test]
    fn test_no_command_means_dashboard() {
        let cli = Cli::parse_from(["applyintel", "--api-url", "http://example.test/"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.api_url.as_deref(), Some("http://example.test/"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let cli = Cli::parse_from(["applyintel", "list", "--status", "ghosted"]);
        let Some(Commands::List { filters }) = cli.command else {
            panic!("expected list command");
        };
        assert!(filters.to_query().is_err());
    }
}
