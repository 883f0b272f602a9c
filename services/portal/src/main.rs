use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use api::filter::FilterCriteria;
use api::gateway::spawn_scrape_trigger;
use api::models::news::SourceLabel;
use auth::{LoginForm, RegistrationForm, View};
use common::config::ClientConfig;
use portal::PortalState;
use portal::routes::navigate;
use portal::views::{self, Entry, LoginView, NewsView, PreferencesView, RegisterView};

#[derive(Parser)]
#[command(name = "news-portal", version, about = "Browse aggregated news from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Remove the stored session
    Logout,
    /// List news, optionally filtered
    News(NewsArgs),
    /// Show or change default sources and authors
    Preferences {
        #[command(subcommand)]
        action: PreferencesAction,
    },
    /// Report which view a path lands on
    Open { path: String },
}

#[derive(Args)]
struct NewsArgs {
    /// Case-insensitive title search
    #[arg(long, default_value = "")]
    search: String,
    /// Publish date as YYYY-MM-DD, in local time
    #[arg(long, default_value = "")]
    date: String,
    /// Source label or domain, e.g. "The Guardian"
    #[arg(long, value_parser = parse_source)]
    source: Option<SourceLabel>,
}

#[derive(Subcommand)]
enum PreferencesAction {
    /// Show saved preferences
    Show,
    /// Replace the selected sources and/or authors, then save
    Set {
        #[arg(long = "source", value_parser = parse_source)]
        sources: Vec<SourceLabel>,
        #[arg(long = "author")]
        authors: Vec<String>,
        /// Save with no default sources
        #[arg(long, conflicts_with = "sources")]
        clear_sources: bool,
        /// Save with no default authors
        #[arg(long, conflicts_with = "authors")]
        clear_authors: bool,
    },
}

fn parse_source(value: &str) -> Result<SourceLabel, String> {
    value.parse().map_err(|e: api::models::news::UnknownSource| {
        let known: Vec<&str> = SourceLabel::ALL.iter().map(|s| s.label()).collect();
        format!("{} (expected one of: {})", e, known.join(", "))
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting news portal client");

    let state = PortalState::from_config(&config)?;
    let scrape = spawn_scrape_trigger(state.gateway.clone());

    let code = run(cli.command, &state).await?;

    if tokio::time::timeout(Duration::from_secs(config.scrape_grace_secs), scrape)
        .await
        .is_err()
    {
        debug!("Scrape trigger still pending at exit");
    }

    Ok(code)
}

async fn run(command: Command, state: &PortalState) -> Result<ExitCode> {
    match command {
        Command::Login { email, password } => {
            let mut view = match LoginView::enter(state) {
                Entry::Entered(view) => view,
                Entry::Redirected(to) => return Ok(redirected(View::Login, to)),
            };
            match view.submit(&LoginForm::new(email, password)).await {
                Ok(next) => {
                    println!("Signed in. Continue at {}", next);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(failed(&e.to_string())),
            }
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let mut view = match RegisterView::enter(state) {
                Entry::Entered(view) => view,
                Entry::Redirected(to) => return Ok(redirected(View::Register, to)),
            };
            match view
                .submit(&RegistrationForm::new(name, email, password))
                .await
            {
                Ok(next) => {
                    println!("Registered and signed in. Continue at {}", next);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(failed(&e.to_string())),
            }
        }
        Command::Logout => {
            let next = views::logout(state)?;
            println!("Signed out. Continue at {}", next);
            Ok(ExitCode::SUCCESS)
        }
        Command::News(args) => {
            let mut view = match NewsView::enter(state).await {
                Entry::Entered(view) => view,
                Entry::Redirected(to) => return Ok(redirected(View::News, to)),
            };

            let mut criteria = FilterCriteria::new()
                .with_search(args.search)
                .with_date(args.date);
            if let Some(source) = args.source {
                criteria = criteria.with_source(source);
            }
            view.set_criteria(criteria);

            print!("{}", view.render());
            Ok(if view.banner().is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Preferences { action } => {
            let mut view = match PreferencesView::enter(state).await {
                Entry::Entered(view) => view,
                Entry::Redirected(to) => return Ok(redirected(View::Preferences, to)),
            };
            if view.draft().is_none() {
                print!("{}", view.render());
                return Ok(ExitCode::FAILURE);
            }

            match action {
                PreferencesAction::Show => {
                    print!("{}", view.render());
                    Ok(ExitCode::SUCCESS)
                }
                PreferencesAction::Set {
                    sources,
                    authors,
                    clear_sources,
                    clear_authors,
                } => {
                    if let Some(draft) = view.draft_mut() {
                        if clear_sources || !sources.is_empty() {
                            draft.set_sources(sources);
                        }
                        if clear_authors || !authors.is_empty() {
                            if let Err(e) = draft.set_authors(&authors) {
                                return Ok(failed(&e.to_string()));
                            }
                        }
                    }

                    match view.save().await {
                        Ok(next) => {
                            println!("Preferences saved. Continue at {}", next);
                            Ok(ExitCode::SUCCESS)
                        }
                        Err(_) => {
                            print!("{}", view.render());
                            Ok(ExitCode::FAILURE)
                        }
                    }
                }
            }
        }
        Command::Open { path } => {
            let navigation = navigate(&path, state.store.as_ref())?;
            for from in &navigation.redirected_from {
                println!("{} redirected", from);
            }
            println!("{}", navigation.view);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn redirected(from: View, to: View) -> ExitCode {
    let reason = match to {
        View::Login => "not signed in",
        _ => "already signed in",
    };
    eprintln!("{} is unavailable ({}); continue at {}", from, reason, to);
    ExitCode::FAILURE
}

fn failed(message: &str) -> ExitCode {
    eprintln!("{}", message);
    ExitCode::FAILURE
}
