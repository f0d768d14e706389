mod config;
mod render;

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use config::Config;
use repertoire_core::{
    self as rc, Axis, FilterAction, FilterSession, FilterState, LiveUpdates, ResolveError,
    repertoire_state::{self as rst, Client, SheetRequest},
};
use smol_str::SmolStr;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser)]
#[command(author, version, about = "Browse the repertoire catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the works list
    Search {
        #[command(flatten)]
        filters: Filters,

        /// The page of results to show
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the details of a composer
    Composer {
        name: String,

        #[arg(long)]
        json: bool,
    },
    /// List the composers of the matching works
    Composers {
        #[command(flatten)]
        filters: Filters,

        /// Group the works under each composer, with their titles
        #[arg(long)]
        titles: bool,

        #[arg(long)]
        json: bool,
    },
    /// List the options of every filter
    Options {
        /// Defaults to the saved locale
        #[arg(long)]
        locale: Option<String>,
    },
    /// Search, then keep the results up to date until interrupted
    Live {
        #[command(flatten)]
        filters: Filters,
    },
    /// Print the saved locale, or save a new one
    Locale { locale: Option<String> },
}

#[derive(clap::Args)]
struct Filters {
    /// Free text, matched against every cell
    query: Option<String>,

    #[arg(long)]
    country: Vec<String>,
    #[arg(long)]
    republic: Vec<String>,
    #[arg(long)]
    decade: Vec<String>,
    #[arg(long = "type")]
    kind: Vec<String>,
    #[arg(long)]
    gender: Vec<String>,

    /// Only works by this composer
    #[arg(long)]
    composer: Option<String>,
}
impl Filters {
    fn state(&self) -> FilterState {
        let mut state = FilterState::default();
        if let Some(query) = &self.query {
            state = state.apply(FilterAction::SetQuery(query.clone()));
        }
        if let Some(composer) = &self.composer {
            state = state.apply(FilterAction::SelectComposer(composer.clone()));
        }
        for (axis, values) in [
            (Axis::Country, &self.country),
            (Axis::Republic, &self.republic),
            (Axis::Decade, &self.decade),
            (Axis::Type, &self.kind),
            (Axis::Gender, &self.gender),
        ] {
            if !values.is_empty() {
                let values = values.iter().map(SmolStr::from).collect();
                state = state.apply(FilterAction::SelectAll(axis, values));
            }
        }
        state
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("repertoire=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    let client = Client::new(
        config.server.base_url.clone(),
        config.server.spreadsheet_id.clone(),
    );
    let request = SheetRequest {
        sheet: Some(config.server.sheet.clone()),
        range: Some(config.server.range.clone()),
    };

    match cli.command {
        Command::Search {
            filters,
            page,
            json,
        } => {
            let rows = rst::fetch_rows(&client, &request).await?;
            let mut session = FilterSession::new(rows, filters.state());
            session.dispatch(FilterAction::GoToPage(page));

            let view = session.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::page(&view));
            }
        }
        Command::Composer { name, json } => {
            match rc::resolve_composer(&client, &name, rc::DEFAULT_CANDIDATE_TABLES).await {
                Ok(found) => {
                    let detail = found.detail();
                    if json {
                        println!("{}", serde_json::to_string_pretty(&detail)?);
                    } else {
                        print!("{}", render::composer_detail(&detail));
                        let rows = rst::fetch_rows(&client, &request)
                            .await
                            .inspect_err(|e| tracing::warn!("works will not be listed: {e}"))
                            .unwrap_or_default();
                        let groups = rc::group_by_composer(&rows);
                        if let Some(group) = rc::find_group(&groups, &detail.name) {
                            print!("{}", render::works(group));
                        }
                    }
                }
                Err(e) => {
                    if let ResolveError::NoMatch {
                        source_table,
                        sample,
                        ..
                    } = &e
                    {
                        tracing::debug!("first record of {source_table}: {sample}");
                    }
                    return Err(e.into());
                }
            }
        }
        Command::Composers {
            filters,
            titles,
            json,
        } => {
            let rows = rst::fetch_rows(&client, &request).await?;
            let filtered = rc::filter_rows(&rows, &filters.state());
            if titles {
                let groups = rc::group_by_composer(filtered);
                if json {
                    println!("{}", serde_json::to_string_pretty(&groups)?);
                } else {
                    print!("{}", render::composer_groups(&groups, true));
                }
            } else {
                let names = rst::options::composers(filtered);
                if json {
                    println!("{}", serde_json::to_string_pretty(&names)?);
                } else {
                    print!("{}", render::composer_names(&names));
                }
            }
        }
        Command::Options { locale } => {
            let locale = locale.unwrap_or_else(|| config.general.locale.clone());
            let rows = rst::fetch_rows(&client, &request)
                .await
                .inspect_err(|e| tracing::warn!("options will not include derived values: {e}"))
                .unwrap_or_default();
            let lists = rst::fetch_option_lists(&client, &locale, &rows).await;
            print!("{}", render::options(&lists));
        }
        Command::Live { filters } => {
            run_live(client, request, filters.state(), &config).await?;
        }
        Command::Locale { locale } => match locale {
            Some(locale) => {
                config.general.locale = locale;
                config.save()?;
                println!("Locale set to {}", config.general.locale);
            }
            None => println!("{}", config.general.locale),
        },
    }

    Ok(())
}

async fn run_live(
    client: Client,
    request: SheetRequest,
    state: FilterState,
    config: &Config,
) -> anyhow::Result<()> {
    let client = Arc::new(client);
    let rows = rst::fetch_rows(client.as_ref(), &request)
        .await
        .context("Failed to load the initial rows")?;
    let mut session = FilterSession::new(rows, state);
    print!("{}", render::page(&session.view()));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut live = LiveUpdates::new(Duration::from_secs(config.general.poll_interval_secs.max(1)));
    live.start(
        move || {
            let client = client.clone();
            let request = request.clone();
            async move { rst::fetch_rows(client.as_ref(), &request).await }
        },
        Some(session.fingerprint().to_string()),
        tx,
    );
    tracing::info!(
        "watching for changes every {}s, press Ctrl-C to stop",
        live.interval().as_secs()
    );

    loop {
        tokio::select! {
            rows = rx.recv() => {
                let Some(rows) = rows else { break };
                if session.replace_rows(rows, false) {
                    println!();
                    print!("{}", render::page(&session.view()));
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
        }
    }

    live.stop();
    Ok(())
}
