use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use artistly::artists::registration::{profile_image_data_url, Registration};
use artistly::backend::BackendClient;
use artistly::browse::{BrowseSession, BrowseView};
use artistly::debounce::Debouncer;
use artistly::settings::Settings;
use artistly::{ArtistlyError, FilterSpec, MatchMode, PriceBand};

#[derive(Parser)]
#[command(name = "artistly", version, about = "Browse and onboard performing artists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List artists matching a filter
    Browse(FilterArgs),
    /// Filter interactively, one search term per stdin line
    Search(FilterArgs),
    /// Submit an artist registration
    Register(RegisterArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// Shareable query string, e.g. `category=Singer&priceRange=mid`
    #[arg(long)]
    query: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// all, budget, mid or premium
    #[arg(long)]
    price_range: Option<String>,
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    bio: String,
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long = "language")]
    languages: Vec<String>,
    #[arg(long)]
    fee_range: String,
    #[arg(long)]
    location: String,
    /// Profile picture to embed as a data URL
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), ArtistlyError> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    log::debug!("{:?}", settings);
    let client = BackendClient::new(settings.api_url.clone());

    let outcome = match cli.command {
        Command::Browse(args) => browse(&client, &settings, args.into_spec()).await,
        Command::Search(args) => search(&client, &settings, args.into_spec()).await,
        Command::Register(args) => register(&client, args).await,
    };
    if let Err(err) = &outcome {
        log::error!("{}", err);
    }
    outcome
}

impl FilterArgs {
    /// Starts from the query string and lets explicit flags override it
    fn into_spec(self) -> FilterSpec {
        let mut spec = FilterSpec::from_query(self.query.as_deref().unwrap_or(""));
        if let Some(category) = self.category {
            spec = spec.with_category(category);
        }
        if let Some(location) = self.location {
            spec = spec.with_location(location);
        }
        if let Some(slug) = self.price_range {
            let band = PriceBand::from_slug(&slug).unwrap_or_else(|| {
                log::warn!("unknown price range `{}`, showing all", slug);
                PriceBand::All
            });
            spec = spec.with_price_band(band);
        }
        if let Some(search) = self.search {
            spec = spec.with_search(search);
        }
        spec
    }
}

fn match_mode(settings: &Settings) -> MatchMode {
    if settings.server_filtering {
        MatchMode::ClientOnly
    } else {
        MatchMode::Full
    }
}

async fn browse(
    client: &BackendClient,
    settings: &Settings,
    spec: FilterSpec,
) -> Result<(), ArtistlyError> {
    let mut session = BrowseSession::new(match_mode(settings));
    session.refresh(client, &spec).await;
    let view = session.view(&spec);
    if let Some(err) = view.error {
        return Err(err.into());
    }
    print_view(&view, &spec);
    Ok(())
}

async fn search(
    client: &BackendClient,
    settings: &Settings,
    base: FilterSpec,
) -> Result<(), ArtistlyError> {
    let mut session = BrowseSession::new(match_mode(settings));
    session.refresh(client, &base).await;
    if let Some(err) = session.view(&base).error {
        return Err(err.into());
    }
    print_view(&session.view(&base), &base);

    let (mut debouncer, mut committed) = Debouncer::new(settings.debounce);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(term) => debouncer.push(term),
                None => break,
            },
            Some(term) = committed.recv() => {
                let spec = base.with_search(term);
                print_view(&session.view(&spec), &spec);
            }
        }
    }

    debouncer.finish();
    while let Some(term) = committed.recv().await {
        let spec = base.with_search(term);
        print_view(&session.view(&spec), &spec);
    }
    Ok(())
}

async fn register(client: &BackendClient, args: RegisterArgs) -> Result<(), ArtistlyError> {
    let profile_image = match &args.image {
        Some(path) => Some(profile_image_data_url(path)?),
        None => None,
    };
    let registration = Registration {
        name: args.name,
        bio: args.bio,
        categories: args.categories,
        languages: args.languages,
        fee_range: args.fee_range,
        location: args.location,
        profile_image,
    };
    let submission = registration.into_submission()?;
    let registered = client.register_artist(&submission).await?;
    log::info!(
        "registered `{}` as #{}",
        registered.name,
        registered
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| submission.id.to_string())
    );
    println!("Registration Successful! Your profile has been created and is pending approval.");
    Ok(())
}

fn print_view(view: &BrowseView<'_>, spec: &FilterSpec) {
    for artist in &view.artists {
        println!("{}", artist);
    }
    if view.count == 0 {
        println!("No artists match your filters.");
    } else {
        println!("{} artists found", view.count);
    }
    if !spec.is_neutral() {
        println!("share: ?{}", spec.to_query());
    }
}
