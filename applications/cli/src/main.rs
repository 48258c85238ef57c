/// Leakify - terminal music player for a Leakify backend
use clap::{Parser, Subcommand};
use leakify_cli::{render, CliConfig, Player};
use leakify_client::LeakifyClient;
use leakify_core::{Catalog, FilterSpec, LibraryBackend, Scope};
use leakify_storage::{JsonFileStore, PreferenceStore};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "leakify")]
#[command(about = "Play music from a Leakify server in the terminal", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./leakify.toml if present)
    #[arg(short, long, global = true, env = "LEAKIFY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive player reading commands from stdin (default)
    Player {
        /// Print engine events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// List songs on the server
    Songs {
        /// Only songs by this artist
        #[arg(short, long, conflicts_with = "tag")]
        artist: Option<String>,
        /// Only songs with this tag
        #[arg(short, long)]
        tag: Option<String>,
        /// Free-text search over title, artist, tag and folder
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show recently played songs
    Recent,
    /// Show liked song identifiers
    Likes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with player output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "leakify=info,leakify_cli=info,leakify_playback=info,leakify_client=info,leakify_storage=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Player { json: false }) {
        Commands::Player { json } => player(&config, json).await?,
        Commands::Songs {
            artist,
            tag,
            search,
        } => list_songs(&config, artist, tag, search).await?,
        Commands::Recent => recent(&config)?,
        Commands::Likes => likes(&config)?,
    }

    Ok(())
}

async fn connect(config: &CliConfig) -> anyhow::Result<LeakifyClient> {
    let client = LeakifyClient::new(config.client_config())?;
    tracing::info!("Server: {}", client.url());

    if let Some((user, pass)) = config.credentials() {
        client.login(user, pass).await?;
    }
    Ok(client)
}

fn open_preferences(config: &CliConfig) -> anyhow::Result<PreferenceStore<JsonFileStore>> {
    let path = config.preferences_path();
    tracing::debug!(path = %path.display(), "Opening preferences");
    let store = JsonFileStore::open(&path)?;
    Ok(PreferenceStore::load(store)?)
}

async fn player(config: &CliConfig, json: bool) -> anyhow::Result<()> {
    let client = LeakifyClient::new(config.client_config())?;
    tracing::info!("Server: {}", client.url());

    // A failed login is not fatal: the library load reports it and the
    // user can retry with `login`
    if let Some((user, pass)) = config.credentials() {
        if let Err(e) = client.login(user, pass).await {
            tracing::warn!(error = %e, "Login failed");
        }
    }

    let preferences = open_preferences(config)?;
    let mut player = Player::new(
        &config.playback_config(),
        config.playback.assumed_bitrate_kbps,
        client,
        preferences,
        std::io::stdout(),
    )
    .with_json(json);

    player.greet()?;
    player.request_catalog();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    player.run(stdin).await
}

async fn list_songs(
    config: &CliConfig,
    artist: Option<String>,
    tag: Option<String>,
    search: Option<String>,
) -> anyhow::Result<()> {
    let client = connect(config).await?;
    let songs = client.fetch_songs().await?;

    let scope = match (artist, tag) {
        (Some(artist), _) => Scope::Artist(artist),
        (None, Some(tag)) => Scope::Tag(tag),
        (None, None) => Scope::All,
    };
    let mut catalog = Catalog::new();
    catalog.replace(songs);
    catalog.apply_filter(FilterSpec {
        scope,
        search: search.unwrap_or_default(),
    });

    print!("{}", render::song_list(&catalog, None));
    Ok(())
}

fn recent(config: &CliConfig) -> anyhow::Result<()> {
    let preferences = open_preferences(config)?;
    let records: Vec<_> = preferences.recent().collect();
    print!("{}", render::recent(&records));
    Ok(())
}

fn likes(config: &CliConfig) -> anyhow::Result<()> {
    let preferences = open_preferences(config)?;
    let liked: Vec<String> = preferences.liked().map(str::to_string).collect();
    print!("{}", render::names("liked songs", &liked));
    Ok(())
}
