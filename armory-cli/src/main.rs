use std::env;

use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use armory_api::players as api;
use armory_api::PlayerQuery;
use armory_core::model::{PlayerDraft, PlayerOrder, Profession, Race};
use armory_database::{Database, MIGRATOR};

#[derive(Parser)]
#[command(name = "armory", version, about = "Player roster admin tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List players matching the given criteria, sorted and paginated.
    List(QueryArgs),
    /// Count players matching the given criteria, ignoring pagination.
    Count(QueryArgs),
    /// Create a player from a full set of fields.
    Create(DraftArgs),
    /// Fetch a single player by id.
    Get { id: i64 },
    /// Apply a partial update to a player by id.
    Update {
        id: i64,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete a player by id.
    Delete { id: i64 },
    /// Apply pending database migrations and exit.
    Migrate,
}

#[derive(Args)]
struct QueryArgs {
    /// Substring to match against names, case-sensitive.
    #[arg(long)]
    name: Option<String>,
    /// Substring to match against titles, case-sensitive.
    #[arg(long)]
    title: Option<String>,
    /// Symbolic race name (e.g. HOBBIT).
    #[arg(long)]
    race: Option<Race>,
    /// Symbolic profession name (e.g. WARRIOR).
    #[arg(long)]
    profession: Option<Profession>,
    /// Earliest birthday, epoch milliseconds.
    #[arg(long)]
    after: Option<i64>,
    /// Latest birthday, epoch milliseconds.
    #[arg(long)]
    before: Option<i64>,
    #[arg(long)]
    banned: Option<bool>,
    #[arg(long)]
    min_experience: Option<i32>,
    #[arg(long)]
    max_experience: Option<i32>,
    #[arg(long)]
    min_level: Option<i32>,
    #[arg(long)]
    max_level: Option<i32>,
    /// Zero-based page number (default 0).
    #[arg(long)]
    page_number: Option<i32>,
    /// Page size (default 3).
    #[arg(long)]
    page_size: Option<i32>,
    /// Sort key: ID, NAME, EXPERIENCE, BIRTHDAY, or LEVEL.
    #[arg(long)]
    order: Option<PlayerOrder>,
}

impl QueryArgs {
    fn into_query(self) -> PlayerQuery {
        PlayerQuery {
            name: self.name,
            title: self.title,
            race: self.race,
            profession: self.profession,
            after: self.after,
            before: self.before,
            banned: self.banned,
            min_experience: self.min_experience,
            max_experience: self.max_experience,
            min_level: self.min_level,
            max_level: self.max_level,
            page_number: self.page_number,
            page_size: self.page_size,
            order: self.order,
        }
    }
}

#[derive(Args)]
struct DraftArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    title: Option<String>,
    /// Symbolic race name (e.g. HOBBIT).
    #[arg(long)]
    race: Option<Race>,
    /// Symbolic profession name (e.g. WARRIOR).
    #[arg(long)]
    profession: Option<Profession>,
    /// Birthday as epoch milliseconds.
    #[arg(long)]
    birthday: Option<i64>,
    #[arg(long)]
    banned: Option<bool>,
    #[arg(long)]
    experience: Option<i32>,
}

impl DraftArgs {
    fn into_draft(self) -> PlayerDraft {
        PlayerDraft {
            name: self.name,
            title: self.title,
            race: self.race,
            profession: self.profession,
            birthday: self.birthday,
            banned: self.banned,
            experience: self.experience,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::INFO);
    tracing_subscriber::registry().with(fmt_layer).init();

    // Load the .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = env::var("DATABASE_URL")?;
    let max_connections = env_u32("DATABASE_MAX_CONNECTIONS", 5);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let db = Database::new(pool);

    if matches!(cli.command, Command::Migrate) {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
        return Ok(());
    }

    if env_bool("AUTO_RUN_MIGRATIONS", true) {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    if let Err(err) = run(&db, cli.command).await {
        error!("{err:#}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run(db: &Database, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List(args) => {
            let found = api::list(db, &args.into_query()).await?;
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Command::Count(args) => {
            let total = api::count(db, &args.into_query()).await?;
            println!("{total}");
        }
        Command::Create(args) => {
            let created = api::create(db, &args.into_draft()).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        Command::Get { id } => {
            let player = api::get(db, id).await?;
            println!("{}", serde_json::to_string_pretty(&player)?);
        }
        Command::Update { id, draft } => {
            let updated = api::update(db, id, &draft.into_draft()).await?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        Command::Delete { id } => {
            let removed = api::delete(db, id).await?;
            println!("{}", serde_json::to_string_pretty(&removed)?);
        }
        Command::Migrate => unreachable!("handled before dispatch"),
    }

    Ok(())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u32>().unwrap_or(default),
        Err(_) => default,
    }
}
