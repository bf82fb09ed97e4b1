mod play;
mod source;
mod store;

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use bornle_engine::matcher::suggest;
use bornle_engine::period::available_periods;
use bornle_engine::{DailyStrategy, GameConfig, PeriodKey, PersonRecord, PuzzleDate, Roster, Session, Variant};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use source::{Source, fetch_people, fetch_summary};
use store::DirStore;

const OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(name = "bornle", about = "Guess someone born in the year of the day")]
struct Cli {
    /// Read people from this JSON file instead of the sheet
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Never hit the network; use the cache or --data
    #[arg(long, global = true)]
    offline: bool,
    /// Partial JSON game config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the people sheet URL
    #[arg(long, global = true)]
    sheet_url: Option<String>,
    /// Puzzle date (YYYY-MM-DD), default today in UTC
    #[arg(long, global = true)]
    date: Option<PuzzleDate>,
    /// Directory of the session cache
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,
    /// Log level, used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a puzzle on the terminal (default: today's daily)
    Play {
        #[arg(long, value_enum, default_value_t = Mode::Single)]
        variant: Mode,
        /// daily, ancient, medieval, early_modern, nineteenth, twentieth
        #[arg(long, default_value = "daily")]
        period: PeriodKey,
        /// Calendar-seeded daily pick instead of the salted shuffle
        #[arg(long)]
        classic: bool,
    },
    /// Print the day's puzzle as JSON
    Today {
        #[arg(long, value_enum, default_value_t = Mode::Single)]
        variant: Mode,
        #[arg(long)]
        classic: bool,
    },
    /// List periods that have data, with their distinct birth years
    Periods,
    /// Autocomplete a name, e.g. "isa"
    Suggest {
        query: Vec<String>,
        #[arg(long, default_value = "daily")]
        period: PeriodKey,
    },
    /// Download the sheet → output/people.json
    Fetch,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Single,
    Staged,
}

impl From<Mode> for Variant {
    fn from(m: Mode) -> Variant {
        match m {
            Mode::Single => Variant::Single,
            Mode::Staged => Variant::Staged,
        }
    }
}

fn strategy(classic: bool) -> DailyStrategy {
    if classic { DailyStrategy::Calendar } else { DailyStrategy::SeededShuffle }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli);
    let date = cli.date.unwrap_or_else(today);

    match cli.command {
        Some(Command::Play {
            variant,
            period,
            classic,
        }) => run_play(&cli, config, variant.into(), period, strategy(classic), date),
        Some(Command::Today { variant, classic }) => run_today(&cli, config, variant.into(), strategy(classic), date),
        Some(Command::Periods) => run_periods(&cli, &config),
        Some(Command::Suggest { ref query, period }) => run_suggest(&cli, &config, &query.join(" "), period),
        Some(Command::Fetch) => run_fetch(&cli, &config),
        None => run_play(&cli, config, Variant::Single, PeriodKey::Daily, DailyStrategy::SeededShuffle, date),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  SETUP HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn or_exit<T, E: Display>(result: Result<T, E>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("{what}: {e}");
        std::process::exit(1);
    })
}

fn today() -> PuzzleDate {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default();
    PuzzleDate::from_unix_millis(ms)
}

fn load_config(cli: &Cli) -> GameConfig {
    let mut config: GameConfig = match &cli.config {
        Some(path) => read_json(path),
        None => GameConfig::default(),
    };
    if let Some(url) = &cli.sheet_url {
        config.sheet_url = url.clone();
    }
    config
}

fn load_people(cli: &Cli, config: &GameConfig) -> Vec<PersonRecord> {
    let mut store = DirStore::new(cli.cache_dir.clone().unwrap_or_else(DirStore::default_root));
    let source = Source {
        data: cli.data.as_deref(),
        offline: cli.offline,
        config,
    };
    or_exit(source.load(&mut store), "Cannot load people")
}

fn start_session(
    cli: &Cli,
    config: GameConfig,
    variant: Variant,
    period: PeriodKey,
    strategy: DailyStrategy,
    date: PuzzleDate,
) -> Session {
    let people = load_people(cli, &config);
    or_exit(
        Session::start(people, config, variant, strategy, period, date, &mut rand::thread_rng()),
        "Cannot start puzzle",
    )
}

// ═══════════════════════════════════════════════════════════════════════
//  OUTPUT FILE HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn output_path(name: &str) -> PathBuf {
    Path::new(OUTPUT_DIR).join(name)
}

fn write_json<T: serde::Serialize>(name: &str, data: &T) {
    let path = output_path(name);
    let json = or_exit(serde_json::to_string_pretty(data), "JSON serialization failed");
    or_exit(std::fs::create_dir_all(OUTPUT_DIR), "Cannot create output directory");
    or_exit(std::fs::write(&path, &json), &format!("Cannot write {}", path.display()));
    eprintln!("  {} ({} bytes)", path.display(), json.len());
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let json = or_exit(std::fs::read_to_string(path), &format!("Cannot read {}", path.display()));
    or_exit(serde_json::from_str(&json), &format!("Cannot parse {}", path.display()))
}

// ═══════════════════════════════════════════════════════════════════════
//  COMMANDS
// ═══════════════════════════════════════════════════════════════════════

fn run_play(
    cli: &Cli,
    config: GameConfig,
    variant: Variant,
    period: PeriodKey,
    strategy: DailyStrategy,
    date: PuzzleDate,
) {
    let mut session = start_session(cli, config, variant, period, strategy, date);
    eprintln!("{} — {} ({date})", session.config().puzzle_name, period.label());

    let mut rng = rand::thread_rng();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let finished = or_exit(
        play::play(&mut session, stdin.lock(), &mut stdout, &mut rng),
        "Terminal error",
    );
    if !finished {
        return;
    }

    println!("\n{}", session.share_text(None));

    let Some(person) = session.puzzle().revealed() else {
        return;
    };
    if let Some(url) = &person.wikiurl {
        println!("\n{url}");
    }
    if cli.offline {
        return;
    }
    if let Some(bio) = fetch_summary(person).as_ref().and_then(|s| s.bio()) {
        println!("\n{bio}");
    }
}

fn run_today(cli: &Cli, config: GameConfig, variant: Variant, strategy: DailyStrategy, date: PuzzleDate) {
    let session = start_session(cli, config, variant, PeriodKey::Daily, strategy, date);
    let puzzle = session.puzzle();

    #[derive(serde::Serialize)]
    struct Today<'a> {
        date: PuzzleDate,
        day_index: i64,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_year: Option<i64>,
        start: i64,
        end: i64,
        valid_answers: usize,
        prompt: String,
        names: Vec<&'a str>,
    }

    let bounds = puzzle.bounds();
    let answers = puzzle.valid_answers();
    let today = Today {
        date,
        day_index: date.day_index(session.config().epoch),
        title: puzzle.share_title(&session.config().puzzle_name),
        target_year: puzzle.target_year(),
        start: bounds.start,
        end: bounds.end,
        valid_answers: answers.len(),
        prompt: puzzle.prompt(),
        names: answers.iter().map(|p| p.name.as_str()).collect(),
    };
    println!("{}", or_exit(serde_json::to_string_pretty(&today), "JSON serialization"));
}

fn run_periods(cli: &Cli, config: &GameConfig) {
    let roster = Roster::new(load_people(cli, config));
    eprintln!("{} people, {} distinct birth years", roster.len(), roster.years().len());
    for (period, years) in available_periods(&roster) {
        println!("{:<14}{:<40}{years} years", period.as_str(), period.label());
    }
}

fn run_suggest(cli: &Cli, config: &GameConfig, query: &str, period: PeriodKey) {
    let roster = Roster::new(load_people(cli, config));
    let pool = match period {
        PeriodKey::Daily => roster.all(),
        _ => roster.within(period.bounds()),
    };
    let hits = suggest(&roster, &pool, query, config.suggest_min_chars, config.suggest_limit);
    if hits.is_empty() {
        eprintln!("No suggestions for: {query}");
        return;
    }
    for p in hits {
        println!("{} ({})", p.name, p.birthyear);
    }
}

fn run_fetch(cli: &Cli, config: &GameConfig) {
    if cli.offline {
        eprintln!("fetch needs the network; drop --offline");
        std::process::exit(1);
    }
    let people = or_exit(fetch_people(&config.sheet_url), "Cannot fetch people");
    eprintln!("Fetched {} people from {}", people.len(), config.sheet_url);
    write_json("people.json", &people);
}
