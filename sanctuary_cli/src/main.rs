use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use sanctuary_core::journal::{recent_history, ActivityRecord};
use sanctuary_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sanctuary")]
#[command(about = "Virtual pet sanctuary - care for your pet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Name shown as the pet's caretaker
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the pet and its activities (default)
    Status {
        /// Evaluate cooldowns at this RFC 3339 time instead of now
        #[arg(long)]
        at: Option<String>,
    },

    /// Perform an activity (feed, play, train, groom, ...)
    Perform {
        /// Activity id
        activity: String,

        /// Perform at this RFC 3339 time instead of now
        #[arg(long)]
        at: Option<String>,

        /// Dry run - show the outcome without saving the pet
        #[arg(long)]
        dry_run: bool,
    },

    /// Show recent activities
    History {
        /// Maximum number of entries
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Start over with the sample pet
    Reset,
}

/// The current caretaker. Only the display functions see this.
struct Session {
    user: String,
}

impl Session {
    fn resolve(cli_user: Option<String>, config: &Config) -> Self {
        let user = cli_user
            .or_else(|| config.session.user.clone())
            .or_else(|| std::env::var("USER").ok())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| "guest".to_string());
        Self { user }
    }
}

struct Paths {
    pet: PathBuf,
    journal: PathBuf,
}

impl Paths {
    fn new(data_dir: &Path) -> Self {
        Self {
            pet: data_dir.join("pet.json"),
            journal: data_dir.join("journal").join("activities.jsonl"),
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr; keep them quiet unless RUST_LOG asks
    sanctuary_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = Paths::new(&data_dir);
    let session = Session::resolve(cli.user, &config);

    tracing::debug!("Using data directory {:?} for {}", data_dir, session.user);

    match cli.command {
        Some(Commands::Status { at }) => cmd_status(&paths, &session, &config, at),
        Some(Commands::Perform {
            activity,
            at,
            dry_run,
        }) => cmd_perform(&paths, &session, &config, &activity, at, dry_run),
        Some(Commands::History { limit }) => cmd_history(&paths, &config, limit),
        Some(Commands::Reset) => cmd_reset(&paths, &config),
        None => {
            // Default to "status" command
            cmd_status(&paths, &session, &config, None)
        }
    }
}

fn resolve_now(at: Option<String>) -> Result<DateTime<Utc>> {
    match at {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::InvalidTimestamp(format!("{}: {}", s, e))),
        None => Ok(Utc::now()),
    }
}

fn cmd_status(paths: &Paths, session: &Session, config: &Config, at: Option<String>) -> Result<()> {
    let now = resolve_now(at)?;
    let pet = Pet::load(&paths.pet, config)?;
    display_pet(session, &pet, now);
    Ok(())
}

fn cmd_perform(
    paths: &Paths,
    session: &Session,
    config: &Config,
    activity_id: &str,
    at: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let now = resolve_now(at)?;
    let perform = |pet: &mut Pet| perform_activity_with_rules(pet, activity_id, now, &config.leveling);

    let result = if dry_run {
        let mut pet = Pet::load(&paths.pet, config)?;
        perform(&mut pet).map(|outcome| (pet, outcome))
    } else {
        Pet::update(&paths.pet, config, perform)
    };

    let (pet, outcome) = match result {
        Ok(done) => done,
        Err(Error::ActivityNotFound(id)) => {
            let pet = Pet::load(&paths.pet, config)?;
            let known: Vec<_> = pet.activities.iter().map(|a| a.id.as_str()).collect();
            eprintln!("Unknown activity: {}. Try one of: {}", id, known.join(", "));
            return Err(Error::ActivityNotFound(id));
        }
        Err(e) => return Err(e),
    };

    display_outcome(session, &pet, &outcome);

    if dry_run {
        println!("\n[Dry run - pet not saved]");
        return Ok(());
    }

    let mut journal = JsonlJournal::new(&paths.journal);
    journal.append(&ActivityRecord::from_outcome(&pet.id, &outcome))?;

    Ok(())
}

fn cmd_history(paths: &Paths, config: &Config, limit: usize) -> Result<()> {
    let pet = Pet::load(&paths.pet, config)?;
    let records = recent_history(&paths.journal, &pet.id, limit)?;

    println!("Recent interactions with {}", pet.name);
    println!();

    if records.is_empty() {
        println!("  No activity yet for {}.", pet.name);
        return Ok(());
    }

    for record in &records {
        let level_note = if record.levels_gained > 0 {
            format!("  ★ level {}", record.level_after)
        } else {
            String::new()
        };
        println!(
            "  {}  {} {}{}",
            record.performed_at.format("%Y-%m-%d %H:%M"),
            record.activity_name,
            pet.name,
            level_note
        );
    }

    Ok(())
}

fn cmd_reset(paths: &Paths, config: &Config) -> Result<()> {
    let pet = sanctuary_core::catalog::sample_pet_with(build_activities(config));
    pet.save(&paths.pet)?;
    println!("✓ {} is back to a fresh start", pet.name);
    Ok(())
}

fn display_pet(session: &Session, pet: &Pet, now: DateTime<Utc>) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} the {}", pet.name, pet.kind);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Caretaker: {}", session.user);
    if !pet.description.is_empty() {
        println!("  {}", pet.description);
    }
    if !pet.traits.is_empty() {
        println!("  Traits: {}", pet.traits.join(", "));
    }
    println!();
    println!(
        "  Level {}  {}/{} XP  {}",
        pet.level,
        pet.experience,
        pet.next_level_experience,
        bar(pet.level_progress_percent())
    );
    println!("  Happiness {:>3}%  {}", pet.happiness, bar(pet.happiness));
    println!("  Health    {:>3}%  {}", pet.health, bar(pet.health));
    println!("  Hunger    {:>3}%  {}", pet.hunger, bar(pet.hunger));
    if !pet.skills.is_empty() {
        println!("  Skills: {}", pet.skills.join(", "));
    }
    println!();
    println!("  Activities");

    for activity in &pet.activities {
        let availability = match activity_state(activity, now) {
            ActivityState::Ready => "Ready".to_string(),
            ActivityState::OnCooldown { remaining } => {
                format!("Available in {} min", remaining_minutes(remaining))
            }
        };
        println!(
            "  → {:<8} [{}]  {}",
            activity.name,
            availability,
            describe_effects(&activity.effect.deltas())
        );
    }

    println!();
}

fn display_outcome(session: &Session, pet: &Pet, outcome: &ActivityOutcome) {
    println!(
        "\n✓ {} successful! {} spent time with {}",
        outcome.activity_name, session.user, pet.name
    );

    for effect in &outcome.effects {
        if effect.stat.is_vital() {
            println!("  → {}: {}% → {}%", effect.stat, effect.before, effect.after);
        } else {
            println!("  → {:+} XP", effect.delta);
        }
    }

    if outcome.leveled_up() {
        println!();
        println!("★ Level Up! {} is now level {}!", pet.name, outcome.level);
    }
}

fn describe_effects(deltas: &[(Stat, i32)]) -> String {
    deltas
        .iter()
        .map(|(stat, delta)| match stat {
            Stat::Experience => format!("{:+} XP", delta),
            stat => format!("{} {:+}%", stat, delta),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn bar(percent: u8) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(percent.min(100)) * WIDTH / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled))
}
