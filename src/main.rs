use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use roomie::genre::{
    balance, read_corpus, GenrePredictor, NaiveBayesGenreModel, MAX_PER_GENRE, TOP_GENRES,
};
use roomie::{
    MatchOutcome, MatchReport, MatchRequest, Matchmaker, PeerGroup, PopulationStore, ProfileDraft,
    RoomieConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Roommate compatibility matcher
#[derive(Parser, Debug)]
#[command(name = "roomie")]
#[command(about = "Find your most compatible roommates", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "roomie.toml")]
    config: PathBuf,

    /// Path to the data directory (overrides the config file)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit your answers and see your best matches
    Match(MatchArgs),

    /// List stored submissions, newest first
    View {
        /// Show at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the number of stored submissions
    Count,

    /// Write every stored submission to a file
    Export {
        /// Output path; a timestamped name in the current directory when unset
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },

    /// Movie genre classifier
    #[command(subcommand)]
    Genre(GenreCommand),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Args, Debug)]
struct MatchArgs {
    #[arg(long)]
    name: String,

    /// Male or Female
    #[arg(long)]
    gender: String,

    /// Early, Mid or Late
    #[arg(long)]
    wakeup: String,

    /// Early, Mid or Late
    #[arg(long)]
    sleep: String,

    /// Morning or Night
    #[arg(long)]
    study: String,

    /// 1 (messy) to 5 (spotless)
    #[arg(long)]
    cleanliness: i64,

    /// 1 (need silence) to 5 (noise is fine)
    #[arg(long)]
    noise: i64,

    /// 0.0 (introvert) to 1.0 (extrovert)
    #[arg(long)]
    social: f64,

    /// What you look for in a roommate
    #[arg(long)]
    looking_for: Option<String>,

    /// Number of matches to show
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Match across genders
    #[arg(long)]
    any_gender: bool,

    /// Do not store the submission
    #[arg(long)]
    no_save: bool,

    /// Show how each attribute contributed to the score
    #[arg(long)]
    explain: bool,
}

#[derive(Subcommand, Debug)]
enum GenreCommand {
    /// Train a model from `id ::: title ::: genre ::: description` lines
    Train {
        #[arg(long)]
        data: PathBuf,

        #[arg(long, default_value = "genre_model.json")]
        model: PathBuf,
    },

    /// Predict the genre of a description
    Predict {
        #[arg(long, default_value = "genre_model.json")]
        model: PathBuf,

        text: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);
    if std::env::var_os("RUST_LOG").is_some() {
        tracing::subscriber::set_global_default(
            builder.with_env_filter(EnvFilter::from_default_env()).finish(),
        )?;
    } else {
        tracing::subscriber::set_global_default(builder.with_max_level(log_level).finish())?;
    }

    info!("Starting roomie v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = cli.data_dir.as_deref();
    match cli.command {
        Command::Match(args) => {
            let (config, store) = open_store(&cli.config, data_dir)?;
            let matchmaker = Matchmaker::new(store, config.matching)?;
            let request = MatchRequest {
                draft: ProfileDraft {
                    name: args.name,
                    gender: args.gender,
                    wakeup: args.wakeup,
                    sleep: args.sleep,
                    study_time: args.study,
                    cleanliness: args.cleanliness,
                    noise_tolerance: args.noise,
                    social_energy: args.social,
                    pet_friendly: None,
                    ideal_roommate: args.looking_for,
                },
                top_n: args.top_n,
                peer_group: args.any_gender.then_some(PeerGroup::AnyGender),
                dry_run: args.no_save,
                explain: args.explain,
            };
            let report = matchmaker.submit(request)?;
            print_report(&report);
        }
        Command::View { limit } => {
            let (_, store) = open_store(&cli.config, data_dir)?;
            let mut records = store.records()?;
            records.reverse();
            if records.is_empty() {
                println!("No submissions yet.");
            }
            for record in records.iter().take(limit.unwrap_or(usize::MAX)) {
                println!(
                    "#{:<4} {}  {:<16} {:<6}  wake {:<5} sleep {:<5} study {:<7} clean {} noise {} social {:.2}",
                    record.id,
                    record.submission_time.format("%Y-%m-%d %H:%M"),
                    record.name,
                    record.gender,
                    record.wakeup,
                    record.sleep,
                    record.study_time,
                    record.cleanliness,
                    record.noise_tolerance,
                    record.intro_extro,
                );
                println!("      looking for: {}", record.looking_for);
            }
        }
        Command::Count => {
            let (_, store) = open_store(&cli.config, data_dir)?;
            println!("{}", store.submission_count()?);
        }
        Command::Export { out, format } => {
            let (_, store) = open_store(&cli.config, data_dir)?;
            if store.submission_count()? == 0 {
                println!("No submissions to export.");
                return Ok(());
            }
            let out = out.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "roommate_submissions_{}.{}",
                    chrono::Local::now().format("%Y%m%d_%H%M%S"),
                    format.extension()
                ))
            });
            let written = match format {
                ExportFormat::Json => store.export_json(&out)?,
                ExportFormat::Csv => store.export_csv(&out)?,
            };
            println!("Exported {} submissions to {}", written, out.display());
        }
        Command::Genre(command) => run_genre(command)?,
    }

    Ok(())
}

fn open_store(
    config_path: &Path,
    data_dir: Option<&Path>,
) -> anyhow::Result<(RoomieConfig, Arc<PopulationStore>)> {
    let mut config = RoomieConfig::load(config_path)?;
    if let Some(data_dir) = data_dir {
        config.storage.data_dir = data_dir.to_path_buf();
    }
    info!("Data directory: {:?}", config.storage.data_dir);

    let store = PopulationStore::open(&config.storage)
        .with_context(|| format!("opening store in {}", config.storage.data_dir.display()))?;
    Ok((config, Arc::new(store)))
}

fn print_report(report: &MatchReport) {
    if report.saved {
        println!("Saved as {}.", report.requester.key());
    } else {
        println!("Not saved; matched as a one-off query.");
    }

    match &report.outcome {
        MatchOutcome::Empty(reason) => {
            println!("No matches: {}.", reason);
        }
        MatchOutcome::Matches {
            results, shortfall, ..
        } => {
            println!(
                "Top matches among {} ({} in pool):",
                report.peer_group, report.stats.pool_size
            );
            for (i, result) in results.iter().enumerate() {
                let profile = &result.profile;
                println!(
                    "{} {}. {}  {:.2}%",
                    result.tier.medal(),
                    result.rank,
                    profile.name(),
                    result.score
                );
                println!(
                    "     wake {}, sleep {}, study {}, cleanliness {}, noise {}, {}",
                    profile.wakeup(),
                    profile.sleep(),
                    profile.study_time(),
                    profile.cleanliness(),
                    profile.noise_tolerance(),
                    profile.social_label(),
                );
                if let Some(looking_for) = profile.ideal_roommate() {
                    println!("     looking for: {}", looking_for);
                }
                if let Some(parts) = report.explanations.get(i) {
                    let breakdown: Vec<String> = parts
                        .iter()
                        .map(|(attribute, share)| format!("{} {:+.1}", attribute, share * 100.0))
                        .collect();
                    println!("     breakdown: {}", breakdown.join(", "));
                }
            }
            if *shortfall > 0 {
                println!("Only {} match(es) available.", results.len());
            }
            println!(
                "Average score {:.2}%, best {:.2}%",
                report.stats.avg_score, report.stats.best_score
            );
        }
    }
}

fn run_genre(command: GenreCommand) -> anyhow::Result<()> {
    match command {
        GenreCommand::Train { data, model } => {
            let samples = read_corpus(&data)
                .with_context(|| format!("reading training data {}", data.display()))?;
            let samples = balance(samples, TOP_GENRES, MAX_PER_GENRE);
            let trained = NaiveBayesGenreModel::train(&samples)?;
            trained.save(&model)?;
            println!(
                "Trained on {} samples, genres: {}",
                samples.len(),
                trained.classes().join(", ")
            );
            println!("Model written to {}", model.display());
        }
        GenreCommand::Predict { model, text } => {
            if text.trim().is_empty() {
                anyhow::bail!("description is empty");
            }
            let loaded = NaiveBayesGenreModel::load(&model)
                .with_context(|| format!("loading model {}", model.display()))?;
            println!("{}", loaded.predict(&text)?);
        }
    }
    Ok(())
}
