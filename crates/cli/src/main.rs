use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{load_dataset, CatalogueIndex, HistoryIndex};
use pipeline::ScoredCandidate;
use rand::seq::IndexedRandom;
use server::{
    EngineConfig, InMemorySessionStore, Infographic, RecommendRequest, RecommendationOrchestrator,
};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// film-recs - Content-based film recommendations from viewing history
#[derive(Parser)]
#[command(name = "film-recs")]
#[command(about = "Film recommendations from a user's watched list and watchlist", long_about = None)]
struct Cli {
    /// Path to the catalogue (JSON lines, one film per line)
    #[arg(short, long, default_value = "data/films.jsonl")]
    catalogue: PathBuf,

    /// Directory with one sub-directory of list files per user
    #[arg(long, default_value = "data/users")]
    history_dir: PathBuf,

    /// Engine configuration (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get film recommendations for a user
    Recommend {
        #[arg(long)]
        username: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        k: usize,

        /// Free-text refinement, e.g. "top 5 korean thrillers from the 2000s"
        #[arg(long)]
        prompt: Option<String>,

        /// Profile source: watched, watchlist or all
        #[arg(long, default_value = "watched")]
        list_kind: String,

        /// Repeat the request this many times in one session
        #[arg(long, default_value = "1")]
        rounds: usize,

        /// Session to continue; a new one is created when omitted
        #[arg(long)]
        session: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Score one film against a user's profile
    Evaluate {
        #[arg(long)]
        username: String,

        #[arg(long)]
        film_id: String,

        /// Contribution groups to show
        #[arg(long, default_value = "3")]
        top_n: usize,

        #[arg(long)]
        json: bool,
    },

    /// Show the constraint a refinement prompt parses to
    Parse {
        prompt: String,
    },

    /// Genre, decade and director counts for a user's list
    Infographic {
        #[arg(long)]
        username: String,

        #[arg(long, default_value = "all")]
        list_kind: String,

        #[arg(long, default_value = "5")]
        top_n: usize,

        #[arg(long)]
        json: bool,
    },

    /// Search for films by title
    Search {
        /// Title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Run concurrent recommend calls and report latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        #[arg(long, default_value = "5")]
        k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    println!("Loading catalogue from {}...", cli.catalogue.display());
    let start = Instant::now();
    let (catalogue, history) = load_dataset(&cli.catalogue, &cli.history_dir)
        .context("Failed to load the dataset")?;
    println!(
        "{} Loaded {} films and {} users in {:?}",
        "✓".green(),
        catalogue.len(),
        history.len(),
        start.elapsed()
    );

    let catalogue = Arc::new(catalogue);
    let usernames = history.usernames();
    let orchestrator = build_orchestrator(catalogue.clone(), history, config);

    match cli.command {
        Commands::Recommend {
            username,
            k,
            prompt,
            list_kind,
            rounds,
            session,
            json,
        } => {
            let session_id = session.unwrap_or_else(RecommendationOrchestrator::new_session_id);
            let mut request = RecommendRequest::new(username, session_id)
                .with_k(k)
                .with_list_kind(list_kind);
            if let Some(prompt) = prompt {
                request = request.with_prompt(prompt);
            }
            handle_recommend(&orchestrator, &request, rounds, json)?
        }
        Commands::Evaluate {
            username,
            film_id,
            top_n,
            json,
        } => {
            let scored = orchestrator.evaluate(&username, &film_id, top_n)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&scored)?);
            } else {
                print_scored(1, &scored, true);
            }
        }
        Commands::Parse { prompt } => {
            let parsed = orchestrator.parse_refinement_detailed(&prompt);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Commands::Infographic {
            username,
            list_kind,
            top_n,
            json,
        } => {
            let info = orchestrator.infographic(&username, &list_kind, top_n)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_infographic(&info);
            }
        }
        Commands::Search { title } => handle_search(&catalogue, &title),
        Commands::Benchmark {
            requests,
            concurrent,
            k,
        } => handle_benchmark(orchestrator, usernames, requests, concurrent, k).await?,
    }

    Ok(())
}

fn build_orchestrator(
    catalogue: Arc<CatalogueIndex>,
    history: HistoryIndex,
    config: EngineConfig,
) -> RecommendationOrchestrator {
    let sessions = InMemorySessionStore::new().with_max_sessions(config.max_sessions);
    RecommendationOrchestrator::with_config(catalogue, Arc::new(history), Arc::new(sessions), config)
}

/// Handle the 'recommend' command
fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    request: &RecommendRequest,
    rounds: usize,
    json: bool,
) -> Result<()> {
    let mut all_rounds = Vec::new();

    for round in 1..=rounds.max(1) {
        let ranked = orchestrator.recommend(request)?;
        if !json {
            let header = format!("Recommendations for {} (round {}):", request.username, round);
            println!("{}", header.bold().blue());
            if ranked.is_empty() {
                println!("  {}", "No films left to recommend in this session".yellow());
            }
            for (rank, scored) in ranked.iter().enumerate() {
                print_scored(rank + 1, scored, false);
            }
        }
        all_rounds.push(ranked);
    }

    if json {
        let output = serde_json::json!({
            "session_id": request.session_id,
            "rounds": all_rounds,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Session: {}", request.session_id.dimmed());
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalogue: &CatalogueIndex, title: &str) {
    let matches = catalogue.search_title(title);
    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  {}", "No matches".yellow());
    }
    for film in matches.iter().take(20) {
        println!(
            "{}: {} ({}) [{}]",
            film.id.green(),
            film.title,
            film.year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string()),
            film.genres.join(", ")
        );
    }
}

/// Handle the 'benchmark' command.
///
/// Every user gets one session, so the overlap check covers concurrent
/// requests that share a session.
async fn handle_benchmark(
    orchestrator: RecommendationOrchestrator,
    usernames: Vec<String>,
    requests: usize,
    concurrent: usize,
    k: usize,
) -> Result<()> {
    if usernames.is_empty() {
        bail!("No users in the history directory");
    }

    let mut rng = rand::rng();
    let picks: Vec<String> = (0..requests)
        .filter_map(|_| usernames.choose(&mut rng).cloned())
        .collect();

    let limit = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = Vec::with_capacity(picks.len());
    for username in picks {
        let orchestrator = orchestrator.clone();
        let limit = limit.clone();
        handles.push(tokio::spawn(async move {
            let _permit = limit.acquire_owned().await?;
            let session_id = format!("bench-{}", username);
            let request = RecommendRequest::new(username, session_id.clone()).with_k(k);
            let start = Instant::now();
            let ranked = orchestrator.recommend_async(request).await?;
            let ids: Vec<String> = ranked.into_iter().map(|scored| scored.film_id).collect();
            Ok::<_, anyhow::Error>((session_id, ids, start.elapsed()))
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    let mut served: HashMap<String, HashSet<String>> = HashMap::new();
    let mut overlaps = 0;
    for handle in handles {
        let (session_id, ids, elapsed) = handle.await??;
        let seen = served.entry(session_id).or_default();
        for id in ids {
            if !seen.insert(id) {
                overlaps += 1;
            }
        }
        timings.push(elapsed);
    }
    let total_time = wall_clock.elapsed();

    if timings.is_empty() {
        bail!("No requests were made");
    }
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p).round() as usize];
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent.max(1));
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    if overlaps == 0 {
        println!("{} No film was served twice within a session", "✓".green());
        Ok(())
    } else {
        bail!("{} films were served twice within a session", overlaps)
    }
}

/// Print one ranked film, with its breakdown when `detailed`
fn print_scored(rank: usize, scored: &ScoredCandidate, detailed: bool) {
    let year = scored.year.map(|y| format!(" ({})", y)).unwrap_or_default();
    println!(
        "{}. {}{} - Score: {:.3}",
        rank.to_string().green(),
        scored.title,
        year,
        scored.score
    );
    println!("   {}", scored.explanation().dimmed());

    if detailed {
        for entry in &scored.contributions {
            println!(
                "   {} {:<9} {:.4}  {}",
                "•".cyan(),
                entry.group.as_str(),
                entry.contribution,
                entry.overlaps.join(", ")
            );
        }
    }
}

fn print_infographic(info: &Infographic) {
    println!(
        "{}",
        format!("{}'s {} list: {} films ({} in catalogue)", info.username, info.list_kind, info.film_count, info.films_found)
            .bold()
            .blue()
    );
    let sections = [
        ("Top genres", &info.top_genres),
        ("Top decades", &info.top_decades),
        ("Top directors", &info.top_directors),
    ];
    for (title, entries) in sections {
        println!("{}:", title);
        for entry in entries.iter() {
            println!("  {} {} ({})", "•".green(), entry.name, entry.count);
        }
    }
}
