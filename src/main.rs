use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use standings_viewer::api::{build_router, state::AppState};
use standings_viewer::calculate::{
    compute_standings, compute_standings_through_round, player_detail, round_pairings, rounds,
};
use standings_viewer::config::AppConfig;
use standings_viewer::export::{
    standings_csv, standings_file_name, summary_csv, summary_file_name, write_csv,
};
use standings_viewer::models::{PlayerId, Standing};
use standings_viewer::parse_duration;
use standings_viewer::storage::{
    check_consistency, division_name, JsonlSource, StorageConfig, TournamentSource,
};
use standings_viewer::watch::{StandingsWatcher, WatcherConfig};

#[derive(Parser)]
#[command(name = "standings-viewer")]
#[command(about = "Tournament rosters, pairings and live standings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct DivisionArgs {
    /// Tournament id
    #[arg(long)]
    tournament: String,

    /// Division id
    #[arg(long)]
    division: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List tournaments and their divisions
    Tournaments,

    /// Print division standings
    Standings {
        #[command(flatten)]
        division: DivisionArgs,

        /// Only count games up to this round
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        through_round: Option<u32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the pairings for a round
    Pairings {
        #[command(flatten)]
        division: DivisionArgs,

        /// Round number (default: latest)
        #[arg(long)]
        round: Option<u32>,
    },

    /// Print one player's record and games
    Player {
        #[command(flatten)]
        division: DivisionArgs,

        /// Player id
        #[arg(long)]
        player: String,
    },

    /// Write standings (or a player's summary) to CSV
    Export {
        #[command(flatten)]
        division: DivisionArgs,

        /// Export this player's game summary instead of the standings
        #[arg(long)]
        player: Option<String>,

        /// Output directory (overrides config)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Report data consistency problems
    Check {
        #[command(flatten)]
        division: DivisionArgs,
    },

    /// Recompute and print standings whenever the data changes
    Watch {
        #[command(flatten)]
        division: DivisionArgs,

        /// Poll interval (e.g., "5s", "1m"; overrides config)
        #[arg(long)]
        interval: Option<String>,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting standings-viewer v{}", env!("CARGO_PKG_VERSION"));

    let source = Arc::new(JsonlSource::new(StorageConfig::new(config.data_dir.clone())));

    match cli.command {
        Commands::Tournaments => {
            let tournaments = source.list_tournaments().await?;
            if tournaments.is_empty() {
                println!("No tournaments in {:?}", config.data_dir);
            }
            for t in tournaments {
                let date = t.date.map(|d| d.to_string()).unwrap_or_default();
                println!("{:<20} {:<30} {}", t.id, t.name, date);
                for d in &t.divisions {
                    println!("    {:<16} {}", d.id, d.name);
                }
            }
        }
        Commands::Standings {
            division,
            through_round,
            json,
        } => {
            let data = source
                .load_division(&division.tournament, &division.division)
                .await?;
            let standings = match through_round {
                Some(round) => compute_standings_through_round(
                    &data.players,
                    &data.pairings,
                    &data.results,
                    round,
                ),
                None => compute_standings(&data.players, &data.pairings, &data.results),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else {
                print_standings(&standings);
            }
        }
        Commands::Pairings { division, round } => {
            let data = source
                .load_division(&division.tournament, &division.division)
                .await?;
            let Some(round) = round.or_else(|| rounds(&data.pairings).last().copied()) else {
                println!("No pairings yet");
                return Ok(());
            };

            println!("=== Round {} ===", round);
            for view in round_pairings(round, &data.players, &data.pairings, &data.results) {
                let score = |s: Option<u32>| s.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
                let star = |first: bool| if first { "*" } else { " " };
                println!(
                    "{:>4}  {}{:<24} {:>5} - {:<5} {}{}",
                    view.table,
                    star(view.player1.first_move),
                    view.player1.name,
                    score(view.player1.score),
                    score(view.player2.score),
                    star(view.player2.first_move),
                    view.player2.name,
                );
            }
        }
        Commands::Player { division, player } => {
            let data = source
                .load_division(&division.tournament, &division.division)
                .await?;
            let player_id = PlayerId::from(player.as_str());
            let Some(detail) =
                player_detail(&player_id, &data.players, &data.pairings, &data.results)
            else {
                anyhow::bail!("Player {} is not in this division", player);
            };

            let s = &detail.standing;
            println!("\n=== {} (rating {}) ===", s.name, s.rating);
            println!("Rank:        {}", s.rank);
            println!("Record:      {}", s.record_string());
            println!("Points:      {}", s.points);
            println!("Spread:      {:+}", s.spread);
            if let Some(avg) = detail.average_score {
                println!("Avg score:   {:.1}", avg);
            }
            if let (Some(high), Some(low)) = (detail.high_game, detail.low_game) {
                println!("High / low:  {} / {}", high, low);
            }
            println!();
            for g in &detail.games {
                println!(
                    "R{:<3} T{:<3} {} {:>4}-{:<4} {:+5}  vs {}{}",
                    g.round,
                    g.table,
                    g.outcome.letter(),
                    g.score,
                    g.opponent_score,
                    g.spread,
                    g.opponent_name,
                    if g.first_move { " (first)" } else { "" },
                );
            }
        }
        Commands::Export {
            division,
            player,
            out_dir,
        } => {
            let data = source
                .load_division(&division.tournament, &division.division)
                .await?;
            let out_dir = out_dir.unwrap_or_else(|| config.export_dir.clone());

            let path = match player {
                Some(player) => {
                    let player_id = PlayerId::from(player.as_str());
                    let Some(detail) =
                        player_detail(&player_id, &data.players, &data.pairings, &data.results)
                    else {
                        anyhow::bail!("Player {} is not in this division", player);
                    };
                    write_csv(
                        &out_dir,
                        &summary_file_name(&detail.standing.name),
                        &summary_csv(&detail.games),
                    )?
                }
                None => {
                    let name =
                        division_name(source.as_ref(), &division.tournament, &division.division)
                            .await;
                    let standings = compute_standings(&data.players, &data.pairings, &data.results);
                    write_csv(
                        &out_dir,
                        &standings_file_name(&name),
                        &standings_csv(&standings),
                    )?
                }
            };
            println!("Wrote {}", path.display());
        }
        Commands::Check { division } => {
            let data = source
                .load_division(&division.tournament, &division.division)
                .await?;
            let issues = check_consistency(&data);
            if issues.is_empty() {
                println!("No issues found");
            } else {
                println!("{} issue(s):", issues.len());
                for issue in &issues {
                    println!("  - {}", issue);
                }
            }
        }
        Commands::Watch { division, interval } => {
            let interval = match interval {
                Some(s) => parse_duration(&s)
                    .filter(|d| !d.is_zero())
                    .with_context(|| format!("Invalid --interval: {}", s))?,
                None => config
                    .watch
                    .interval()
                    .context("Invalid watch.poll_interval in config")?,
            };

            let watcher = Arc::new(StandingsWatcher::new(
                WatcherConfig {
                    tournament_id: division.tournament,
                    division_id: division.division,
                    interval,
                },
                source,
            ));
            let mut updates = watcher.subscribe();
            let runner = tokio::spawn(watcher.clone().run());

            loop {
                tokio::select! {
                    update = updates.recv() => match update {
                        Ok(update) => {
                            println!(
                                "\n=== Revision {} at {} ===",
                                update.revision,
                                update.computed_at.format("%H:%M:%S")
                            );
                            print_standings(&update.standings);
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!("Skipped {} stale standings updates", n);
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    },
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Stopping watcher");
                        watcher.cancel().await;
                        break;
                    }
                }
            }
            runner.await?;
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(source).with_cors_origin(config.server.cors_origin.clone());
            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Serving standings on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn print_standings(standings: &[Standing]) {
    println!(
        "{:>4}  {:<24} {:>6} {:>8} {:>6} {:>7}",
        "#", "Player", "Rating", "Record", "Pts", "Spread"
    );
    for s in standings {
        println!(
            "{:>4}  {:<24} {:>6} {:>8} {:>6} {:>+7}",
            s.rank,
            s.name,
            s.rating,
            s.record_string(),
            s.points,
            s.spread
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_through_round_must_be_positive() {
        let args = ["standings-viewer", "standings", "--tournament", "t", "--division", "d"];

        let zero = Cli::try_parse_from(args.iter().chain(&["--through-round", "0"]));
        assert!(zero.is_err());

        let cli = Cli::try_parse_from(args.iter().chain(&["--through-round", "2"])).unwrap();
        match cli.command {
            Commands::Standings { through_round, .. } => assert_eq!(through_round, Some(2)),
            _ => panic!("expected standings command"),
        }
    }
}
