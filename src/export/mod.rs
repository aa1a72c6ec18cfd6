//! CSV export of standings and player game logs.
//!
//! Every field is wrapped in double quotes and rows are joined with `\n`.
//! Quotes inside a field are written as-is, not doubled, so a name containing
//! `"` produces a row most CSV readers will mis-split.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::calculate::PlayerGame;
use crate::models::Standing;

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub const STANDINGS_HEADER: [&str; 9] = [
    "Rank", "Player", "Rating", "Wins", "Losses", "Draws", "Points", "Spread", "Games",
];

pub const SUMMARY_HEADER: [&str; 8] = [
    "Round",
    "Table",
    "Opponent",
    "Score",
    "Opponent Score",
    "Spread",
    "Result",
    "First",
];

/// Replace characters that cannot appear in a single file name.
fn file_stem(entity_name: &str) -> String {
    entity_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// File name for a division's standings export.
pub fn standings_file_name(entity_name: &str) -> String {
    format!("{}_Standings.csv", file_stem(entity_name))
}

/// File name for a player's game summary export.
pub fn summary_file_name(entity_name: &str) -> String {
    format!("{}_Summary.csv", file_stem(entity_name))
}

fn row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| format!("\"{}\"", f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    std::iter::once(row(header))
        .chain(rows.iter().map(|r| row(r)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Standings table as CSV text.
pub fn standings_csv(standings: &[Standing]) -> String {
    let rows = standings
        .iter()
        .map(|s| {
            vec![
                s.rank.to_string(),
                s.name.clone(),
                s.rating.to_string(),
                s.wins.to_string(),
                s.losses.to_string(),
                s.draws.to_string(),
                s.points.to_string(),
                s.spread.to_string(),
                s.games_played.to_string(),
            ]
        })
        .collect();
    table(&STANDINGS_HEADER, rows)
}

/// A player's game log as CSV text.
pub fn summary_csv(games: &[PlayerGame]) -> String {
    let rows = games
        .iter()
        .map(|g| {
            vec![
                g.round.to_string(),
                g.table.to_string(),
                g.opponent_name.clone(),
                g.score.to_string(),
                g.opponent_score.to_string(),
                g.spread.to_string(),
                g.outcome.letter().to_string(),
                if g.first_move { "Yes" } else { "No" }.to_string(),
            ]
        })
        .collect();
    table(&SUMMARY_HEADER, rows)
}

/// Write a payload into `dir`, creating it if needed. Returns the file path.
pub fn write_csv(dir: &Path, file_name: &str, payload: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, payload)?;
    info!("Wrote {} bytes to {:?}", payload.len(), path);
    Ok(path)
}
