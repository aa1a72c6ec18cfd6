//! JSONL (JSON Lines) storage.
//!
//! Each line is one JSON object. Rosters, pairings and results live in one
//! file per division; the tournament index is a single global file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::Tournament;

/// Per-division entity files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Player,
    Pairing,
    Result,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [EntityType::Player, EntityType::Pairing, EntityType::Result];

    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Player => "players.jsonl",
            EntityType::Pairing => "pairings.jsonl",
            EntityType::Result => "results.jsonl",
        }
    }
}

/// Path of a division's entity file.
pub fn entity_path(
    config: &StorageConfig,
    entity: EntityType,
    tournament_id: &str,
    division_id: &str,
) -> PathBuf {
    config
        .division_dir(tournament_id, division_id)
        .join(entity.filename())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(
        config: &StorageConfig,
        entity: EntityType,
        tournament_id: &str,
        division_id: &str,
    ) -> Self {
        Self::new(entity_path(config, entity, tournament_id, division_id))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serde_json::to_string(entity)?)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        for entity in entities {
            writeln!(writer, "{}", serde_json::to_string(entity)?)?;
        }

        writer.flush()?;
        info!("Wrote {} entities to {:?}", entities.len(), self.path);

        Ok(entities.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(
        config: &StorageConfig,
        entity: EntityType,
        tournament_id: &str,
        division_id: &str,
    ) -> Self {
        Self::new(entity_path(config, entity, tournament_id, division_id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities. A missing file reads as empty; malformed lines
    /// are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", i + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Read the tournament index.
pub fn read_tournaments(config: &StorageConfig) -> Result<Vec<Tournament>, StorageError> {
    JsonlReader::new(config.tournaments_path()).read_all()
}

/// Replace the tournament index, sorted newest first.
pub fn write_tournaments(
    config: &StorageConfig,
    tournaments: &mut [Tournament],
) -> Result<usize, StorageError> {
    tournaments.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.name.cmp(&b.name)));
    JsonlWriter::new(config.tournaments_path()).write_all(tournaments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Row {
        id: String,
        value: u32,
    }

    fn row(id: &str, value: u32) -> Row {
        Row {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("rows.jsonl");

        let writer: JsonlWriter<Row> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&[row("1", 10), row("2", 20)]).unwrap(), 2);

        let reader: JsonlReader<Row> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), vec![row("1", 10), row("2", 20)]);
    }

    #[test]
    fn test_append() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("append.jsonl");

        let writer: JsonlWriter<Row> = JsonlWriter::new(path.clone());
        writer.append(&row("1", 1)).unwrap();
        writer.append(&row("2", 2)).unwrap();

        let reader: JsonlReader<Row> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_write_all_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("overwrite.jsonl");

        let writer: JsonlWriter<Row> = JsonlWriter::new(path.clone());
        writer.write_all(&[row("old", 1)]).unwrap();
        writer.write_all(&[row("a", 2), row("b", 3)]).unwrap();

        let read = JsonlReader::<Row>::new(path).read_all().unwrap();
        assert_eq!(read, vec![row("a", 2), row("b", 3)]);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<Row> = JsonlReader::new(temp_dir.path().join("none.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_skips_bad_and_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.jsonl");
        std::fs::write(
            &path,
            "{\"id\":\"1\",\"value\":1}\nnot-json\n\n{\"id\":\"2\",\"value\":2}\n",
        )
        .unwrap();

        let read = JsonlReader::<Row>::new(path).read_all().unwrap();
        assert_eq!(read, vec![row("1", 1), row("2", 2)]);
    }

    #[test]
    fn test_entity_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        let path = entity_path(&config, EntityType::Result, "spring", "a");
        assert_eq!(path, PathBuf::from("/data/tournaments/spring/a/results.jsonl"));

        let reader: JsonlReader<Row> =
            JsonlReader::for_entity(&config, EntityType::Player, "spring", "a");
        assert!(reader.path().ends_with("spring/a/players.jsonl"));
    }

    #[test]
    fn test_tournament_index_sorted_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        let mut tournaments = vec![
            Tournament::new("Winter Classic", NaiveDate::from_ymd_opt(2026, 1, 10)),
            Tournament::new("Summer Open", NaiveDate::from_ymd_opt(2026, 7, 4)),
        ];
        write_tournaments(&config, &mut tournaments).unwrap();

        let read = read_tournaments(&config).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].name, "Summer Open");
    }

    #[test]
    fn test_tournament_index_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        assert!(read_tournaments(&config).unwrap().is_empty());
    }
}
