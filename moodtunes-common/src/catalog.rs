//! Song catalog and emotion-based song selection
//!
//! The catalog is a CSV file loaded once at startup. Emotion tags are trimmed
//! and lowercased at load time so they compare directly against normalized
//! labels.

use crate::emotion::AliasTable;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

/// Number of songs returned per recommendation unless configured otherwise
pub const DEFAULT_SONG_LIMIT: usize = 5;

const REQUIRED_COLUMNS: &[&str] = &["title", "artist", "emotion"];

/// One catalog row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub emotion: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Immutable, in-memory song table
#[derive(Debug, Clone, Default)]
pub struct SongCatalog {
    songs: Vec<Song>,
}

impl SongCatalog {
    /// Build a catalog from songs, normalizing emotion tags and empty links
    pub fn new(songs: Vec<Song>) -> Self {
        let songs = songs
            .into_iter()
            .map(|mut song| {
                song.emotion = song.emotion.trim().to_lowercase();
                song.link = song
                    .link
                    .map(|link| link.trim().to_string())
                    .filter(|link| !link.is_empty());
                song
            })
            .collect();
        Self { songs }
    }

    /// Load the catalog, degrading to an empty catalog on any failure
    ///
    /// A missing file is a warning; an unreadable or malformed one is an
    /// error. Neither prevents startup.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!(
                "Catalog {} not found, song recommendations will not be available",
                path.display()
            );
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(catalog) => {
                info!(
                    "Loaded {} songs across {} emotions from {}",
                    catalog.len(),
                    catalog.emotions().len(),
                    path.display()
                );
                catalog
            }
            Err(e) => {
                error!("Could not load catalog {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load the catalog, propagating I/O and format errors
    pub fn try_load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse CSV with a header row; columns are located by name
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                return Err(Error::InvalidInput(format!(
                    "Catalog is missing required column '{}'",
                    column
                )));
            }
        }

        let mut songs = Vec::new();
        for (row, record) in reader.deserialize::<Song>().enumerate() {
            match record {
                Ok(song) if song.emotion.trim().is_empty() => {
                    debug!("Skipping catalog row {} without emotion tag", row + 1);
                }
                Ok(song) => songs.push(song),
                Err(e) => warn!("Skipping malformed catalog row {}: {}", row + 1, e),
            }
        }

        Ok(Self::new(songs))
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Distinct emotion tags present in the catalog
    pub fn emotions(&self) -> BTreeSet<String> {
        self.songs.iter().map(|s| s.emotion.clone()).collect()
    }

    /// Songs tagged with exactly `canonical`
    pub fn matching(&self, canonical: &str) -> Vec<&Song> {
        self.songs.iter().filter(|s| s.emotion == canonical).collect()
    }
}

/// Pick up to `limit` random songs whose tag matches the normalized emotion
///
/// Sampling is uniform and without replacement; the result has
/// `min(limit, matches)` songs in no particular order.
pub fn select<R: Rng + ?Sized>(
    emotion: &str,
    limit: usize,
    catalog: &SongCatalog,
    aliases: &AliasTable,
    rng: &mut R,
) -> Vec<Song> {
    let canonical = aliases.normalize(emotion);
    let matches = catalog.matching(&canonical);
    if matches.is_empty() {
        debug!("No songs found for normalized emotion '{}'", canonical);
        return Vec::new();
    }

    let amount = limit.min(matches.len());
    matches
        .choose_multiple(rng, amount)
        .map(|song| (*song).clone())
        .collect()
}

/// Catalog + alias table + randomness source shared by request handlers
pub struct SongSelector {
    catalog: Arc<SongCatalog>,
    aliases: Arc<AliasTable>,
    limit: usize,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl SongSelector {
    /// Selector with an entropy-seeded generator
    pub fn new(catalog: Arc<SongCatalog>, aliases: Arc<AliasTable>, limit: usize) -> Self {
        Self::with_rng(catalog, aliases, limit, StdRng::from_entropy())
    }

    /// Selector with a caller-provided generator (seeded in tests)
    pub fn with_rng<R>(catalog: Arc<SongCatalog>, aliases: Arc<AliasTable>, limit: usize, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            catalog,
            aliases,
            limit,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    pub fn catalog(&self) -> &SongCatalog {
        &self.catalog
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Select with the configured limit
    pub fn select(&self, emotion: &str) -> Vec<Song> {
        self.select_with_limit(emotion, self.limit)
    }

    pub fn select_with_limit(&self, emotion: &str, limit: usize) -> Vec<Song> {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        select(emotion, limit, &self.catalog, &self.aliases, rng.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const CSV: &str = "\
title,artist,emotion,link,year
Song A,Artist 1, Happy ,https://a.example,2001
Song B,Artist 2,happy,,2002
Song C,Artist 3,SAD,https://c.example,2003
Song D,Artist 4,happy,https://d.example,2004
Song E,Artist 5,anger,,2005
Song F,Artist 6,,https://f.example,2006
Song G,Artist 7,happy,https://g.example,2007
";

    fn catalog() -> SongCatalog {
        SongCatalog::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_normalizes_tags_and_links() {
        let catalog = catalog();

        // Row without emotion is skipped
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.songs()[0].emotion, "happy");
        assert_eq!(catalog.songs()[0].link.as_deref(), Some("https://a.example"));
        assert_eq!(catalog.songs()[1].link, None);
        assert_eq!(catalog.songs()[2].emotion, "sad");

        let emotions: Vec<_> = catalog.emotions().into_iter().collect();
        assert_eq!(emotions, vec!["anger", "happy", "sad"]);
    }

    #[test]
    fn test_load_without_link_column() {
        let csv = "emotion,artist,title\nsad,Someone,Rainy Day\n";
        let catalog = SongCatalog::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.songs()[0].title, "Rainy Day");
        assert_eq!(catalog.songs()[0].link, None);
    }

    #[test]
    fn test_load_missing_required_column() {
        let csv = "title,artist\nA,B\n";
        let result = SongCatalog::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_load_missing_file_gives_empty_catalog() {
        let catalog = SongCatalog::load(Path::new("/nonexistent/moodtunes/songs.csv"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_select_respects_limit_and_matches() {
        let catalog = catalog();
        let aliases = AliasTable::default();
        let mut rng = StdRng::seed_from_u64(7);

        let songs = select("happy", 2, &catalog, &aliases, &mut rng);
        assert_eq!(songs.len(), 2);
        assert!(songs.iter().all(|s| s.emotion == "happy"));

        let songs = select("happy", 10, &catalog, &aliases, &mut rng);
        assert_eq!(songs.len(), 4);

        let songs = select("sad", 5, &catalog, &aliases, &mut rng);
        assert_eq!(songs.len(), 1);
    }

    #[test]
    fn test_select_without_replacement() {
        let catalog = catalog();
        let aliases = AliasTable::default();
        let mut rng = StdRng::seed_from_u64(11);

        let songs = select("happy", 4, &catalog, &aliases, &mut rng);
        let titles: HashSet<_> = songs.iter().map(|s| s.title.clone()).collect();
        assert_eq!(titles.len(), 4);
    }

    #[test]
    fn test_select_normalizes_emotion() {
        let catalog = catalog();
        let aliases = AliasTable::default();
        let mut rng = StdRng::seed_from_u64(1);

        let songs = select(" JOY ", 5, &catalog, &aliases, &mut rng);
        assert_eq!(songs.len(), 4);

        let songs = select("Angry", 5, &catalog, &aliases, &mut rng);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Song E");
    }

    #[test]
    fn test_select_no_matches_is_empty() {
        let catalog = catalog();
        let aliases = AliasTable::default();
        let mut rng = StdRng::seed_from_u64(3);

        assert!(select("calm", 5, &catalog, &aliases, &mut rng).is_empty());
        assert!(select("", 5, &catalog, &aliases, &mut rng).is_empty());
        assert!(select("happy", 5, &SongCatalog::default(), &aliases, &mut rng).is_empty());
    }

    #[test]
    fn test_select_zero_limit() {
        let catalog = catalog();
        let aliases = AliasTable::default();
        let mut rng = StdRng::seed_from_u64(3);

        assert!(select("happy", 0, &catalog, &aliases, &mut rng).is_empty());
    }

    #[test]
    fn test_seeded_selection_is_deterministic() {
        let catalog = catalog();
        let aliases = AliasTable::default();

        let first = select("happy", 2, &catalog, &aliases, &mut StdRng::seed_from_u64(42));
        let second = select("happy", 2, &catalog, &aliases, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_varies_across_trials() {
        let catalog = Arc::new(catalog());
        let selector = SongSelector::with_rng(
            catalog,
            Arc::new(AliasTable::default()),
            2,
            StdRng::seed_from_u64(99),
        );

        let mut subsets = HashSet::new();
        for _ in 0..200 {
            let mut titles: Vec<_> = selector
                .select("happy")
                .into_iter()
                .map(|s| s.title)
                .collect();
            titles.sort();
            subsets.insert(titles);
        }

        // 4 matches choose 2 gives 6 possible subsets
        assert!(subsets.len() > 1, "selection never varied");
    }

    #[test]
    fn test_selector_uses_configured_limit() {
        let selector = SongSelector::new(
            Arc::new(catalog()),
            Arc::new(AliasTable::default()),
            3,
        );
        assert_eq!(selector.limit(), 3);
        assert_eq!(selector.select("happy").len(), 3);
        assert_eq!(selector.select_with_limit("happy", 1).len(), 1);
    }
}
