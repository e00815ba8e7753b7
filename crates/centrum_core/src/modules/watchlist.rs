//! Watchlist staging.
//!
//! # Responsibility
//! - Project the movie/series cards and expand streaming URL templates.
//! - Stage add/advance/remove edits with the dirty flag set.
//!
//! # Invariants
//! - URL templates use `^SEASON^` and `^EPISODE^` placeholders, expanded to
//!   two-digit zero-padded numbers.
//! - A film has `season == 0 && episode == 0`; everything else is a series.
//! - Removal is tombstoning (text blanked), so the deletion still syncs.

use crate::model::record::{Record, RecordId};
use crate::modules::{decode_record, encode_record};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SEASON_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\^SEASON\^").expect("season placeholder pattern is valid"));
static EPISODE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\^EPISODE\^").expect("episode placeholder pattern is valid"));

/// One watchlist card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: RecordId,
    /// Movie or series title.
    pub text: String,
    #[serde(default)]
    pub url: String,
    /// Poster image link.
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub season: u32,
    #[serde(default)]
    pub episode: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
}

impl WatchlistEntry {
    /// True for one-off films, which have no season/episode progress.
    pub fn is_film(&self) -> bool {
        self.season == 0 && self.episode == 0
    }

    /// Streaming URL with the season/episode placeholders filled in.
    pub fn watch_url(&self) -> String {
        let season = format!("{:02}", self.season);
        let episode = format!("{:02}", self.episode);
        let url = SEASON_PLACEHOLDER.replace_all(&self.url, season.as_str());
        EPISODE_PLACEHOLDER
            .replace_all(&url, episode.as_str())
            .into_owned()
    }

    /// Card progress label, `s3e07` style for series and a clapper for films.
    pub fn progress_label(&self) -> String {
        if self.is_film() {
            "🎬".to_string()
        } else {
            format!("s{}e{}", self.season, self.episode)
        }
    }
}

/// Cards still on the list (tombstones hidden), oldest first by id.
pub fn visible_entries(records: &[Record]) -> Vec<WatchlistEntry> {
    let mut entries: Vec<WatchlistEntry> = records
        .iter()
        .filter_map(decode_record::<WatchlistEntry>)
        .filter(|entry| !entry.text.trim().is_empty())
        .collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    entries
}

/// Adds a card. Returns false (snapshot untouched) when the trimmed title
/// is empty.
pub fn add_entry(
    records: &mut Vec<Record>,
    title: &str,
    url: &str,
    banner: &str,
    season: u32,
    episode: u32,
    now_epoch_ms: i64,
) -> bool {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return false;
    }

    let entry = WatchlistEntry {
        id: RecordId::from_epoch_ms(now_epoch_ms),
        text: trimmed.to_string(),
        url: url.to_string(),
        banner: banner.to_string(),
        season,
        episode,
        edit: Some(true),
    };
    if let Some(record) = encode_record(&entry) {
        records.push(record);
        return true;
    }
    false
}

/// Advances a series by `increment` episodes and marks it dirty.
pub fn advance_episode(records: &mut Vec<Record>, id: &RecordId, increment: u32) {
    update_entry(records, id, |entry| {
        entry.episode += increment;
    });
}

/// Advances a series by `increment` seasons, restarting at episode one, and
/// marks it dirty. Used when the streaming site 404s past the season's end.
pub fn advance_season(records: &mut Vec<Record>, id: &RecordId, increment: u32) {
    update_entry(records, id, |entry| {
        entry.season += increment;
        entry.episode = 1;
    });
}

/// Tombstones one card by blanking its title.
pub fn remove_entry(records: &mut Vec<Record>, id: &RecordId) {
    update_entry(records, id, |entry| {
        entry.text.clear();
        entry.url.clear();
        entry.banner.clear();
    });
}

fn update_entry(records: &mut Vec<Record>, id: &RecordId, apply: impl FnOnce(&mut WatchlistEntry)) {
    for record in records.iter_mut() {
        if &record.id != id {
            continue;
        }
        let Some(mut entry) = decode_record::<WatchlistEntry>(record) else {
            return;
        };
        apply(&mut entry);
        entry.edit = Some(true);
        if let Some(updated) = encode_record(&entry) {
            *record = updated;
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_entry, advance_episode, advance_season, remove_entry, visible_entries, WatchlistEntry,
    };
    use crate::model::record::{Record, RecordId};

    fn series(records: &mut Vec<Record>) -> RecordId {
        assert!(add_entry(
            records,
            "Pat a Mat",
            "https://example.test/s^SEASON^/e^EPISODE^",
            "https://example.test/poster.jpg",
            1,
            3,
            1736500000000,
        ));
        records[records.len() - 1].id.clone()
    }

    #[test]
    fn watch_url_pads_placeholders_to_two_digits() {
        let mut records = Vec::new();
        series(&mut records);
        let entries = visible_entries(&records);
        assert_eq!(entries[0].watch_url(), "https://example.test/s01/e03");
        assert_eq!(entries[0].progress_label(), "s1e3");
    }

    #[test]
    fn film_has_no_progress() {
        let entry = WatchlistEntry {
            id: RecordId::Int(1),
            text: "Pelíšky".to_string(),
            url: "https://example.test/pelisky".to_string(),
            banner: String::new(),
            season: 0,
            episode: 0,
            edit: None,
        };
        assert!(entry.is_film());
        assert_eq!(entry.progress_label(), "🎬");
        assert_eq!(entry.watch_url(), "https://example.test/pelisky");
    }

    #[test]
    fn advance_episode_marks_dirty() {
        let mut records = Vec::new();
        let id = series(&mut records);
        records[0].edit = Some(false);

        advance_episode(&mut records, &id, 2);
        let entries = visible_entries(&records);
        assert_eq!(entries[0].episode, 5);
        assert_eq!(entries[0].season, 1);
        assert!(records[0].is_dirty());
    }

    #[test]
    fn advance_season_restarts_episode_numbering() {
        let mut records = Vec::new();
        let id = series(&mut records);

        advance_season(&mut records, &id, 1);
        let entries = visible_entries(&records);
        assert_eq!(entries[0].season, 2);
        assert_eq!(entries[0].episode, 1);
    }

    #[test]
    fn remove_entry_tombstones_instead_of_deleting() {
        let mut records = Vec::new();
        let id = series(&mut records);

        remove_entry(&mut records, &id);
        assert!(visible_entries(&records).is_empty());
        assert_eq!(records.len(), 1);
        assert!(records[0].is_dirty());
        assert_eq!(records[0].str_field("text"), Some(""));
    }

    #[test]
    fn add_entry_rejects_blank_title() {
        let mut records = Vec::new();
        assert!(!add_entry(&mut records, "  ", "", "", 0, 0, 1));
        assert!(records.is_empty());
    }
}
