//! Tag metadata extraction and normalization
//!
//! Raw tags are flattened into a [`TagContainer`] keyed by both generic
//! names (`title`, `tracknumber`) and format-specific codes (`TIT2`, `TRCK`).
//! Each canonical field is then resolved by an ordered [`FieldRule`], so the
//! resolution logic can be tested without real audio files.

use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::models::AudioMetadataRecord;

/// Bitrate assumed when neither duration nor bitrate is known
pub const FALLBACK_BITRATE_KBPS: u32 = 192;

/// Flattened tag values: key -> values in tag order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagContainer {
    entries: HashMap<String, Vec<String>>,
}

impl TagContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(|v| v.as_slice())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagContainer {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut container = Self::new();
        for (k, v) in iter {
            container.insert(k, v);
        }
        container
    }
}

/// Canonical fields of a metadata record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Artist,
    AlbumArtist,
    Album,
    Year,
    Track,
    Disc,
    Publisher,
    Composer,
    Genre,
}

/// Ordered key names tried for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub keys: &'static [&'static str],
}

impl FieldRule {
    /// First non-empty value among the rule's keys; multi-valued keys yield their first element
    pub fn resolve(&self, tags: &TagContainer) -> Option<String> {
        self.keys.iter().find_map(|key| {
            tags.get(key)
                .and_then(|values| values.first())
                .filter(|v| !v.is_empty())
                .cloned()
        })
    }
}

/// Generic name first, then format-specific codes
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Title,
        keys: &["title", "TIT2"],
    },
    FieldRule {
        field: Field::Artist,
        keys: &["artist", "TPE1"],
    },
    FieldRule {
        field: Field::AlbumArtist,
        keys: &["albumartist", "TPE2"],
    },
    FieldRule {
        field: Field::Album,
        keys: &["album", "TALB"],
    },
    FieldRule {
        field: Field::Year,
        keys: &["date", "year", "TDRC", "TYER"],
    },
    FieldRule {
        field: Field::Track,
        keys: &["tracknumber", "TRCK"],
    },
    FieldRule {
        field: Field::Disc,
        keys: &["discnumber", "TPOS"],
    },
    FieldRule {
        field: Field::Publisher,
        keys: &["publisher", "TPUB"],
    },
    FieldRule {
        field: Field::Composer,
        keys: &["composer", "TCOM"],
    },
    FieldRule {
        field: Field::Genre,
        keys: &["genre", "TCON"],
    },
];

/// Keep a track/disc value only if it is a bare integer or a digit pair "N/M"
pub fn normalize_number_field(value: &str) -> String {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let valid = match value.split_once('/') {
        Some((number, total)) => all_digits(number) && all_digits(total),
        None => all_digits(value),
    };

    if valid {
        value.to_string()
    } else {
        String::new()
    }
}

/// Fill in a missing duration or bitrate from the file size.
///
/// Uses `size_bytes * 8 = bitrate_kbps * 1000 * duration_seconds`. When both
/// are unknown the bitrate is assumed to be 192 kbps. Without a file size
/// the missing values stay 0.
pub fn resolve_duration_bitrate(duration: f64, bitrate: u32, file_size: Option<u64>) -> (f64, u32) {
    let known_duration = duration > 0.0;
    let known_bitrate = bitrate > 0;
    if known_duration && known_bitrate {
        return (duration, bitrate);
    }

    let Some(size) = file_size else {
        return (duration, bitrate);
    };
    let bits = size as f64 * 8.0;

    match (known_duration, known_bitrate) {
        (true, false) => (duration, (bits / (duration * 1000.0)) as u32),
        (false, true) => (bits / (bitrate as f64 * 1000.0), bitrate),
        _ => (
            bits / (FALLBACK_BITRATE_KBPS as f64 * 1000.0),
            FALLBACK_BITRATE_KBPS,
        ),
    }
}

/// Tags and stream properties as read from a file
#[derive(Debug, Clone, Default)]
pub struct RawAudio {
    pub tags: TagContainer,
    /// Seconds, 0 when unknown
    pub duration: f64,
    /// Kbps, 0 when unknown
    pub bitrate: u32,
}

/// Reads tags from a file; `None` means the file is not readable audio
pub trait TagReader: Send + Sync {
    fn read(&self, path: &Path) -> Option<RawAudio>;
}

/// Build a record from a file, or `None` when the reader cannot parse it
pub fn extract_record(reader: &dyn TagReader, path: &Path) -> Option<AudioMetadataRecord> {
    let raw = reader.read(path)?;
    let file_size = std::fs::metadata(path).ok().map(|m| m.len());
    Some(build_record(path, &raw, file_size))
}

/// Apply field rules and normalization to raw tag data
pub fn build_record(path: &Path, raw: &RawAudio, file_size: Option<u64>) -> AudioMetadataRecord {
    let mut record = AudioMetadataRecord {
        path: path.to_string_lossy().to_string(),
        ..Default::default()
    };

    for rule in FIELD_RULES {
        let value = rule.resolve(&raw.tags).unwrap_or_default();
        match rule.field {
            Field::Title => record.title = value,
            Field::Artist => record.artist = value,
            Field::AlbumArtist => record.album_artist = value,
            Field::Album => record.album = value,
            Field::Year => record.year = value,
            Field::Track => record.track = normalize_number_field(&value),
            Field::Disc => record.disc = normalize_number_field(&value),
            Field::Publisher => record.publisher = value,
            Field::Composer => record.composer = value,
            Field::Genre => record.genre = value,
        }
    }

    let (duration, bitrate) = resolve_duration_bitrate(raw.duration, raw.bitrate, file_size);
    record.duration = duration;
    record.bitrate = bitrate;
    record
}

/// [`TagReader`] backed by lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl LoftyTagReader {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Option<TaggedFile> {
        Probe::open(path).ok()?.guess_file_type().ok()?.read().ok()
    }
}

impl TagReader for LoftyTagReader {
    fn read(&self, path: &Path) -> Option<RawAudio> {
        // A malformed file must degrade to "no record", even if the parser panics
        let parsed = panic::catch_unwind(AssertUnwindSafe(|| Self::open(path)));
        let tagged = match parsed {
            Ok(Some(tagged)) => tagged,
            Ok(None) => return None,
            Err(_) => {
                log::warn!("Tag parser panicked on {:?}", path);
                return None;
            }
        };

        let properties = tagged.properties();
        let mut tags = TagContainer::new();
        for tag in tagged.tags() {
            flatten_tag(tag, &mut tags);
        }

        Some(RawAudio {
            tags,
            duration: properties.duration().as_secs_f64(),
            bitrate: properties.audio_bitrate().unwrap_or(0),
        })
    }
}

fn generic_name(key: &ItemKey) -> Option<&'static str> {
    match key {
        ItemKey::TrackTitle => Some("title"),
        ItemKey::TrackArtist => Some("artist"),
        ItemKey::AlbumArtist => Some("albumartist"),
        ItemKey::AlbumTitle => Some("album"),
        ItemKey::RecordingDate => Some("date"),
        ItemKey::Label | ItemKey::Publisher => Some("publisher"),
        ItemKey::Composer => Some("composer"),
        ItemKey::Genre => Some("genre"),
        _ => None,
    }
}

/// "N" or "N/M" from split number/total items
fn compose_number(number: Option<&str>, total: Option<&str>) -> Option<String> {
    match (number, total) {
        (Some(n), Some(t)) => Some(format!("{}/{}", n, t)),
        (Some(n), None) => Some(n.to_string()),
        _ => None,
    }
}

fn flatten_tag(tag: &Tag, out: &mut TagContainer) {
    let tag_type = tag.tag_type();

    for item in tag.items() {
        let key = item.key();
        if matches!(
            key,
            ItemKey::TrackNumber | ItemKey::TrackTotal | ItemKey::DiscNumber | ItemKey::DiscTotal
        ) {
            continue;
        }
        let Some(text) = item.value().text() else {
            continue;
        };
        if let Some(name) = generic_name(key) {
            out.insert(name, text);
        }
        if let Some(native) = key.map_key(tag_type, true) {
            out.insert(native, text);
        }
    }

    // lofty splits "3/12" into number and total; put it back together
    let pairs = [
        ("tracknumber", ItemKey::TrackNumber, ItemKey::TrackTotal),
        ("discnumber", ItemKey::DiscNumber, ItemKey::DiscTotal),
    ];
    for (name, number_key, total_key) in pairs {
        let composed = compose_number(tag.get_string(&number_key), tag.get_string(&total_key));
        if let Some(value) = composed {
            if let Some(native) = number_key.map_key(tag_type, false) {
                out.insert(native, value.clone());
            }
            out.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(field: Field) -> &'static FieldRule {
        FIELD_RULES.iter().find(|r| r.field == field).unwrap()
    }

    #[test]
    fn test_normalize_number_field() {
        assert_eq!(normalize_number_field("5"), "5");
        assert_eq!(normalize_number_field("3/12"), "3/12");
        assert_eq!(normalize_number_field("a/3"), "");
        assert_eq!(normalize_number_field("0"), "0");
        assert_eq!(normalize_number_field(""), "");
        assert_eq!(normalize_number_field("3/"), "");
        assert_eq!(normalize_number_field("1/2/3"), "");
        assert_eq!(normalize_number_field(" 4"), "");
        assert_eq!(normalize_number_field("-1"), "");
    }

    proptest! {
        #[test]
        fn prop_digit_pairs_survive(n in 0u32..10_000, m in 0u32..10_000) {
            let pair = format!("{}/{}", n, m);
            prop_assert_eq!(normalize_number_field(&pair), pair.clone());
            prop_assert_eq!(normalize_number_field(&n.to_string()), n.to_string());
        }

        #[test]
        fn prop_output_is_input_or_empty(s in ".{0,12}") {
            let out = normalize_number_field(&s);
            prop_assert!(out.is_empty() || out == s);
        }
    }

    #[test]
    fn test_rule_prefers_generic_key() {
        let tags: TagContainer = [("TIT2", "Native"), ("title", "Generic")].into_iter().collect();
        assert_eq!(rule(Field::Title).resolve(&tags), Some("Generic".to_string()));
    }

    #[test]
    fn test_rule_falls_back_to_native_code() {
        let tags: TagContainer = [("TPE1", "Soda Stereo")].into_iter().collect();
        assert_eq!(rule(Field::Artist).resolve(&tags), Some("Soda Stereo".to_string()));
    }

    #[test]
    fn test_rule_skips_empty_values_and_takes_first_element() {
        let mut tags = TagContainer::new();
        tags.insert("date", "");
        tags.insert("TDRC", "1986");
        tags.insert("TDRC", "1987");
        assert_eq!(rule(Field::Year).resolve(&tags), Some("1986".to_string()));
    }

    #[test]
    fn test_rule_missing_is_none() {
        assert_eq!(rule(Field::Genre).resolve(&TagContainer::new()), None);
    }

    #[test]
    fn test_fallback_both_unknown_uses_192() {
        let (duration, bitrate) = resolve_duration_bitrate(0.0, 0, Some(4_800_000));
        assert_eq!(bitrate, 192);
        assert_eq!(duration, 4_800_000.0 * 8.0 / (192.0 * 1000.0));
    }

    #[test]
    fn test_fallback_estimates_missing_bitrate() {
        // 10 s of 320 kbps
        let (duration, bitrate) = resolve_duration_bitrate(10.0, 0, Some(400_000));
        assert_eq!(duration, 10.0);
        assert_eq!(bitrate, 320);
    }

    #[test]
    fn test_fallback_estimates_missing_duration() {
        let (duration, bitrate) = resolve_duration_bitrate(0.0, 128, Some(160_000));
        assert_eq!(bitrate, 128);
        assert_eq!(duration, 10.0);
    }

    #[test]
    fn test_fallback_keeps_known_values_and_unknown_size() {
        assert_eq!(resolve_duration_bitrate(200.5, 256, Some(1)), (200.5, 256));
        assert_eq!(resolve_duration_bitrate(0.0, 0, None), (0.0, 0));
    }

    #[test]
    fn test_build_record_normalizes_fields() {
        let tags: TagContainer = [
            ("title", "De Música Ligera"),
            ("artist", "Soda Stereo"),
            ("TPE2", "Soda Stereo"),
            ("album", "Canción Animal"),
            ("TDRC", "1990"),
            ("tracknumber", "a/3"),
            ("TPOS", "1/1"),
            ("genre", "Rock"),
        ]
        .into_iter()
        .collect();
        let raw = RawAudio {
            tags,
            duration: 211.0,
            bitrate: 320,
        };

        let record = build_record(Path::new("/music/a.mp3"), &raw, Some(1));
        assert_eq!(record.path, "/music/a.mp3");
        assert_eq!(record.title, "De Música Ligera");
        assert_eq!(record.album_artist, "Soda Stereo");
        assert_eq!(record.year, "1990");
        assert_eq!(record.track, "");
        assert_eq!(record.disc, "1/1");
        assert_eq!(record.publisher, "");
        assert_eq!(record.composer, "");
        assert_eq!(record.duration, 211.0);
        assert_eq!(record.bitrate, 320);
    }

    #[test]
    fn test_compose_number() {
        assert_eq!(compose_number(Some("3"), Some("12")), Some("3/12".to_string()));
        assert_eq!(compose_number(Some("3"), None), Some("3".to_string()));
        assert_eq!(compose_number(None, Some("12")), None);
    }

    #[test]
    fn test_lofty_reader_rejects_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.flac");
        std::fs::write(&path, b"this is not audio").unwrap();
        assert!(LoftyTagReader::new().read(&path).is_none());
        assert!(extract_record(&LoftyTagReader, &path).is_none());
    }

    #[test]
    fn test_lofty_reader_missing_file() {
        assert!(LoftyTagReader::new().read(Path::new("/nonexistent/file.flac")).is_none());
    }
}
