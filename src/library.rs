//! Library-wide statistics over extracted metadata

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::models::{round_to, AudioMetadataRecord};

/// Aggregate view of an analyzed library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibrarySummary {
    /// Number of records analyzed
    pub archivos_analizados: usize,
    /// Elapsed analysis time, seconds
    pub tiempo_total_segundos: f64,
    /// Elapsed analysis time as HH:MM:SS
    pub tiempo_total_formateado: String,
    /// Average over records with a known bitrate
    pub bitrate_promedio_kbps: f64,
    pub duracion_total_segundos: f64,
    pub duracion_promedio_segundos: f64,
    /// Average duration as MM:SS
    pub duracion_promedio_formateada: String,
    pub artistas_unicos: usize,
    pub album_artistas_unicos: usize,
    pub albumes_unicos: usize,
    /// Total listening time, human readable
    pub tiempo_total_escucha: String,
    /// Most frequent genre, first seen wins ties
    pub genero_predominante: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analisis_ia: Option<String>,
}

/// Compute the summary; pure over its inputs
pub fn build_summary(records: &[AudioMetadataRecord], elapsed: Duration) -> LibrarySummary {
    let count = records.len();
    let elapsed_secs = elapsed.as_secs_f64();

    let total_duration: f64 = records.iter().map(|r| r.duration).sum();
    let duration_avg = if count > 0 {
        total_duration / count as f64
    } else {
        0.0
    };

    let with_bitrate: Vec<u32> = records.iter().map(|r| r.bitrate).filter(|b| *b > 0).collect();
    let bitrate_avg = if with_bitrate.is_empty() {
        0.0
    } else {
        with_bitrate.iter().map(|b| *b as f64).sum::<f64>() / with_bitrate.len() as f64
    };

    LibrarySummary {
        archivos_analizados: count,
        tiempo_total_segundos: round_to(elapsed_secs, 2),
        tiempo_total_formateado: clock_hms(elapsed_secs),
        bitrate_promedio_kbps: round_to(bitrate_avg, 1),
        duracion_total_segundos: round_to(total_duration, 2),
        duracion_promedio_segundos: round_to(duration_avg, 2),
        duracion_promedio_formateada: clock_ms(duration_avg),
        artistas_unicos: distinct(records, |r| &r.artist),
        album_artistas_unicos: distinct(records, |r| &r.album_artist),
        albumes_unicos: distinct(records, |r| &r.album),
        tiempo_total_escucha: readable_duration(total_duration),
        genero_predominante: most_frequent(records.iter().map(|r| r.genre.as_str())),
        analisis_ia: None,
    }
}

fn distinct<F>(records: &[AudioMetadataRecord], field: F) -> usize
where
    F: Fn(&AudioMetadataRecord) -> &String,
{
    records
        .iter()
        .map(&field)
        .filter(|v| !v.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Most common non-empty value; on a tie the value seen first wins
pub fn most_frequent<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values.into_iter().filter(|v| !v.is_empty()) {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((value, n));
        }
    }
    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}

/// "1 días, 2 horas, 3 minutos", leaving out zero parts
pub fn readable_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{} días", days));
    }
    if hours > 0 {
        parts.push(format!("{} horas", hours));
    }
    if minutes > 0 {
        parts.push(format!("{} minutos", minutes));
    }

    if parts.is_empty() {
        "0 minutos".to_string()
    } else {
        parts.join(", ")
    }
}

/// HH:MM:SS, hours wrap at 24
pub fn clock_hms(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        (total / 3_600) % 24,
        (total / 60) % 60,
        total % 60
    )
}

/// MM:SS, minutes wrap at 60
pub fn clock_ms(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", (total / 60) % 60, total % 60)
}
