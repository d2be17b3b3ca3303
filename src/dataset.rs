//! Dataset loading, validation and the built-in demo data.
//!
//! In production the rows come already aggregated by period from the rate
//! shopping backend; the desktop console reads the same shape from a JSON or
//! TOML export, or falls back to a deterministic demo dataset.

use crate::error::DatasetError;
use crate::models::{Dataset, Entity, PeriodRow, RateBand};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Read and validate a dataset. The format follows the file extension.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ext != "json" && ext != "toml" {
        return Err(DatasetError::UnsupportedFormat(path.display().to_string()));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DatasetError::FileNotFound(path.display().to_string())
        } else {
            DatasetError::IoError(e)
        }
    })?;

    let dataset: Dataset = if ext == "json" {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    validate(&dataset)?;

    log::info!(
        "[Dataset] loaded {} rows, {} competitors from {}",
        dataset.rows.len(),
        dataset.competitors.len(),
        path.display()
    );
    Ok(dataset)
}

/// Structural checks. Period labels are not checked here: a row
/// with a malformed label still renders, it just has no drill-down chart.
pub fn validate(dataset: &Dataset) -> Result<(), DatasetError> {
    let mut ids = HashSet::new();
    for competitor in &dataset.competitors {
        if !ids.insert(&competitor.id) {
            return Err(DatasetError::DuplicateEntity(competitor.id.to_string()));
        }
    }

    let mut labels = HashSet::new();
    for row in &dataset.rows {
        if !labels.insert(row.label.as_str()) {
            return Err(DatasetError::DuplicatePeriod(row.label.clone()));
        }
        if let Some(unknown) = row.competitors.keys().find(|id| !ids.contains(id)) {
            return Err(DatasetError::UnknownEntity {
                row: row.label.clone(),
                entity: unknown.to_string(),
            });
        }
    }
    Ok(())
}

const DEMO_COMPETITORS: [(&str, &str); 12] = [
    ("Harbor View Inn", "$120 - $180"),
    ("The Meridian", "$210 - $320"),
    ("Bayside Suites", "$95 - $150"),
    ("Grand Plaza Hotel & Conference Center", "Group & conference rates"),
    ("Lighthouse Lodge", "$80 - $130"),
    ("Coral Reef Resort", "$250 - $410"),
    ("Old Town B&B", "$70 - $110"),
    ("Skyline Tower Hotel", "$160 - $240"),
    ("Marina Bay Hotel", "$140 - $220"),
    ("Pinewood Retreat", "$90 - $140"),
    ("The Regent Boutique", "$280 - $450"),
    ("Sunset Boulevard Motel", "$60 - $95"),
];

const DEMO_MONTHS: [&str; 12] = [
    "Aug'24", "Sep'24", "Oct'24", "Nov'24", "Dec'24", "Jan'25", "Feb'25", "Mar'25", "Apr'25",
    "May'25", "Jun'25", "Jul'25",
];

/// Built-in dataset: one subscriber, twelve competitors, twelve months.
///
/// Counts follow a fixed seasonal pattern, so the demo renders identically
/// on every start. Some competitors have months with no rate changes at all.
pub fn demo_dataset() -> Dataset {
    const SEASON: [u64; 12] = [92, 74, 61, 48, 70, 44, 39, 55, 63, 78, 95, 100];

    let competitors: Vec<Entity> = DEMO_COMPETITORS
        .iter()
        .enumerate()
        .map(|(i, (name, range))| {
            let entity = Entity::competitor(format!("hotel{}", i + 1), *name, *range);
            if i == 3 {
                entity.with_rate_band(RateBand::new(1_000_000_000.0, 9_999_999_999.0))
            } else {
                entity
            }
        })
        .collect();

    let rows = DEMO_MONTHS
        .iter()
        .zip(SEASON)
        .enumerate()
        .map(|(m, (label, season))| {
            let mut row = PeriodRow::new(*label, season * 7);
            for (i, competitor) in competitors.iter().enumerate() {
                let weight = 2 + ((i * 7 + m * 3) % 9) as u64;
                let quiet = (i + m) % 11 == 0;
                let count = if quiet { 0 } else { season * weight / 2 };
                row.competitors.insert(competitor.id.clone(), count);
            }
            row
        })
        .collect();

    Dataset {
        subscriber: Entity::subscriber("subscriber", "Seaside Grand Resort")
            .with_rate_band(RateBand::new(150.0, 260.0)),
        competitors,
        rows,
    }
}
