use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use tracing::info;

use crate::ids::extract_id;
use crate::model::{CanonicalPoem, CombinedPoem, Source, TranslationRecord};
use crate::settings::Settings;
use crate::store;

/// Lower-cased record id → text. A repeated id keeps the last record.
pub fn index_by_id(records: &[TranslationRecord]) -> HashMap<String, String> {
    records
        .iter()
        .map(|r| (r.id.to_lowercase(), r.text.clone()))
        .collect()
}

/// Left-join translations onto the Latin poems, in Latin order. Translation ids
/// are matched as-is (case-insensitively); only Latin headings are normalized.
pub fn merge(
    canonical: &[CanonicalPoem],
    sources: &BTreeMap<Source, Vec<TranslationRecord>>,
) -> Vec<CombinedPoem> {
    let indexed: Vec<(Source, HashMap<String, String>)> = sources
        .iter()
        .map(|(source, records)| (*source, index_by_id(records)))
        .collect();

    canonical
        .iter()
        .map(|poem| {
            let id = extract_id(&poem.title);
            let key = id.to_lowercase();
            let translations = indexed
                .iter()
                .filter_map(|(source, index)| index.get(&key).map(|t| (*source, t.clone())))
                .collect();
            CombinedPoem {
                id,
                latin_title: poem.title.clone(),
                latin_text: poem.text.clone(),
                translations,
            }
        })
        .collect()
}

/// Read every source snapshot. A missing file is a hard error.
pub fn load_sources(settings: &Settings) -> Result<BTreeMap<Source, Vec<TranslationRecord>>> {
    Source::ALL
        .into_iter()
        .map(|source| -> Result<(Source, Vec<TranslationRecord>)> {
            Ok((source, store::read_json(&settings.source_path(source))?))
        })
        .collect()
}

/// Rebuild the combined corpus from the persisted snapshots.
pub fn run(settings: &Settings) -> Result<usize> {
    info!("Combining all sources into one JSON file...");
    let canonical: Vec<CanonicalPoem> = store::read_json(&settings.canonical_path())?;
    let sources = load_sources(settings)?;
    for (source, records) in &sources {
        info!("{}: {} records", source, records.len());
    }

    let combined = merge(&canonical, &sources);
    let path = settings.combined_path();
    store::write_json(&path, &combined)?;
    println!("Saved combined data with {} poems to {:?}", combined.len(), path);
    Ok(combined.len())
}
