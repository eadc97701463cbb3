pub mod negenborn;
pub mod perseus;
pub mod poetry_in_translation;
pub mod wikisource;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::fetch::{self, Fetch};
use crate::model::{Source, TranslationRecord};
use crate::settings::Settings;
use crate::store;

/// One translation provider. Each owns its page layout rules; a page that does not
/// match is skipped, never fatal.
pub trait Extractor {
    fn source(&self) -> Source;
    fn collect(&self, fetcher: &dyn Fetch) -> Vec<TranslationRecord>;
}

pub fn extractor_for(source: Source, settings: &Settings) -> Box<dyn Extractor> {
    match source {
        Source::Negenborn => Box::new(negenborn::Negenborn::new(settings)),
        Source::Perseus => Box::new(perseus::Perseus::new(settings)),
        Source::Wikisource => Box::new(wikisource::Wikisource::new(settings)),
        Source::PoetryinTranslation => {
            Box::new(poetry_in_translation::PoetryInTranslation::new(settings))
        }
    }
}

/// Scrape one source and replace its snapshot file. Returns the record count.
pub fn run(extractor: &dyn Extractor, fetcher: &dyn Fetch, settings: &Settings) -> Result<usize> {
    let source = extractor.source();
    info!("Scraping {}...", source);
    let records = extractor.collect(fetcher);

    let path = settings.source_path(source);
    store::write_json(&path, &records)?;
    println!("Saved {} {} poems to {:?}", records.len(), source, path);
    Ok(records.len())
}

/// Visit each `(id, url)` in order with a fixed pause after every request.
pub(crate) fn paced<F>(
    source: Source,
    targets: Vec<(String, String)>,
    delay_ms: u64,
    mut visit: F,
) -> Vec<TranslationRecord>
where
    F: FnMut(&str, &str) -> Option<String>,
{
    let pb = progress_bar(targets.len());
    let mut records = Vec::new();

    for (id, url) in targets {
        debug!("Fetching {} poem {}", source, id);
        if let Some(text) = visit(&id, &url) {
            records.push(TranslationRecord {
                id,
                source,
                url,
                text,
            });
        }
        fetch::pause(delay_ms);
        pb.inc(1);
    }

    pb.finish_and_clear();
    records
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::CannedFetcher;

    #[test]
    fn paced_keeps_order_and_skips_misses() {
        let targets = vec![
            ("1".to_string(), "u1".to_string()),
            ("2".to_string(), "u2".to_string()),
            ("2b".to_string(), "u2b".to_string()),
        ];
        let records = paced(Source::Perseus, targets, 0, |id, _| {
            (id != "2").then(|| format!("poem {}", id))
        });
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2b"]);
        assert_eq!(records[1].url, "u2b");
        assert_eq!(records[1].text, "poem 2b");
    }

    #[test]
    fn run_writes_snapshot_even_when_everything_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default().with_data_dir(dir.path());
        let extractor = extractor_for(Source::PoetryinTranslation, &settings);
        let saved = run(extractor.as_ref(), &CannedFetcher::default(), &settings).unwrap();
        assert_eq!(saved, 0);
        let back: Vec<TranslationRecord> =
            store::read_json(&settings.source_path(Source::PoetryinTranslation)).unwrap();
        assert!(back.is_empty());
    }
}
