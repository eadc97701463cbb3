use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::warn;

use super::{paced, Extractor};
use crate::fetch::Fetch;
use crate::html::{joined_text, raw_text, word_count};
use crate::ids;
use crate::model::{Source, TranslationRecord};
use crate::settings::{fill_template, Settings};

static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static TRANSLATION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("catullus_translation").unwrap());

/// Cells shorter than this are navigation or notes, not a poem.
const MIN_WORDS: usize = 10;

/// Rudy Negenborn's Catullus site, one page per poem id.
pub struct Negenborn {
    url_template: String,
    delay_ms: u64,
    markers: Vec<String>,
    ids: Vec<String>,
}

impl Negenborn {
    pub fn new(settings: &Settings) -> Self {
        Negenborn {
            url_template: settings.negenborn_url_template.clone(),
            delay_ms: settings.negenborn_delay_ms,
            markers: settings.negenborn_markers.clone(),
            ids: ids::poem_ids(),
        }
    }
}

impl Extractor for Negenborn {
    fn source(&self) -> Source {
        Source::Negenborn
    }

    fn collect(&self, fetcher: &dyn Fetch) -> Vec<TranslationRecord> {
        let targets = self
            .ids
            .iter()
            .map(|id| (id.clone(), fill_template(&self.url_template, id)))
            .collect();

        paced(Source::Negenborn, targets, self.delay_ms, |id, url| {
            let html = match fetcher.fetch(url) {
                Ok(html) => html,
                Err(e) => {
                    warn!("Error fetching poem {}: {}", id, e);
                    return None;
                }
            };
            let text = parse_page(&html, &self.markers);
            if text.is_none() {
                warn!("No text found for poem {}", id);
            }
            text
        })
    }
}

/// First table cell that either wraps a `<catullus_translation>` element or
/// mentions one of `markers` and is long enough to be a poem.
pub fn parse_page(html: &str, markers: &[String]) -> Option<String> {
    let doc = Html::parse_document(html);

    for td in doc.select(&TD_SEL) {
        if let Some(tagged) = td.select(&TRANSLATION_SEL).next() {
            return Some(joined_text(tagged, "\n")).filter(|t| !t.is_empty());
        }
        let raw = raw_text(td);
        if markers.iter().any(|m| raw.contains(m.as_str())) {
            let candidate = joined_text(td, "\n");
            if word_count(&candidate) > MIN_WORDS {
                return Some(candidate);
            }
        }
    }
    None
}
