use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::warn;

use super::{paced, Extractor};
use crate::fetch::Fetch;
use crate::html::joined_text;
use crate::ids;
use crate::model::{Source, TranslationRecord};
use crate::settings::{fill_template, Settings};

static TEXT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.text").unwrap());

/// Perseus Digital Library, one page per poem id.
pub struct Perseus {
    url_template: String,
    delay_ms: u64,
    ids: Vec<String>,
}

impl Perseus {
    pub fn new(settings: &Settings) -> Self {
        Perseus {
            url_template: settings.perseus_url_template.clone(),
            delay_ms: settings.perseus_delay_ms,
            ids: ids::poem_ids(),
        }
    }
}

impl Extractor for Perseus {
    fn source(&self) -> Source {
        Source::Perseus
    }

    fn collect(&self, fetcher: &dyn Fetch) -> Vec<TranslationRecord> {
        let targets = self
            .ids
            .iter()
            .map(|id| (id.clone(), fill_template(&self.url_template, id)))
            .collect();

        paced(Source::Perseus, targets, self.delay_ms, |id, url| {
            match fetcher.fetch(url) {
                Ok(html) => parse_page(&html),
                Err(e) => {
                    warn!("Error fetching poem {}: {}", id, e);
                    None
                }
            }
        })
    }
}

/// Text of the `div.text` region, one stripped text node per line.
pub fn parse_page(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let region = doc.select(&TEXT_SEL).next()?;
    Some(joined_text(region, "\n")).filter(|t| !t.is_empty())
}
