use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, warn};

use super::{paced, Extractor};
use crate::fetch::Fetch;
use crate::html::joined_text;
use crate::model::{Source, TranslationRecord};
use crate::settings::Settings;

static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.mw-parser-output li a").unwrap());
static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static TR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

static POEM_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Catullus (\d+[a-z]?)").unwrap());

const POEM_HREF_PREFIX: &str = "/wiki/Translation:Catullus_";

/// English Wikisource. Poems are discovered from one index page, and each poem
/// page holds a translation/original table.
pub struct Wikisource {
    base_url: String,
    index_path: String,
    delay_ms: u64,
}

impl Wikisource {
    pub fn new(settings: &Settings) -> Self {
        Wikisource {
            base_url: settings.wikisource_base_url.clone(),
            index_path: settings.wikisource_index_path.clone(),
            delay_ms: settings.wikisource_delay_ms,
        }
    }
}

impl Extractor for Wikisource {
    fn source(&self) -> Source {
        Source::Wikisource
    }

    fn collect(&self, fetcher: &dyn Fetch) -> Vec<TranslationRecord> {
        let index_url = format!("{}{}", self.base_url, self.index_path);
        let links = match fetcher.fetch(&index_url) {
            Ok(html) => parse_index(&html, &self.base_url),
            Err(e) => {
                warn!("Wikisource index unavailable: {}", e);
                return Vec::new();
            }
        };
        info!("Wikisource index lists {} poems", links.len());

        paced(Source::Wikisource, links, self.delay_ms, |id, url| {
            match fetcher.fetch(url) {
                Ok(html) => parse_poem_page(&html),
                Err(e) => {
                    warn!("Error fetching Wikisource poem {}: {}", id, e);
                    None
                }
            }
        })
    }
}

/// `(id, absolute url)` for every "Catullus N" link on the index page.
pub fn parse_index(html: &str, base_url: &str) -> Vec<(String, String)> {
    let doc = Html::parse_document(html);
    doc.select(&LINK_SEL)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if !href.starts_with(POEM_HREF_PREFIX) {
                return None;
            }
            let label: String = a.text().collect();
            let id = POEM_LINK_RE.captures(&label)?.get(1)?.as_str().to_string();
            Some((id, format!("{}{}", base_url, href)))
        })
        .collect()
}

/// First column of the first table, header row skipped, one row per line.
pub fn parse_poem_page(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let table = doc.select(&TABLE_SEL).next()?;

    let lines: Vec<String> = table
        .select(&TR_SEL)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<_> = row.select(&TD_SEL).collect();
            (cells.len() >= 2).then(|| joined_text(cells[0], " "))
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
