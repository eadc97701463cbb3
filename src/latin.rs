use std::sync::LazyLock;

use anyhow::Result;
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::fetch::Fetch;
use crate::html::{joined_text, stripped_strings};
use crate::model::CanonicalPoem;
use crate::settings::Settings;
use crate::store;

static P_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static B_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("b").unwrap());

/// Split the Latin Library index into poems. A paragraph holding a bold heading
/// opens a new poem; every other paragraph adds its lines to the open one.
pub fn parse_index(html: &str) -> Vec<CanonicalPoem> {
    let doc = Html::parse_document(html);
    let mut poems = Vec::new();
    let mut title: Option<String> = None;
    let mut lines: Vec<String> = Vec::new();

    for p in doc.select(&P_SEL) {
        match p.select(&B_SEL).next() {
            Some(bold) => {
                flush(&mut poems, title.take(), &mut lines);
                title = Some(joined_text(bold, ""));
            }
            None => lines.extend(stripped_strings(p)),
        }
    }
    flush(&mut poems, title, &mut lines);

    poems
}

fn flush(poems: &mut Vec<CanonicalPoem>, title: Option<String>, lines: &mut Vec<String>) {
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        if !lines.is_empty() {
            poems.push(CanonicalPoem {
                title,
                text: lines.join("\n"),
            });
        }
    }
    lines.clear();
}

/// Fetch, parse and persist the Latin poems. Returns how many were saved.
pub fn run(fetcher: &dyn Fetch, settings: &Settings) -> Result<usize> {
    info!("Scraping Latin Library: {}", settings.latin_url);
    let poems = match fetcher.fetch(&settings.latin_url) {
        Ok(html) => parse_index(&html),
        Err(e) => {
            warn!("Latin index unavailable: {}", e);
            Vec::new()
        }
    };

    let path = settings.canonical_path();
    store::write_json(&path, &poems)?;
    println!("Saved {} Latin poems to {:?}", poems.len(), path);
    Ok(poems.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::CannedFetcher;

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/latin_library.html").unwrap()
    }

    #[test]
    fn splits_poems_on_bold_headings() {
        let poems = parse_index(&fixture());
        let titles: Vec<&str> = poems.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["I. ad Cornelium", "II. fletus passeris Lesbiae", "IIb.", "V. ad Lesbiam"]);
    }

    #[test]
    fn joins_stripped_lines() {
        let poems = parse_index(&fixture());
        assert_eq!(
            poems[0].text,
            "Cui dono lepidum novum libellum\narida modo pumice expolitum?\nCorneli, tibi: namque tu solebas\nmeas esse aliquid putare nugas."
        );
        assert_eq!(poems[2].text, "tam gratum est mihi quam ferunt puellae\npernici aureolum fuisse malum,");
    }

    #[test]
    fn heading_without_lines_is_dropped() {
        let html = "<p><b>III.</b></p><p><b>IV.</b></p><p>Phaselus ille, quem videtis, hospites,</p>";
        let poems = parse_index(html);
        assert_eq!(poems.len(), 1);
        assert_eq!(poems[0].title, "IV.");
    }

    #[test]
    fn text_before_first_heading_is_ignored() {
        let html = "<p>C. VALERIVS CATVLLVS</p><p><b>I.</b></p><p>Cui dono</p>";
        let poems = parse_index(html);
        assert_eq!(poems.len(), 1);
        assert_eq!(poems[0].text, "Cui dono");
    }

    #[test]
    fn unreachable_index_writes_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default().with_data_dir(dir.path());
        let saved = run(&CannedFetcher::default(), &settings).unwrap();
        assert_eq!(saved, 0);
        let back: Vec<CanonicalPoem> = store::read_json(&settings.canonical_path()).unwrap();
        assert!(back.is_empty());
    }
}
