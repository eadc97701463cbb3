use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::Extractor;
use crate::fetch::Fetch;
use crate::html::{joined_text, word_count};
use crate::model::{Source, TranslationRecord};
use crate::settings::Settings;

static POEM_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.poem").unwrap());
static BLOCK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2, p").unwrap());
static IMG_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

static HEADING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[a-z]?)\.").unwrap());
static CAPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(museum|artist|anonymous|c\. ?\d{3,4})").unwrap());

const QUOTES: &[char] = &['‘', '’', '“', '”', '"', '\''];

/// A.S. Kline's translation, every poem on one long page.
pub struct PoetryInTranslation {
    url: String,
}

impl PoetryInTranslation {
    pub fn new(settings: &Settings) -> Self {
        PoetryInTranslation {
            url: settings.poetry_in_translation_url.clone(),
        }
    }
}

impl Extractor for PoetryInTranslation {
    fn source(&self) -> Source {
        Source::PoetryinTranslation
    }

    fn collect(&self, fetcher: &dyn Fetch) -> Vec<TranslationRecord> {
        match fetcher.fetch(&self.url) {
            Ok(html) => parse_page(&html, &self.url),
            Err(e) => {
                warn!("PoetryinTranslation page unavailable: {}", e);
                Vec::new()
            }
        }
    }
}

struct OpenPoem {
    id: String,
    lines: Vec<String>,
}

/// Walk headings and paragraphs in page order. A numbered `h2` opens a poem;
/// paragraphs feed the open poem unless they are images or picture captions.
pub fn parse_page(html: &str, url: &str) -> Vec<TranslationRecord> {
    let doc = Html::parse_document(html);
    let Some(root) = doc.select(&POEM_SEL).next() else {
        warn!("No div.poem on {}", url);
        return Vec::new();
    };

    let mut poems = Vec::new();
    let mut current: Option<OpenPoem> = None;

    for block in root.select(&BLOCK_SEL) {
        match block.value().name() {
            "h2" => {
                let heading = joined_text(block, " ").to_lowercase();
                if !heading.starts_with(|c: char| c.is_ascii_digit()) {
                    continue;
                }
                if let Some(done) = current.take() {
                    poems.push(finish(done, url));
                }
                let id = HEADING_ID_RE
                    .captures(&heading)
                    .map(|c| c[1].to_string())
                    .unwrap_or_else(|| (poems.len() + 1).to_string());
                current = Some(OpenPoem {
                    id,
                    lines: Vec::new(),
                });
            }
            _ => {
                let Some(open) = current.as_mut() else {
                    continue;
                };
                if block.select(&IMG_SEL).next().is_some() || is_caption(block) {
                    continue;
                }
                let text = joined_text(block, " ");
                if !text.is_empty() {
                    open.lines.push(text);
                }
            }
        }
    }

    if let Some(done) = current {
        poems.push(finish(done, url));
    }
    poems
}

fn finish(poem: OpenPoem, url: &str) -> TranslationRecord {
    TranslationRecord {
        id: poem.id,
        source: Source::PoetryinTranslation,
        url: url.to_string(),
        text: poem.lines.join("\n"),
    }
}

/// Picture credits and epigraphs that sit between poems. Text nodes are glued
/// without a separator before counting, so `<br>` breaks do not add words.
fn is_caption(p: ElementRef<'_>) -> bool {
    let text = joined_text(p, "");
    text.is_empty()
        || word_count(&text) <= 3
        || text.starts_with(QUOTES)
        || CAPTION_RE.is_match(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.poetryintranslation.com/PITBR/Latin/Catullus.php";

    fn parse_fixture() -> Vec<TranslationRecord> {
        let html = std::fs::read_to_string("tests/fixtures/poetry_in_translation.html").unwrap();
        parse_page(&html, URL)
    }

    #[test]
    fn splits_on_numbered_headings() {
        let poems = parse_fixture();
        let ids: Vec<&str> = poems.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2b", "3", "4"]);
        assert!(poems.iter().all(|p| p.url == URL && p.source == Source::PoetryinTranslation));
    }

    #[test]
    fn drops_images_and_captions() {
        let poems = parse_fixture();
        assert_eq!(
            poems[0].text,
            "To whom shall I give this charming new little book\njust polished with dry pumice-stone?"
        );
        assert!(poems.iter().all(|p| !p.text.contains("Museum")));
        assert!(poems.iter().all(|p| !p.text.contains("Anonymous")));
    }

    #[test]
    fn unparseable_numbered_heading_gets_sequential_id() {
        let poems = parse_fixture();
        // "4 The Yacht" has no dot after the number; three poems precede it.
        assert_eq!(poems[3].id, "4");
        assert_eq!(poems[3].text, "That yacht you see, my friends, says that she was");
    }

    #[test]
    fn unnumbered_heading_does_not_split() {
        let poems = parse_fixture();
        assert_eq!(poems[2].text, "Mourn, you Venuses and Cupids,\nand whoever there are of more refined men.");
    }

    #[test]
    fn caption_rules() {
        let doc = Html::parse_fragment(
            "<p>Cupid.</p><p>“Lugete, o Veneres Cupidinesque”</p><p>The Death of Sparrow, c. 1870 oil on canvas</p><p>Mourn, you Venuses and Cupids, mourn</p>",
        );
        let p = Selector::parse("p").unwrap();
        let flags: Vec<bool> = doc.select(&p).map(is_caption).collect();
        assert_eq!(flags, vec![true, true, true, false]);
    }

    #[test]
    fn br_split_short_paragraph_is_a_caption() {
        let doc = Html::parse_fragment(
            "<p>Sparrow,<br>my girl's<br>delight</p><p>Sparrow, my girl's delight, with whom she plays</p>",
        );
        let p = Selector::parse("p").unwrap();
        let flags: Vec<bool> = doc.select(&p).map(is_caption).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn missing_poem_container_yields_nothing() {
        assert!(parse_page("<html><body><h2>1. To Cornelius</h2><p>To whom shall I give this</p></body></html>", URL).is_empty());
    }
}
