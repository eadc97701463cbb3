use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A poem from the Latin index. `title` is the raw heading, e.g. "IIb.".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPoem {
    pub title: String,
    pub text: String,
}

/// One translated poem as scraped, keyed by the source's own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub id: String,
    pub source: Source,
    pub url: String,
    pub text: String,
}

/// A Latin poem joined with every translation that matched its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPoem {
    pub id: String,
    pub latin_title: String,
    pub latin_text: String,
    pub translations: BTreeMap<Source, String>,
}

/// Translation providers. Declaration order is the key order of `translations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    Negenborn,
    Perseus,
    Wikisource,
    #[serde(alias = "PoetryInTranslation")]
    PoetryinTranslation,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::Negenborn,
        Source::Perseus,
        Source::Wikisource,
        Source::PoetryinTranslation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Source::Negenborn => "Negenborn",
            Source::Perseus => "Perseus",
            Source::Wikisource => "Wikisource",
            Source::PoetryinTranslation => "PoetryinTranslation",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Source::Negenborn => "catullus_english_negenborn.json",
            Source::Perseus => "catullus_english_perseus.json",
            Source::Wikisource => "catullus_wikisource_english_all.json",
            Source::PoetryinTranslation => "catullus_english_poetryintranslation.json",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|src| src.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown source '{}' (expected one of: negenborn, perseus, wikisource, poetryintranslation)",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_source_case_insensitive() {
        assert_eq!("perseus".parse::<Source>().unwrap(), Source::Perseus);
        assert_eq!(
            "POETRYINTRANSLATION".parse::<Source>().unwrap(),
            Source::PoetryinTranslation
        );
        assert!("loeb".parse::<Source>().is_err());
    }

    #[test]
    fn accepts_alternate_spelling() {
        let json = r#"{"id":"3","source":"PoetryInTranslation","url":"u","text":"t"}"#;
        let rec: TranslationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.source, Source::PoetryinTranslation);
    }

    #[test]
    fn translations_serialize_in_source_order() {
        let mut translations = BTreeMap::new();
        translations.insert(Source::PoetryinTranslation, "d".to_string());
        translations.insert(Source::Perseus, "b".to_string());
        translations.insert(Source::Negenborn, "a".to_string());
        let poem = CombinedPoem {
            id: "1".into(),
            latin_title: "I.".into(),
            latin_text: "x".into(),
            translations,
        };
        let json = serde_json::to_string(&poem).unwrap();
        assert!(json.ends_with(
            r#""translations":{"Negenborn":"a","Perseus":"b","PoetryinTranslation":"d"}}"#
        ));
    }
}
