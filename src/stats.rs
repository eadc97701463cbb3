use std::collections::BTreeMap;

use anyhow::Result;

use crate::model::{CombinedPoem, Source};
use crate::settings::Settings;
use crate::store;

pub struct Coverage {
    pub total: usize,
    pub translated: usize,
    pub per_source: BTreeMap<Source, usize>,
}

impl Coverage {
    pub fn untranslated(&self) -> usize {
        self.total - self.translated
    }
}

pub fn coverage(poems: &[CombinedPoem]) -> Coverage {
    let mut per_source: BTreeMap<Source, usize> = Source::ALL.into_iter().map(|s| (s, 0)).collect();
    for source in poems.iter().flat_map(|p| p.translations.keys()) {
        *per_source.entry(*source).or_default() += 1;
    }
    Coverage {
        total: poems.len(),
        translated: poems.iter().filter(|p| !p.translations.is_empty()).count(),
        per_source,
    }
}

pub fn run(settings: &Settings) -> Result<()> {
    let poems: Vec<CombinedPoem> = store::read_json(&settings.combined_path())?;
    let c = coverage(&poems);

    println!("Poems:        {}", c.total);
    println!("Translated:   {}", c.translated);
    println!("Untranslated: {}", c.untranslated());
    println!();
    println!("{:<20} | {:>5}", "Source", "Poems");
    println!("{}", "-".repeat(28));
    for (source, count) in &c.per_source {
        println!("{:<20} | {:>5}", source.name(), count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poem(id: &str, sources: &[Source]) -> CombinedPoem {
        CombinedPoem {
            id: id.into(),
            latin_title: format!("{}.", id),
            latin_text: String::new(),
            translations: sources.iter().map(|s| (*s, "t".to_string())).collect(),
        }
    }

    #[test]
    fn counts_per_source() {
        let poems = vec![
            poem("1", &[Source::Perseus, Source::Negenborn]),
            poem("2", &[Source::Perseus]),
            poem("2b", &[]),
        ];
        let c = coverage(&poems);
        assert_eq!(c.total, 3);
        assert_eq!(c.translated, 2);
        assert_eq!(c.untranslated(), 1);
        assert_eq!(c.per_source[&Source::Perseus], 2);
        assert_eq!(c.per_source[&Source::Negenborn], 1);
        assert_eq!(c.per_source[&Source::Wikisource], 0);
    }
}
