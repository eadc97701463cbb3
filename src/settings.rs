use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::model::Source;

const ENV_PREFIX: &str = "CATULLUS";

const CANONICAL_FILE: &str = "catullus_all_poems.json";
const COMBINED_FILE: &str = "catullus_combined_translations.json";
const TRANSLATIONS_DIR: &str = "translations";

/// Runtime configuration handed to every pipeline stage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,

    pub latin_url: String,

    pub perseus_url_template: String,
    pub perseus_delay_ms: u64,

    pub negenborn_url_template: String,
    pub negenborn_delay_ms: u64,
    pub negenborn_markers: Vec<String>,

    pub wikisource_base_url: String,
    pub wikisource_index_path: String,
    pub wikisource_delay_ms: u64,

    pub poetry_in_translation_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("data"),
            user_agent: "Mozilla/5.0".into(),
            request_timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 1000,
            latin_url: "https://www.thelatinlibrary.com/catullus.shtml".into(),
            perseus_url_template:
                "https://www.perseus.tufts.edu/hopper/text?doc=Perseus:text:1999.02.0005:poem={}"
                    .into(),
            perseus_delay_ms: 1000,
            negenborn_url_template: "http://rudy.negenborn.net/catullus/text2/e{}.htm".into(),
            negenborn_delay_ms: 500,
            negenborn_markers: vec!["Mentula".into(), "Lesbia".into()],
            wikisource_base_url: "https://en.wikisource.org".into(),
            wikisource_index_path: "/wiki/Translation:The_poems_of_Catullus".into(),
            wikisource_delay_ms: 0,
            poetry_in_translation_url:
                "https://www.poetryintranslation.com/PITBR/Latin/Catullus.php".into(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with `CATULLUS_*` environment variables.
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("negenborn_markers"),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .context("Invalid CATULLUS_* configuration")
    }

    pub fn canonical_path(&self) -> PathBuf {
        self.data_dir.join(CANONICAL_FILE)
    }

    pub fn combined_path(&self) -> PathBuf {
        self.data_dir.join(COMBINED_FILE)
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.data_dir.join(TRANSLATIONS_DIR)
    }

    pub fn source_path(&self, source: Source) -> PathBuf {
        self.translations_dir().join(source.file_name())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = dir.to_path_buf();
        self
    }
}

/// Substitute a poem id into a `{}` URL template.
pub fn fill_template(template: &str, id: &str) -> String {
    template.replace("{}", id)
}
