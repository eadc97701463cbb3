use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::warn;

use crate::decode;
use crate::error::FetchError;
use crate::settings::Settings;

/// Anything that can turn a URL into page HTML.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher with retry on rate limits and server errors.
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    backoff: Duration,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.request_timeout())
            .build()?;
        Ok(HttpFetcher {
            client,
            max_retries: settings.max_retries,
            backoff: Duration::from_millis(settings.retry_backoff_ms),
        })
    }

    fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().map_err(http_err)?;
        Ok(decode::decode_page(&bytes, content_type.as_deref()))
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        with_retry(self.max_retries, self.backoff, || self.fetch_once(url))
    }
}

/// Run `attempt` until it succeeds, fails for good, or `max_retries` extra tries
/// are used up. The wait doubles after each retryable failure.
pub fn with_retry<F>(max_retries: u32, backoff: Duration, mut attempt: F) -> Result<String, FetchError>
where
    F: FnMut() -> Result<String, FetchError>,
{
    let mut tries = 0;
    loop {
        match attempt() {
            Err(e) if e.is_retryable() && tries < max_retries => {
                let wait = backoff * 2u32.pow(tries);
                warn!(
                    "{} (attempt {}/{}), backing off {:.1}s",
                    e,
                    tries + 1,
                    max_retries,
                    wait.as_secs_f64()
                );
                thread::sleep(wait);
                tries += 1;
            }
            result => return result,
        }
    }
}

/// Fixed courtesy delay between requests to one host.
pub fn pause(delay_ms: u64) {
    if delay_ms > 0 {
        thread::sleep(Duration::from_millis(delay_ms));
    }
}


#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    /// Serves pages from memory; unknown URLs fail with 404.
    #[derive(Default)]
    pub struct CannedFetcher {
        pages: HashMap<String, String>,
        pub requested: RefCell<Vec<String>>,
    }

    impl CannedFetcher {
        pub fn with(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    impl Fetch for CannedFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
        }
    }
}
