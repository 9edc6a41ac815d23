//! Outbound HTTP as an injected capability.
//!
//! Both the page collector and the storage backends go through [`Fetcher`],
//! so tests can point them at a local mock server (or skip the network
//! entirely for pure dispatch tests).

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// Blocking-from-the-caller's-perspective HTTP fetches. One page or image
/// is fully fetched before the pipeline moves on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and returns the response body as text.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// Fetches a URL and returns the raw response body.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a throwaway user-agent string: a random run of ASCII letters
/// whose length is a multiple of 10, up to 90.
///
/// The random source is injected so the string is reproducible under test.
pub fn random_user_agent<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.random_range(0..10) * 10;
    (0..len)
        .map(|_| LETTERS[rng.random_range(0..LETTERS.len())] as char)
        .collect()
}

/// `reqwest`-backed [`Fetcher`] used for real scrape runs.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let ua = random_user_agent(&mut rand::rng());
        let response = self.client.get(url).header(USER_AGENT, ua).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        Ok(self.get(url).await?.text().await?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn user_agent_is_letters_in_tens() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let ua = random_user_agent(&mut rng);
            assert_eq!(ua.len() % 10, 0);
            assert!(ua.len() <= 90);
            assert!(ua.chars().all(|c| c.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn user_agent_is_deterministic_for_a_seed() {
        let a = random_user_agent(&mut StdRng::seed_from_u64(42));
        let b = random_user_agent(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
