use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Directory service the lookups go to unless `COUNTRY_API_URL` overrides it.
const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Enrichment record for a blog's country tag. Fields come through from the
/// directory service as-is; absent ones default instead of failing the
/// decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryInfo {
    #[serde(default)]
    pub name: CountryName,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

/// Thin client for the country directory service.
#[derive(Clone)]
pub struct CountryClient {
    http: reqwest::Client,
    base_url: String,
}

impl CountryClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .expect("reqwest client");

        CountryClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("COUNTRY_API_URL")
            .unwrap_or_else(|_| String::from(DEFAULT_BASE_URL));
        CountryClient::new(&base_url)
    }

    /// Fetches the directory record for a country name, taking the first
    /// element of the returned array.
    ///
    /// Every failure mode (transport error, timeout, non-200 answer,
    /// undecodable body) comes back as `None`: callers treat a missing
    /// record as normal, never as an error.
    pub async fn lookup(&self, country_name: &str) -> Option<CountryInfo> {
        let url = format!(
            "{}/name/{}",
            self.base_url,
            urlencoding::encode(country_name)
        );

        let response = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(err) => {
                log::warn!("country lookup for {:?} failed: {}", country_name, err);
                return None;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            log::warn!(
                "country lookup for {:?} answered {}",
                country_name,
                response.status()
            );
            return None;
        }

        match response.json::<Vec<CountryInfo>>().await {
            Ok(matches) => matches.into_iter().next(),
            Err(err) => {
                log::warn!(
                    "country lookup for {:?} sent an undecodable body: {}",
                    country_name,
                    err
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DIRECTORY_ANSWER: &str = r#"[
        {
            "name": { "common": "Iceland", "official": "Iceland" },
            "region": "Europe",
            "subregion": "Northern Europe",
            "population": 366425,
            "capital": ["Reykjavik"],
            "flag": "🇮🇸",
            "unasked_for_field": true
        },
        {
            "name": { "common": "Republic of Iceland", "official": "whatever" }
        }
    ]"#;

    #[test]
    fn test_first_array_element_wins() {
        let matches: Vec<CountryInfo> = serde_json::from_str(DIRECTORY_ANSWER).unwrap();
        let first = matches.into_iter().next().unwrap();

        assert_eq!(first.name.common, "Iceland");
        assert_eq!(first.region.as_deref(), Some("Europe"));
        assert_eq!(first.population, Some(366425));
        assert_eq!(first.capital, vec![String::from("Reykjavik")]);
    }

    #[test]
    fn test_sparse_record_still_decodes() {
        let sparse: CountryInfo = serde_json::from_str(r#"{ "region": "Oceania" }"#).unwrap();

        assert_eq!(sparse.name.common, "");
        assert_eq!(sparse.population, None);
        assert!(sparse.capital.is_empty());
    }

    #[actix_rt::test]
    async fn test_unreachable_service_is_absent_not_error() {
        let client = CountryClient::new("http://127.0.0.1:1");

        assert!(client.lookup("Iceland").await.is_none());
    }
}
