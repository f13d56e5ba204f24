//! Upstream endpoints and the JSON shapes they return.
//!
//! Everything comes from the public alquran.cloud API. Only the fields the
//! merge step needs are modelled; serde ignores the rest.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::PrepError;

/// alquran.cloud API base URL.
pub const API_BASE: &str = "https://api.alquran.cloud/v1";

/// Uthmani script edition, also the source of the partition tags.
pub const ARABIC_EDITION: &str = "quran-uthmani";
pub const URDU_EDITION: &str = "ur.jalandhry";
pub const ENGLISH_EDITION: &str = "en.sahih";

/// Per-verse recitation host, keyed by global verse identity.
pub const AUDIO_BASE: &str = "https://cdn.islamic.network/quran/audio/128/ar.alafasy";

/// Full editions are several megabytes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub fn audio_url(global_id: u32) -> String {
    format!("{AUDIO_BASE}/{global_id}.mp3")
}

/// Standard `{ code, status, data }` wrapper around every response.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    #[serde(default)]
    pub status: String,
    pub data: T,
}

/// Entry of the `/surah` metadata list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterInfo {
    pub number: u16,
    pub name: String,
    pub english_name: String,
    pub english_name_translation: String,
    pub number_of_ayahs: usize,
    #[serde(default)]
    pub revelation_type: String,
}

/// A full text edition.
#[derive(Debug, Clone, Deserialize)]
pub struct Edition {
    pub surahs: Vec<EditionChapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditionChapter {
    pub number: u16,
    pub ayahs: Vec<EditionVerse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionVerse {
    /// Global identity as reported upstream.
    pub number: u32,
    pub text: String,
    pub number_in_surah: u16,
    #[serde(default)]
    pub juz: u8,
    #[serde(default)]
    pub manzil: u8,
    #[serde(default)]
    pub page: u16,
    #[serde(default)]
    pub ruku: u16,
    #[serde(default)]
    pub hizb_quarter: u16,
}

/// Thin blocking client over the upstream API.
pub struct UpstreamClient {
    client: Client,
    base: String,
}

impl UpstreamClient {
    pub fn new() -> Result<Self, PrepError> {
        Self::with_base(API_BASE)
    }

    /// Point the client at another host serving the same API.
    pub fn with_base(base: impl Into<String>) -> Result<Self, PrepError> {
        let base = base.into();
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| PrepError::Network {
                url: base.clone(),
                source,
            })?;
        Ok(Self { client, base })
    }

    pub fn fetch_chapter_list(&self) -> Result<Vec<ChapterInfo>, PrepError> {
        self.get_json(&format!("{}/surah", self.base))
    }

    pub fn fetch_edition(&self, edition: &str) -> Result<Edition, PrepError> {
        self.get_json(&format!("{}/quran/{edition}", self.base))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, PrepError> {
        debug!(%url, "requesting");
        let network = |source| PrepError::Network {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, concat!("noble-quran/", env!("CARGO_PKG_VERSION")))
            .send()
            .map_err(network)?
            .error_for_status()
            .map_err(network)?;

        let envelope: Envelope<T> = response.json().map_err(network)?;
        if envelope.code != 200 {
            return Err(PrepError::Upstream {
                url: url.to_string(),
                message: format!("code {} ({})", envelope.code, envelope.status),
            });
        }
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edition_payload() {
        let raw = r#"{
            "code": 200,
            "status": "OK",
            "data": {
                "surahs": [{
                    "number": 1,
                    "name": "x",
                    "ayahs": [{
                        "number": 1, "text": "t", "numberInSurah": 1,
                        "juz": 1, "manzil": 1, "page": 1, "ruku": 1,
                        "hizbQuarter": 1, "sajda": false
                    }]
                }],
                "edition": { "identifier": "quran-uthmani" }
            }
        }"#;
        let envelope: Envelope<Edition> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.code, 200);
        let verse = &envelope.data.surahs[0].ayahs[0];
        assert_eq!(verse.number_in_surah, 1);
        assert_eq!(verse.hizb_quarter, 1);
    }

    #[test]
    fn parses_chapter_list() {
        let raw = r#"{"code":200,"status":"OK","data":[{"number":2,"name":"n",
            "englishName":"Al-Baqara","englishNameTranslation":"The Cow",
            "numberOfAyahs":286,"revelationType":"Medinan"}]}"#;
        let envelope: Envelope<Vec<ChapterInfo>> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data[0].english_name, "Al-Baqara");
        assert_eq!(envelope.data[0].number_of_ayahs, 286);
    }

    #[test]
    fn audio_url_uses_global_identity() {
        assert_eq!(
            audio_url(7),
            "https://cdn.islamic.network/quran/audio/128/ar.alafasy/7.mp3"
        );
    }
}
