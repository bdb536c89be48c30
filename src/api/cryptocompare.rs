// ============================================================================
// API Client : CryptoCompare
// ============================================================================
// Récupère le catalogue des cryptos et les cotations depuis min-api.cryptocompare.com
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Result<T, E> : erreurs typées (QuoteError) propagées avec ?
// 3. Serde : désérialisation JSON automatique
// 4. Désérialiseur custom : valeurs DISPLAY en string OU en nombre
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::api::MarketData;
use crate::config::Config;
use crate::error::{QuoteError, QuoteResult};
use crate::models::{Asset, Quote, ValidSelection};

// ============================================================================
// Structures pour parser les réponses JSON de CryptoCompare
// ============================================================================
// CONCEPT RUST : #[serde(rename = "...")]
// - CryptoCompare utilise des clés en PascalCase / MAJUSCULES
// - On garde des noms Rust en snake_case
// ============================================================================

/// Réponse de /data/top/mktcapfull
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(rename = "Data")]
    data: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "CoinInfo")]
    coin_info: CoinInfo,
}

#[derive(Debug, Deserialize)]
struct CoinInfo {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "FullName")]
    full_name: String,
}

/// Réponse de /data/pricemultifull
///
/// DISPLAY[asset][devise] : valeurs formatées pour l'affichage
/// RAW[asset][devise] : valeurs numériques
#[derive(Debug, Deserialize)]
struct PriceMultiResponse {
    #[serde(rename = "DISPLAY", default)]
    display: HashMap<String, HashMap<String, DisplayQuote>>,
    #[serde(rename = "RAW", default)]
    raw: HashMap<String, HashMap<String, RawQuote>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct DisplayQuote {
    #[serde(deserialize_with = "string_or_number")]
    price: String,
    #[serde(rename = "HIGHDAY", deserialize_with = "string_or_number")]
    high_day: String,
    #[serde(rename = "LOWDAY", deserialize_with = "string_or_number")]
    low_day: String,
    #[serde(rename = "CHANGEPCT24HOUR", deserialize_with = "string_or_number")]
    change_pct_24h: String,
    #[serde(rename = "LASTUPDATE", deserialize_with = "string_or_number")]
    last_update: String,
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    #[serde(rename = "CHANGEPCT24HOUR", default)]
    change_pct_24h: Option<f64>,
    #[serde(rename = "LASTUPDATE", default)]
    last_update: Option<i64>,
}

/// Accepte "2.5" comme 2.5 : les champs DISPLAY sont normalement des strings
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP CryptoCompare
///
/// CONCEPT RUST : reqwest::Client réutilisé
/// - Le pool de connexions est partagé entre les appels
/// - Les URLs de base sont validées une seule fois à la construction
#[derive(Debug, Clone)]
pub struct CryptoCompare {
    client: reqwest::Client,
    catalog_url: Url,
    quote_url: Url,
    catalog_limit: u32,
    reference_currency: String,
}

impl CryptoCompare {
    /// Crée le client à partir de la configuration
    pub fn new(config: &Config) -> QuoteResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cryptoquote/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            catalog_url: Url::parse(&config.catalog_url)?,
            quote_url: Url::parse(&config.quote_url)?,
            catalog_limit: config.catalog_limit,
            reference_currency: config.reference_currency.clone(),
        })
    }

    /// URL du catalogue : ?limit=<n>&tsym=<devise de référence>
    pub fn catalog_url(&self) -> Url {
        let mut url = self.catalog_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.catalog_limit.to_string())
            .append_pair("tsym", &self.reference_currency);
        url
    }

    /// URL de cotation : ?fsyms=<asset>&tsyms=<devise>
    ///
    /// CONCEPT : query_pairs_mut encode les valeurs (pas d'injection de paramètres)
    pub fn quote_url(&self, asset: &str, currency: &str) -> Url {
        let mut url = self.quote_url.clone();
        url.query_pairs_mut()
            .append_pair("fsyms", asset)
            .append_pair("tsyms", currency);
        url
    }

    /// GET + vérification du statut, retourne le corps brut
    async fn get_body(&self, url: Url) -> QuoteResult<String> {
        debug!(url = %url, "Sending HTTP request to CryptoCompare");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "CryptoCompare returned error status");
            return Err(QuoteError::Status(status));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl MarketData for CryptoCompare {
    #[instrument(skip(self))]
    async fn fetch_catalog(&self) -> QuoteResult<Vec<Asset>> {
        debug!(limit = self.catalog_limit, tsym = %self.reference_currency, "Fetching catalog");
        let body = self.get_body(self.catalog_url()).await?;
        let assets = parse_catalog(&body)?;
        info!(assets = assets.len(), "Successfully fetched catalog");
        Ok(assets)
    }

    #[instrument(skip(self, selection), fields(pair = %selection))]
    async fn fetch_quote(&self, selection: &ValidSelection) -> QuoteResult<Quote> {
        let url = self.quote_url(selection.asset(), selection.currency());
        let body = self.get_body(url).await?;
        let quote = parse_quote(&body, selection.asset(), selection.currency())?;
        info!(price = %quote.price, updated_at = ?quote.updated_at, "Successfully fetched quote");
        Ok(quote)
    }
}

// ============================================================================
// Décodage
// ============================================================================

/// Décode un corps JSON en détectant l'enveloppe d'erreur CryptoCompare
///
/// CryptoCompare répond HTTP 200 même en cas d'erreur :
/// {"Response":"Error","Message":"...","Data":{}}
fn decode<T: DeserializeOwned>(body: &str) -> QuoteResult<T> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    if value.get("Response").and_then(|r| r.as_str()) == Some("Error") {
        let message = value
            .get("Message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error")
            .to_string();
        warn!(message = %message, "CryptoCompare returned an error envelope");
        return Err(QuoteError::Provider(message));
    }

    Ok(serde_json::from_value(value)?)
}

/// Extrait les assets dans l'ordre de la réponse
fn parse_catalog(body: &str) -> QuoteResult<Vec<Asset>> {
    let response: CatalogResponse = decode(body)?;

    Ok(response
        .data
        .into_iter()
        .map(|entry| Asset::new(entry.coin_info.name, entry.coin_info.full_name))
        .collect())
}

/// Extrait DISPLAY[asset][currency], enrichi de RAW[asset][currency] si présent
fn parse_quote(body: &str, asset: &str, currency: &str) -> QuoteResult<Quote> {
    let mut response: PriceMultiResponse = decode(body)?;

    let display = response
        .display
        .get_mut(asset)
        .and_then(|by_currency| by_currency.remove(currency))
        .ok_or_else(|| QuoteError::PairNotFound {
            asset: asset.to_string(),
            currency: currency.to_string(),
        })?;

    let raw = response
        .raw
        .get_mut(asset)
        .and_then(|by_currency| by_currency.remove(currency));

    let mut quote = Quote::new(
        display.price,
        display.high_day,
        display.low_day,
        display.change_pct_24h,
        display.last_update,
    );

    if let Some(raw) = raw {
        quote.change_pct_24h_raw = raw.change_pct_24h;
        quote.updated_at = raw
            .last_update
            .and_then(|ts| DateTime::from_timestamp(ts, 0));
    }

    Ok(quote)
}

// ============================================================================
// Tests unitaires
// ============================================================================
