// ============================================================================
// Module : error
// ============================================================================
// Erreurs métier du flux catalogue / cotation
//
// CONCEPT RUST : thiserror vs anyhow
// - QuoteError : enum typé, l'UI doit distinguer les cas pour les afficher
// - anyhow : réservé à la plomberie applicative (terminal, logging, runtime)
// ============================================================================

use thiserror::Error;

/// Échecs possibles lors d'un appel au fournisseur de données de marché
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Requête HTTP impossible (réseau, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Réponse HTTP hors 2xx
    #[error("Market data provider returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Corps de réponse qui ne correspond pas au format attendu
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Enveloppe d'erreur CryptoCompare ({"Response":"Error","Message":...})
    #[error("Provider error: {0}")]
    Provider(String),

    /// URL d'endpoint invalide (configuration)
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// La paire demandée est absente de DISPLAY[asset][currency]
    #[error("No quote available for {asset}/{currency}")]
    PairNotFound { asset: String, currency: String },

    /// Le worker a disparu avant de répondre
    #[error("Background worker unavailable")]
    WorkerGone,
}

/// Alias pratique pour les résultats du flux de cotation
pub type QuoteResult<T> = std::result::Result<T, QuoteError>;
