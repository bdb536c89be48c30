// ============================================================================
// Module : api
// ============================================================================
// Client du fournisseur de données de marché (CryptoCompare)
//
// CONCEPT RUST : Trait comme point d'injection
// - MarketData décrit les deux appels dont l'application a besoin
// - CryptoCompare est l'unique implémentation réelle
// - Les tests injectent une implémentation en mémoire
// ============================================================================

pub mod cryptocompare; // Client HTTP CryptoCompare

use async_trait::async_trait;

use crate::error::QuoteResult;
use crate::models::{Asset, Quote, ValidSelection};

// Re-export des éléments principaux
pub use cryptocompare::CryptoCompare;

/// Les deux lectures faites auprès du fournisseur
///
/// CONCEPT RUST : Send + Sync
/// - Le client est partagé avec le worker thread via Arc
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Liste ordonnée des assets du catalogue
    async fn fetch_catalog(&self) -> QuoteResult<Vec<Asset>>;

    /// Cotation de la paire choisie
    async fn fetch_quote(&self, selection: &ValidSelection) -> QuoteResult<Quote>;
}
