// ============================================================================
// Structure : Asset
// ============================================================================
// Représente une cryptomonnaie du catalogue (symbole + nom complet)
//
// CONCEPTS RUST :
// 1. #[derive(...)] : Debug, Clone, PartialEq générés automatiquement
// 2. Immutabilité : un Asset ne change plus une fois reçu du fournisseur
// ============================================================================

/// Cryptomonnaie listée par le catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Symbole court, clé unique (ex: "BTC")
    pub symbol: String,

    /// Nom affiché (ex: "Bitcoin")
    pub full_name: String,
}

impl Asset {
    pub fn new(symbol: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            full_name: full_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_creation() {
        let asset = Asset::new("BTC", "Bitcoin");
        assert_eq!(asset.symbol, "BTC");
        assert_eq!(asset.full_name, "Bitcoin");
    }
}
