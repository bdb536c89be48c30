// ============================================================================
// Structure : Quote
// ============================================================================
// Instantané de cotation pour une paire asset/devise
//
// CONCEPTS RUST :
// 1. Value object : valeurs scalaires, jamais fusionnées avec une ancienne
// 2. Option<T> : les extras RAW peuvent manquer sans invalider la cotation
// ============================================================================

use chrono::{DateTime, Utc};

/// Cotation d'une paire, telle que formatée par le fournisseur
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Prix actuel (ex: "$ 50,000.00")
    pub price: String,

    /// Plus haut du jour
    pub high_day: String,

    /// Plus bas du jour
    pub low_day: String,

    /// Variation sur 24h en pourcentage, sans le suffixe "%"
    pub change_pct_24h: String,

    /// Dernière mise à jour (ex: "Just now")
    pub last_update: String,

    /// Variation 24h numérique (section RAW), pour la couleur
    pub change_pct_24h_raw: Option<f64>,

    /// Horodatage de la dernière mise à jour (section RAW)
    pub updated_at: Option<DateTime<Utc>>,
}

/// Une ligne d'affichage : libellé + valeur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLine {
    pub label: &'static str,
    pub value: String,
}

impl Quote {
    /// Crée une cotation sans les extras RAW
    pub fn new(
        price: impl Into<String>,
        high_day: impl Into<String>,
        low_day: impl Into<String>,
        change_pct_24h: impl Into<String>,
        last_update: impl Into<String>,
    ) -> Self {
        Self {
            price: price.into(),
            high_day: high_day.into(),
            low_day: low_day.into(),
            change_pct_24h: change_pct_24h.into(),
            last_update: last_update.into(),
            change_pct_24h_raw: None,
            updated_at: None,
        }
    }

    /// Les cinq lignes affichées, dans l'ordre :
    /// prix, plus haut, plus bas, variation 24h (suffixe "%"), mise à jour
    pub fn lines(&self) -> [QuoteLine; 5] {
        [
            QuoteLine {
                label: "Current price",
                value: self.price.clone(),
            },
            QuoteLine {
                label: "Today's high",
                value: self.high_day.clone(),
            },
            QuoteLine {
                label: "Today's low",
                value: self.low_day.clone(),
            },
            QuoteLine {
                label: "24h change",
                value: format!("{}%", self.change_pct_24h),
            },
            QuoteLine {
                label: "Last update",
                value: self.last_update.clone(),
            },
        ]
    }

    /// true si la variation 24h est positive ou nulle
    ///
    /// Utilise la valeur RAW si présente, sinon tente de parser l'affichage.
    pub fn is_positive(&self) -> Option<bool> {
        self.change_pct_24h_raw
            .or_else(|| self.change_pct_24h.trim().parse::<f64>().ok())
            .map(|c| c >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_order_and_percent_suffix() {
        let quote = Quote::new("50000", "51000", "49000", "2.5", "2024-01-01");
        let values: Vec<String> = quote.lines().iter().map(|l| l.value.clone()).collect();
        assert_eq!(values, vec!["50000", "51000", "49000", "2.5%", "2024-01-01"]);
    }

    #[test]
    fn test_is_positive() {
        let mut quote = Quote::new("1", "1", "1", "-0.42", "now");
        assert_eq!(quote.is_positive(), Some(false));

        // La valeur RAW prime sur l'affichage
        quote.change_pct_24h_raw = Some(0.1);
        assert_eq!(quote.is_positive(), Some(true));

        let unknown = Quote::new("1", "1", "1", "n/a", "now");
        assert_eq!(unknown.is_positive(), None);
    }
}
