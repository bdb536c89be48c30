// ============================================================================
// Module : config
// ============================================================================
// Configuration de l'application : endpoints, devises, délais d'affichage
//
// CONCEPT RUST : clap derive
// - #[derive(Parser)] génère le parsing de la ligne de commande
// - Chaque champ devient une option (--limit, --alert-ms, ...)
// - Args est converti en Config, la structure utilisée par la lib
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Endpoint du classement des cryptos par capitalisation
pub const DEFAULT_CATALOG_URL: &str = "https://min-api.cryptocompare.com/data/top/mktcapfull";

/// Endpoint des cotations multi-paires
pub const DEFAULT_QUOTE_URL: &str = "https://min-api.cryptocompare.com/data/pricemultifull";

/// Devises fiat proposées par défaut dans la liste "moneda"
pub const DEFAULT_CURRENCIES: [(&str, &str); 4] = [
    ("USD", "US Dollar"),
    ("MXN", "Mexican Peso"),
    ("EUR", "Euro"),
    ("GBP", "Pound Sterling"),
];

/// Arguments de la ligne de commande
#[derive(Debug, Parser)]
#[command(name = "cryptoquote", version, about = "Cotations crypto dans le terminal")]
pub struct Args {
    /// Endpoint du catalogue d'assets
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Endpoint des cotations
    #[arg(long, default_value = DEFAULT_QUOTE_URL)]
    pub quote_url: String,

    /// Nombre d'assets demandés au catalogue
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Devise de référence pour le classement du catalogue
    #[arg(long, default_value = "USD")]
    pub reference_currency: String,

    /// Devises fiat proposées (séparées par des virgules)
    #[arg(long, value_delimiter = ',', default_value = "USD,MXN,EUR,GBP")]
    pub currencies: Vec<String>,

    /// Durée minimum d'affichage du spinner (ms)
    #[arg(long, default_value_t = 1000)]
    pub min_spinner_ms: u64,

    /// Durée de vie de l'alerte de validation (ms)
    #[arg(long, default_value_t = 5000)]
    pub alert_ms: u64,

    /// Répertoire des fichiers de log
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

/// Devise fiat proposée à l'utilisateur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiatCurrency {
    pub code: String,
    pub label: String,
}

impl FiatCurrency {
    /// Construit une devise depuis son code ISO
    ///
    /// Les codes connus reçoivent un libellé lisible, les autres gardent le code.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        let label = DEFAULT_CURRENCIES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| code.clone());
        Self { code, label }
    }
}

/// Configuration résolue de l'application
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_url: String,
    pub quote_url: String,
    pub catalog_limit: u32,
    pub reference_currency: String,
    pub currencies: Vec<FiatCurrency>,

    /// Le résultat d'une cotation n'est pas affiché avant ce délai
    pub min_spinner: Duration,

    /// Au-delà, l'alerte de validation disparaît
    pub alert_ttl: Duration,

    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            catalog_limit: 10,
            reference_currency: "USD".to_string(),
            currencies: DEFAULT_CURRENCIES
                .iter()
                .map(|(code, _)| FiatCurrency::from_code(code))
                .collect(),
            min_spinner: Duration::from_millis(1000),
            alert_ttl: Duration::from_millis(5000),
            log_dir: None,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        // Filtre les entrées vides ("USD,,EUR") et les doublons
        let mut currencies: Vec<FiatCurrency> = Vec::new();
        for code in args.currencies.iter().filter(|c| !c.trim().is_empty()) {
            let currency = FiatCurrency::from_code(code);
            if !currencies.iter().any(|c| c.code == currency.code) {
                currencies.push(currency);
            }
        }

        Self {
            catalog_url: args.catalog_url,
            quote_url: args.quote_url,
            catalog_limit: args.limit,
            reference_currency: args.reference_currency.trim().to_uppercase(),
            currencies,
            min_spinner: Duration::from_millis(args.min_spinner_ms),
            alert_ttl: Duration::from_millis(args.alert_ms),
            log_dir: args.log_dir,
        }
    }
}
