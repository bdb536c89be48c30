// ============================================================================
// CryptoQuote - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;    // Client CryptoCompare
pub mod app;    // État de l'application
pub mod config; // Configuration (clap)
pub mod error;  // Erreurs métier
pub mod logging; // Initialisation de tracing
pub mod models; // Structures de données
pub mod ui;     // Interface utilisateur
pub mod worker; // Worker thread des appels réseau
