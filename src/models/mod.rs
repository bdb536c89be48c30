// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod asset;     // Cryptomonnaie du catalogue
pub mod selection; // Choix courant (moneda + criptomoneda)
pub mod quote;     // Instantané de cotation
pub mod view;      // Éléments d'interface : listes, formulaire, zone de résultat

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use cryptoquote::models::asset::Asset;
// On peut faire : use cryptoquote::models::Asset;
pub use asset::Asset;
pub use quote::{Quote, QuoteLine};
pub use selection::{ChangeEvent, Selection, SelectionField, ValidSelection};
pub use view::{Alert, Form, ResultArea, ResultNode, SelectControl, SelectOption};
