// ============================================================================
// Structure : Selection
// ============================================================================
// Le choix courant de l'utilisateur : devise fiat + cryptomonnaie
//
// CONCEPTS RUST :
// 1. Reducer : reduce() consomme self et retourne une nouvelle Selection
//    - Pas d'état mutable partagé entre les handlers
// 2. Newtype de validation : ValidSelection prouve que les deux champs
//    sont remplis, seule une ValidSelection peut produire une requête
// ============================================================================

use std::fmt;

/// Champ de la sélection, identifié par le nom du contrôle qui l'alimente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    /// Devise fiat (contrôle "moneda")
    Moneda,
    /// Cryptomonnaie (contrôle "criptomoneda")
    Criptomoneda,
}

impl SelectionField {
    /// Nom du contrôle associé
    pub fn name(&self) -> &'static str {
        match self {
            SelectionField::Moneda => "moneda",
            SelectionField::Criptomoneda => "criptomoneda",
        }
    }
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Changement de valeur émis par un contrôle de sélection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub field: SelectionField,
    pub value: String,
}

/// Choix courant de l'utilisateur, les deux champs commencent vides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub moneda: String,
    pub criptomoneda: String,
}

/// Sélection dont les deux champs sont non vides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSelection {
    currency: String,
    asset: String,
}

impl ValidSelection {
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }
}

impl fmt::Display for ValidSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.asset, self.currency)
    }
}

impl Selection {
    /// Applique un changement et retourne la nouvelle sélection
    ///
    /// Aucune validation à l'écriture : la valeur est copiée telle quelle.
    pub fn reduce(self, event: ChangeEvent) -> Self {
        match event.field {
            SelectionField::Moneda => Self {
                moneda: event.value,
                ..self
            },
            SelectionField::Criptomoneda => Self {
                criptomoneda: event.value,
                ..self
            },
        }
    }

    /// Valide la sélection au moment de la soumission
    ///
    /// Retourne None si l'un des champs est vide.
    pub fn validate(&self) -> Option<ValidSelection> {
        if self.moneda.is_empty() || self.criptomoneda.is_empty() {
            return None;
        }

        Some(ValidSelection {
            currency: self.moneda.clone(),
            asset: self.criptomoneda.clone(),
        })
    }
}
