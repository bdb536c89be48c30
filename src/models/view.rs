// ============================================================================
// Éléments d'interface : SelectControl, Form, ResultArea
// ============================================================================
// Le contenu des widgets, séparé du rendu ratatui
//
// CONCEPTS RUST :
// 1. Injection de dépendances : App possède ces éléments et les passe
//    explicitement aux composants, aucun lookup global
// 2. Testabilité : tout est vérifiable sans terminal réel
// 3. Temps injecté : Instant passé en paramètre (pas d'horloge cachée)
// ============================================================================

use std::time::{Duration, Instant};

use crate::models::{Asset, ChangeEvent, Quote, QuoteLine, SelectionField};

// ============================================================================
// SelectControl : liste de choix (équivalent d'un <select>)
// ============================================================================

/// Option d'une liste : valeur transmise + libellé affiché
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Liste de choix nommée
///
/// CONCEPT : Le nom du contrôle détermine le champ de Selection mis à jour.
/// - highlighted : option sous le curseur (navigation ↑↓)
/// - chosen : option validée (Enter), celle qui émet le ChangeEvent
#[derive(Debug, Clone)]
pub struct SelectControl {
    name: SelectionField,
    options: Vec<SelectOption>,
    highlighted: usize,
    chosen: usize,
}

impl SelectControl {
    /// Crée une liste avec une option placeholder de valeur vide
    pub fn new(name: SelectionField, placeholder: impl Into<String>) -> Self {
        Self {
            name,
            options: vec![SelectOption::new("", placeholder)],
            highlighted: 0,
            chosen: 0,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Option actuellement choisie
    pub fn chosen(&self) -> Option<&SelectOption> {
        self.options.get(self.chosen)
    }

    /// Ajoute une option en fin de liste
    pub fn append_option(&mut self, option: SelectOption) {
        self.options.push(option);
    }

    /// Ajoute une option par asset, dans l'ordre reçu
    ///
    /// value = symbole, libellé = nom complet
    pub fn append_assets(&mut self, assets: &[Asset]) {
        for asset in assets {
            self.append_option(SelectOption::new(&asset.symbol, &asset.full_name));
        }
    }

    pub fn highlight_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn highlight_down(&mut self) {
        let max_index = self.options.len().saturating_sub(1);
        self.highlighted = (self.highlighted + 1).min(max_index);
    }

    /// Choisit l'option surlignée et émet l'événement de changement
    pub fn choose(&mut self) -> Option<ChangeEvent> {
        let option = self.options.get(self.highlighted)?;
        self.chosen = self.highlighted;
        Some(ChangeEvent {
            field: self.name,
            value: option.value.clone(),
        })
    }
}

// ============================================================================
// Form : porte l'alerte de validation
// ============================================================================

/// Bandeau d'alerte transitoire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub expires_at: Instant,
}

/// Formulaire de recherche
#[derive(Debug, Clone)]
pub struct Form {
    alert: Option<Alert>,
    alert_ttl: Duration,
}

impl Form {
    pub fn new(alert_ttl: Duration) -> Self {
        Self {
            alert: None,
            alert_ttl,
        }
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Affiche une alerte si aucune n'est présente
    ///
    /// Une alerte déjà visible n'est ni doublée ni remplacée.
    /// Retourne true si une nouvelle alerte a été créée.
    pub fn show_alert(&mut self, message: &str, now: Instant) -> bool {
        if self.alert.is_some() {
            return false;
        }

        self.alert = Some(Alert {
            message: message.to_string(),
            expires_at: now + self.alert_ttl,
        });
        true
    }

    /// Retire l'alerte arrivée à expiration
    pub fn expire_alert(&mut self, now: Instant) {
        if self.alert.as_ref().is_some_and(|a| now >= a.expires_at) {
            self.alert = None;
        }
    }
}

// ============================================================================
// ResultArea : zone de sortie (équivalent de #resultado)
// ============================================================================

/// Nœud affiché dans la zone de résultat
#[derive(Debug, Clone, PartialEq)]
pub enum ResultNode {
    /// Indicateur de chargement
    Spinner,

    /// Ligne de cotation
    QuoteLine {
        line: QuoteLine,
        /// Couleur de la variation (Some uniquement sur la ligne 24h)
        positive: Option<bool>,
    },

    /// Bandeau d'erreur
    Error(String),
}

/// Zone de résultat : chaque rendu remplace entièrement le précédent
#[derive(Debug, Clone, Default)]
pub struct ResultArea {
    nodes: Vec<ResultNode>,
}

impl ResultArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[ResultNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Supprime tous les nœuds (sans effet sur une zone vide)
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn show_spinner(&mut self) {
        self.clear();
        self.nodes.push(ResultNode::Spinner);
    }

    pub fn show_quote(&mut self, quote: &Quote) {
        self.clear();
        let positive = quote.is_positive();
        for (index, line) in quote.lines().into_iter().enumerate() {
            self.nodes.push(ResultNode::QuoteLine {
                line,
                // La 4e ligne est la variation 24h
                positive: if index == 3 { positive } else { None },
            });
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.clear();
        self.nodes.push(ResultNode::Error(message.into()));
    }

    pub fn has_spinner(&self) -> bool {
        self.nodes.iter().any(|n| matches!(n, ResultNode::Spinner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assets_preserves_order() {
        let mut select = SelectControl::new(SelectionField::Criptomoneda, "- Select -");
        let assets = vec![
            Asset::new("BTC", "Bitcoin"),
            Asset::new("ETH", "Ethereum"),
            Asset::new("USDT", "Tether"),
        ];

        select.append_assets(&assets);

        // Placeholder + 3 options, dans l'ordre
        assert_eq!(select.options().len(), 4);
        let appended: Vec<(&str, &str)> = select.options()[1..]
            .iter()
            .map(|o| (o.value.as_str(), o.label.as_str()))
            .collect();
        assert_eq!(
            appended,
            vec![("BTC", "Bitcoin"), ("ETH", "Ethereum"), ("USDT", "Tether")]
        );
    }

    #[test]
    fn test_choose_emits_change_for_control_name() {
        let mut select = SelectControl::new(SelectionField::Moneda, "- Select -");
        select.append_option(SelectOption::new("USD", "US Dollar"));

        select.highlight_down();
        select.highlight_down(); // reste sur la dernière option
        assert_eq!(select.highlighted(), 1);

        let event = select.choose().unwrap();
        assert_eq!(event.field, SelectionField::Moneda);
        assert_eq!(event.value, "USD");
        assert_eq!(select.chosen().unwrap().value, "USD");

        // Revenir au placeholder réécrit une valeur vide
        select.highlight_up();
        assert_eq!(select.choose().unwrap().value, "");
    }

    #[test]
    fn test_alert_is_not_stacked_nor_replaced() {
        let now = Instant::now();
        let mut form = Form::new(Duration::from_secs(5));

        assert!(form.show_alert("Both fields are required", now));
        assert!(!form.show_alert("Another message", now + Duration::from_secs(1)));
        assert_eq!(form.alert().unwrap().message, "Both fields are required");
    }

    #[test]
    fn test_alert_expires_after_ttl() {
        let now = Instant::now();
        let mut form = Form::new(Duration::from_millis(5000));
        form.show_alert("Both fields are required", now);

        form.expire_alert(now + Duration::from_millis(4999));
        assert!(form.alert().is_some());

        form.expire_alert(now + Duration::from_millis(5000));
        assert!(form.alert().is_none());

        // Une nouvelle alerte peut alors être affichée
        assert!(form.show_alert("Both fields are required", now + Duration::from_secs(6)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut area = ResultArea::new();
        area.clear();
        assert!(area.is_empty());

        area.show_error("boom");
        area.clear();
        area.clear();
        assert!(area.is_empty());
    }

    #[test]
    fn test_show_quote_replaces_spinner() {
        let mut area = ResultArea::new();
        area.show_spinner();
        assert!(area.has_spinner());

        area.show_quote(&Quote::new("50000", "51000", "49000", "2.5", "2024-01-01"));
        assert!(!area.has_spinner());
        assert_eq!(area.nodes().len(), 5);
        assert!(matches!(
            &area.nodes()[3],
            ResultNode::QuoteLine { positive: Some(true), .. }
        ));
    }
}
