// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Un seul propriétaire : seul le thread UI modifie App, le worker
//    renvoie des AppResult que l'UI applique
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// ============================================================================

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{
    Asset, ChangeEvent, Form, ResultArea, SelectControl, SelectOption, Selection,
    SelectionField,
};
use crate::worker::{AppResult, QuoteRequest};

/// Message de l'alerte de validation
pub const REQUIRED_FIELDS_MESSAGE: &str = "Both fields are required";

/// Libellé de l'option vide des listes
const PLACEHOLDER: &str = "- Select -";

// ============================================================================
// Enum : Focus
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul élément du formulaire a le focus à la fois
// - Tab / Shift-Tab parcourent le cycle
// ============================================================================

/// Élément du formulaire qui reçoit le clavier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Liste des devises fiat
    Moneda,

    /// Liste des cryptomonnaies
    Criptomoneda,

    /// Bouton "Quote"
    Submit,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Moneda => Focus::Criptomoneda,
            Focus::Criptomoneda => Focus::Submit,
            Focus::Submit => Focus::Moneda,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Moneda => Focus::Submit,
            Focus::Criptomoneda => Focus::Moneda,
            Focus::Submit => Focus::Criptomoneda,
        }
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Two-step quit : première pression de 'q' → confirmation
    pub confirm_quit: bool,

    pub focus: Focus,

    /// Liste "moneda" (devises fiat, fournies par la configuration)
    pub moneda: SelectControl,

    /// Liste "criptomoneda" (remplie par le catalogue)
    pub criptomoneda: SelectControl,

    /// Choix courant, remplacé à chaque ChangeEvent
    pub selection: Selection,

    /// Formulaire : porte l'alerte de validation
    pub form: Form,

    /// Zone de résultat
    pub result: ResultArea,

    /// true tant que le catalogue n'a pas répondu
    pub catalog_loading: bool,

    /// Identifiant de la dernière requête de cotation émise
    latest_request: u64,

    /// Frame courante de l'animation du spinner
    pub spinner_frame: usize,
}

impl App {
    /// Crée l'application avec les devises de la configuration
    ///
    /// La liste des cryptos ne contient que le placeholder jusqu'au
    /// chargement du catalogue.
    pub fn new(config: &Config) -> Self {
        let mut moneda = SelectControl::new(SelectionField::Moneda, PLACEHOLDER);
        for currency in &config.currencies {
            moneda.append_option(SelectOption::new(&currency.code, &currency.label));
        }

        Self {
            running: true,
            confirm_quit: false,
            focus: Focus::Moneda,
            moneda,
            criptomoneda: SelectControl::new(SelectionField::Criptomoneda, PLACEHOLDER),
            selection: Selection::default(),
            form: Form::new(config.alert_ttl),
            result: ResultArea::new(),
            catalog_loading: true,
            latest_request: 0,
            spinner_frame: 0,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Navigation dans le formulaire
    // ========================================================================

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Liste qui a le focus (None sur le bouton)
    fn focused_select(&mut self) -> Option<&mut SelectControl> {
        match self.focus {
            Focus::Moneda => Some(&mut self.moneda),
            Focus::Criptomoneda => Some(&mut self.criptomoneda),
            Focus::Submit => None,
        }
    }

    pub fn highlight_up(&mut self) {
        if let Some(select) = self.focused_select() {
            select.highlight_up();
        }
    }

    pub fn highlight_down(&mut self) {
        if let Some(select) = self.focused_select() {
            select.highlight_down();
        }
    }

    /// Choisit l'option surlignée de la liste active et met à jour la sélection
    pub fn choose_highlighted(&mut self) {
        if let Some(event) = self.focused_select().and_then(|s| s.choose()) {
            self.on_change(event);
        }
    }

    // ========================================================================
    // Catalogue et sélection
    // ========================================================================

    /// Ajoute les assets du catalogue à la liste des cryptos, dans l'ordre
    pub fn populate_catalog(&mut self, assets: &[Asset]) {
        info!(assets = assets.len(), "Populating asset list");
        self.criptomoneda.append_assets(assets);
        self.catalog_loading = false;
    }

    /// Écrit la valeur du contrôle dans le champ de même nom
    pub fn on_change(&mut self, event: ChangeEvent) {
        debug!(field = %event.field, value = %event.value, "Selection changed");
        self.selection = std::mem::take(&mut self.selection).reduce(event);
    }

    // ========================================================================
    // Soumission et résultats
    // ========================================================================

    /// Soumet le formulaire
    ///
    /// - Sélection incomplète : alerte, aucune requête
    /// - Sélection complète : spinner immédiat + requête à envoyer au worker
    pub fn submit(&mut self, now: Instant) -> Option<QuoteRequest> {
        let Some(selection) = self.selection.validate() else {
            if self.form.show_alert(REQUIRED_FIELDS_MESSAGE, now) {
                info!("Submission rejected: incomplete selection");
            }
            return None;
        };

        self.result.show_spinner();
        self.latest_request += 1;

        info!(pair = %selection, request_id = self.latest_request, "Quote requested");
        Some(QuoteRequest {
            id: self.latest_request,
            selection,
        })
    }

    /// Applique un résultat du worker
    ///
    /// Une cotation qui ne correspond pas à la dernière requête est ignorée :
    /// elle ne doit pas remplacer un spinner plus récent.
    pub fn apply_result(&mut self, result: AppResult) {
        match result {
            AppResult::Catalog(Ok(assets)) => self.populate_catalog(&assets),
            AppResult::Catalog(Err(e)) => {
                self.catalog_loading = false;
                self.result.show_error(format!("Could not load cryptocurrencies: {}", e));
            }
            AppResult::Quote { request_id, .. } if request_id != self.latest_request => {
                warn!(request_id, latest = self.latest_request, "Discarding stale quote");
            }
            AppResult::Quote { result: Ok(quote), .. } => self.result.show_quote(&quote),
            AppResult::Quote { result: Err(e), .. } => self.result.show_error(e.to_string()),
        }
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// - Retire l'alerte expirée
    /// - Fait avancer l'animation du spinner
    pub fn tick(&mut self, now: Instant) {
        self.form.expire_alert(now);
        if self.result.has_spinner() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::models::{Quote, ResultNode};
    use std::time::Duration;

    /// Choisit l'option `value` dans la liste qui a le focus
    fn pick(app: &mut App, focus: Focus, value: &str) {
        app.focus = focus;
        let select = app.focused_select().unwrap();
        while select.highlighted() > 0 {
            select.highlight_up();
        }
        while select.options()[select.highlighted()].value != value {
            select.highlight_down();
        }
        app.choose_highlighted();
    }

    fn ready_app() -> App {
        let mut app = App::default();
        app.populate_catalog(&[Asset::new("BTC", "Bitcoin"), Asset::new("ETH", "Ethereum")]);
        app
    }

    #[test]
    fn test_app_creation() {
        let app = App::default();
        assert!(app.is_running());
        assert!(app.catalog_loading);
        assert_eq!(app.selection, Selection::default());
        // Placeholder + 4 devises par défaut
        assert_eq!(app.moneda.options().len(), 5);
        assert_eq!(app.criptomoneda.options().len(), 1);
        assert!(app.result.is_empty());
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::default();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_focus_cycle() {
        let mut app = App::default();
        app.focus_next();
        assert_eq!(app.focus, Focus::Criptomoneda);
        app.focus_next();
        assert_eq!(app.focus, Focus::Submit);
        app.focus_next();
        assert_eq!(app.focus, Focus::Moneda);
        app.focus_previous();
        assert_eq!(app.focus, Focus::Submit);
    }

    #[test]
    fn test_choose_updates_selection() {
        let mut app = ready_app();
        pick(&mut app, Focus::Moneda, "EUR");
        pick(&mut app, Focus::Criptomoneda, "ETH");

        assert_eq!(app.selection.moneda, "EUR");
        assert_eq!(app.selection.criptomoneda, "ETH");
    }

    #[test]
    fn test_invalid_submit_shows_alert_without_request() {
        let mut app = ready_app();
        pick(&mut app, Focus::Moneda, "USD");

        let now = Instant::now();
        assert!(app.submit(now).is_none());
        assert_eq!(app.form.alert().unwrap().message, REQUIRED_FIELDS_MESSAGE);
        assert!(app.result.is_empty());

        // Deuxième soumission invalide : toujours une seule alerte
        assert!(app.submit(now + Duration::from_secs(1)).is_none());
        assert!(app.form.alert().is_some());

        // L'alerte disparaît après 5 secondes
        app.tick(now + Duration::from_secs(5));
        assert!(app.form.alert().is_none());
    }

    #[test]
    fn test_valid_submit_shows_spinner_first() {
        let mut app = ready_app();
        app.result.show_error("previous content");
        pick(&mut app, Focus::Moneda, "USD");
        pick(&mut app, Focus::Criptomoneda, "BTC");

        let request = app.submit(Instant::now()).unwrap();
        assert_eq!(request.selection.asset(), "BTC");
        assert_eq!(request.selection.currency(), "USD");
        assert_eq!(app.result.nodes(), &[ResultNode::Spinner]);
        assert!(app.form.alert().is_none());
    }

    #[test]
    fn test_stale_quote_is_discarded() {
        let mut app = ready_app();
        pick(&mut app, Focus::Moneda, "USD");
        pick(&mut app, Focus::Criptomoneda, "BTC");

        let first = app.submit(Instant::now()).unwrap();
        let second = app.submit(Instant::now()).unwrap();
        assert!(second.id > first.id);

        app.apply_result(AppResult::Quote {
            request_id: first.id,
            result: Ok(Quote::new("1", "1", "1", "0", "old")),
        });
        assert!(app.result.has_spinner());

        app.apply_result(AppResult::Quote {
            request_id: second.id,
            result: Ok(Quote::new("2", "2", "2", "0", "new")),
        });
        assert_eq!(app.result.nodes().len(), 5);
    }

    #[test]
    fn test_quote_error_replaces_spinner() {
        let mut app = ready_app();
        pick(&mut app, Focus::Moneda, "MXN");
        pick(&mut app, Focus::Criptomoneda, "ETH");
        let request = app.submit(Instant::now()).unwrap();

        app.apply_result(AppResult::Quote {
            request_id: request.id,
            result: Err(QuoteError::PairNotFound {
                asset: "ETH".to_string(),
                currency: "MXN".to_string(),
            }),
        });

        assert_eq!(
            app.result.nodes(),
            &[ResultNode::Error("No quote available for ETH/MXN".to_string())]
        );
    }

    #[test]
    fn test_catalog_error_is_surfaced() {
        let mut app = App::default();
        app.apply_result(AppResult::Catalog(Err(QuoteError::Provider(
            "rate limit".to_string(),
        ))));

        assert!(!app.catalog_loading);
        assert_eq!(app.criptomoneda.options().len(), 1);
        assert!(matches!(&app.result.nodes()[0], ResultNode::Error(msg) if msg.contains("rate limit")));
    }

    #[test]
    fn test_spinner_animates_only_while_loading() {
        let mut app = ready_app();
        let now = Instant::now();
        app.tick(now);
        assert_eq!(app.spinner_frame, 0);

        app.result.show_spinner();
        app.tick(now);
        app.tick(now);
        assert_eq!(app.spinner_frame, 2);
    }
}
