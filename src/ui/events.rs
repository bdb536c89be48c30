// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Polling avec timeout : un Tick régulier même sans touche pressée
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (animation du spinner, expiration de l'alerte)
    Tick,
}

/// Intervalle de poll : borne aussi le délai d'affichage d'un résultat du worker
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec un tick de 100ms (10 images/s pour le spinner)
    pub fn new() -> Self {
        Self {
            tick_rate: TICK_RATE,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au maximum tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helper : Convertir KeyEvent en action
// ============================================================================

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Tab : élément suivant du formulaire
pub fn is_next_focus_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Tab | KeyCode::Right)
    } else {
        false
    }
}

/// Shift-Tab : élément précédent du formulaire
pub fn is_previous_focus_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::BackTab | KeyCode::Left)
    } else {
        false
    }
}

/// Vérifie si l'événement est la flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K'))
    } else {
        false
    }
}

/// Vérifie si l'événement est la flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J'))
    } else {
        false
    }
}

/// Entrée ou Espace : choisir l'option / activer le bouton
pub fn is_activate_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
    } else {
        false
    }
}

/// 'c' : soumettre le formulaire depuis n'importe quel élément
pub fn is_submit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, event::KeyModifiers::empty()))
    }

    #[test]
    fn test_tick_rate_bounds_result_latency() {
        // Un résultat du worker est appliqué au plus un tick après son arrivée
        let handler = EventHandler::default();
        assert_eq!(handler.tick_rate(), TICK_RATE);
        assert!(handler.tick_rate() <= Duration::from_millis(100));
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_navigation_events() {
        assert!(is_next_focus_event(&key(KeyCode::Tab)));
        assert!(is_previous_focus_event(&key(KeyCode::BackTab)));
        assert!(is_up_event(&key(KeyCode::Char('k'))));
        assert!(is_down_event(&key(KeyCode::Down)));
        assert!(is_activate_event(&key(KeyCode::Enter)));
        assert!(is_activate_event(&key(KeyCode::Char(' '))));
        assert!(is_submit_event(&key(KeyCode::Char('c'))));
        assert!(!is_submit_event(&Event::Tick));
    }
}
