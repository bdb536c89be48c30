// ============================================================================
// CryptoQuote - Cotations crypto dans le terminal
// ============================================================================
// Programme TUI : choisir une devise et une cryptomonnaie, puis afficher
// le prix, le plus haut / plus bas du jour et la variation sur 24h
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements, résultats du worker et rendu
// 3. Worker thread : les appels réseau ne bloquent jamais l'UI
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use cryptoquote::api::CryptoCompare;
use cryptoquote::app::{App, Focus};
use cryptoquote::config::{Args, Config};
use cryptoquote::error::QuoteError;
use cryptoquote::logging::init_logging;
use cryptoquote::ui::events::{
    is_activate_event, is_down_event, is_next_focus_event, is_previous_focus_event,
    is_quit_event, is_submit_event, is_up_event, Event, EventHandler,
};
use cryptoquote::ui::render;
use cryptoquote::worker::{spawn_worker, AppCommand, WorkerHandle};

fn main() -> Result<()> {
    let config = Config::from(Args::parse());

    // Logging en premier : si l'init échoue, on continue sans
    if let Err(e) = init_logging(config.log_dir.as_deref()) {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    }
    info!(?config, "CryptoQuote starting up");

    let provider = CryptoCompare::new(&config).context("Configuration des endpoints invalide")?;
    let worker = spawn_worker(Arc::new(provider), config.min_spinner)?;

    // Le catalogue est chargé une seule fois, au démarrage
    worker
        .commands
        .send(AppCommand::LoadCatalog)
        .context("Le worker n'accepte plus de commandes")?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new(&config);
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &worker);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Appliquer les résultats du worker
//   1. Dessiner l'interface
//   2. Traiter l'événement clavier
//   3. Tick (alerte, spinner)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    worker: &WorkerHandle,
) -> Result<()> {
    while app.is_running() {
        // CONCEPT : try_recv non bloquant, on vide tout ce qui est arrivé
        // (au plus TICK_RATE après la fin d'une requête)
        loop {
            match worker.results.try_recv() {
                Ok(result) => app.apply_result(result),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    anyhow::bail!("Worker thread disconnected");
                }
            }
        }

        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        handle_event(app, event, &worker.commands);

        app.tick(Instant::now());
    }

    Ok(())
}

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Guard clauses (if) pour filtrer les événements
/// - La soumission produit une requête envoyée au worker
fn handle_event(app: &mut App, event: Event, command_tx: &mpsc::Sender<AppCommand>) {
    match event {
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Tick => {}

        Event::Key(_) => {
            // Toute autre touche annule la confirmation de quit
            app.cancel_quit();

            if is_next_focus_event(&event) {
                app.focus_next();
            } else if is_previous_focus_event(&event) {
                app.focus_previous();
            } else if is_up_event(&event) {
                app.highlight_up();
            } else if is_down_event(&event) {
                app.highlight_down();
            } else if is_submit_event(&event)
                || (is_activate_event(&event) && app.focus == Focus::Submit)
            {
                submit(app, command_tx);
            } else if is_activate_event(&event) {
                app.choose_highlighted();
            }
        }
    }
}

/// Soumet le formulaire et transmet la requête au worker
fn submit(app: &mut App, command_tx: &mpsc::Sender<AppCommand>) {
    if let Some(request) = app.submit(Instant::now()) {
        if command_tx.send(AppCommand::FetchQuote(request)).is_err() {
            error!("Worker channel closed, quote request dropped");
            app.result.show_error(QuoteError::WorkerGone.to_string());
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Impossible d'activer le raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    Terminal::new(CrosstermBackend::new(stdout)).context("Impossible de créer le terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
