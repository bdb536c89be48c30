// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine le formulaire de cotation en utilisant les widgets de ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, List)
// 3. Layout : découpage de l'espace en zones
// 4. StatefulWidget : List + ListState pour le scroll automatique
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::{ResultNode, SelectControl};

/// Frames de l'animation du spinner
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Dessine l'interface complète
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `app` - État de l'application (lecture seule)
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Listes
            Constraint::Length(3), // Bouton
            Constraint::Length(3), // Alerte
            Constraint::Length(7), // Résultat : 5 lignes + bordures
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    render_header(frame, chunks[0]);
    render_selects(frame, app, chunks[1]);
    render_submit_button(frame, app, chunks[2]);
    render_alert(frame, app, chunks[3]);
    render_result(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" CryptoQuote ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Quote cryptocurrencies instantly",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )))
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Listes de sélection
// ============================================================================

/// Dessine les deux listes côte à côte : moneda | criptomoneda
fn render_selects(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_select(
        frame,
        &app.moneda,
        " Currency ",
        app.focus == Focus::Moneda,
        None,
        columns[0],
    );

    let loading = app.catalog_loading.then_some("Loading cryptocurrencies...");
    render_select(
        frame,
        &app.criptomoneda,
        " Cryptocurrency ",
        app.focus == Focus::Criptomoneda,
        loading,
        columns[1],
    );
}

/// Dessine une liste
///
/// CONCEPT RATATUI : ListState
/// - selected = option surlignée
/// - ratatui fait défiler la liste pour la garder visible
/// - L'option choisie est marquée d'un ●
fn render_select(
    frame: &mut Frame,
    select: &SelectControl,
    title: &str,
    focused: bool,
    status: Option<&str>,
    area: Rect,
) {
    let border_color = if focused { Color::Yellow } else { Color::Cyan };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());

    let chosen_value = select.chosen().map(|o| o.value.as_str());
    let mut items: Vec<ListItem> = select
        .options()
        .iter()
        .map(|option| {
            let marker = if Some(option.value.as_str()) == chosen_value { "● " } else { "  " };
            let style = if option.value.is_empty() {
                Style::default().fg(Color::Gray)
            } else {
                Style::default()
            };
            ListItem::new(format!("{}{}", marker, option.label)).style(style)
        })
        .collect();

    if let Some(status) = status {
        items.push(ListItem::new(format!("  {}", status)).style(Style::default().fg(Color::DarkGray)));
    }

    let highlight = if focused {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let list = List::new(items).block(block).highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(select.highlighted()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_submit_button(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.focus == Focus::Submit {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };

    let paragraph = Paragraph::new(Line::from(Span::styled("[ Quote ]", style)))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine l'alerte de validation (zone vide s'il n'y en a pas)
fn render_alert(frame: &mut Frame, app: &App, area: Rect) {
    let Some(alert) = app.form.alert() else {
        return;
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(
        alert.message.as_str(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)))
    .style(Style::default().bg(Color::Red))
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Zone de résultat
// ============================================================================

/// Dessine la zone de résultat : spinner, cotation ou erreur
fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Result ");

    let lines: Vec<Line> = app
        .result
        .nodes()
        .iter()
        .map(|node| match node {
            ResultNode::Spinner => {
                let glyph = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
                Line::from(Span::styled(
                    format!("{} Loading...", glyph),
                    Style::default().fg(Color::Yellow),
                ))
            }
            ResultNode::QuoteLine { line, positive } => {
                let value_style = match positive {
                    Some(true) => Style::default().fg(Color::Green),
                    Some(false) => Style::default().fg(Color::Red),
                    None => Style::default().fg(Color::White),
                }
                .add_modifier(Modifier::BOLD);

                Line::from(vec![
                    Span::styled(format!("{}: ", line.label), Style::default().fg(Color::Gray)),
                    Span::styled(line.value.clone(), value_style),
                ])
            }
            ResultNode::Error(message) => Line::from(Span::styled(
                format!("✗ {}", message),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Press ", key_style),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(" again to quit, any other key to cancel ⚠", key_style),
        ])
    } else {
        Line::from(vec![
            Span::styled("[Tab]", key_style),
            Span::raw(" Next field  "),
            Span::styled("[↑↓ / j k]", key_style),
            Span::raw(" Move  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Choose  "),
            Span::styled("[c]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Quote  "),
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ])
    };

    let paragraph = Paragraph::new(shortcuts)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
