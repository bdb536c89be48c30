// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place
// - Tracing : framework moderne de logging structuré
// - Rotation quotidienne automatique des logs
// ============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Nom de base des fichiers de log
const LOG_FILE: &str = "cryptoquote.log";

/// Filtre par défaut quand RUST_LOG n'est pas défini
const DEFAULT_FILTER: &str = "cryptoquote=debug,info";

/// Détermine le répertoire de logs
///
/// Ordre de priorité :
/// 1. --log-dir
/// 2. Linux : ~/.local/share/cryptoquote/logs (dirs::data_local_dir)
/// 3. ./logs
pub fn resolve_log_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("cryptoquote").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : transforme et route les logs
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
/// - RollingFileAppender : rotation automatique
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/cryptoquote/logs/cryptoquote.log
/// RUST_LOG=cryptoquote=trace cargo run
/// ```
pub fn init_logging(log_dir: Option<&Path>) -> Result<PathBuf> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = resolve_log_dir(log_dir);
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // UI vs worker
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .try_init()
        .context("Un subscriber tracing est déjà installé")?;

    info!(?log_dir, "Logging initialisé");
    Ok(log_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_log_dir_wins() {
        let dir = resolve_log_dir(Some(Path::new("/tmp/cryptoquote-logs")));
        assert_eq!(dir, PathBuf::from("/tmp/cryptoquote-logs"));
    }

    #[test]
    fn test_default_log_dir_ends_with_logs() {
        let dir = resolve_log_dir(None);
        assert!(dir.ends_with("logs"));
    }
}
