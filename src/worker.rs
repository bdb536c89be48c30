// ============================================================================
// Background Worker
// ============================================================================
// Exécute les appels réseau hors du thread UI
//
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des AppCommand au worker
// - Le worker exécute les tâches async (fetch API) sur son runtime tokio
// - Les résultats reviennent via un second channel (AppResult)
// - L'UI reste la seule à modifier l'état de l'application
// ============================================================================

use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::api::MarketData;
use crate::error::QuoteResult;
use crate::models::{Asset, Quote, ValidSelection};

/// Demande de cotation émise par une soumission valide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    /// Identifiant croissant : seule la dernière requête est affichée
    pub id: u64,
    pub selection: ValidSelection,
}

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Charger le catalogue (une fois au démarrage)
    LoadCatalog,

    /// Récupérer la cotation d'une paire
    FetchQuote(QuoteRequest),
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
pub enum AppResult {
    Catalog(QuoteResult<Vec<Asset>>),
    Quote {
        request_id: u64,
        result: QuoteResult<Quote>,
    },
}

/// Récupère une cotation en respectant la durée minimum du spinner
///
/// CONCEPT RUST : tokio::join!
/// - La requête part immédiatement, en parallèle du délai
/// - Le résultat n'est rendu qu'une fois les deux terminés
/// - Le délai est purement cosmétique : il ne retarde pas la requête
pub async fn fetch_quote_paced(
    provider: &dyn MarketData,
    selection: &ValidSelection,
    min_spinner: Duration,
) -> QuoteResult<Quote> {
    let (result, ()) = tokio::join!(
        provider.fetch_quote(selection),
        tokio::time::sleep(min_spinner)
    );
    result
}

/// Vide la file de commandes en attente
///
/// Les LoadCatalog sont gardés dans l'ordre, seule la FetchQuote la plus
/// récente (id le plus grand) survit : les autres seraient ignorées par l'UI
fn coalesce(first: AppCommand, pending: &mpsc::Receiver<AppCommand>) -> Vec<AppCommand> {
    let mut batch = vec![first];
    batch.extend(pending.try_iter());

    let latest = batch
        .iter()
        .filter_map(|command| match command {
            AppCommand::FetchQuote(request) => Some(request.id),
            AppCommand::LoadCatalog => None,
        })
        .max();

    let queued = batch.len();
    batch.retain(|command| match command {
        AppCommand::FetchQuote(request) => Some(request.id) == latest,
        AppCommand::LoadCatalog => true,
    });
    if batch.len() < queued {
        debug!(skipped = queued - batch.len(), "Superseded quote requests skipped");
    }

    batch
}

/// Poignées côté UI vers le worker
pub struct WorkerHandle {
    pub commands: mpsc::Sender<AppCommand>,
    pub results: mpsc::Receiver<AppResult>,
}

/// Lance le worker thread
///
/// CONCEPT RUST : Thread + async runtime
/// - Le runtime tokio est créé ici (erreur propagée) puis déplacé dans le thread
/// - block_on() bloque le worker, jamais l'UI
/// - Les commandes sont traitées dans l'ordre d'arrivée, les cotations
///   remplacées par une soumission plus récente sont abandonnées
pub fn spawn_worker(provider: Arc<dyn MarketData>, min_spinner: Duration) -> Result<WorkerHandle> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Échec de la création du runtime tokio du worker")?;

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    std::thread::Builder::new()
        .name("cryptoquote-worker".to_string())
        .spawn(move || {
            // Boucle de traitement : se termine quand l'UI ferme le channel
            while let Ok(first) = command_rx.recv() {
                for command in coalesce(first, &command_rx) {
                    info!(?command, "Worker received command");

                    let result = match command {
                        AppCommand::LoadCatalog => {
                            let catalog = runtime.block_on(provider.fetch_catalog());
                            if let Err(e) = &catalog {
                                error!(error = %e, "Failed to load catalog");
                            }
                            AppResult::Catalog(catalog)
                        }
                        AppCommand::FetchQuote(request) => {
                            let result = runtime.block_on(fetch_quote_paced(
                                provider.as_ref(),
                                &request.selection,
                                min_spinner,
                            ));
                            if let Err(e) = &result {
                                error!(pair = %request.selection, error = %e, "Failed to fetch quote");
                            }
                            AppResult::Quote {
                                request_id: request.id,
                                result,
                            }
                        }
                    };

                    if result_tx.send(result).is_err() {
                        info!("Worker thread exiting (UI gone)");
                        return;
                    }
                }
            }

            info!("Worker thread exiting (channel closed)");
        })
        .context("Échec du lancement du worker thread")?;

    Ok(WorkerHandle {
        commands: command_tx,
        results: result_rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::models::{ChangeEvent, Selection, SelectionField};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fournisseur en mémoire qui enregistre les paires demandées
    #[derive(Default)]
    struct FakeProvider {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MarketData for FakeProvider {
        async fn fetch_catalog(&self) -> QuoteResult<Vec<Asset>> {
            Ok(vec![Asset::new("BTC", "Bitcoin")])
        }

        async fn fetch_quote(&self, selection: &ValidSelection) -> QuoteResult<Quote> {
            self.requested.lock().unwrap().push(selection.to_string());
            if selection.currency() == "USD" {
                Ok(Quote::new("50000", "51000", "49000", "2.5", "2024-01-01"))
            } else {
                Err(QuoteError::PairNotFound {
                    asset: selection.asset().to_string(),
                    currency: selection.currency().to_string(),
                })
            }
        }
    }

    fn btc(currency: &str) -> ValidSelection {
        Selection::default()
            .reduce(ChangeEvent {
                field: SelectionField::Moneda,
                value: currency.to_string(),
            })
            .reduce(ChangeEvent {
                field: SelectionField::Criptomoneda,
                value: "BTC".to_string(),
            })
            .validate()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_fetch_waits_for_min_spinner() {
        let provider = FakeProvider::default();
        let start = tokio::time::Instant::now();

        let quote = fetch_quote_paced(&provider, &btc("USD"), Duration::from_millis(1000))
            .await
            .unwrap();

        assert_eq!(quote.price, "50000");
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(*provider.requested.lock().unwrap(), vec!["BTC/USD"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_fetch_propagates_errors() {
        let provider = FakeProvider::default();
        let result = fetch_quote_paced(&provider, &btc("MXN"), Duration::from_millis(1000)).await;
        assert!(matches!(result, Err(QuoteError::PairNotFound { .. })));
    }

    #[test]
    fn test_worker_round_trip() {
        let provider = Arc::new(FakeProvider::default());
        let worker = spawn_worker(provider.clone(), Duration::ZERO).unwrap();

        worker.commands.send(AppCommand::LoadCatalog).unwrap();
        worker
            .commands
            .send(AppCommand::FetchQuote(QuoteRequest {
                id: 7,
                selection: btc("USD"),
            }))
            .unwrap();

        let timeout = Duration::from_secs(5);
        match worker.results.recv_timeout(timeout).unwrap() {
            AppResult::Catalog(Ok(assets)) => assert_eq!(assets, vec![Asset::new("BTC", "Bitcoin")]),
            other => panic!("unexpected result: {:?}", other),
        }
        match worker.results.recv_timeout(timeout).unwrap() {
            AppResult::Quote { request_id, result } => {
                assert_eq!(request_id, 7);
                assert_eq!(result.unwrap().high_day, "51000");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    fn quote_request(id: u64) -> AppCommand {
        AppCommand::FetchQuote(QuoteRequest {
            id,
            selection: btc("USD"),
        })
    }

    #[test]
    fn test_coalesce_keeps_latest_quote_and_catalog() {
        let (tx, rx) = mpsc::channel();
        for command in [quote_request(2), AppCommand::LoadCatalog, quote_request(3)] {
            tx.send(command).unwrap();
        }

        let batch = coalesce(quote_request(1), &rx);

        assert_eq!(batch.len(), 2);
        assert!(matches!(batch[0], AppCommand::LoadCatalog));
        assert!(matches!(&batch[1], AppCommand::FetchQuote(request) if request.id == 3));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_coalesce_single_command_untouched() {
        let (_tx, rx) = mpsc::channel();
        let batch = coalesce(quote_request(5), &rx);
        assert!(matches!(&batch[..], [AppCommand::FetchQuote(request)] if request.id == 5));
    }

    #[test]
    fn test_superseded_requests_do_not_delay_latest_quote() {
        let min_spinner = Duration::from_millis(300);
        let provider = Arc::new(FakeProvider::default());
        let worker = spawn_worker(provider.clone(), min_spinner).unwrap();

        let start = std::time::Instant::now();
        for id in 1..=4 {
            worker.commands.send(quote_request(id)).unwrap();
        }

        // Au pire la requête 1 part seule, puis 2..4 sont fusionnées
        let mut received = Vec::new();
        loop {
            match worker.results.recv_timeout(Duration::from_secs(5)).unwrap() {
                AppResult::Quote { request_id, result } => {
                    assert!(result.is_ok());
                    received.push(request_id);
                    if request_id == 4 {
                        break;
                    }
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }

        let elapsed = start.elapsed();
        assert!(elapsed >= min_spinner);
        assert!(elapsed < min_spinner * 3, "latest quote took {:?}", elapsed);
        assert!(received.len() <= 2);
        assert!(provider.requested.lock().unwrap().len() <= 2);
    }
}
