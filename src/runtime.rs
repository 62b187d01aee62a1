use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::export;
use crate::update::{Effect, Msg};

pub const UNDO_WINDOW: Duration = Duration::from_secs(5);
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs effects as tokio tasks; every outcome comes back as a `Msg`.
pub struct Runtime {
    client: ApiClient,
    tx: UnboundedSender<Msg>,
    export_dir: PathBuf,
    undo_window: Duration,
    search_debounce: Duration,
    undo_timer: Option<JoinHandle<()>>,
    search_timer: Option<JoinHandle<()>>,
}

impl Runtime {
    pub fn new(client: ApiClient, tx: UnboundedSender<Msg>, export_dir: PathBuf) -> Self {
        Self {
            client,
            tx,
            export_dir,
            undo_window: UNDO_WINDOW,
            search_debounce: SEARCH_DEBOUNCE,
            undo_timer: None,
            search_timer: None,
        }
    }

    #[cfg(test)]
    fn with_timings(mut self, undo_window: Duration, search_debounce: Duration) -> Self {
        self.undo_window = undo_window;
        self.search_debounce = search_debounce;
        self
    }

    pub fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Load { generation, query } => {
                let client = self.client.clone();
                self.spawn(async move {
                    let result = tokio::try_join!(
                        client.fetch_stats(),
                        client.list_applications(&query)
                    )
                    .map_err(|e| e.to_string());
                    Msg::Loaded { generation, result }
                });
            }
            Effect::ScheduleSearch { token } => {
                let delay = self.search_debounce;
                let handle = self.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Msg::SearchSettled { token }
                });
                replace_timer(&mut self.search_timer, handle);
            }
            Effect::Create(payload) => {
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client.create_application(&payload).await;
                    if let Ok(app) = &result {
                        info!("Created application #{} ({})", app.id, app.company);
                    }
                    Msg::Created(result.map_err(|e| e.to_string()))
                });
            }
            Effect::UpdateStatus { id, status } => {
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client.update_status(id, status).await;
                    if result.is_ok() {
                        info!("Application #{} moved to {}", id, status);
                    }
                    Msg::StatusUpdated(result.map_err(|e| e.to_string()))
                });
            }
            Effect::Delete { id } => {
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client.delete_application(id).await;
                    if result.is_ok() {
                        info!("Deleted application #{}", id);
                    }
                    Msg::Deleted {
                        id,
                        result: result.map_err(|e| e.to_string()),
                    }
                });
            }
            Effect::Restore { id } => {
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client.restore_application(id).await;
                    if result.is_ok() {
                        info!("Restored application #{}", id);
                    }
                    Msg::Restored(result.map_err(|e| e.to_string()))
                });
            }
            Effect::StartUndoTimer { token } => {
                let window = self.undo_window;
                let handle = self.spawn(async move {
                    tokio::time::sleep(window).await;
                    Msg::UndoExpired { token }
                });
                replace_timer(&mut self.undo_timer, handle);
            }
            Effect::CancelUndoTimer => {
                if let Some(handle) = self.undo_timer.take() {
                    handle.abort();
                }
            }
            Effect::Export(applications) => {
                let rows = applications.len();
                let result = export::export_to_dir(&self.export_dir, &applications)
                    .map_err(|e| format!("{:#}", e));
                match &result {
                    Ok(path) => info!("Exported {} rows to {}", rows, path.display()),
                    Err(e) => warn!("Export failed: {}", e),
                }
                self.send(Msg::Exported { rows, result });
            }
        }
    }

    fn spawn<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = Msg> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // Receiver gone means the dashboard is shutting down.
            let _ = tx.send(task.await);
        })
    }

    fn send(&self, msg: Msg) {
        let _ = self.tx.send(msg);
    }
}

fn replace_timer(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
    if let Some(previous) = slot.replace(handle) {
        previous.abort();
    }
}
