//! Wires the store, templates and router for `formed query` and serves them.

use crate::infra::assets::Assets;
use crate::infra::config::QueryConfig;
use crate::storage::fs::DiskFilesystem;
use crate::storage::store::CsvStore;
use crate::transport::http::{create_router, AppState, Templates};
use anyhow::Context;
use std::sync::Arc;

/// Builds the shared state. Fails when a view is missing or does not parse,
/// so the service never starts without its templates.
pub fn build_state(config: &QueryConfig) -> anyhow::Result<AppState> {
    let assets = Assets::new(config.ui_local);
    let templates = Templates::gather(&assets).context("no usable templates")?;

    let fsys = Arc::new(DiskFilesystem::new());
    let store = Arc::new(CsvStore::new(fsys, config.file_store.clone()));
    tracing::debug!(
        file_store = ?store.path(),
        ui_local = assets.is_local(),
        "initialized store and templates"
    );

    Ok(AppState::new(store, templates))
}

pub async fn run_query(config: QueryConfig) -> anyhow::Result<()> {
    let app_state = build_state(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.api_addr)
        .await
        .with_context(|| format!("unable to listen on {}", config.api_addr))?;
    tracing::info!(api = %format!("tcp://{}", listener.local_addr()?), "query API listening");

    let app = create_router(app_state);
    tokio::select! {
        result = axum::serve(listener, app) => {
            result.context("query API stopped")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::path::PathBuf;

    fn config(file_store: PathBuf, ui_local: bool) -> QueryConfig {
        QueryConfig {
            api_addr: "127.0.0.1:0".to_string(),
            file_store,
            debug: false,
            ui_local,
        }
    }

    #[test]
    fn build_state_with_embedded_views() {
        let dir = tempfile::tempdir().unwrap();
        let state = build_state(&config(dir.path().join("store.csv"), false)).unwrap();
        assert_eq!(state.templates.get(StatusCode::OK).name(), "form");
    }

    #[test]
    fn build_state_with_local_views() {
        let dir = tempfile::tempdir().unwrap();
        let state = build_state(&config(dir.path().join("store.csv"), true)).unwrap();
        assert_eq!(state.templates.get(StatusCode::NOT_FOUND).name(), "error");
    }
}
