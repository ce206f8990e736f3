// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use gatekeep::{
    app_service::{self, AppState, SERVICE_NAME},
    config::AppServiceConfig,
    server,
    telemetry,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_from_env()?;

    let config = AppServiceConfig::from_env().inspect_err(|e| {
        error!(error = %e, "invalid app service configuration");
    })?;
    let state = AppState::from_config(&config)?;

    info!(
        verify_url = %state.verifier.verify_url(),
        verify_timeout_ms = config.verify_timeout.as_millis() as u64,
        cache_enabled = config.cache_enabled(),
        "app service configured (docs at /docs)"
    );

    let app = app_service::router(state);
    server::serve(
        SERVICE_NAME,
        config.listen.socket_addr(),
        app,
        server::shutdown_on_signal(),
    )
    .await?;
    Ok(())
}
