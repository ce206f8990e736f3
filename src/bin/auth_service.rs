// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use gatekeep::{
    auth_service::{self, AuthState, SERVICE_NAME},
    config::AuthServiceConfig,
    server,
    telemetry,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_from_env()?;

    let config = AuthServiceConfig::from_env().inspect_err(|e| {
        error!(error = %e, "invalid auth service configuration");
    })?;
    let state = AuthState::from_config(&config)?;
    let users = state.issuer.known_users().await?;

    info!(
        users,
        token_ttl_secs = state.issuer.ttl().as_secs(),
        bcrypt_cost = config.bcrypt_cost,
        "auth service configured (docs at /docs)"
    );

    let app = auth_service::router(state);
    server::serve(
        SERVICE_NAME,
        config.listen.socket_addr(),
        app,
        server::shutdown_on_signal(),
    )
    .await?;
    Ok(())
}
