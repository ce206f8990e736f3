// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use gatekeep::{
    config::GatewayConfig,
    gateway::{self, GatewayState, SERVICE_NAME},
    server,
    telemetry,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_from_env()?;

    let config = GatewayConfig::from_env().inspect_err(|e| {
        error!(error = %e, "invalid gateway configuration");
    })?;

    for mapping in config.routes.mappings() {
        info!(
            prefix = mapping.prefix(),
            upstream = %mapping.upstream(),
            rewrite = mapping.rewrite(),
            "route"
        );
    }

    let state = GatewayState::from_config(&config)?;
    let app = gateway::router(state);
    server::serve(
        SERVICE_NAME,
        config.listen.socket_addr(),
        app,
        server::shutdown_on_signal(),
    )
    .await?;
    Ok(())
}
