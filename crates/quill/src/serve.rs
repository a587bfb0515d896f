// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quill serve` command implementation.
//!
//! Loads the prompt templates once, builds the OpenAI provider and the
//! Supabase store, wires them into a [`WorkflowController`], and serves the
//! HTTP gateway until a shutdown signal arrives.

use std::sync::Arc;

use quill_config::model::QuillConfig;
use quill_core::{PluginAdapter, QuillError};
use quill_gateway::{GatewayState, ServerConfig};
use quill_openai::OpenAiProvider;
use quill_prompt::PromptSet;
use quill_supabase::SupabaseStorage;
use quill_workflow::WorkflowController;
use tracing::{error, info};

use crate::shutdown;

/// Runs the `quill serve` command.
pub async fn run_serve(config: QuillConfig) -> Result<(), QuillError> {
    init_tracing(&config.server.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting quill serve"
    );

    let prompts = Arc::new(PromptSet::load(&config.prompts).await?);
    info!(
        generate = prompts.generate().name(),
        refine = prompts.refine().name(),
        "prompt templates loaded"
    );

    let provider = Arc::new(OpenAiProvider::new(&config.openai)?);
    let storage = Arc::new(SupabaseStorage::new(&config.supabase)?);

    let controller = WorkflowController::new(
        provider.clone(),
        storage.clone(),
        prompts,
        config.workflow.clone(),
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        cors_permissive: config.server.cors_permissive,
    };

    let cancel = shutdown::install_signal_handler();
    let result =
        quill_gateway::start_server(&server_config, GatewayState::new(controller), cancel.clone())
            .await;
    if let Err(e) = &result {
        error!(error = %e, "gateway exited with an error");
    }
    cancel.cancel();

    shutdown::shutdown_adapters(&[
        provider.as_ref() as &dyn PluginAdapter,
        storage.as_ref() as &dyn PluginAdapter,
    ])
    .await;

    info!("quill serve shutdown complete");
    result
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `quill=<log_level>,warn`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quill={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
