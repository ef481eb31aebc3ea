mod cli;
mod config;
mod effects;
mod logging;
mod render;
mod repl;
mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use taplist_core::{Msg, StatusView};
use taplist_engine::{
    ActorIdentity, AvailabilityStore, EngineConfig, EngineHandle, MemoryAvailabilityStore,
    RestAvailabilityStore,
};
use taplist_logging::{tap_info, tap_warn};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::session::Session;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (destination, level) = logging::choose(cli.log_file.is_some(), cli.verbose);
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| logging::DEFAULT_LOG_FILE.into());
    logging::initialize(destination, level, &log_path);

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(url) = &cli.source_url {
        config.source_url = url.clone();
    }

    let actor = ActorIdentity::load_or_create(&config.data_dir).unwrap_or_else(|err| {
        tap_warn!("Using a throwaway actor identity: {}", err);
        ActorIdentity::generate()
    });

    let store = build_store(&cli, &config)?;
    let settle_timeout = config.fetch_settings().request_timeout * 2;

    let engine = EngineHandle::new(EngineConfig {
        fetch: config.fetch_settings(),
        source_url: config.source_url.clone(),
        store,
        actor,
        clock: Arc::new(chrono::Utc::now),
    })
    .context("failed to start the network engine")?;

    let mut session = Session::new(EffectRunner::new(engine));
    session.dispatch(Msg::Started);
    session.settle(settle_timeout);

    let bounds = session.view().abv_bounds.map(|b| (b.min, b.max));
    for msg in cli.view_messages(bounds) {
        session.dispatch(msg);
    }
    for key in &cli.toggle {
        session.dispatch(Msg::ToggleAvailabilityClicked(key.clone()));
    }
    session.settle(settle_timeout);

    let view = session.view();
    println!("{}", render::render(&view, cli.format)?);

    if cli.interactive {
        repl::run(&mut session, cli.format, settle_timeout)?;
    } else if let StatusView::Failed { message } = &view.status {
        anyhow::bail!("{message}");
    }
    Ok(())
}

fn build_store(
    cli: &Cli,
    config: &AppConfig,
) -> anyhow::Result<Option<Arc<dyn AvailabilityStore>>> {
    if cli.offline_store {
        tap_info!("Using an in-process availability store");
        let memory: Arc<dyn AvailabilityStore> = Arc::new(MemoryAvailabilityStore::new());
        return Ok(Some(memory));
    }
    let Some(store) = &config.store else {
        tap_info!("No availability store configured");
        return Ok(None);
    };
    let rest = RestAvailabilityStore::new(&store.url, &store.api_key, &store.table)
        .context("invalid availability store settings")?;
    let rest: Arc<dyn AvailabilityStore> = Arc::new(rest);
    Ok(Some(rest))
}
