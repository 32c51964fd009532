//! Taskbook binary: wires storage, store, and the terminal view.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use taskbook::{
    Config, MonotonicIdGenerator, TaskArchive, TodoAction, TodoEnvironment, TodoReducer, TodoState,
    TodoStore, view,
};
use taskbook_core::environment::SystemClock;
use taskbook_storage::FileStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the rendered list.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;
    tracing::info!(data_dir = %config.data_dir.display(), "starting");

    let archive = TaskArchive::new(Arc::new(FileStore::new(config.data_dir)));

    // Hydrate once, before the first render.
    let tasks = archive.hydrate();

    let ids = Arc::new(MonotonicIdGenerator::new(Arc::new(SystemClock)));
    for task in &tasks {
        ids.observe(task.id);
    }

    let env = TodoEnvironment::new(ids, archive);
    let store = TodoStore::new(TodoState::new(), TodoReducer::new(), env);
    store.send(TodoAction::Hydrated { tasks }).await;

    view::run(&store).await.context("terminal I/O failed")?;

    // Let the last persistence write land before the process ends.
    store
        .flush(Duration::from_secs(5))
        .await
        .context("flushing pending writes")?;

    Ok(())
}
