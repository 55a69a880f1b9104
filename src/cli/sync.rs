use crate::{config::Config, error, sync};

pub async fn sync(config: &Config, dry_run: bool) {
    if let Err(e) = sync::run_sync(config, dry_run).await {
        error!("Sync failed: {}", e);
    }
}
