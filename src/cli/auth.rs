use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::Config, spotify, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>, config: &Config) {
    spotify::auth::auth(shared_state, config).await;
}
