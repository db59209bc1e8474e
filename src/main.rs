use std::sync::Arc;

use log::info;
use tokio::net::TcpListener;

use flatwiki::logger::Logger;
use flatwiki::{build_app, AppState, Config, PageStore, Templates, WikiError};

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("flatwiki: logger already installed: {}", e);
    }

    let config = Config::from_env();
    let store = PageStore::open(&config.data_dir)?;
    let templates = Templates::load(&config.views_dir)?;
    let state = AppState { store: Arc::new(store), renderer: Arc::new(templates) };
    let app = build_app(state);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr.as_str()).await?;
    info!("Wiki listening on http://{} (pages in {:?})", addr, config.data_dir);
    axum::serve(listener, app).await.map_err(WikiError::from)
}
