// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::signal;

use cardpacks_core::table::CardTable;
use cardpacks_core::types::card::PackCard;
use cardpacks_core::types::ids::UserId;

use crate::cmd::check::load_cards;
use crate::cmd::serve::get::cards_get_handler;
use crate::cmd::serve::get::register_get_handler;
use crate::cmd::serve::get::root_handler;
use crate::cmd::serve::post::cards_post_handler;
use crate::cmd::serve::post::register_post_handler;
use crate::cmd::serve::state::ServerState;
use crate::error::Fallible;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct ServerConfig {
    pub cards_file: Option<String>,
    pub user_id: Option<String>,
    pub page_size: usize,
    pub host: String,
    pub port: u16,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let cards: Vec<PackCard> = match &config.cards_file {
        Some(path) => load_cards(path)?.cards,
        None => Vec::new(),
    };
    let user: Option<UserId> = config.user_id.map(UserId::new);
    if user.is_none() {
        log::info!("No user id given, all cards are read-only");
    }
    let table = CardTable::new(cards, user, config.page_size)?;
    log::debug!("Loaded {} cards", table.len());

    let state = ServerState::new(table);
    let app = Router::new();
    let app = app.route("/", get(root_handler));
    let app = app.route("/register", get(register_get_handler));
    let app = app.route("/register", post(register_post_handler));
    let app = app.route("/cards", get(cards_get_handler));
    let app = app.route("/cards", post(cards_post_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
