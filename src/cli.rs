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

use std::process::exit;

use clap::Parser;
use tokio::spawn;

use crate::cmd::check::check_cards;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::error::Fallible;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve the registration form and card table locally.
    Serve {
        /// Path to a JSON card list, as returned by the card service. By default, the table is empty.
        cards_file: Option<String>,
        /// The authorised user. Only this user's cards can be edited or deleted.
        #[arg(long)]
        user_id: Option<String>,
        /// Number of cards per table page. Default is 10.
        #[arg(long, default_value_t = cardpacks_core::table::DEFAULT_PAGE_SIZE)]
        page_size: usize,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Check that a card list file parses.
    Check {
        /// Path to a JSON card list.
        cards_file: String,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            cards_file,
            user_id,
            page_size,
            host,
            port,
            open_browser,
        } => {
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/register"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                cards_file,
                user_id,
                page_size,
                host,
                port,
            };
            start_server(config).await
        }
        Command::Check { cards_file } => check_cards(&cards_file),
    }
}
