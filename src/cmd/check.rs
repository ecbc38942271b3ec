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

use std::collections::HashSet;
use std::path::Path;

use cardpacks_core::types::card::CardList;

use crate::error::Fallible;
use crate::error::fail;

/// Read a JSON card list from disk.
pub fn load_cards(path: &str) -> Fallible<CardList> {
    if !Path::new(path).exists() {
        return fail("cards file does not exist.");
    }
    let text = std::fs::read_to_string(path)?;
    CardList::from_json(&text)
}

pub fn check_cards(path: &str) -> Fallible<()> {
    let list = load_cards(path)?;
    let packs: HashSet<_> = list.cards.iter().map(|card| &card.pack_id).collect();
    log::debug!("Checked {path}");
    println!("{} cards in {} packs.", list.cards.len(), packs.len());
    Ok(())
}
