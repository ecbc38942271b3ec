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

//! Where dispatched actions go. The preview server has no card service
//! behind it, so everything is logged and kept in memory.

use std::fmt::Display;
use std::fmt::Formatter;

use cardpacks_core::register::Dispatch;
use cardpacks_core::register::RegistrationRequest;
use cardpacks_core::table::CardDeletion;
use cardpacks_core::table::CardUpdate;

#[derive(Clone, Debug, PartialEq)]
pub enum Dispatched {
    Registration(RegistrationRequest),
    Update(CardUpdate),
    Deletion(CardDeletion),
}

impl Display for Dispatched {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatched::Registration(request) => write!(f, "registration for {}", request.email),
            Dispatched::Update(update) => write!(f, "update of card {}", update.id),
            Dispatched::Deletion(deletion) => write!(
                f,
                "deletion of card {} from pack {}",
                deletion.id, deletion.pack_id
            ),
        }
    }
}

#[derive(Default)]
pub struct Outbox {
    sent: Vec<Dispatched>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[Dispatched] {
        &self.sent
    }

    fn push(&mut self, item: Dispatched) {
        log::info!("Dispatching {item}");
        self.sent.push(item);
    }

    pub fn update(&mut self, update: CardUpdate) {
        self.push(Dispatched::Update(update));
    }

    pub fn delete(&mut self, deletion: CardDeletion) {
        self.push(Dispatched::Deletion(deletion));
    }
}

impl Dispatch for Outbox {
    fn dispatch(&mut self, request: RegistrationRequest) {
        self.push(Dispatched::Registration(request));
    }
}
