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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use cardpacks_core::register::RegisterForm;
use cardpacks_core::table::CardTable;

use crate::cmd::serve::outbox::Outbox;

#[derive(Clone)]
pub struct ServerState {
    pub mutable: Arc<Mutex<MutableState>>,
}

impl ServerState {
    pub fn new(table: CardTable) -> Self {
        Self {
            mutable: Arc::new(Mutex::new(MutableState {
                form: RegisterForm::new(),
                table,
                outbox: Outbox::new(),
                notice: None,
            })),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, MutableState> {
        // Handlers never leave the state half-updated, so a poisoned lock is
        // still usable.
        self.mutable.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MutableState {
    pub form: RegisterForm,
    pub table: CardTable,
    pub outbox: Outbox,
    /// One-shot message shown on the next render.
    pub notice: Option<Notice>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}
