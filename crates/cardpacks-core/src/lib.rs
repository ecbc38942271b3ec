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

//! cardpacks-core: Core library for the cardpacks flashcard front-end.
//!
//! This library holds the WASM-compatible state behind the browser screens:
//! - The registration form validator and its readiness status
//! - The card table: sorting, pagination, inline editing and deletion
//! - Card, identifier and timestamp types as delivered by the card service

pub mod error;
pub mod register;
pub mod table;
pub mod types;

// Re-exports for convenience
pub use error::{ErrorReport, Fallible, fail};
pub use register::{Dispatch, FieldState, RegisterForm, RegistrationRequest, Status};
pub use table::{CardDeletion, CardTable, CardUpdate, Sort, SortColumn, SortDirection};
pub use types::card::{CardList, PackCard};
pub use types::ids::{CardId, PackId, UserId};
pub use types::timestamp::Timestamp;
