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

//! Card table bindings. Rows cross the boundary as JSON.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use cardpacks_core::table::CardTable;
use cardpacks_core::table::Sort;
use cardpacks_core::table::SortColumn;
use cardpacks_core::types::card::CardList;
use cardpacks_core::types::card::PackCard;
use cardpacks_core::types::ids::CardId;
use cardpacks_core::types::ids::UserId;

use crate::JsDispatch;

/// One rendered row of the table.
#[derive(Serialize)]
struct RowView<'a> {
    id: &'a str,
    question: &'a str,
    answer: &'a str,
    updated: String,
    rating: u8,
    can_modify: bool,
    editing: bool,
}

#[derive(Serialize)]
struct DraftView<'a> {
    id: &'a str,
    question: &'a str,
    answer: &'a str,
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_cards(cards_json: &str) -> Result<Vec<PackCard>, JsValue> {
    CardList::from_json(cards_json)
        .map(|list| list.cards)
        .map_err(to_js)
}

#[wasm_bindgen]
pub struct CardTableView {
    table: CardTable,
}

#[wasm_bindgen]
impl CardTableView {
    /// `cards_json` is a card service response: `{"cards": [...]}`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        cards_json: &str,
        user_id: Option<String>,
        page_size: usize,
    ) -> Result<CardTableView, JsValue> {
        let cards = parse_cards(cards_json)?;
        let table = CardTable::new(cards, user_id.map(UserId::new), page_size).map_err(to_js)?;
        Ok(Self { table })
    }

    #[wasm_bindgen]
    pub fn replace_cards(&mut self, cards_json: &str) -> Result<(), JsValue> {
        let cards = parse_cards(cards_json)?;
        self.table.replace_cards(cards);
        Ok(())
    }

    /// The current page as a JSON array of rows.
    #[wasm_bindgen]
    pub fn rows_json(&self) -> String {
        let rows: Vec<RowView> = self
            .table
            .rows()
            .iter()
            .map(|card| RowView {
                id: card.id.as_str(),
                question: &card.question,
                answer: &card.answer,
                updated: card.updated_date().to_string(),
                rating: card.rating(),
                can_modify: self.table.can_modify(card),
                editing: self.table.is_editing(&card.id),
            })
            .collect();
        serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[wasm_bindgen]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[wasm_bindgen]
    pub fn page(&self) -> usize {
        self.table.page()
    }

    #[wasm_bindgen]
    pub fn page_count(&self) -> usize {
        self.table.page_count()
    }

    /// Returns the page actually shown after clamping.
    #[wasm_bindgen]
    pub fn set_page(&mut self, page: usize) -> usize {
        self.table.set_page(page)
    }

    /// Sort by a column ("question", "answer", "updated", "grade") and
    /// return the sort in `sortCards` form, e.g. "1grade".
    #[wasm_bindgen]
    pub fn sort_by(&mut self, column: &str) -> Result<String, JsValue> {
        let column = SortColumn::try_from(column).map_err(to_js)?;
        Ok(self.table.sort_by(column).to_param())
    }

    #[wasm_bindgen]
    pub fn set_sort(&mut self, param: &str) -> Result<(), JsValue> {
        let sort = Sort::from_param(param).map_err(to_js)?;
        self.table.set_sort(sort);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn sort_param(&self) -> Option<String> {
        self.table.sort().map(Sort::to_param)
    }

    #[wasm_bindgen]
    pub fn begin_edit(&mut self, id: &str) -> Result<(), JsValue> {
        self.table.begin_edit(&CardId::new(id)).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_draft_question(&mut self, value: &str) -> Result<(), JsValue> {
        self.table.set_draft_question(value).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_draft_answer(&mut self, value: &str) -> Result<(), JsValue> {
        self.table.set_draft_answer(value).map_err(to_js)
    }

    /// The open draft as JSON, if any.
    #[wasm_bindgen]
    pub fn draft_json(&self) -> Option<String> {
        let draft = self.table.editing()?;
        let view = DraftView {
            id: draft.id.as_str(),
            question: &draft.question,
            answer: &draft.answer,
        };
        serde_json::to_string(&view).ok()
    }

    /// Apply the draft and pass the update JSON to `callback`.
    #[wasm_bindgen]
    pub fn commit_edit(&mut self, callback: &js_sys::Function) -> Result<(), JsValue> {
        let update = self.table.commit_edit().map_err(to_js)?;
        let mut dispatch = JsDispatch::new(callback);
        dispatch.send(&update);
        dispatch.finish()
    }

    #[wasm_bindgen]
    pub fn cancel_edit(&mut self) {
        self.table.cancel_edit();
    }

    /// Remove the card and pass the deletion JSON to `callback`.
    #[wasm_bindgen]
    pub fn delete(&mut self, id: &str, callback: &js_sys::Function) -> Result<(), JsValue> {
        let deletion = self.table.delete(&CardId::new(id)).map_err(to_js)?;
        let mut dispatch = JsDispatch::new(callback);
        dispatch.send(&deletion);
        dispatch.finish()
    }
}
