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

//! State behind the card table: sort order, the current page, the row being
//! edited, and which rows the authorised user may change.

use std::cmp::Ordering;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::PackCard;
use crate::types::ids::CardId;
use crate::types::ids::PackId;
use crate::types::ids::UserId;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Question,
    Answer,
    Updated,
    Grade,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Question,
        SortColumn::Answer,
        SortColumn::Updated,
        SortColumn::Grade,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Question => "question",
            SortColumn::Answer => "answer",
            SortColumn::Updated => "updated",
            SortColumn::Grade => "grade",
        }
    }

    /// Column header text.
    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Question => "Question",
            SortColumn::Answer => "Answer",
            SortColumn::Updated => "Last Updated",
            SortColumn::Grade => "Grade",
        }
    }

    fn compare(self, a: &PackCard, b: &PackCard) -> Ordering {
        match self {
            SortColumn::Question => compare_text(&a.question, &b.question),
            SortColumn::Answer => compare_text(&a.answer, &b.answer),
            SortColumn::Updated => a.updated.cmp(&b.updated),
            SortColumn::Grade => a.grade.total_cmp(&b.grade),
        }
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for SortColumn {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == value)
            .ok_or_else(|| ErrorReport::new(format!("unknown sort column: '{value}'")))
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Sort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Encode in the card service's `sortCards` form: a `0` (ascending) or
    /// `1` (descending) prefix followed by the column name.
    pub fn to_param(self) -> String {
        let prefix = match self.direction {
            SortDirection::Ascending => '0',
            SortDirection::Descending => '1',
        };
        format!("{prefix}{}", self.column)
    }

    pub fn from_param(param: &str) -> Fallible<Self> {
        let direction = match param.chars().next() {
            Some('0') => SortDirection::Ascending,
            Some('1') => SortDirection::Descending,
            _ => return fail(format!("invalid sort parameter: '{param}'")),
        };
        let column = SortColumn::try_from(&param[1..])?;
        Ok(Self { column, direction })
    }
}

/// The row currently being edited.
#[derive(Clone, Debug, PartialEq)]
pub struct EditDraft {
    pub id: CardId,
    pub question: String,
    pub answer: String,
}

/// An edit to send to the card service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardUpdate {
    #[serde(rename = "_id")]
    pub id: CardId,
    pub question: String,
    pub answer: String,
}

/// A deletion to send to the card service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDeletion {
    #[serde(rename = "_id")]
    pub id: CardId,
    #[serde(rename = "cardsPack_id")]
    pub pack_id: PackId,
}

#[derive(Clone, Debug)]
pub struct CardTable {
    /// All cards, in display order.
    cards: Vec<PackCard>,
    /// The authorised user. Only their cards can be edited or deleted.
    user: Option<UserId>,
    /// `None` keeps the order the service returned.
    sort: Option<Sort>,
    /// 1-based.
    page: usize,
    page_size: usize,
    draft: Option<EditDraft>,
}

impl CardTable {
    pub fn new(cards: Vec<PackCard>, user: Option<UserId>, page_size: usize) -> Fallible<Self> {
        if page_size == 0 {
            return fail("page size must be at least 1");
        }
        Ok(Self {
            cards,
            user,
            sort: None,
            page: 1,
            page_size,
            draft: None,
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Always at least one, so an empty table still has a page to show.
    pub fn page_count(&self) -> usize {
        self.cards.len().div_ceil(self.page_size).max(1)
    }

    /// Go to `page`, clamped to the valid range. Returns the page shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.page_count());
        self.page
    }

    /// The cards on the current page.
    pub fn rows(&self) -> &[PackCard] {
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.cards.len());
        if start >= end {
            return &[];
        }
        &self.cards[start..end]
    }

    /// Whether the authorised user may edit or delete `card`.
    pub fn can_modify(&self, card: &PackCard) -> bool {
        match &self.user {
            Some(user) => card.is_owned_by(user),
            None => false,
        }
    }

    /// Sort by `column`. Selecting the active column flips the direction;
    /// any other column starts ascending.
    pub fn sort_by(&mut self, column: SortColumn) -> Sort {
        let sort = match self.sort {
            Some(current) if current.column == column => Sort {
                column,
                direction: current.direction.flip(),
            },
            _ => Sort::ascending(column),
        };
        self.set_sort(sort);
        sort
    }

    pub fn set_sort(&mut self, sort: Sort) {
        self.sort = Some(sort);
        self.apply_sort();
        self.set_page(self.page);
    }

    fn apply_sort(&mut self) {
        if let Some(Sort { column, direction }) = self.sort {
            self.cards.sort_by(|a, b| {
                let ordering = column.compare(a, b);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
    }

    /// Swap in a freshly fetched list. The sort order is re-applied, and an
    /// open draft survives only if its card is still present.
    pub fn replace_cards(&mut self, cards: Vec<PackCard>) {
        self.cards = cards;
        self.apply_sort();
        if let Some(draft) = &self.draft {
            if self.find(&draft.id).is_none() {
                self.draft = None;
            }
        }
        self.set_page(self.page);
    }

    fn find(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    fn find_modifiable(&self, id: &CardId) -> Fallible<usize> {
        let Some(idx) = self.find(id) else {
            return fail(format!("card not found: {id}"));
        };
        if !self.can_modify(&self.cards[idx]) {
            return fail(format!("card {id} belongs to another user"));
        }
        Ok(idx)
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub fn is_editing(&self, id: &CardId) -> bool {
        self.draft.as_ref().is_some_and(|draft| &draft.id == id)
    }

    /// Open a draft for `id`. Any other open draft is discarded.
    pub fn begin_edit(&mut self, id: &CardId) -> Fallible<()> {
        let idx = self.find_modifiable(id)?;
        let card = &self.cards[idx];
        self.draft = Some(EditDraft {
            id: card.id.clone(),
            question: card.question.clone(),
            answer: card.answer.clone(),
        });
        Ok(())
    }

    fn draft_mut(&mut self) -> Fallible<&mut EditDraft> {
        self.draft
            .as_mut()
            .ok_or_else(|| ErrorReport::new("no card is being edited"))
    }

    pub fn set_draft_question(&mut self, value: impl Into<String>) -> Fallible<()> {
        self.draft_mut()?.question = value.into();
        Ok(())
    }

    pub fn set_draft_answer(&mut self, value: impl Into<String>) -> Fallible<()> {
        self.draft_mut()?.answer = value.into();
        Ok(())
    }

    /// Apply the open draft locally and return the update to dispatch.
    pub fn commit_edit(&mut self) -> Fallible<CardUpdate> {
        let Some(draft) = self.draft.take() else {
            return fail("no card is being edited");
        };
        let idx = self.find_modifiable(&draft.id)?;
        let card = &mut self.cards[idx];
        card.question = draft.question.clone();
        card.answer = draft.answer.clone();
        self.apply_sort();
        Ok(CardUpdate {
            id: draft.id,
            question: draft.question,
            answer: draft.answer,
        })
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    /// Remove `id` locally and return the deletion to dispatch.
    pub fn delete(&mut self, id: &CardId) -> Fallible<CardDeletion> {
        let idx = self.find_modifiable(id)?;
        let card = self.cards.remove(idx);
        if self.is_editing(id) {
            self.draft = None;
        }
        self.set_page(self.page);
        Ok(CardDeletion {
            id: card.id,
            pack_id: card.pack_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::timestamp::Timestamp;

    fn card(id: &str, user: &str, question: &str, grade: f64, day: u32) -> PackCard {
        let updated = NaiveDate::from_ymd_opt(2022, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        PackCard {
            id: CardId::new(id),
            pack_id: PackId::new("pack"),
            user_id: UserId::new(user),
            question: question.to_string(),
            answer: format!("answer {id}"),
            grade,
            updated: Timestamp::new(updated),
        }
    }

    fn sample() -> Vec<PackCard> {
        vec![
            card("c1", "me", "beta", 2.0, 3),
            card("c2", "other", "Alpha", 5.0, 1),
            card("c3", "me", "gamma", 0.5, 2),
        ]
    }

    fn ids(table: &CardTable) -> Vec<&str> {
        table.rows().iter().map(|c| c.id.as_str()).collect()
    }

    fn table(page_size: usize) -> CardTable {
        CardTable::new(sample(), Some(UserId::new("me")), page_size).unwrap()
    }

    #[test]
    fn test_zero_page_size() {
        assert!(CardTable::new(sample(), None, 0).is_err());
    }

    #[test]
    fn test_initial_order_is_service_order() {
        let table = table(10);
        assert_eq!(ids(&table), vec!["c1", "c2", "c3"]);
        assert_eq!(table.sort(), None);
        assert_eq!(table.page_count(), 1);
    }

    #[test]
    fn test_sort_toggle() {
        let mut table = table(10);
        let sort = table.sort_by(SortColumn::Question);
        assert_eq!(sort.direction, SortDirection::Ascending);
        assert_eq!(ids(&table), vec!["c2", "c1", "c3"]);
        let sort = table.sort_by(SortColumn::Question);
        assert_eq!(sort.direction, SortDirection::Descending);
        assert_eq!(ids(&table), vec!["c3", "c1", "c2"]);
        let sort = table.sort_by(SortColumn::Grade);
        assert_eq!(sort, Sort::ascending(SortColumn::Grade));
        assert_eq!(ids(&table), vec!["c3", "c1", "c2"]);
        table.sort_by(SortColumn::Updated);
        assert_eq!(ids(&table), vec!["c2", "c3", "c1"]);
    }

    #[test]
    fn test_sort_param() -> Fallible<()> {
        let sort = Sort::from_param("1updated")?;
        assert_eq!(sort.column, SortColumn::Updated);
        assert_eq!(sort.direction, SortDirection::Descending);
        assert_eq!(sort.to_param(), "1updated");
        assert_eq!(Sort::ascending(SortColumn::Grade).to_param(), "0grade");
        assert!(Sort::from_param("2grade").is_err());
        assert!(Sort::from_param("0shots").is_err());
        assert!(Sort::from_param("").is_err());
        Ok(())
    }

    #[test]
    fn test_pagination() {
        let mut table = table(2);
        assert_eq!(table.page_count(), 2);
        assert_eq!(ids(&table), vec!["c1", "c2"]);
        assert_eq!(table.set_page(2), 2);
        assert_eq!(ids(&table), vec!["c3"]);
        assert_eq!(table.set_page(9), 2);
        assert_eq!(table.set_page(0), 1);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let mut table = CardTable::new(Vec::new(), None, 5).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.page_count(), 1);
        assert_eq!(table.set_page(3), 1);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_sort_keeps_page() {
        let mut table = table(2);
        table.set_page(2);
        table.sort_by(SortColumn::Grade);
        assert_eq!(table.page(), 2);
        assert_eq!(ids(&table), vec!["c2"]);
    }

    #[test]
    fn test_can_modify() {
        let table = table(10);
        let rows = table.rows();
        assert!(table.can_modify(&rows[0]));
        assert!(!table.can_modify(&rows[1]));
        let anonymous = CardTable::new(sample(), None, 10).unwrap();
        assert!(!anonymous.can_modify(&anonymous.rows()[0]));
    }

    #[test]
    fn test_edit_commit() -> Fallible<()> {
        let mut table = table(10);
        table.begin_edit(&CardId::new("c1"))?;
        assert!(table.is_editing(&CardId::new("c1")));
        assert_eq!(table.editing().unwrap().question, "beta");
        table.set_draft_question("delta")?;
        table.set_draft_answer("new answer")?;
        let update = table.commit_edit()?;
        assert_eq!(
            update,
            CardUpdate {
                id: CardId::new("c1"),
                question: "delta".to_string(),
                answer: "new answer".to_string(),
            }
        );
        assert!(table.editing().is_none());
        assert_eq!(table.rows()[0].question, "delta");
        Ok(())
    }

    #[test]
    fn test_commit_resorts() -> Fallible<()> {
        let mut table = table(10);
        table.sort_by(SortColumn::Question);
        table.begin_edit(&CardId::new("c3"))?;
        table.set_draft_question("aardvark")?;
        table.commit_edit()?;
        assert_eq!(ids(&table), vec!["c3", "c2", "c1"]);
        Ok(())
    }

    #[test]
    fn test_cancel_edit() -> Fallible<()> {
        let mut table = table(10);
        table.begin_edit(&CardId::new("c1"))?;
        table.set_draft_question("changed")?;
        table.cancel_edit();
        assert!(table.editing().is_none());
        assert_eq!(table.rows()[0].question, "beta");
        assert!(table.commit_edit().is_err());
        assert!(table.set_draft_answer("x").is_err());
        Ok(())
    }

    #[test]
    fn test_single_draft() -> Fallible<()> {
        let mut table = table(10);
        table.begin_edit(&CardId::new("c1"))?;
        table.begin_edit(&CardId::new("c3"))?;
        assert!(!table.is_editing(&CardId::new("c1")));
        assert!(table.is_editing(&CardId::new("c3")));
        Ok(())
    }

    #[test]
    fn test_edit_other_users_card() {
        let mut table = table(10);
        let err = table.begin_edit(&CardId::new("c2")).unwrap_err();
        assert_eq!(err.message(), "card c2 belongs to another user");
        assert!(table.editing().is_none());
    }

    #[test]
    fn test_edit_unknown_card() {
        let mut table = table(10);
        let err = table.begin_edit(&CardId::new("nope")).unwrap_err();
        assert_eq!(err.message(), "card not found: nope");
    }

    #[test]
    fn test_delete() -> Fallible<()> {
        let mut table = table(2);
        table.set_page(2);
        let deletion = table.delete(&CardId::new("c3"))?;
        assert_eq!(
            deletion,
            CardDeletion {
                id: CardId::new("c3"),
                pack_id: PackId::new("pack"),
            }
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.page(), 1);
        assert!(table.delete(&CardId::new("c2")).is_err());
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[test]
    fn test_delete_clears_draft() -> Fallible<()> {
        let mut table = table(10);
        table.begin_edit(&CardId::new("c1"))?;
        table.delete(&CardId::new("c1"))?;
        assert!(table.editing().is_none());
        Ok(())
    }

    #[test]
    fn test_replace_cards() -> Fallible<()> {
        let mut table = table(10);
        table.sort_by(SortColumn::Grade);
        table.begin_edit(&CardId::new("c1"))?;
        table.replace_cards(vec![
            card("c4", "me", "delta", 4.0, 4),
            card("c3", "me", "gamma", 0.5, 2),
        ]);
        assert_eq!(ids(&table), vec!["c3", "c4"]);
        assert!(table.editing().is_none());
        Ok(())
    }

    #[test]
    fn test_sort_column_parse() {
        assert_eq!(SortColumn::try_from("grade").unwrap(), SortColumn::Grade);
        assert!(SortColumn::try_from("Grade").is_err());
        assert_eq!(SortColumn::Updated.label(), "Last Updated");
    }
}
