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

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::ids::CardId;
use crate::types::ids::PackId;
use crate::types::ids::UserId;
use crate::types::timestamp::Timestamp;

/// Highest value on the grade scale.
pub const MAX_RATING: u8 = 5;

/// A question/answer card as returned by the card service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackCard {
    #[serde(rename = "_id")]
    pub id: CardId,
    #[serde(rename = "cardsPack_id")]
    pub pack_id: PackId,
    pub user_id: UserId,
    pub question: String,
    pub answer: String,
    /// Average grade in `0.0..=5.0`.
    pub grade: f64,
    pub updated: Timestamp,
}

impl PackCard {
    /// The "Last Updated" cell: the date part of `updated`.
    pub fn updated_date(&self) -> NaiveDate {
        self.updated.date()
    }

    /// Number of filled stars in the grade cell.
    pub fn rating(&self) -> u8 {
        rating(self.grade)
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }
}

/// Round a grade to whole stars. Out-of-range and NaN grades are clamped.
pub fn rating(grade: f64) -> u8 {
    if grade.is_nan() {
        return 0;
    }
    grade.round().clamp(0.0, MAX_RATING as f64) as u8
}

/// A page of cards in the card service's response envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CardList {
    pub cards: Vec<PackCard>,
}

impl CardList {
    pub fn from_json(text: &str) -> Fallible<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cards": [
            {
                "_id": "c1",
                "cardsPack_id": "p1",
                "user_id": "u1",
                "question": "2 + 2?",
                "answer": "4",
                "grade": 3.6,
                "shots": 4,
                "updated": "2022-03-09T10:15:00.000Z"
            }
        ],
        "cardsTotalCount": 1
    }"#;

    #[test]
    fn test_parse_service_response() -> Fallible<()> {
        let list = CardList::from_json(SAMPLE)?;
        assert_eq!(list.cards.len(), 1);
        let card = &list.cards[0];
        assert_eq!(card.id, CardId::new("c1"));
        assert_eq!(card.pack_id, PackId::new("p1"));
        assert_eq!(card.updated_date().to_string(), "2022-03-09");
        assert_eq!(card.rating(), 4);
        assert!(card.is_owned_by(&UserId::new("u1")));
        assert!(!card.is_owned_by(&UserId::new("u2")));
        Ok(())
    }

    #[test]
    fn test_parse_error() {
        let err = CardList::from_json("{\"cards\": 3}").unwrap_err();
        assert!(err.to_string().starts_with("error: JSON error:"));
    }

    #[test]
    fn test_rating() {
        assert_eq!(rating(0.0), 0);
        assert_eq!(rating(2.49), 2);
        assert_eq!(rating(2.5), 3);
        assert_eq!(rating(4.9), 5);
        assert_eq!(rating(7.0), 5);
        assert_eq!(rating(-1.0), 0);
        assert_eq!(rating(f64::NAN), 0);
    }
}
