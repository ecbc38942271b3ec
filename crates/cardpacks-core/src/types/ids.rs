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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier the card service assigns to a card.
    CardId
);

string_id!(
    /// Identifier of the pack a card belongs to.
    PackId
);

string_id!(
    /// Identifier of a user account.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_transparent() {
        let id = CardId::new("62a1f0");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"62a1f0\"");
        let back: CardId = serde_json::from_str("\"62a1f0\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(UserId::from("u1").to_string(), "u1");
        assert_eq!(PackId::new("p1").as_str(), "p1");
    }
}
