//! Typed wire contract with the expense-splitting backend.
//!
//! Entity structs mirror what the server serializes; write payloads are
//! separate types so read-only fields (ids, authorship, timestamps) never
//! leak into request bodies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

mod amount;

pub use amount::{Amount, AmountParseError};

pub mod user {
    use super::*;

    /// Identity record as the backend serializes it.
    ///
    /// `username` and `email` may independently hold the address the
    /// identity provider reported for the account; neither field is
    /// canonical, so callers matching "the current user" must check both.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: i64,
        pub username: String,
        #[serde(default)]
        pub email: String,
        #[serde(default)]
        pub first_name: String,
        #[serde(default)]
        pub last_name: String,
    }

    impl User {
        /// Full name for display, falling back to the username when the
        /// profile carries no name fields.
        #[must_use]
        pub fn display_name(&self) -> String {
            let full = format!("{} {}", self.first_name, self.last_name);
            let full = full.trim();
            if full.is_empty() {
                self.username.clone()
            } else {
                full.to_string()
            }
        }
    }
}

pub mod group {
    use super::*;
    use crate::user::User;

    /// A group of users sharing expenses. Membership is implicit in
    /// `members`; the server maintains it.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Group {
        pub id: i64,
        pub name: String,
        #[serde(default)]
        pub description: String,
        pub created_by: User,
        pub created_at: DateTime<Utc>,
        #[serde(default)]
        pub members: Vec<User>,
    }

    /// Request body for `POST /groups/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: String,
    }

    /// Request body for `PUT /groups/{id}/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupUpdate {
        pub name: String,
        pub description: String,
    }

    /// Request body for `POST /groups/{id}/add_member/` (invite by email).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub email: String,
    }
}

pub mod instance {
    use super::*;
    use crate::{item::Item, user::User};

    /// A recorded shared-expense event ("shopping trip").
    ///
    /// `group` is the owning group's id; the server embeds the full item
    /// list on reads.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Instance {
        pub id: i64,
        pub name: String,
        pub date: NaiveDate,
        #[serde(default)]
        pub description: String,
        pub group: i64,
        pub created_by: User,
        pub created_at: DateTime<Utc>,
        #[serde(default)]
        pub items: Vec<Item>,
    }

    /// Request body for `POST /instances/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InstanceNew {
        pub name: String,
        pub date: NaiveDate,
        pub description: String,
        pub group: i64,
    }

    /// Request body for `PUT /instances/{id}/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InstanceUpdate {
        pub name: String,
        pub date: NaiveDate,
        pub description: String,
        pub group: i64,
    }
}

pub mod item {
    use super::*;
    use crate::user::User;

    /// One purchased line within an instance, attributed across a subset
    /// of the group's members.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Item {
        pub id: i64,
        pub name: String,
        pub price: Amount,
        pub created_by: User,
        pub created_at: DateTime<Utc>,
        /// Read side: attribution rows with the per-user share the server
        /// computed. The write side sends plain user ids instead.
        #[serde(default)]
        pub shared_with: Vec<ItemShare>,
        pub instance: i64,
    }

    /// One user's share of an item (equal split, server-computed).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ItemShare {
        pub id: i64,
        pub user: User,
        pub amount: Amount,
    }

    /// Request body for `POST /items/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemNew {
        pub name: String,
        pub price: Amount,
        pub instance: i64,
        /// User ids the item is shared with.
        pub shared_with: Vec<i64>,
    }

    /// Request body for `PUT /items/{id}/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemUpdate {
        pub name: String,
        pub price: Amount,
        pub instance: i64,
        pub shared_with: Vec<i64>,
    }
}

pub mod balance {
    use super::*;
    use crate::user::User;

    /// Server-computed net amount one user owes another.
    ///
    /// Read-only: the client never constructs or mutates balances. The
    /// server guarantees `from_user != to_user` and a non-negative amount
    /// in the direction the two fields encode.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Balance {
        pub id: i64,
        pub from_user: User,
        pub to_user: User,
        pub amount: Amount,
    }
}
