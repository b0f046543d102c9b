//! Balance attribution from the caller's point of view.
//!
//! A balance row involves the caller when either identity field on the
//! relevant user sub-record equals the caller's email. The backend fills
//! `username` and `email` inconsistently (some rows carry the address in
//! one field, some in the other), so both are checked with exact string
//! equality. No normalization and no case folding: the provider reports
//! addresses verbatim and the backend stores them verbatim.

use api_types::balance::Balance;
use api_types::user::User;

/// Balances partitioned into what the caller owes and what is owed to the
/// caller, each preserving the input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalanceSplit {
    pub i_owe: Vec<Balance>,
    pub owed_to_me: Vec<Balance>,
}

/// Returns `true` when either identity field equals the caller's email.
///
/// Open question tracked with the backend owners: which of the two fields
/// is canonical. Until that settles, both stay checked.
#[must_use]
pub fn matches_identity(user: &User, email: &str) -> bool {
    user.username == email || user.email == email
}

/// Partitions `balances` by the caller's identity, preserving input order.
///
/// `from_user` match wins over `to_user` match, so the two partitions are
/// disjoint even on malformed rows where both sides name the caller. Rows
/// involving neither side belong to other group members and are dropped.
#[must_use]
pub fn split_balances(balances: Vec<Balance>, caller_email: &str) -> BalanceSplit {
    let mut split = BalanceSplit::default();

    for balance in balances {
        if matches_identity(&balance.from_user, caller_email) {
            tracing::debug!(
                balance = balance.id,
                amount = %balance.amount,
                "caller {caller_email} owes {}",
                balance.to_user.username
            );
            split.i_owe.push(balance);
        } else if matches_identity(&balance.to_user, caller_email) {
            tracing::debug!(
                balance = balance.id,
                amount = %balance.amount,
                "{} owes caller {caller_email}",
                balance.from_user.username
            );
            split.owed_to_me.push(balance);
        } else {
            tracing::debug!(
                balance = balance.id,
                "balance does not involve {caller_email}, skipping"
            );
        }
    }

    split
}

#[cfg(test)]
mod tests {
    use api_types::Amount;

    use super::*;

    fn user(id: i64, username: &str, email: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    fn balance(id: i64, from: User, to: User, cents: i64) -> Balance {
        Balance {
            id,
            from_user: from,
            to_user: to,
            amount: Amount::from_cents(cents),
        }
    }

    #[test]
    fn matches_either_identity_field() {
        let by_username = user(1, "a@example.com", "uid-1");
        let by_email = user(2, "uid-2", "a@example.com");
        let neither = user(3, "uid-3", "b@example.com");

        assert!(matches_identity(&by_username, "a@example.com"));
        assert!(matches_identity(&by_email, "a@example.com"));
        assert!(!matches_identity(&neither, "a@example.com"));
    }

    #[test]
    fn matching_is_exact() {
        let u = user(1, "A@Example.com", "");
        assert!(!matches_identity(&u, "a@example.com"));
    }

    #[test]
    fn splits_into_disjoint_partitions() {
        let alice = || user(1, "alice@example.com", "alice@example.com");
        let bob = || user(2, "bob@example.com", "bob@example.com");
        let carol = || user(3, "carol@example.com", "carol@example.com");

        let balances = vec![
            balance(10, alice(), bob(), 1000),
            balance(11, bob(), alice(), 500),
            balance(12, bob(), carol(), 700),
        ];

        let split = split_balances(balances, "alice@example.com");

        assert_eq!(split.i_owe.len(), 1);
        assert_eq!(split.i_owe[0].id, 10);
        assert_eq!(split.owed_to_me.len(), 1);
        assert_eq!(split.owed_to_me[0].id, 11);

        let i_owe_ids: Vec<i64> = split.i_owe.iter().map(|b| b.id).collect();
        for b in &split.owed_to_me {
            assert!(!i_owe_ids.contains(&b.id));
        }
    }

    #[test]
    fn preserves_input_order() {
        let alice = || user(1, "alice@example.com", "");
        let bob = || user(2, "bob@example.com", "");

        let balances = vec![
            balance(3, alice(), bob(), 100),
            balance(1, alice(), bob(), 200),
            balance(2, alice(), bob(), 300),
        ];

        let split = split_balances(balances, "alice@example.com");
        let ids: Vec<i64> = split.i_owe.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn string_and_numeric_amounts_partition_the_same() {
        // Mirrors the backend's mixed encoding: one amount a string, one a
        // number. Caller A owes B 10.00 and is owed 5 by B.
        let raw = r#"[
            {"id": 1,
             "from_user": {"id": 1, "username": "a@example.com", "email": "a@example.com"},
             "to_user": {"id": 2, "username": "b@example.com", "email": "b@example.com"},
             "amount": "10.00"},
            {"id": 2,
             "from_user": {"id": 2, "username": "b@example.com", "email": "b@example.com"},
             "to_user": {"id": 1, "username": "a@example.com", "email": "a@example.com"},
             "amount": 5}
        ]"#;
        let balances: Vec<Balance> = serde_json::from_str(raw).unwrap();

        let split = split_balances(balances, "a@example.com");

        assert_eq!(split.i_owe.len(), 1);
        assert_eq!(split.i_owe[0].to_user.id, 2);
        assert_eq!(split.i_owe[0].amount, Amount::from_cents(1000));
        assert_eq!(split.owed_to_me.len(), 1);
        assert_eq!(split.owed_to_me[0].from_user.id, 2);
        assert_eq!(split.owed_to_me[0].amount, Amount::from_cents(500));
    }

    #[test]
    fn unrelated_balances_are_dropped() {
        let bob = || user(2, "bob@example.com", "");
        let carol = || user(3, "carol@example.com", "");

        let split = split_balances(vec![balance(1, bob(), carol(), 100)], "alice@example.com");
        assert!(split.i_owe.is_empty());
        assert!(split.owed_to_me.is_empty());
    }
}
