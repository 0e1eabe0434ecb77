//! Word lists the generator samples from.

use rand::Rng;

pub const CONTROLLERS: &[&str] = &[
    "Home", "Account", "Product", "Cart", "Checkout", "Order", "Search", "Admin",
];

pub const ACTIONS: &[&str] = &[
    "Index", "Details", "Edit", "Create", "Delete", "List", "Login", "Logout",
];

pub const METHODS: &[&str] = &["GET", "GET", "GET", "POST", "POST", "PUT", "DELETE"];

/// Status codes, weighted towards success.
pub const STATUS_CODES: &[u16] = &[200, 200, 200, 200, 200, 200, 302, 304, 404, 500];

/// Made-up user accounts.
pub const USERS: &[(&str, &str)] = &[
    ("1", "Test User One"),
    ("2", "Sample Shopper"),
    ("3", "Demo Admin"),
    ("4", "Guest Tester"),
    ("5", "Fake Customer"),
    ("6", "Example Editor"),
];

pub const TABLES: &[&str] = &["Products", "Orders", "Customers", "Carts", "Sessions"];

pub const LOG_LINES: &[&str] = &[
    "Cache miss for key",
    "Resolved view",
    "Validation passed",
    "Retrying connection",
    "Loaded configuration section",
];

/// Pick a random entry from a non-empty list.
pub fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_users_are_unique_placeholders() {
        let ids: HashSet<&str> = USERS.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), USERS.len());

        let words = ["Test", "Sample", "Demo", "Guest", "Fake", "Example"];
        for (_, name) in USERS {
            assert!(words.iter().any(|w| name.starts_with(w)), "{} is not a placeholder", name);
        }
    }

    #[test]
    fn test_pick_stays_in_list() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(TABLES.contains(pick(&mut rng, TABLES)));
        }
    }
}
