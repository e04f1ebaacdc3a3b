//! Default category tree.
//!
//! `supabase/seed.sql` installs a trigger that creates these categories for
//! every new user. The list here is the reference the integration tests
//! compare the trigger's output against.

use serde::Serialize;

/// One starter category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategorySeed {
    /// Category name, unique within a user's defaults.
    pub name: &'static str,
    /// Parent category name, `None` for roots.
    pub parent: Option<&'static str>,
}

const fn root(name: &'static str) -> CategorySeed {
    CategorySeed { name, parent: None }
}

const fn child(name: &'static str, parent: &'static str) -> CategorySeed {
    CategorySeed {
        name,
        parent: Some(parent),
    }
}

/// Categories created for a new user. Parents precede their children.
pub static DEFAULT_CATEGORIES: [CategorySeed; 14] = [
    // Income
    root("Income"),
    child("Salary", "Income"),
    child("Freelance", "Income"),
    child("Investments", "Income"),
    // Expenses
    root("Housing"),
    child("Rent/Mortgage", "Housing"),
    child("Utilities", "Housing"),
    root("Transportation"),
    root("Food & Dining"),
    root("Shopping"),
    root("Entertainment"),
    root("Healthcare"),
    root("Education"),
    root("Other"),
];

/// Root categories, in seed order.
pub fn roots() -> impl Iterator<Item = &'static CategorySeed> {
    DEFAULT_CATEGORIES.iter().filter(|c| c.parent.is_none())
}

/// Children of `parent`, in seed order.
pub fn children_of(parent: &str) -> impl Iterator<Item = &'static CategorySeed> + '_ {
    DEFAULT_CATEGORIES
        .iter()
        .filter(move |c| c.parent == Some(parent))
}
