//! The category catalog.
//!
//! Categories are a fixed, process-wide, read-only table. Each one maps a
//! short key (as used in URLs and on the command line) to the subreddit the
//! upstream API serves it from.

use serde::Serialize;

/// Key of the category selected when nothing else has been chosen.
pub const DEFAULT_CATEGORY: &str = "all";

/// Upstream target used by `all` and by unknown category keys.
pub const DEFAULT_TARGET: &str = "popular";

// ============================================================================
// Category
// ============================================================================

/// A named grouping mapping to one upstream content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    /// Short lowercase key (e.g. `technology`).
    pub key: &'static str,
    /// Human readable name.
    pub display_name: &'static str,
    /// Subreddit the category is served from.
    pub subreddit: &'static str,
    /// One-line description.
    pub description: &'static str,
}

const fn category(
    key: &'static str,
    display_name: &'static str,
    subreddit: &'static str,
    description: &'static str,
) -> Category {
    Category {
        key,
        display_name,
        subreddit,
        description,
    }
}

static CATALOG: [Category; 15] = [
    category("all", "All Posts", DEFAULT_TARGET, "All popular posts"),
    category("technology", "Technology", "technology", "Tech news and discussions"),
    category("programming", "Programming", "programming", "Programming and coding"),
    category("gaming", "Gaming", "gaming", "Video games and gaming culture"),
    category("science", "Science", "science", "Scientific discoveries and research"),
    category("news", "News", "news", "Current events and world news"),
    category("entertainment", "Entertainment", "entertainment", "Movies, TV, and entertainment"),
    category("sports", "Sports", "sports", "Sports news and discussions"),
    category("food", "Food", "food", "Cooking, recipes, and food culture"),
    category("travel", "Travel", "travel", "Travel tips and destinations"),
    category("fitness", "Fitness", "fitness", "Health and fitness discussions"),
    category("books", "Books", "books", "Book recommendations and discussions"),
    category("music", "Music", "music", "Music news and discussions"),
    category("art", "Art", "art", "Artwork and creative content"),
    category("photography", "Photography", "photography", "Photography and images"),
];

impl Category {
    /// Returns the whole catalog in display order.
    pub fn all() -> &'static [Category] {
        &CATALOG
    }

    /// Looks up a category by key (case-insensitive).
    pub fn find(key: &str) -> Option<&'static Category> {
        CATALOG.iter().find(|c| c.key.eq_ignore_ascii_case(key))
    }

    /// Returns the default `all` category.
    pub fn default_category() -> &'static Category {
        &CATALOG[0]
    }

    /// Resolves a category key to its upstream subreddit.
    ///
    /// Unknown keys resolve to [`DEFAULT_TARGET`].
    pub fn target_for(key: &str) -> &'static str {
        Self::find(key).map_or(DEFAULT_TARGET, |c| c.subreddit)
    }

    /// Returns the display name for a key, or the key itself when unknown.
    pub fn display_name_for(key: &str) -> &str {
        Self::find(key).map_or(key, |c| c.display_name)
    }

    /// Returns true if this is the default listing.
    pub fn is_default(&self) -> bool {
        self.key == DEFAULT_CATEGORY
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keys_are_unique() {
        let mut keys: Vec<_> = Category::all().iter().map(|c| c.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Category::all().len());
    }

    #[test]
    fn test_all_maps_to_popular() {
        assert_eq!(Category::target_for("all"), "popular");
        assert!(Category::default_category().is_default());
    }

    #[test]
    fn test_unknown_key_falls_back_to_popular() {
        assert_eq!(Category::target_for("no-such-thing"), DEFAULT_TARGET);
        assert_eq!(Category::display_name_for("no-such-thing"), "no-such-thing");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let cat = Category::find("Gaming").unwrap();
        assert_eq!(cat.subreddit, "gaming");
        assert_eq!(cat.display_name, "Gaming");
    }
}
