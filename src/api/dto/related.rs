//! Query parameters for `GET /api/posts/related`.

/// Categories requested for a related-posts lookup.
///
/// Accepts repeated keys (`categories=Travel&categories=City`), the bracket
/// form some HTTP clients emit (`categories[]=Travel`), and comma-separated
/// values (`categories=Travel,City`). Blank entries are dropped and
/// duplicates keep their first position.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RelatedQuery {
    pub categories: Vec<String>,
}

impl RelatedQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut categories: Vec<String> = Vec::new();

        for (key, value) in pairs {
            if key != "categories" && key != "categories[]" {
                continue;
            }
            for category in value.split(',').map(str::trim).filter(|c| !c.is_empty()) {
                if !categories.iter().any(|c| c == category) {
                    categories.push(category.to_string());
                }
            }
        }

        Self { categories }
    }
}
