//! Share → schema → table listing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Three-level listing of the tables a profile can see.
///
/// Serializes as `{share: {schema: [table, ...]}}`. Shares and schemas keep
/// the order in which they were first reported; tables keep their reported
/// order inside each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MetadataTree(IndexMap<String, IndexMap<String, Vec<String>>>);

impl MetadataTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `table` to the `(share, schema)` bucket, creating it if needed.
    pub fn insert(
        &mut self,
        share: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) {
        self.0
            .entry(share.into())
            .or_default()
            .entry(schema.into())
            .or_default()
            .push(table.into());
    }

    /// Tables under `(share, schema)`, if that bucket exists.
    pub fn tables(&self, share: &str, schema: &str) -> Option<&[String]> {
        self.0
            .get(share)
            .and_then(|schemas| schemas.get(schema))
            .map(Vec::as_slice)
    }

    /// Share names in first-seen order.
    pub fn shares(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total number of leaves.
    pub fn table_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|schemas| schemas.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S, C, T> FromIterator<(S, C, T)> for MetadataTree
where
    S: Into<String>,
    C: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, C, T)>>(iter: I) -> Self {
        let mut tree = MetadataTree::new();
        for (share, schema, table) in iter {
            tree.insert(share, schema, table);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_and_keeps_first_seen_order() {
        let tree: MetadataTree = [
            ("sales", "eu", "orders"),
            ("hr", "core", "people"),
            ("sales", "us", "orders"),
            ("sales", "eu", "customers"),
            ("sales", "eu", "invoices"),
        ]
        .into_iter()
        .collect();

        assert_eq!(tree.table_count(), 5);
        assert_eq!(tree.shares().collect::<Vec<_>>(), vec!["sales", "hr"]);
        assert_eq!(
            tree.tables("sales", "eu").unwrap(),
            ["orders", "customers", "invoices"]
        );
        assert_eq!(tree.tables("sales", "us").unwrap(), ["orders"]);
        assert!(tree.tables("hr", "eu").is_none());
    }

    #[test]
    fn test_serializes_as_nested_object() {
        let tree: MetadataTree = [("s", "d", "t1"), ("s", "d", "t2")].into_iter().collect();
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, r#"{"s":{"d":["t1","t2"]}}"#);
    }

    #[test]
    fn test_empty_tree_is_empty_object() {
        let tree = MetadataTree::new();
        assert!(tree.is_empty());
        assert_eq!(serde_json::to_string(&tree).unwrap(), "{}");
    }
}
