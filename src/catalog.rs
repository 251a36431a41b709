//! In-memory document catalog backing the read-only browse endpoints.
//!
//! Mirrors the shape of the upstream data source: a set of named tables whose
//! rows are free-form JSON objects, each carrying the source document's title
//! in a `pdf_title` or `pdf_name` column (either spelling). Tables are seeded
//! from a directory of JSON files, one array of rows per file, with the file
//! stem as the table name.

use crate::article::{Article, RawArticle};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct Table {
    name: String,
    rows: Vec<Value>,
}

/// Catalog of article tables, safe to clone into handlers.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<Vec<Table>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` table file from the given directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            anyhow::bail!("Data directory does not exist: {:?}", dir);
        }

        let store = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.extension().map(|e| e == "json").unwrap_or(false) {
                continue;
            }

            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read table file: {:?}", path))?;
            let rows: Vec<Value> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse table file: {:?}", path))?;
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("table")
                .to_string();

            info!("Loaded table '{}' ({} rows) from {:?}", name, rows.len(), path);
            store.insert_table(&name, rows);
        }

        Ok(store)
    }

    /// Insert a table, replacing any existing one with the same name.
    pub fn insert_table(&self, name: &str, rows: Vec<Value>) {
        let mut tables = self.inner.write().unwrap();
        if let Some(existing) = tables.iter_mut().find(|t| t.name == name) {
            existing.rows = rows;
        } else {
            tables.push(Table {
                name: name.to_string(),
                rows,
            });
        }
    }

    pub fn table_count(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Distinct document titles across all tables, sorted.
    pub fn pdf_names(&self) -> Vec<String> {
        let tables = self.inner.read().unwrap();
        let mut names = BTreeSet::new();
        for table in tables.iter() {
            for row in &table.rows {
                if let Some(title) = row_title(row) {
                    names.insert(title);
                }
            }
        }
        names.into_iter().collect()
    }

    /// Rows of the first table carrying the given document title, together
    /// with that table's name.
    pub fn pdf_data(&self, title: &str) -> Option<(String, Vec<Value>)> {
        let tables = self.inner.read().unwrap();
        for table in tables.iter() {
            let rows: Vec<Value> = table
                .rows
                .iter()
                .filter(|row| row_title(row).as_deref() == Some(title))
                .cloned()
                .collect();
            if !rows.is_empty() {
                return Some((table.name.clone(), rows));
            }
        }
        None
    }

    /// Every row of every table, normalized into the internal article shape.
    /// Rows that do not deserialize as articles are skipped.
    pub fn all_articles(&self) -> Vec<Article> {
        let tables = self.inner.read().unwrap();
        let mut articles = Vec::new();
        for table in tables.iter() {
            for row in &table.rows {
                match serde_json::from_value::<RawArticle>(row.clone()) {
                    Ok(raw) => articles.push(raw.normalize()),
                    Err(e) => debug!("Skipping non-article row in '{}': {}", table.name, e),
                }
            }
        }
        articles
    }
}

/// Document title of a row, checking both column names and both spellings.
fn row_title(row: &Value) -> Option<String> {
    let value = row
        .get("pdf_title")
        .or_else(|| row.get("pdfTitle"))
        .or_else(|| row.get("pdf_name"))
        .or_else(|| row.get("pdfName"))?;
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> CatalogStore {
        let store = CatalogStore::new();
        store.insert_table(
            "ucp_articles",
            vec![
                json!({"pdf_title": "UCP 600", "pdf_name": "UCP600.pdf", "article_number": "1"}),
                json!({"pdf_title": "UCP 600", "pdf_name": "UCP600.pdf", "article_number": "2"}),
            ],
        );
        store.insert_table(
            "isbp_articles",
            vec![json!({"pdfTitle": "ISBP 745", "pdfName": "ISBP745.pdf", "articleNumber": 1})],
        );
        store
    }

    #[test]
    fn test_pdf_names_dedup_and_sort() {
        let names = seeded().pdf_names();
        assert_eq!(names, vec!["ISBP 745", "UCP 600"]);
    }

    #[test]
    fn test_pdf_data_returns_first_matching_table() {
        let (table, rows) = seeded().pdf_data("UCP 600").unwrap();
        assert_eq!(table, "ucp_articles");
        assert_eq!(rows.len(), 2);

        assert!(seeded().pdf_data("No Such Document").is_none());
    }

    #[test]
    fn test_all_articles_normalizes_both_spellings() {
        let articles = seeded().all_articles();
        assert_eq!(articles.len(), 3);
        assert!(articles.iter().any(|a| a.pdf_title == "ISBP 745"
            && a.article_number.as_deref() == Some("1")));
    }

    #[test]
    fn test_insert_table_replaces_existing() {
        let store = seeded();
        store.insert_table("ucp_articles", vec![json!({"pdf_title": "UCP 600 rev2"})]);
        assert_eq!(store.table_count(), 2);
        assert!(store.pdf_names().contains(&"UCP 600 rev2".to_string()));
        assert!(!store.pdf_names().contains(&"UCP 600".to_string()));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("trade_articles.json"),
            r#"[{"pdf_title": "URC 522", "article_number": "4"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = CatalogStore::load_from_dir(dir.path()).unwrap();
        assert_eq!(store.table_count(), 1);
        assert_eq!(store.pdf_names(), vec!["URC 522"]);

        assert!(CatalogStore::load_from_dir(&dir.path().join("missing")).is_err());
    }
}
