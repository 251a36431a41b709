//! Article records, normalization, and client-side grouping.
//!
//! Catalog rows come back with fields spelled in either camelCase or
//! snake_case depending on which backing table produced them. [`RawArticle`]
//! accepts the union of both spellings at the boundary; [`Article`] is the
//! single normalized shape used everywhere past it.

use serde::{Deserialize, Serialize};

/// Articles shown per page when browsing.
pub const ITEMS_PER_PAGE: usize = 10;

/// A field that backing tables store as either text or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl TextOrNumber {
    fn into_string(self) -> String {
        match self {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Int(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Boundary shape: every field optional, both spellings accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub id: Option<TextOrNumber>,
    #[serde(default, alias = "pdfName")]
    pub pdf_name: Option<String>,
    #[serde(default, alias = "pdfTitle")]
    pub pdf_title: Option<String>,
    #[serde(default, alias = "articleNumber")]
    pub article_number: Option<TextOrNumber>,
    #[serde(default, alias = "articleName")]
    pub article_name: Option<String>,
    #[serde(default, alias = "articleMainTitle")]
    pub article_main_title: Option<String>,
    #[serde(default, alias = "articleDescription")]
    pub article_description: Option<String>,
    #[serde(default, alias = "articlePage")]
    pub article_page: Option<TextOrNumber>,
}

impl RawArticle {
    /// Collapse the field-name union into the internal shape.
    pub fn normalize(self) -> Article {
        Article {
            id: self.id.map(TextOrNumber::into_string),
            pdf_name: self.pdf_name.unwrap_or_else(|| "Unknown Document".to_string()),
            pdf_title: self.pdf_title.unwrap_or_else(|| "Untitled".to_string()),
            article_number: self.article_number.map(TextOrNumber::into_string),
            article_name: self.article_name,
            article_main_title: self.article_main_title,
            article_description: self.article_description,
            article_page: self.article_page.map(TextOrNumber::into_string),
        }
    }
}

/// Normalized article record, serialized outward in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub pdf_name: String,
    pub pdf_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_main_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_page: Option<String>,
}

/// Articles of one document title, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct TitleGroup {
    pub pdf_title: String,
    pub articles: Vec<Article>,
}

/// All titles of one source document, in first-seen order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentGroup {
    pub pdf_name: String,
    pub titles: Vec<TitleGroup>,
}

/// Group articles by document name, then by title, preserving first-seen
/// order at both levels.
pub fn group_by_document(articles: Vec<Article>) -> Vec<DocumentGroup> {
    let mut groups: Vec<DocumentGroup> = Vec::new();

    for article in articles {
        let gi = match groups.iter().position(|g| g.pdf_name == article.pdf_name) {
            Some(i) => i,
            None => {
                groups.push(DocumentGroup {
                    pdf_name: article.pdf_name.clone(),
                    titles: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let doc = &mut groups[gi];
        let ti = match doc.titles.iter().position(|t| t.pdf_title == article.pdf_title) {
            Some(i) => i,
            None => {
                doc.titles.push(TitleGroup {
                    pdf_title: article.pdf_title.clone(),
                    articles: Vec::new(),
                });
                doc.titles.len() - 1
            }
        };

        doc.titles[ti].articles.push(article);
    }

    groups
}

/// One fixed-size page out of a list. Pages are 1-based; out-of-range pages
/// yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if per_page == 0 {
        return &items[..0];
    }
    let start = page.saturating_sub(1).saturating_mul(per_page);
    if start >= items.len() {
        return &items[..0];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

/// Number of pages needed to show `len` items.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}
