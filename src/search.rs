//! Writes `search.json`, the index `site.js` filters as the reader types.
//! The browser applies the same rule as [`crate::catalog::matches`].

use crate::article::Article;
use crate::date;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize, Debug, PartialEq)]
pub struct SearchEntry<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub thumbnail: &'a str,
    pub date: String,
    pub category: &'a str,
}

impl<'a> From<&'a Article> for SearchEntry<'a> {
    fn from(article: &'a Article) -> SearchEntry<'a> {
        SearchEntry {
            slug: &article.slug,
            title: &article.title,
            description: &article.description,
            url: article.url.as_str(),
            thumbnail: &article.thumbnail,
            date: date::format_long(&article.date),
            category: &article.primary_category().name,
        }
    }
}

/// Serializes one entry per article, in catalog order.
pub fn write_search_index<W: Write>(articles: &[Article], w: W) -> serde_json::Result<()> {
    let entries: Vec<SearchEntry> = articles.iter().map(SearchEntry::from).collect();
    serde_json::to_writer(w, &entries)
}
