//! Defines the [`Catalog`], the in-memory view of every article that the
//! home, article and category pages draw from.

use crate::article::Article;
use crate::category::Category;
use std::collections::HashSet;

/// The site's articles, newest first, together with their categories.
pub struct Catalog {
    articles: Vec<Article>,

    /// Unique categories in order of first appearance across `articles`.
    /// Categories whose names differ only in case or spacing share a slug
    /// and are merged under the first name seen.
    categories: Vec<Category>,
}

impl Catalog {
    /// Builds a catalog from date-ordered articles (see
    /// [`crate::article::sort_articles`]).
    pub fn new(articles: Vec<Article>) -> Catalog {
        let mut seen: HashSet<&Category> = HashSet::new();
        let mut categories = Vec::new();
        for category in articles.iter().flat_map(|a| a.categories.iter()) {
            if seen.insert(category) {
                categories.push(category.clone());
            }
        }
        Catalog {
            articles,
            categories,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The newest `count` articles.
    pub fn featured(&self, count: usize) -> &[Article] {
        &self.articles[..count.min(self.articles.len())]
    }

    /// The first `count` categories.
    pub fn popular_categories(&self, count: usize) -> &[Category] {
        &self.categories[..count.min(self.categories.len())]
    }

    /// Returns up to `limit` articles whose title or description contains
    /// `query`, ignoring case. An empty query matches every article.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Article> {
        let query = query.trim().to_lowercase();
        self.articles
            .iter()
            .filter(|a| matches(a, &query))
            .take(limit)
            .collect()
    }

    /// Whether there are more articles than a listing of `shown` displays.
    pub fn has_more(&self, shown: usize) -> bool {
        self.articles.len() > shown
    }

    /// Every article filed under the category with the given slug.
    pub fn in_category(&self, slug: &str) -> Vec<&Article> {
        self.articles.iter().filter(|a| a.in_category(slug)).collect()
    }

    /// Up to `limit` other articles sharing `article`'s primary category.
    pub fn related(&self, article: &Article, limit: usize) -> Vec<&Article> {
        let primary = article.primary_category();
        self.articles
            .iter()
            .filter(|a| a.slug != article.slug && a.primary_category() == primary)
            .take(limit)
            .collect()
    }

    /// The number of articles filed under each category, in category order.
    pub fn category_counts(&self) -> Vec<(&Category, usize)> {
        self.categories
            .iter()
            .map(|c| (c, self.in_category(&c.slug).len()))
            .collect()
    }
}

/// The search rule shared with the browser-side filter in `site.js`.
pub fn matches(article: &Article, lowercase_query: &str) -> bool {
    lowercase_query.is_empty()
        || article.title.to_lowercase().contains(lowercase_query)
        || article.description.to_lowercase().contains(lowercase_query)
}
