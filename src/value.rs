//! Conversions from site types into template [`Value`]s. Strings that come
//! from article sources or the project file are HTML-escaped here, since the
//! templates print values verbatim. Rendered bodies and tables of contents
//! are already HTML and pass through untouched.

use crate::article::Article;
use crate::category::Category;
use crate::date;
use crate::toc;
use gtmpl::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;
use url::Url;

/// HTML-escapes `s` into a string value.
pub fn escaped(s: &str) -> Value {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(&mut out, s);
    Value::String(out)
}

/// Wraps trusted HTML (or any text that needs no escaping) as a value.
pub fn raw(s: &str) -> Value {
    Value::String(s.to_owned())
}

pub fn url(url: &Url) -> Value {
    escaped(url.as_str())
}

pub fn option_url(opt: Option<&Url>) -> Value {
    match opt {
        Some(u) => url(u),
        None => Value::Nil,
    }
}

/// Counts are printed, never computed on, in templates.
pub fn count(n: usize) -> Value {
    Value::String(n.to_string())
}

pub fn object(entries: Vec<(&str, Value)>) -> Value {
    let m: HashMap<String, Value> = entries
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
    Value::Object(m)
}

pub fn array<T, F: Fn(T) -> Value>(items: impl IntoIterator<Item = T>, f: F) -> Value {
    Value::Array(items.into_iter().map(f).collect())
}

impl From<&Category> for Value {
    /// Converts [`Category`]s into [`Value`]s for templating.
    fn from(c: &Category) -> Value {
        category(c, false)
    }
}

/// A category as shown in navigation; `active` marks the current one.
pub fn category(c: &Category, active: bool) -> Value {
    object(vec![
        ("name", escaped(&c.name)),
        ("slug", escaped(&c.slug)),
        ("url", url(&c.url)),
        ("active", Value::Bool(active)),
    ])
}

impl Article {
    /// The fields shared by cards and full article pages.
    fn common_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("slug", escaped(&self.slug)),
            ("title", escaped(&self.title)),
            ("description", escaped(&self.description)),
            ("has_description", Value::Bool(!self.description.is_empty())),
            ("url", url(&self.url)),
            ("thumbnail", escaped(&self.thumbnail)),
            ("date", raw(&date::format_long(&self.date))),
            ("date_short", raw(&date::format_short(&self.date))),
            ("date_iso", raw(&date::format_iso(&self.date))),
            ("category", Value::from(self.primary_category())),
            ("categories", array(self.categories.iter(), Value::from)),
        ]
    }

    /// Converts an [`Article`] into the card shown on home and index pages.
    pub fn summarize(&self) -> Value {
        object(self.common_fields())
    }

    /// Converts an [`Article`] into the item of its own page, including
    /// related article cards.
    pub fn to_value(&self, related: &[&Article]) -> Value {
        let mut fields = self.common_fields();
        fields.push(("body", raw(&self.body)));
        fields.push(("toc", raw(&toc::render(&self.sections))));
        fields.push(("has_toc", Value::Bool(!self.sections.is_empty())));
        fields.push(("related", array(related.iter(), |a| a.summarize())));
        fields.push(("has_related", Value::Bool(!related.is_empty())));
        object(fields)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::catalog::test::article;

    pub(crate) fn field<'v>(value: &'v Value, key: &str) -> &'v Value {
        match value {
            Value::Object(m) => &m[key],
            _ => panic!("not an object"),
        }
    }

    pub(crate) fn text(value: &Value) -> &str {
        match value {
            Value::String(s) => s,
            _ => panic!("not a string"),
        }
    }

    pub(crate) fn flag(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            _ => panic!("not a bool"),
        }
    }

    #[test]
    fn test_escaped() {
        assert_eq!(
            "Tips &amp; Trik &lt;HTML&gt;",
            text(&escaped("Tips & Trik <HTML>"))
        );
    }

    #[test]
    fn test_summarize() {
        let mut a = article("halo-dunia", "2024-08-05", &["Web Development"]);
        a.title = String::from("Halo & Dunia");
        let value = a.summarize();
        assert_eq!("Halo &amp; Dunia", text(field(&value, "title")));
        assert_eq!("5 Agu 2024", text(field(&value, "date")));
        assert_eq!(
            "https://example.org/kategori/web-development/index.html",
            text(field(field(&value, "category"), "url"))
        );
    }

    #[test]
    fn test_to_value_keeps_body_html() {
        let a = article("halo-dunia", "2024-08-05", &["Rust"]);
        let b = article("lain", "2024-08-01", &["Rust"]);
        let value = a.to_value(&[&b]);
        assert_eq!("<p>halo-dunia</p>", text(field(&value, "body")));
        assert!(!flag(field(&value, "has_toc")));
        assert!(flag(field(&value, "has_related")));
    }
}
