//! Defines the [`Category`] type, which groups [`crate::article::Article`]s.

use std::fmt;
use std::hash::{Hash, Hasher};
use url::{ParseError, Url};

/// The category assigned to articles whose frontmatter names none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Represents an article category. Categories are identified by their slug,
/// so `Rust` and `rust` are the same category; the `slug` and `url` are
/// derived from the display name.
#[derive(Clone, Debug)]
pub struct Category {
    /// The category's display name, e.g., `Web Development`.
    pub name: String,

    /// The URL path segment for the category, e.g., `web-development`. See
    /// [`category_slug`].
    pub slug: String,

    /// The base URL for the category's index pages, with a trailing slash:
    /// `{categories_url}/{slug}/`. The slug is percent-encoded.
    pub index_url: Url,

    /// The URL for the category's first index page,
    /// `{categories_url}/{slug}/index.html`.
    pub url: Url,
}

impl Category {
    /// Creates a [`Category`] from its display name, deriving the slug and
    /// the index URLs beneath `categories_url` (which must end in a slash).
    /// Names whose slug is `.` or `..` are rejected since the slug doubles as
    /// an output directory name.
    pub fn new(name: &str, categories_url: &Url) -> Result<Category> {
        let slug = category_slug(name);
        if slug.is_empty() || slug == "." || slug == ".." {
            return Err(Error::InvalidName(name.to_owned()));
        }

        let mut index_url = categories_url.clone();
        index_url
            .path_segments_mut()
            .map_err(|()| Error::UrlParse(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(&slug)
            .push("");
        let url = index_url.join("index.html")?;
        Ok(Category {
            name: name.to_owned(),
            slug,
            index_url,
            url,
        })
    }
}

impl Hash for Category {
    /// Implements [`Hash`] for [`Category`] by delegating directly to the
    /// `slug` field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.hash(state)
    }
}

impl PartialEq for Category {
    /// Implements [`PartialEq`] and [`Eq`] for [`Category`] by delegating
    /// directly to the `slug` field.
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}
impl Eq for Category {}

/// Lower-cases `name` and replaces each run of whitespace with a single `-`.
/// Path separators become `-` as well, so `CI/CD` is `ci-cd`.
pub fn category_slug(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Splits a comma-separated category list, trimming every entry and dropping
/// empty ones and ones whose slug was already seen. Falls back to
/// [`UNCATEGORIZED`] so the result is never empty.
pub fn split_categories<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names.flat_map(|n| n.split(',')).map(str::trim) {
        let slug = category_slug(name);
        if !name.is_empty() && !out.iter().any(|seen| category_slug(seen) == slug) {
            out.push(name.to_owned());
        }
    }
    if out.is_empty() {
        out.push(UNCATEGORIZED.to_owned());
    }
    out
}

/// The result of building a [`Category`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building a [`Category`].
#[derive(Debug)]
pub enum Error {
    /// Returned when a category name can't be used as a URL path segment and
    /// directory name, e.g., `..`.
    InvalidName(String),

    /// Returned when there is a problem building the category's URLs.
    UrlParse(ParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidName(name) => write!(f, "invalid category name `{}`", name),
            Error::UrlParse(err) => write!(f, "building category URL: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidName(_) => None,
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts a [`ParseError`] into an [`Error`]. It allows us to use the
    /// `?` operator for URL joining.
    fn from(err: ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_category_slug() {
        assert_eq!("web-development", category_slug("Web Development"));
        assert_eq!("devops", category_slug("  DevOps "));
        assert_eq!("tips-and-tricks", category_slug("Tips \t and   Tricks"));
        assert_eq!("ci-cd", category_slug("CI/CD"));
        assert_eq!("a-b", category_slug("a \\ b"));
    }

    #[test]
    fn test_category_url() -> Result<()> {
        let base = Url::parse("https://example.org/kategori/")?;
        let category = Category::new("Web Development", &base)?;
        assert_eq!(
            "https://example.org/kategori/web-development/",
            category.index_url.as_str()
        );
        assert_eq!(
            "https://example.org/kategori/web-development/index.html",
            category.url.as_str()
        );
        Ok(())
    }

    #[test]
    fn test_category_url_is_percent_encoded() -> Result<()> {
        let base = Url::parse("https://example.org/kategori/")?;

        let category = Category::new("C#", &base)?;
        assert_eq!("c#", category.slug);
        assert_eq!(
            "https://example.org/kategori/c%23/index.html",
            category.url.as_str()
        );
        assert_eq!(None, category.url.fragment());

        let category = Category::new("Apa?", &base)?;
        assert_eq!(
            "https://example.org/kategori/apa%3F/index.html",
            category.url.as_str()
        );
        assert_eq!(None, category.url.query());
        Ok(())
    }

    #[test]
    fn test_invalid_category_names() -> Result<()> {
        let base = Url::parse("https://example.org/kategori/")?;
        for name in &["..", ".", "/"] {
            match Category::new(name, &base) {
                Err(Error::InvalidName(n)) => assert_eq!(*name, n),
                Err(e) => panic!("unexpected error: {}", e),
                Ok(c) => panic!("expected an error, got {}", c.url),
            }
        }
        Ok(())
    }

    #[test]
    fn test_identity_is_by_slug() -> Result<()> {
        let base = Url::parse("https://example.org/kategori/")?;
        assert_eq!(Category::new("Rust", &base)?, Category::new("rust", &base)?);
        assert_ne!(Category::new("Rust", &base)?, Category::new("Go", &base)?);
        Ok(())
    }

    #[test]
    fn test_split_categories() {
        assert_eq!(
            vec!["Rust", "Web"],
            split_categories(vec!["Rust, Web,,"].into_iter())
        );
        assert_eq!(
            vec!["Rust", "Database"],
            split_categories(vec!["Rust", " Database ", "Rust"].into_iter())
        );
        assert_eq!(
            vec!["Rust"],
            split_categories(vec!["Rust, rust,  RUST"].into_iter())
        );
    }

    #[test]
    fn test_split_categories_defaults() {
        assert_eq!(vec![UNCATEGORIZED], split_categories(vec![" , "].into_iter()));
        assert_eq!(
            vec![UNCATEGORIZED],
            split_categories(Vec::<&str>::new().into_iter())
        );
    }
}
