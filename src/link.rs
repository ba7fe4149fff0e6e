//! Rewrites link and image targets found in article bodies. Authors link to
//! other articles by their source file (`other.md`); the published site
//! serves them as `other.html` beneath the articles URL. Root-relative
//! targets (`/images/a.png`) are relative to the site root, which may itself
//! have a path.

use url::{ParseError, Url};

const MARKDOWN_EXTENSION: &str = ".md";
const HTML_EXTENSION: &str = ".html";

pub struct Converter<'a> {
    site_root: &'a Url,
    articles_root: &'a Url,
    base: Url,
}

impl<'a> Converter<'a> {
    /// Constructs a new `Converter`
    ///
    /// # Arguments
    ///
    /// * `site_root` - the URL of the home page, with a trailing slash.
    /// * `articles_root` - the URL prefix for articles. This should end in a
    ///   trailing slash.
    /// * `base` - the path relative to `articles_root` of the page the links
    ///   appear on (e.g., `intro.html`).
    pub fn new(site_root: &'a Url, articles_root: &'a Url, base: &str) -> Result<Converter<'a>> {
        Ok(Converter {
            site_root,
            articles_root,
            base: articles_root.join(base)?,
        })
    }

    fn convert_absolute(&self, mut absolute: Url) -> Url {
        let is_article_source = absolute.origin() == self.articles_root.origin()
            && absolute.path().starts_with(self.articles_root.path())
            && absolute.path().ends_with(MARKDOWN_EXTENSION);
        if is_article_source {
            let path = format!(
                "{}{}",
                absolute.path().trim_end_matches(MARKDOWN_EXTENSION),
                HTML_EXTENSION
            );
            absolute.set_path(&path);
        }
        absolute
    }

    /// Converts a link target. Fragment-only links (`#usage`) are returned
    /// unchanged so they keep pointing into the current page.
    pub fn convert(&self, url: &str) -> Result<String> {
        if url.starts_with('#') {
            return Ok(url.to_owned());
        }
        let absolute = match Url::parse(url) {
            Ok(absolute) => absolute,
            Err(ParseError::RelativeUrlWithoutBase) => match is_root_relative(url) {
                true => self.site_root.join(url.trim_start_matches('/'))?,
                false => self.base.join(url)?,
            },
            Err(e) => return Err(e),
        };
        Ok(self.convert_absolute(absolute).to_string())
    }
}

// `/images/a.png` but not the scheme-relative `//cdn.example/a.png`.
fn is_root_relative(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//")
}

type Result<T> = std::result::Result<T, ParseError>;
