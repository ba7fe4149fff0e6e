//! Defines the [`Article`], [`Parser`], and [`Error`] types. Also defines the
//! logic for reading articles from the content directory into memory.

use std::{
    fmt,
    fs::{read_dir, File},
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use serde::Deserialize;
use url::Url;

use crate::{category, category::Category, date, markdown, toc, toc::Section};

/// The thumbnail shown for articles whose frontmatter names none.
pub const DEFAULT_THUMBNAIL: &str = "/images/default-thumbnail.png";

const MARKDOWN_EXTENSION: &str = ".md";

/// Marks the end of an article's summary in its body.
const FOLD_TAG: &str = "<!-- more -->";

/// An article parsed from a source file and rendered to HTML.
#[derive(Clone, Debug)]
pub struct Article {
    /// The source file name less its extension. Unique within a site.
    pub slug: String,
    pub title: String,

    /// Never empty. The first entry is the article's primary category.
    pub categories: Vec<Category>,
    pub description: String,

    /// The absolute thumbnail URL.
    pub thumbnail: String,
    pub date: NaiveDateTime,

    /// The rendered HTML body.
    pub body: String,

    /// The table of contents built from the body's `##` and `###` headings.
    pub sections: Vec<Section>,
    pub url: Url,

    /// The target location on disk for the article page.
    pub file_path: PathBuf,
}

impl Article {
    /// The first category, which drives breadcrumbs and related articles.
    pub fn primary_category(&self) -> &Category {
        // `categories` is never empty; see `category::split_categories`.
        &self.categories[0]
    }

    /// Returns the body up to the fold tag (`<!-- more -->`) and whether the
    /// fold tag was present.
    pub fn summary(&self) -> (&str, bool) {
        match self.body.find(FOLD_TAG) {
            Some(i) => (&self.body[..i], true),
            None => (&self.body, false),
        }
    }

    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c.slug == slug)
    }
}

/// Parses [`Article`] objects from source files.
pub struct Parser<'a> {
    /// `site_root` is the base URL for the site. Root-relative thumbnail
    /// paths are resolved against it.
    site_root: &'a Url,

    /// `articles_url` is the base URL for article pages (i.e., the URL for an
    /// article is `{articles_url}/{slug}.html`).
    articles_url: &'a Url,

    /// `categories_url` is the base URL for category index pages.
    categories_url: &'a Url,

    /// `articles_directory` is the directory in which article pages will be
    /// rendered.
    articles_directory: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(
        site_root: &'a Url,
        articles_url: &'a Url,
        categories_url: &'a Url,
        articles_directory: &'a Path,
    ) -> Parser<'a> {
        Parser {
            site_root,
            articles_url,
            categories_url,
            articles_directory,
        }
    }

    /// Parses a single [`Article`] from its source file. The slug is the file
    /// name less the `.md` extension.
    pub fn parse_article(&self, path: &Path) -> Result<Article> {
        match self._parse_article(path) {
            Ok(a) => Ok(a),
            Err(e) => Err(Error::Annotated(
                format!("parsing article `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_article(&self, path: &Path) -> Result<Article> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let (frontmatter, body) = split_frontmatter(&contents)?;

        let slug = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.trim_end_matches(MARKDOWN_EXTENSION))
            .ok_or_else(|| InvalidFileNameError(path.to_owned()))?
            .to_owned();
        let file_name = format!("{}.html", slug);
        let url = self.articles_url.join(&file_name)?;

        let document = markdown::to_html(
            self.site_root,
            self.articles_url,
            &file_name,
            body,
            url.as_str(),
        )?;

        let categories = category::split_categories(frontmatter.category_names())
            .iter()
            .map(|name| Category::new(name, self.categories_url))
            .collect::<category::Result<Vec<Category>>>()?;

        Ok(Article {
            title: frontmatter
                .title
                .or(document.title)
                .unwrap_or_else(|| slug.replace('-', " ")),
            categories,
            description: frontmatter.description.unwrap_or_default(),
            thumbnail: self
                .site_root
                .join(
                    frontmatter
                        .thumbnail
                        .as_deref()
                        .unwrap_or(DEFAULT_THUMBNAIL)
                        .trim_start_matches('/'),
                )?
                .to_string(),
            date: date::parse(frontmatter.date.as_deref().unwrap_or(date::DEFAULT_DATE))?,
            body: document.body,
            sections: toc::sections(&document.headings),
            file_path: self.articles_directory.join(&file_name),
            url,
            slug,
        })
    }

    /// Searches a provided `source_directory` for article files (extension =
    /// `.md`) and returns a list of [`Article`] objects sorted by date (most
    /// recent first, ties broken by slug). Each article file is structured
    /// as follows:
    ///
    /// 1. Optional YAML frontmatter between `---` fences with any of the
    ///    fields `title`, `categories`, `description`, `thumbnail`, `date`
    /// 2. Article body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Halo, dunia!
    /// categories: Rust, Web Development
    /// date: 2024-04-16
    /// ---
    /// Isi artikel.
    /// ```
    pub fn parse_articles(&self, source_directory: &Path) -> Result<Vec<Article>> {
        let mut articles = Vec::new();
        for result in read_dir(source_directory)? {
            let entry = result?;
            let is_markdown = entry.file_type()?.is_file()
                && entry.file_name().to_string_lossy().ends_with(MARKDOWN_EXTENSION);
            if is_markdown {
                log::debug!("parsing article {}", entry.path().display());
                articles.push(self.parse_article(&entry.path())?);
            }
        }

        sort_articles(&mut articles);
        Ok(articles)
    }
}

/// Orders articles newest first; equal dates are ordered by slug.
pub fn sort_articles(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

// Splits a source file into its frontmatter and body. Files whose first line
// isn't a fence have no frontmatter. Fences are lines holding exactly `---`.
fn split_frontmatter(input: &str) -> Result<(Frontmatter, &str)> {
    let mut lines = input.split_inclusive('\n');
    let yaml_start = match lines.next() {
        Some(first) if is_fence(first) => first.len(),
        _ => return Ok((Frontmatter::default(), input)),
    };

    let mut yaml_stop = yaml_start;
    for line in lines {
        if is_fence(line) {
            let yaml = &input[yaml_start..yaml_stop];
            let frontmatter = match yaml.trim().is_empty() {
                true => Frontmatter::default(),
                false => serde_yaml::from_str(yaml)?,
            };
            return Ok((frontmatter, &input[yaml_stop + line.len()..]));
        }
        yaml_stop += line.len();
    }
    Err(Error::FrontmatterMissingEndFence)
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(|c| c == '\n' || c == '\r') == "---"
}

#[derive(Deserialize, Default)]
struct Frontmatter {
    /// The title of the article.
    #[serde(default)]
    title: Option<String>,

    /// The categories of the article, either a comma-separated string or a
    /// list.
    #[serde(default, alias = "category")]
    categories: Option<CategoryList>,

    #[serde(default)]
    description: Option<String>,

    /// A root-relative path or an absolute URL.
    #[serde(default)]
    thumbnail: Option<String>,

    #[serde(default)]
    date: Option<String>,
}

impl Frontmatter {
    fn category_names(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match &self.categories {
            None => &[],
            Some(CategoryList::One(name)) => std::slice::from_ref(name),
            Some(CategoryList::Many(names)) => names,
        };
        names.iter().map(String::as_str)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryList {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of an [`Article`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing an [`Article`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file opens a frontmatter fence (`---`) but
    /// never closes it.
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the frontmatter date isn't in a supported format.
    Date(chrono::ParseError),

    /// Returned when there is a problem parsing URLs.
    UrlParse(url::ParseError),

    /// Returned when a category name can't be turned into a category page.
    Category(category::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Date(err) => write!(f, "invalid date: {}", err),
            Error::UrlParse(err) => err.fmt(f),
            Error::Category(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Date(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Category(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<markdown::Error> for Error {
    fn from(err: markdown::Error) -> Error {
        match err {
            markdown::Error::UrlParse(e) => Error::UrlParse(e),
        }
    }
}

impl From<category::Error> for Error {
    fn from(err: category::Error) -> Error {
        Error::Category(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts a [`chrono::ParseError`] into an [`Error`]. It allows us to
    /// use the `?` operator for date parsing.
    fn from(err: chrono::ParseError) -> Error {
        Error::Date(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Fixture {
        site_root: Url,
        articles_url: Url,
        categories_url: Url,
    }

    impl Fixture {
        fn new() -> std::result::Result<Fixture, url::ParseError> {
            let site_root = Url::parse("https://example.org/")?;
            Ok(Fixture {
                articles_url: site_root.join("artikel/")?,
                categories_url: site_root.join("kategori/")?,
                site_root,
            })
        }

        fn parser(&self) -> Parser {
            Parser::new(
                &self.site_root,
                &self.articles_url,
                &self.categories_url,
                Path::new("/tmp/out/artikel"),
            )
        }
    }

    #[test]
    fn test_parse_articles() -> Result<()> {
        let fixture = Fixture::new()?;
        let articles = fixture.parser().parse_articles(Path::new("./testdata/content/"))?;

        let slugs: Vec<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(
            vec![
                "mengenal-rust",
                "query-postgres",
                "deploy-docker",
                "catatan-tanpa-judul",
            ],
            slugs
        );

        let rust = &articles[0];
        assert_eq!("Mengenal Rust", rust.title);
        assert_eq!(
            vec!["Programming", "Web Development"],
            rust.categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
        assert_eq!(
            "https://example.org/kategori/web-development/index.html",
            rust.categories[1].url.as_str()
        );
        assert_eq!("https://example.org/artikel/mengenal-rust.html", rust.url.as_str());
        assert_eq!(
            PathBuf::from("/tmp/out/artikel/mengenal-rust.html"),
            rust.file_path
        );
        assert_eq!("https://example.org/images/rust.png", rust.thumbnail);
        assert_eq!(2, rust.sections.len());
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let fixture = Fixture::new()?;
        let article = fixture
            .parser()
            .parse_article(Path::new("./testdata/content/catatan-tanpa-judul.md"))?;

        assert_eq!("catatan tanpa judul", article.title);
        assert_eq!(category::UNCATEGORIZED, article.primary_category().name);
        assert_eq!("", article.description);
        assert_eq!(
            "https://example.org/images/default-thumbnail.png",
            article.thumbnail
        );
        assert_eq!(date::parse(date::DEFAULT_DATE)?, article.date);
        Ok(())
    }

    #[test]
    fn test_split_frontmatter() -> Result<()> {
        let (frontmatter, body) =
            split_frontmatter("---\ntitle: A\ncategory: DevOps\n---\nbody\n")?;
        assert_eq!(Some("A".to_owned()), frontmatter.title);
        assert_eq!(vec!["DevOps"], frontmatter.category_names().collect::<Vec<_>>());
        assert_eq!("body\n", body);

        let (frontmatter, body) = split_frontmatter("no fences here")?;
        assert!(frontmatter.title.is_none());
        assert_eq!("no fences here", body);
        Ok(())
    }

    #[test]
    fn test_split_frontmatter_list() -> Result<()> {
        let (frontmatter, _) =
            split_frontmatter("---\ncategories: [Rust, Database]\n---\n")?;
        assert_eq!(
            vec!["Rust", "Database"],
            frontmatter.category_names().collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_fences_are_whole_lines() -> Result<()> {
        let (frontmatter, body) = split_frontmatter("---\r\ntitle: A\r\n---\r\nbody")?;
        assert_eq!(Some("A".to_owned()), frontmatter.title);
        assert_eq!("body", body);

        // a longer rule is a thematic break, not a fence
        let (frontmatter, body) = split_frontmatter("----\nIsi\n")?;
        assert!(frontmatter.title.is_none());
        assert_eq!("----\nIsi\n", body);

        let (frontmatter, body) = split_frontmatter("---\ntitle: A\n---")?;
        assert_eq!(Some("A".to_owned()), frontmatter.title);
        assert_eq!("", body);

        match split_frontmatter("---\ntitle: A\n----\n---foo\nbody") {
            Err(Error::FrontmatterMissingEndFence) => {}
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an error"),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_category_names_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("aneh.md");
        std::fs::write(&path, "---\ncategories: Rust, ..\n---\nIsi\n")?;

        let fixture = Fixture::new()?;
        let err = match fixture.parser().parse_article(&path) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert!(err.to_string().contains("aneh.md"));
        assert!(err.to_string().contains("invalid category name `..`"));
        Ok(())
    }

    #[test]
    fn test_missing_end_fence() {
        match split_frontmatter("---\ntitle: A\nbody") {
            Err(Error::FrontmatterMissingEndFence) => {}
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_invalid_date_names_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("rusak.md");
        std::fs::write(&path, "---\ndate: kemarin\n---\nIsi\n")?;

        let fixture = Fixture::new()?;
        let err = match fixture.parser().parse_article(&path) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert!(err.to_string().contains("rusak.md"));
        assert!(err.to_string().contains("invalid date"));
        Ok(())
    }
}
