//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: parsing the articles
//! ([`crate::article`]), rendering home, article and index pages
//! ([`crate::write`]), copying the theme's static assets and the project's
//! public files, and generating the Atom feed, sitemap and search index.

use crate::article::{Error as ParseError, Parser as ArticleParser};
use crate::catalog::Catalog;
use crate::chrome::Chrome;
use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::search::write_search_index;
use crate::sitemap::{sitemap_entries, write_sitemap};
use crate::write::{Error as WriteError, Writer};
use chrono::{Datelike, Utc};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Builds the site from a [`Config`] object. This calls into
/// [`ArticleParser::parse_articles`], [`Writer::write_site`], and the feed,
/// sitemap and search writers which do the heavy-lifting. This function also
/// copies the static assets from source directories to the output directory.
pub fn build_site(config: Config) -> Result<()> {
    let parser = ArticleParser::new(
        &config.home_page,
        &config.articles_url,
        &config.categories_url,
        &config.articles_output_directory,
    );

    // collect all articles
    let catalog = Catalog::new(parser.parse_articles(&config.content_directory)?);
    log::info!(
        "Parsed {} articles in {} categories",
        catalog.articles().len(),
        catalog.categories().len()
    );

    // Parse the template files.
    let home_template = parse_template(config.home_template.iter())?;
    let article_template = parse_template(config.article_template.iter())?;
    let category_template = parse_template(config.category_template.iter())?;

    // Blow away the old output directories so we don't have any collisions.
    // The root output directory itself is left alone in case the user passed
    // the wrong directory.
    rmdir(&config.articles_output_directory)?;
    rmdir(&config.categories_output_directory)?;
    rmdir(&config.static_output_directory)?;

    // write the home, article and index pages
    let chrome = Chrome::new(&config, catalog.category_counts(), Utc::now().year());
    let writer = Writer {
        home_template: &home_template,
        article_template: &article_template,
        index_template: &category_template,
        chrome: &chrome,
        articles_url: &config.articles_url,
        root_output_directory: &config.root_output_directory,
        articles_output_directory: &config.articles_output_directory,
        categories_output_directory: &config.categories_output_directory,
        index_page_size: config.index_page_size,
        featured_count: config.featured_count,
        recent_count: config.recent_count,
        popular_category_count: config.popular_category_count,
        related_count: config.related_count,
    };
    writer.write_site(&catalog)?;

    // copy the theme's static directory, then the project's public files;
    // both are optional
    if config.static_source_directory.is_dir() {
        copy_dir(
            &config.static_source_directory,
            &config.static_output_directory,
        )?;
    }
    if config.public_directory.is_dir() {
        copy_dir(&config.public_directory, &config.root_output_directory)?;
    }

    write_search_index(
        catalog.articles(),
        File::create(config.root_output_directory.join("search.json"))?,
    )
    .map_err(Error::SearchIndex)?;

    let urls = sitemap_entries(&config.home_page, &config.articles_url, &catalog)
        .map_err(Error::Url)?;
    write_sitemap(
        &urls,
        File::create(config.root_output_directory.join("sitemap.xml"))?,
    )?;

    // create the atom feed
    write_feed(
        FeedConfig {
            title: config.title.clone(),
            id: config.home_page.to_string(),
            author: config.author.clone(),
            home_page: config.home_page.clone(),
        },
        catalog.articles(),
        File::create(config.root_output_directory.join("feed.atom"))?,
    )?;

    log::info!(
        "Built site in `{}`",
        config.root_output_directory.display()
    );
    Ok(())
}

// Copies the files beneath `src` into `dst`, creating directories as needed
// and overwriting files that already exist.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|err| Error::Copy {
            path: src.to_owned(),
            err,
        })?;
        let target = match entry.path().strip_prefix(src) {
            Ok(relpath) => dst.join(relpath),
            Err(_) => continue,
        };
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
            log::debug!("Copied `{}`", target.display());
        }
    }

    Ok(())
}

// Loads the template file contents, appends them to `base_template`, and
// parses the result into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, writing,
/// cleaning output directories, parsing template files, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for problems walking a directory being copied.
    Copy { path: PathBuf, err: walkdir::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for errors serializing the search index.
    SearchIndex(serde_json::Error),

    /// Returned for errors building sitemap URLs.
    Url(url::ParseError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::Copy { path, err } => {
                write!(f, "Copying directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::SearchIndex(err) => write!(f, "Writing search index: {}", err),
            Error::Url(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::Copy { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Feed(err) => Some(err),
            Error::SearchIndex(err) => Some(err),
            Error::Url(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::read_to_string;

    fn build(output: &Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_directory(Path::new("./testdata"), output)?;
        build_site(config)?;
        Ok(())
    }

    #[test]
    fn test_build_site() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        build(dir.path())?;

        let home = read_to_string(dir.path().join("index.html"))?;
        assert!(home.contains("Mengenal Rust"));
        assert!(home.contains("https://ruangcodes.example/blog/artikel/mengenal-rust.html"));

        let article = read_to_string(dir.path().join("artikel/mengenal-rust.html"))?;
        assert!(article.contains(r#"class="sectlevel1""#));
        assert!(article.contains(r#"class="language-rust""#));
        assert!(article.contains(r#"data-breakpoint="768""#));
        assert!(article.contains(r#"src="https://ruangcodes.example/blog/images/rust.png""#));
        assert!(article
            .contains(r#"href="https://ruangcodes.example/blog/artikel/query-postgres.html""#));

        // 4 articles at 2 per page
        assert!(dir.path().join("artikel/index.html").exists());
        assert!(dir.path().join("artikel/1.html").exists());
        assert!(!dir.path().join("artikel/2.html").exists());

        let category = read_to_string(dir.path().join("kategori/programming/index.html"))?;
        assert!(category.contains("Mengenal Rust"));
        assert!(dir
            .path()
            .join("kategori/uncategorized/index.html")
            .exists());

        assert!(dir.path().join("static/site.js").exists());
        assert!(dir.path().join("images/rust.png").exists());

        let search = read_to_string(dir.path().join("search.json"))?;
        assert!(search.contains(r#""slug":"catatan-tanpa-judul""#));
        assert!(read_to_string(dir.path().join("sitemap.xml"))?.contains("<urlset"));
        assert!(read_to_string(dir.path().join("feed.atom"))?.contains("Mengenal Rust"));
        Ok(())
    }

    #[test]
    fn test_rebuild_replaces_output() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("artikel"))?;
        std::fs::write(dir.path().join("artikel/usang.html"), "stale")?;
        build(dir.path())?;
        build(dir.path())?;
        assert!(!dir.path().join("artikel/usang.html").exists());
        assert!(dir.path().join("artikel/mengenal-rust.html").exists());
        Ok(())
    }

    #[test]
    fn test_article_named_index_fails_build() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let project = tempfile::tempdir()?;
        copy_dir(Path::new("./testdata"), project.path())?;
        std::fs::write(
            project.path().join("content/index.md"),
            "---\ntitle: Indeks\n---\nIsi\n",
        )?;

        let output = tempfile::tempdir()?;
        let config = Config::from_directory(project.path(), output.path())?;
        match build_site(config) {
            Err(Error::Write(WriteError::PathCollision { article, .. })) => {
                assert_eq!("index", article)
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(()) => panic!("expected the build to fail"),
        }
        Ok(())
    }

    #[test]
    fn test_theme_without_static_directory() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let project = tempfile::tempdir()?;
        copy_dir(Path::new("./testdata"), project.path())?;
        std::fs::remove_dir_all(project.path().join("theme/static"))?;

        let output = tempfile::tempdir()?;
        build_site(Config::from_directory(project.path(), output.path())?)?;
        assert!(output.path().join("index.html").exists());
        assert!(!output.path().join("static").exists());
        Ok(())
    }

    #[test]
    fn test_missing_template_file() {
        let result = parse_template(vec![PathBuf::from("./testdata/theme/missing.html")].iter());
        match result {
            Err(Error::OpenTemplateFile { path, .. }) => {
                assert_eq!(PathBuf::from("./testdata/theme/missing.html"), path)
            }
            _ => panic!("expected an OpenTemplateFile error"),
        }
    }
}
