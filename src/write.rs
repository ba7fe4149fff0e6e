use crate::article::Article;
use crate::catalog::Catalog;
use crate::category::Category;
use crate::chrome::{AdPlacement, Chrome};
use crate::value::{self, array, count, escaped, object, option_url};
use gtmpl::{Context, Template, Value};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use url::{ParseError, Url};

/// The heading of the index listing every article.
pub const ALL_ARTICLES_TITLE: &str = "Semua Artikel";

/// Responsible for laying out, templating, and writing the HTML pages of the
/// site from a [`Catalog`].
pub struct Writer<'a> {
    /// The template for the home page.
    pub home_template: &'a Template,

    /// The template for article pages.
    pub article_template: &'a Template,

    /// The template for category and all-articles index pages.
    pub index_template: &'a Template,

    /// The shared frame, passed to every page as `site`.
    pub chrome: &'a Chrome<'a>,

    /// The base URL for article pages. The all-articles index lives at
    /// `{articles_url}/index.html`, `{articles_url}/1.html`, etc.
    pub articles_url: &'a Url,

    /// The directory the home page is written to.
    pub root_output_directory: &'a Path,

    pub articles_output_directory: &'a Path,

    /// Each category's index is written to `{categories_output_directory}/{slug}`
    /// and served from [`Category::index_url`].
    pub categories_output_directory: &'a Path,

    /// The number of articles per index page.
    pub index_page_size: usize,

    pub featured_count: usize,
    pub recent_count: usize,
    pub popular_category_count: usize,
    pub related_count: usize,
}

impl Writer<'_> {
    /// Takes a single [`Page`], templates it, and writes it to disk.
    fn write_page(&self, page: &Page) -> Result<()> {
        let mut value = page.to_value();
        if let Value::Object(obj) = &mut value {
            obj.insert(
                "site".to_owned(),
                self.chrome.to_value(page.category, page.placement),
            );
        }
        page.template
            .execute(&mut File::create(&page.file_path)?, &Context::from(value)?)?;
        Ok(())
    }

    /// Lays out the home page, the article pages and every index, and writes
    /// them to disk.
    pub fn write_site(&self, catalog: &Catalog) -> Result<()> {
        let mut pages = vec![self.home_page(catalog)?];
        for index in indices(
            catalog,
            self.articles_url,
            self.articles_output_directory,
            self.categories_output_directory,
        )? {
            pages.extend(index.to_pages(self.index_page_size, self.index_template)?);
        }
        check_article_paths(&pages, catalog.articles())?;
        pages.extend(article_pages(
            catalog,
            self.related_count,
            self.article_template,
        ));

        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
        for page in &pages {
            if let Some(dir) = page.file_path.parent() {
                if seen_dirs.insert(dir.to_owned()) {
                    std::fs::create_dir_all(dir)?;
                }
            }
            self.write_page(page)?;
            log::debug!("Wrote `{}`", page.file_path.display());
        }
        log::info!("Wrote {} pages", pages.len());
        Ok(())
    }

    /// Lays out the home page: the featured articles, the recent list, the
    /// popular categories, and a link to the all-articles index when the
    /// recent list doesn't show everything.
    fn home_page(&self, catalog: &Catalog) -> Result<Page<'_>> {
        let featured = catalog.featured(self.featured_count);
        let recent = catalog.search("", self.recent_count);
        let popular = catalog.popular_categories(self.popular_category_count);
        Ok(Page {
            item: object(vec![
                ("featured", array(featured.iter(), Article::summarize)),
                ("has_featured", Value::Bool(!featured.is_empty())),
                ("recent", array(recent.iter(), |a| a.summarize())),
                ("recent_count", count(recent.len())),
                ("has_recent", Value::Bool(!recent.is_empty())),
                ("popular", array(popular.iter(), Value::from)),
                ("has_popular", Value::Bool(!popular.is_empty())),
                ("has_more", Value::Bool(catalog.has_more(self.recent_count))),
                (
                    "all_articles_url",
                    value::url(&self.articles_url.join("index.html")?),
                ),
            ]),
            file_path: self.root_output_directory.join("index.html"),
            prev: None,
            next: None,
            template: self.home_template,
            category: None,
            placement: AdPlacement::Home,
        })
    }
}

/// An object representing an output HTML file. A [`Page`] can be converted to a
/// [`Value`] and thus rendered in a template via [`Page::to_value`].
struct Page<'a> {
    /// The main item for the page.
    item: Value,

    /// The target location on disk for the output file.
    file_path: PathBuf,

    /// The URL for the previous page, if any.
    prev: Option<Url>,

    /// The URL for the next page, if any.
    next: Option<Url>,

    /// The template with which the page will be rendered.
    template: &'a Template,

    /// The category highlighted in the navigation, if any.
    category: Option<&'a Category>,

    placement: AdPlacement,
}

impl Page<'_> {
    /// Converts a [`Page`] into a [`Value`]. The result is a [`Value::Object`]
    /// with fields `item`, `prev`, `next`, `has_prev` and `has_next`.
    fn to_value(&self) -> Value {
        object(vec![
            ("item", self.item.clone()),
            ("prev", option_url(self.prev.as_ref())),
            ("next", option_url(self.next.as_ref())),
            ("has_prev", Value::Bool(self.prev.is_some())),
            ("has_next", Value::Bool(self.next.is_some())),
        ])
    }
}

/// Fails if an article page would be written over one of `pages`, e.g., an
/// article named `index.md` over the all-articles index.
fn check_article_paths(pages: &[Page], articles: &[Article]) -> Result<()> {
    let taken: HashSet<&Path> = pages.iter().map(|p| p.file_path.as_path()).collect();
    match articles
        .iter()
        .find(|a| taken.contains(a.file_path.as_path()))
    {
        Some(article) => Err(Error::PathCollision {
            article: article.slug.clone(),
            path: article.file_path.clone(),
        }),
        None => Ok(()),
    }
}

/// Creates a [`Page`] per article. `prev` points at the newer neighbor and
/// `next` at the older one.
fn article_pages<'a>(
    catalog: &'a Catalog,
    related_count: usize,
    template: &'a Template,
) -> impl Iterator<Item = Page<'a>> {
    let articles = catalog.articles();
    articles.iter().enumerate().map(move |(i, article)| Page {
        item: article.to_value(&catalog.related(article, related_count)),
        file_path: article.file_path.clone(),
        prev: match i < 1 {
            true => None,
            false => Some(articles[i - 1].url.clone()),
        },
        next: match i + 1 >= articles.len() {
            true => None,
            false => Some(articles[i + 1].url.clone()),
        },
        template,
        category: Some(article.primary_category()),
        placement: AdPlacement::Article,
    })
}

/// `Index` represents a paginated listing of [`Article`]s: either every
/// article or those of a single category.
struct Index<'a> {
    /// The base URL for the index's pages, with a trailing slash.
    url: Url,

    /// The output directory for the index's pages.
    output_directory: PathBuf,

    title: String,

    /// The category listed, or `None` for the all-articles index.
    category: Option<&'a Category>,

    articles: Vec<&'a Article>,
}

impl<'a> Index<'a> {
    /// Converts the index to a list of index pages of `page_size` articles
    /// each. The first page is `index.html`, the rest are `1.html`,
    /// `2.html`, etc.
    fn to_pages(&self, page_size: usize, template: &'a Template) -> Result<Vec<Page<'a>>> {
        let total_pages = match self.articles.len() % page_size {
            0 => self.articles.len() / page_size,
            _ => self.articles.len() / page_size + 1,
        };

        self.articles
            .chunks(page_size)
            .enumerate()
            .map(|(i, chunk)| -> Result<Page<'a>> {
                let file_name = match i > 0 {
                    false => String::from("index.html"),
                    true => format!("{}.html", i),
                };

                Ok(Page {
                    item: object(vec![
                        ("title", escaped(&self.title)),
                        (
                            "category",
                            match self.category {
                                Some(category) => Value::from(category),
                                None => Value::Nil,
                            },
                        ),
                        ("is_category", Value::Bool(self.category.is_some())),
                        ("articles", array(chunk.iter(), |a| a.summarize())),
                        ("article_count", count(self.articles.len())),
                        ("page", count(i + 1)),
                        ("total_pages", count(total_pages)),
                    ]),
                    file_path: self.output_directory.join(&file_name),
                    prev: match i {
                        0 => None,
                        1 => Some(self.url.join("index.html")?),
                        _ => Some(self.url.join(&format!("{}.html", i - 1))?),
                    },
                    next: match i < total_pages - 1 {
                        false => None,
                        true => Some(self.url.join(&format!("{}.html", i + 1))?),
                    },
                    template,
                    category: self.category,
                    placement: AdPlacement::None,
                })
            })
            .collect()
    }
}

/// Builds the all-articles index followed by one index per category, in
/// navigation order.
fn indices<'a>(
    catalog: &'a Catalog,
    articles_url: &Url,
    articles_output_directory: &Path,
    categories_output_directory: &Path,
) -> Result<Vec<Index<'a>>> {
    let mut indices = vec![Index {
        url: articles_url.to_owned(),
        output_directory: articles_output_directory.to_owned(),
        title: ALL_ARTICLES_TITLE.to_owned(),
        category: None,
        articles: catalog.articles().iter().collect(),
    }];

    for category in catalog.categories() {
        indices.push(Index {
            url: category.index_url.clone(),
            output_directory: categories_output_directory.join(&category.slug),
            title: category.name.clone(),
            category: Some(category),
            articles: catalog.in_category(&category.slug),
        });
    }
    Ok(indices)
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error building a page URL.
    UrlParse(ParseError),

    /// An article page would overwrite another page.
    PathCollision { article: String, path: PathBuf },

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::UrlParse(err) => write!(f, "building page URL: {}", err),
            Error::PathCollision { article, path } => write!(
                f,
                "article `{}.md` would overwrite the index page `{}`; rename the file",
                article,
                path.display()
            ),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::UrlParse(err) => Some(err),
            Error::PathCollision { .. } => None,
            Error::Io(err) => Some(err),
        }
    }
}
