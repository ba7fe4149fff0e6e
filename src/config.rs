//! Loads a [`Config`] from a project's `ruang.yaml` and its theme's
//! `theme/theme.yaml`.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The project file name searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "ruang.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(10)
    }
}

#[derive(Deserialize)]
struct Project {
    title: String,

    #[serde(default)]
    description: String,
    site_root: Url,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default = "default_language")]
    language: String,

    #[serde(default = "default_featured_count")]
    featured_count: usize,

    #[serde(default = "default_recent_count")]
    recent_count: usize,

    #[serde(default = "default_popular_category_count")]
    popular_category_count: usize,

    #[serde(default = "default_related_count")]
    related_count: usize,

    #[serde(default)]
    index_page_size: PageSize,

    #[serde(default)]
    social_links: Vec<SocialLink>,

    #[serde(default)]
    adsense: Option<AdSense>,
}

fn default_language() -> String {
    String::from("id")
}

fn default_featured_count() -> usize {
    3
}

fn default_recent_count() -> usize {
    9
}

fn default_popular_category_count() -> usize {
    8
}

fn default_related_count() -> usize {
    3
}

#[derive(Deserialize)]
struct Theme {
    home_template: Vec<PathBuf>,
    article_template: Vec<PathBuf>,
    category_template: Vec<PathBuf>,
}

/// The site author, credited in the footer and the feed.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// A link shown in the header, mobile navigation and footer.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

/// Display ad configuration. Pages only render ad units when this is set.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct AdSense {
    /// The publisher id, e.g., `ca-pub-0000000000000000`.
    pub client: String,

    #[serde(default)]
    pub home_slot: Option<String>,

    #[serde(default)]
    pub article_slot: Option<String>,
}

/// Everything the build needs: where to read, where to write, the URLs
/// pages are served from, and the knobs for the page layouts.
pub struct Config {
    pub title: String,
    pub description: String,
    pub language: String,
    pub author: Option<Author>,
    pub social_links: Vec<SocialLink>,
    pub adsense: Option<AdSense>,

    pub home_page: Url,
    pub articles_url: Url,
    pub categories_url: Url,
    pub static_url: Url,
    pub feed_url: Url,
    pub search_index_url: Url,

    pub content_directory: PathBuf,
    pub public_directory: PathBuf,
    pub static_source_directory: PathBuf,

    pub root_output_directory: PathBuf,
    pub articles_output_directory: PathBuf,
    pub categories_output_directory: PathBuf,
    pub static_output_directory: PathBuf,

    pub home_template: Vec<PathBuf>,
    pub article_template: Vec<PathBuf>,
    pub category_template: Vec<PathBuf>,

    pub featured_count: usize,
    pub recent_count: usize,
    pub popular_category_count: usize,
    pub related_count: usize,
    pub index_page_size: usize,
}

impl Config {
    /// Loads the configuration from the `ruang.yaml` in `dir` or in its
    /// nearest ancestor.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
                .with_context(|| format!("Loading configuration `{}`", path.display()))
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        let theme_dir = project_root.join("theme");
        let theme: Theme = serde_yaml::from_reader(open(&theme_dir.join("theme.yaml"), "theme")?)?;

        if project.index_page_size.0 == 0 {
            return Err(anyhow!("`index_page_size` must be at least 1"));
        }

        // Every derived URL is a directory beneath the site root, so the
        // root needs a trailing slash for `Url::join` to keep its path.
        let mut site_root = project.site_root;
        if !site_root.path().ends_with('/') {
            let path = format!("{}/", site_root.path());
            site_root.set_path(&path);
        }

        let in_theme = |paths: Vec<PathBuf>| -> Vec<PathBuf> {
            paths.iter().map(|relpath| theme_dir.join(relpath)).collect()
        };

        Ok(Config {
            title: project.title,
            description: project.description,
            language: project.language,
            author: project.author,
            social_links: project.social_links,
            adsense: project.adsense,

            articles_url: site_root.join("artikel/")?,
            categories_url: site_root.join("kategori/")?,
            static_url: site_root.join("static/")?,
            feed_url: site_root.join("feed.atom")?,
            search_index_url: site_root.join("search.json")?,
            home_page: site_root,

            content_directory: project_root.join("content"),
            public_directory: project_root.join("public"),
            static_source_directory: theme_dir.join("static"),

            root_output_directory: output_directory.to_owned(),
            articles_output_directory: output_directory.join("artikel"),
            categories_output_directory: output_directory.join("kategori"),
            static_output_directory: output_directory.join("static"),

            home_template: in_theme(theme.home_template),
            article_template: in_theme(theme.article_template),
            category_template: in_theme(theme.category_template),

            featured_count: project.featured_count,
            recent_count: project.recent_count,
            popular_category_count: project.popular_category_count,
            related_count: project.related_count,
            index_page_size: project.index_page_size.0,
        })
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    File::open(path).with_context(|| format!("Opening {} file `{}`", kind, path.display()))
}
