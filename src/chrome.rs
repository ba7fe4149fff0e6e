//! The shared frame around every page: header, sidebar, mobile navigation,
//! footer and ad units. [`Chrome`] gathers what those partials need once per
//! build and converts it to the `site` value for each page.

use crate::category::Category;
use crate::config::{AdSense, Author, Config, SocialLink};
use crate::state::{Sidebar, Theme, MOBILE_BREAKPOINT, THEME_STORAGE_KEY};
use crate::value::{self, array, escaped, object};
use gtmpl::Value;
use url::Url;

/// Where on the site an ad unit is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdPlacement {
    Home,
    Article,
    None,
}

/// Site-wide values shared by all pages.
pub struct Chrome<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub language: &'a str,
    pub author: Option<&'a Author>,
    pub social_links: &'a [SocialLink],
    pub adsense: Option<&'a AdSense>,
    pub home_page: &'a Url,
    pub articles_url: &'a Url,
    pub static_url: &'a Url,
    pub feed_url: &'a Url,
    pub search_index_url: &'a Url,

    /// Every category, in navigation order, with its article count.
    pub categories: Vec<(&'a Category, usize)>,

    /// The copyright year shown in the footer.
    pub year: i32,
}

impl<'a> Chrome<'a> {
    pub fn new(config: &'a Config, categories: Vec<(&'a Category, usize)>, year: i32) -> Self {
        Chrome {
            title: &config.title,
            description: &config.description,
            language: &config.language,
            author: config.author.as_ref(),
            social_links: &config.social_links,
            adsense: config.adsense.as_ref(),
            home_page: &config.home_page,
            articles_url: &config.articles_url,
            static_url: &config.static_url,
            feed_url: &config.feed_url,
            search_index_url: &config.search_index_url,
            categories,
            year,
        }
    }

    /// Converts the chrome into the `site` value for one page. `current`
    /// highlights a category in the navigation.
    pub fn to_value(&self, current: Option<&Category>, placement: AdPlacement) -> Value {
        let theme = Theme::default();
        let sidebar = Sidebar::default();
        object(vec![
            ("title", escaped(self.title)),
            ("description", escaped(self.description)),
            ("language", escaped(self.language)),
            ("home_page", value::url(self.home_page)),
            ("articles_url", value::url(self.articles_url)),
            ("static_url", value::url(self.static_url)),
            ("feed_url", value::url(self.feed_url)),
            ("search_index_url", value::url(self.search_index_url)),
            ("year", Value::String(self.year.to_string())),
            ("author", self.author_value()),
            ("has_author", Value::Bool(self.author.is_some())),
            (
                "social_links",
                array(self.social_links.iter(), |link| {
                    object(vec![("name", escaped(&link.name)), ("url", escaped(&link.url))])
                }),
            ),
            (
                "categories",
                array(self.categories.iter(), |(category, count)| {
                    let mut item = value::category(category, Some(*category) == current);
                    if let Value::Object(obj) = &mut item {
                        obj.insert("count".to_owned(), value::count(*count));
                    }
                    item
                }),
            ),
            ("has_categories", Value::Bool(!self.categories.is_empty())),
            (
                "theme",
                object(vec![
                    ("initial", Value::String(theme.to_string())),
                    ("storage_key", Value::String(THEME_STORAGE_KEY.to_owned())),
                ]),
            ),
            (
                "sidebar",
                object(vec![
                    ("open", Value::Bool(sidebar.open)),
                    ("breakpoint", Value::String(MOBILE_BREAKPOINT.to_string())),
                ]),
            ),
            ("ad", self.ad_value(placement)),
        ])
    }

    fn author_value(&self) -> Value {
        match self.author {
            Some(author) => object(vec![
                ("name", escaped(&author.name)),
                (
                    "url",
                    match &author.url {
                        Some(url) => escaped(url),
                        None => value::url(self.home_page),
                    },
                ),
            ]),
            None => Value::Nil,
        }
    }

    // An ad unit renders only when a client is configured and the placement
    // has a slot.
    fn ad_value(&self, placement: AdPlacement) -> Value {
        let slot = self.adsense.and_then(|ads| match placement {
            AdPlacement::Home => ads.home_slot.as_deref(),
            AdPlacement::Article => ads.article_slot.as_deref(),
            AdPlacement::None => None,
        });
        match (self.adsense, slot) {
            (Some(ads), Some(slot)) => object(vec![
                ("enabled", Value::Bool(true)),
                ("client", escaped(&ads.client)),
                ("slot", escaped(slot)),
                ("format", Value::String("auto".to_owned())),
                ("responsive", Value::String("true".to_owned())),
            ]),
            _ => object(vec![("enabled", Value::Bool(false))]),
        }
    }
}
