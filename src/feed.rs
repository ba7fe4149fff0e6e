//! Support for creating Atom feeds from a list of articles.

use crate::article::Article;
use crate::config::Author;
use atom_syndication::{
    Category as AtomCategory, Entry, Error as AtomError, Feed, Link, Person, Text,
};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub id: String,
    pub author: Option<Author>,
    pub home_page: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Article`]s and writes the result to a [`std::io::Write`]. This function
/// takes ownership of the provided [`FeedConfig`].
pub fn write_feed<W: Write>(config: FeedConfig, articles: &[Article], w: W) -> Result<()> {
    feed(config, articles).write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, articles: &[Article]) -> Feed {
    // Articles are newest first, so the feed is as fresh as the first one.
    let updated = match articles.first() {
        Some(article) => utc(&article.date),
        None => utc(&Utc::now().naive_utc()),
    };
    Feed {
        entries: articles
            .iter()
            .map(|article| feed_entry(&config, article))
            .collect(),
        title: Text::plain(config.title),
        id: config.id,
        updated,
        authors: author_to_people(config.author),
        links: vec![Link {
            href: config.home_page.into(),
            rel: "alternate".to_owned(),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn feed_entry(config: &FeedConfig, article: &Article) -> Entry {
    let date = utc(&article.date);
    Entry {
        id: article.url.to_string(),
        title: Text::plain(article.title.clone()),
        updated: date,
        published: Some(date),
        authors: author_to_people(config.author.clone()),
        links: vec![Link {
            href: article.url.to_string(),
            rel: "alternate".to_owned(),
            ..Default::default()
        }],
        categories: article
            .categories
            .iter()
            .map(|category| AtomCategory {
                term: category.name.clone(),
                ..Default::default()
            })
            .collect(),
        summary: Some(summary(article)),
        ..Default::default()
    }
}

/// The description when the article has one, otherwise the rendered body up
/// to the fold.
fn summary(article: &Article) -> Text {
    match article.description.is_empty() {
        false => Text::plain(article.description.clone()),
        true => Text::html(article.summary().0),
    }
}

// Article dates carry no zone; they are published as UTC.
fn utc(date: &NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(date).into()
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: author.url,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O and Atom
/// issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}
