use crate::htmlrenderer::HtmlRenderer;
use crate::link::Converter as LinkConverter;
use crate::toc::{Heading, IdGenerator};
use pulldown_cmark::*;
use std::fmt;
use url::{ParseError as UrlParseError, Url};

/// The HTML rendering of an article body plus what was learned along the way.
#[derive(Debug, Default)]
pub struct Document {
    /// The text of the leading level-1 heading, if the body starts with one.
    /// That heading is treated as the document title and is not rendered.
    pub title: Option<String>,

    /// The rendered HTML.
    pub body: String,

    /// Every heading left in the body, in order, with its anchor id.
    pub headings: Vec<Heading>,
}

/// Converts markdown to HTML.
///
/// * [`site_root`] is the URL of the home page. Root-relative link and image
///   targets (`/images/a.png`) resolve against it.
/// * [`articles_url`] is the prefix for article URLs (e.g.,
///   https://example.org/artikel/). This should end in a trailing slash.
/// * [`source_path`] is the path of the rendered page relative to
///   [`articles_url`], used to resolve relative links.
/// * [`markdown`] is the body of the source file.
/// * [`footnote_prefix`] is the prefix to prepend onto footnote links.
pub fn to_html(
    site_root: &Url,
    articles_url: &Url,
    source_path: &str,
    markdown: &str,
    footnote_prefix: &str,
) -> Result<Document, Error> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let event_converter = EventConverter {
        link_converter: LinkConverter::new(site_root, articles_url, source_path)?,
    };
    let mut events = Parser::new_ext(markdown, options)
        .map(|ev| event_converter.convert(ev))
        .collect::<Result<Vec<Event>, UrlParseError>>()?;

    let mut document = Document {
        title: take_title(&mut events),
        ..Document::default()
    };
    document.headings = headings(&events);

    HtmlRenderer::new(
        footnote_prefix,
        document.headings.iter().map(|h| h.id.clone()).collect(),
    )
    .push_html(&mut document.body, events);
    Ok(document)
}

// Removes a leading level-1 heading from `events` and returns its text.
fn take_title(events: &mut Vec<Event>) -> Option<String> {
    match events.first() {
        Some(Event::Start(Tag::Heading(1))) => {}
        _ => return None,
    }
    let end = events
        .iter()
        .position(|ev| matches!(ev, Event::End(Tag::Heading(1))))?;
    let title = events.drain(..=end).fold(String::new(), |mut title, ev| {
        if let Event::Text(text) | Event::Code(text) = ev {
            title.push_str(&text);
        }
        title
    });
    Some(title.trim().to_owned())
}

fn headings(events: &[Event]) -> Vec<Heading> {
    let mut ids = IdGenerator::default();
    let mut out = Vec::new();
    let mut current: Option<(u32, String)> = None;
    for ev in events {
        match ev {
            Event::Start(Tag::Heading(level)) => current = Some((*level, String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title)) = current.as_mut() {
                    title.push_str(text);
                }
            }
            Event::End(Tag::Heading(_)) => {
                if let Some((level, title)) = current.take() {
                    let title = title.trim().to_owned();
                    out.push(Heading {
                        level,
                        id: ids.id_for(&title),
                        title,
                    });
                }
            }
            _ => {}
        }
    }
    out
}

struct EventConverter<'a> {
    link_converter: LinkConverter<'a>,
}

impl<'a> EventConverter<'a> {
    fn convert_tag<'b>(&self, tag: Tag<'b>) -> Result<Tag<'b>, UrlParseError> {
        Ok(match tag {
            // Internal links (links from one article to another) need to be
            // converted from their input format to their output format (e.g.,
            // an article linking to another as `foo.md` needs an equivalent
            // link ending in `foo.html`).
            Tag::Link(
                link @ (LinkType::Inline
                | LinkType::Reference
                | LinkType::ReferenceUnknown
                | LinkType::Shortcut
                | LinkType::Collapsed
                | LinkType::CollapsedUnknown),
                url,
                title,
            ) => Tag::Link(link, self.convert_url(&url)?, title),
            Tag::Image(link, url, title) => Tag::Image(link, self.convert_url(&url)?, title),
            _ => tag,
        })
    }

    fn convert_url<'b>(&self, url: &str) -> Result<CowStr<'b>, UrlParseError> {
        Ok(CowStr::Boxed(
            self.link_converter.convert(url)?.into_boxed_str(),
        ))
    }

    fn convert<'b>(&self, ev: Event<'b>) -> Result<Event<'b>, UrlParseError> {
        Ok(match ev {
            Event::Start(tag) => Event::Start(self.convert_tag(tag)?),
            _ => ev,
        })
    }
}

/// Represents an error converting markdown to HTML.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a problem parsing URLs.
    UrlParse(UrlParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn convert(markdown: &str) -> Result<Document, Error> {
        let site_root = Url::parse("https://example.org/blog/")?;
        let articles_url = site_root.join("artikel/")?;
        to_html(
            &site_root,
            &articles_url,
            "halo.html",
            markdown,
            "https://example.org/blog/artikel/halo.html",
        )
    }

    #[test]
    fn test_leading_heading_is_title() -> Result<(), Error> {
        let document = convert("# Halo `Dunia`\n\nIsi.\n")?;
        assert_eq!(Some("Halo Dunia".to_owned()), document.title);
        assert_eq!("<p>Isi.</p>\n", document.body);
        Ok(())
    }

    #[test]
    fn test_later_heading_is_not_title() -> Result<(), Error> {
        let document = convert("Isi.\n\n# Bukan Judul\n")?;
        assert_eq!(None, document.title);
        assert_eq!(
            "<p>Isi.</p>\n<h1 id=\"bukan-judul\">Bukan Judul</h1>\n",
            document.body
        );
        Ok(())
    }

    #[test]
    fn test_headings_get_ids() -> Result<(), Error> {
        let document = convert("## Setup\n\n### Linux\n\n## Setup\n")?;
        let ids: Vec<&str> = document.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(vec!["setup", "linux", "setup-1"], ids);
        assert!(document.body.contains(r#"<h2 id="setup-1">Setup</h2>"#));
        Ok(())
    }

    #[test]
    fn test_article_links_are_converted() -> Result<(), Error> {
        let document = convert("[next](lanjutan.md) and [top](#setup)")?;
        assert!(document
            .body
            .contains(r#"<a href="https://example.org/blog/artikel/lanjutan.html">"#));
        assert!(document.body.contains(r##"<a href="#setup">"##));
        Ok(())
    }

    #[test]
    fn test_root_relative_targets_use_site_root() -> Result<(), Error> {
        let document = convert("[img](/images/rust.png) ![a](/images/rust.png)")?;
        assert!(document
            .body
            .contains(r#"<a href="https://example.org/blog/images/rust.png">"#));
        assert!(document
            .body
            .contains(r#"<img src="https://example.org/blog/images/rust.png" alt="a" />"#));
        Ok(())
    }
}
