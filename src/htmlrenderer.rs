//! Renders article bodies to HTML on top of
//! [`pulldown_cmark::html::push_html`]. Two kinds of event are rewritten
//! before they get there:
//!
//! * headings carry the anchor ids computed for the table of contents;
//! * footnote links are prefixed with the article URL. `push_html` assumes the
//!   footnote definition is on the same page as the reference, which is true
//!   for article pages but not for a summary cut at the fold.

use pulldown_cmark::escape::{escape_href, escape_html};
use pulldown_cmark::{html, CowStr, Event, Tag};
use std::collections::{HashMap, VecDeque};

pub struct HtmlRenderer {
    footnote_prefix: String,

    /// Anchor ids for the headings still to be rendered, in document order.
    heading_ids: VecDeque<String>,

    /// Footnotes are numbered in order of first appearance, reference or
    /// definition.
    footnote_numbers: HashMap<String, usize>,
}

impl HtmlRenderer {
    /// Creates a renderer that prefixes footnote links with
    /// `footnote_prefix` and hands out `heading_ids` to headings in order.
    pub fn new(footnote_prefix: &str, heading_ids: Vec<String>) -> Self {
        HtmlRenderer {
            footnote_prefix: footnote_prefix.to_owned(),
            heading_ids: heading_ids.into(),
            footnote_numbers: HashMap::new(),
        }
    }

    /// Appends the HTML for `events` to `out`.
    pub fn push_html<'a>(&mut self, out: &mut String, events: impl IntoIterator<Item = Event<'a>>) {
        html::push_html(out, events.into_iter().map(|ev| self.rewrite(ev)));
    }

    fn rewrite<'a>(&mut self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Start(Tag::Heading(level)) => match self.heading_ids.pop_front() {
                Some(id) => html_event(format!(r#"<h{} id="{}">"#, level, escaped(&id))),
                None => Event::Start(Tag::Heading(level)),
            },
            Event::FootnoteReference(name) => {
                let number = self.footnote_number(&name);
                let mut href = String::new();
                let _ = escape_href(&mut href, &format!("{}#{}", self.footnote_prefix, name));
                html_event(format!(
                    r#"<sup class="footnote-reference"><a href="{}">{}</a></sup>"#,
                    href, number
                ))
            }
            Event::Start(Tag::FootnoteDefinition(name)) => {
                let number = self.footnote_number(&name);
                html_event(format!(
                    r#"<div class="footnote-definition" id="{}"><sup class="footnote-definition-label">{}</sup>"#,
                    escaped(&name),
                    number
                ))
            }
            ev => ev,
        }
    }

    fn footnote_number(&mut self, name: &str) -> usize {
        let next = self.footnote_numbers.len() + 1;
        *self.footnote_numbers.entry(name.to_owned()).or_insert(next)
    }
}

fn html_event<'a>(html: String) -> Event<'a> {
    Event::Html(CowStr::from(html))
}

fn escaped(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(&mut out, s);
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use pulldown_cmark::{Options, Parser};

    fn render(markdown: &str, heading_ids: Vec<String>) -> String {
        let mut out = String::new();
        HtmlRenderer::new("https://example.org/a.html", heading_ids)
            .push_html(&mut out, Parser::new_ext(markdown, Options::ENABLE_FOOTNOTES));
        out
    }

    #[test]
    fn test_heading_ids() {
        assert_eq!(
            "<h2 id=\"intro\">Intro</h2>\n<h3>Next</h3>\n",
            render("## Intro\n### Next", vec!["intro".to_owned()])
        );
    }

    #[test]
    fn test_image_alt_text() {
        assert_eq!(
            "<p><img src=\"/images/x.png\" alt=\"a b c\" title=\"T\" /></p>\n",
            render(r#"![a *b* `c`](/images/x.png "T")"#, Vec::new())
        );
    }

    #[test]
    fn test_code_block_language() {
        assert_eq!(
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n",
            render("```rust ignore\nfn main() {}\n```", Vec::new())
        );
    }

    #[test]
    fn test_footnote_prefix() {
        let html = render("Hi[^note] and[^2]\n\n[^note]: there\n\n[^2]: again", Vec::new());
        assert!(html.contains(
            r##"<sup class="footnote-reference"><a href="https://example.org/a.html#note">1</a></sup>"##
        ));
        assert!(html.contains(r##"<a href="https://example.org/a.html#2">2</a>"##));
        assert!(html.contains(
            r#"<div class="footnote-definition" id="note"><sup class="footnote-definition-label">1</sup>"#
        ));
    }
}
