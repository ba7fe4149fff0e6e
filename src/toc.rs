//! Table-of-contents support. The markdown pass records every section heading
//! as a [`Heading`]; [`sections`] nests them and [`render`] turns the result
//! into the HTML list shown next to an article.

use pulldown_cmark::escape::escape_html;
use std::collections::HashSet;
use std::fmt::Write;

/// A heading encountered in the article body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// The HTML heading level (`##` is 2).
    pub level: u32,
    pub id: String,
    pub title: String,
}

/// A top-level section of an article and its direct subsections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// 1 for `##` headings, 2 for `###` headings.
    pub level: u32,
    pub id: String,
    pub title: String,
    pub subsections: Vec<Section>,
}

/// Hands out unique anchor ids for heading text.
#[derive(Default)]
pub struct IdGenerator {
    issued: HashSet<String>,
}

impl IdGenerator {
    /// Slugifies `text`. A slug that was already issued gets the lowest
    /// `-1`, `-2`, ... suffix not issued either, so no two ids are equal.
    pub fn id_for(&mut self, text: &str) -> String {
        let mut base = slug::slugify(text);
        if base.is_empty() {
            base = String::from("section");
        }
        let mut id = base.clone();
        let mut n = 0;
        while self.issued.contains(&id) {
            n += 1;
            id = format!("{}-{}", base, n);
        }
        self.issued.insert(id.clone());
        id
    }
}

/// Nests `##` headings with the `###` headings that follow them. Deeper
/// headings are left out; `###` headings before the first `##` are promoted.
pub fn sections(headings: &[Heading]) -> Vec<Section> {
    let mut out: Vec<Section> = Vec::new();
    for heading in headings {
        let section = Section {
            level: 1,
            id: heading.id.clone(),
            title: heading.title.clone(),
            subsections: Vec::new(),
        };
        match heading.level {
            2 => out.push(section),
            3 => match out.last_mut() {
                Some(parent) => parent.subsections.push(Section { level: 2, ..section }),
                None => out.push(section),
            },
            _ => {}
        }
    }
    out
}

/// Renders sections as nested `sectlevel` lists of anchors. Returns an empty
/// string when there are no sections.
pub fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    if sections.is_empty() {
        return out;
    }
    render_level(&mut out, sections, 1);
    out
}

fn render_level(out: &mut String, sections: &[Section], level: u32) {
    let _ = write!(out, r#"<ul class="sectlevel{}">"#, level);
    for section in sections {
        let _ = write!(out, r##"<li><a href="#{}">"##, section.id);
        let _ = escape_html(&mut *out, &section.title);
        out.push_str("</a>");
        if !section.subsections.is_empty() {
            render_level(out, &section.subsections, level + 1);
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}
