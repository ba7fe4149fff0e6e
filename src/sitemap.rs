//! Writes `sitemap.xml`: the home page, the all-articles index, every
//! category index and every article page.

use crate::catalog::Catalog;
use crate::date;
use pulldown_cmark::escape::escape_html;
use std::io::{self, Write};
use url::{ParseError, Url};

#[derive(Clone, Debug, PartialEq)]
pub struct SitemapEntry {
    loc: String,
    lastmod: Option<String>,
}

/// Lists the site's pages. Listings take the date of their newest article.
pub fn sitemap_entries(
    home_page: &Url,
    articles_url: &Url,
    catalog: &Catalog,
) -> Result<Vec<SitemapEntry>, ParseError> {
    let newest = catalog
        .articles()
        .first()
        .map(|a| date::format_iso(&a.date));
    let mut urls = Vec::with_capacity(catalog.articles().len() + catalog.categories().len() + 2);
    urls.push(SitemapEntry {
        loc: home_page.to_string(),
        lastmod: newest.clone(),
    });
    urls.push(SitemapEntry {
        loc: articles_url.join("index.html")?.to_string(),
        lastmod: newest,
    });

    for category in catalog.categories() {
        urls.push(SitemapEntry {
            loc: category.url.to_string(),
            lastmod: catalog
                .in_category(&category.slug)
                .first()
                .map(|a| date::format_iso(&a.date)),
        });
    }

    for article in catalog.articles() {
        urls.push(SitemapEntry {
            loc: article.url.to_string(),
            lastmod: Some(date::format_iso(&article.date)),
        });
    }
    Ok(urls)
}

pub fn write_sitemap<W: Write>(urls: &[SitemapEntry], mut w: W) -> io::Result<()> {
    w.write_all(render_xml(urls).as_bytes())
}

fn render_xml(urls: &[SitemapEntry]) -> String {
    let mut body = String::new();
    for entry in urls {
        body.push_str("  <url>\n    <loc>");
        let _ = escape_html(&mut body, &entry.loc);
        body.push_str("</loc>\n");
        if let Some(lastmod) = entry.lastmod.as_ref() {
            body.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
        }
        body.push_str("  </url>\n");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}</urlset>
"#,
        body
    )
}
