//! The library code for the `ruang` static blog generator. A build runs in
//! two distinct steps:
//!
//! 1. Parsing articles from Markdown source files on disk
//!    ([`crate::article`]) into a [`crate::catalog::Catalog`]
//! 2. Converting the catalog into output files on disk ([`crate::write`],
//!    [`crate::feed`], [`crate::sitemap`], [`crate::search`])
//!
//! The second step renders three kinds of page. The home page shows the
//! featured and recent articles along with the popular categories. Each
//! article gets a page with its table of contents and related articles. The
//! indices list every article and each category's articles, paginated by a
//! configurable number of articles per page.
//!
//! Every page is wrapped in the same frame ([`crate::chrome`]): header,
//! sidebar, mobile navigation, footer and ad units. The frame is rendered in
//! the pre-hydration theme and sidebar state ([`crate::state`]); the theme's
//! `site.js` takes over in the browser.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod article;
pub mod build;
pub mod catalog;
pub mod category;
pub mod chrome;
pub mod config;
pub mod date;
pub mod feed;
pub mod htmlrenderer;
pub mod link;
pub mod markdown;
pub mod search;
pub mod sitemap;
pub mod state;
pub mod toc;
pub mod value;
pub mod write;
