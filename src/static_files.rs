//! Static pages of the web front end
//!
//! `/` serves the configured index page; any path not claimed by an API route
//! falls through to the site directory.

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::SiteConfig;

/// Mount the site on `router` as its root page and fallback
pub fn attach_site<S>(router: Router<S>, site: &SiteConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let index = ServeFile::new(site.dir.join(&site.index_page));
    // ServeDir refuses `..` segments, so requests stay inside site.dir
    let assets = ServeDir::new(&site.dir).append_index_html_on_directories(false);

    router.route_service("/", index).fallback_service(assets)
}
