//! Section renderers for the procurement pages.

mod form;
mod landing;
mod results;
mod sidebar;

pub use form::*;
pub use landing::*;
pub use results::*;
pub use sidebar::*;

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
