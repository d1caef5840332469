pub mod clan;
pub mod dom;
mod markers;
pub mod scraper;
pub mod shop;
pub mod text;
pub mod types;
pub mod utils;

pub use scraper::{ScraperError, WebScraper};

pub(crate) const BASE_URL: &str = "https://h5.mongtutien.vn";
