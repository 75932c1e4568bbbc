//! Scrapes the paginated `/index/<page>` listing of a quote site,
//! extracts the jokes on every page and stores them batch by batch
//! either as JSON files or in a SQLite table.

mod error;
mod macros;

pub mod batch;
pub mod db;
pub mod joke;
pub mod parse;
pub mod process;
pub mod request;
pub mod sink;

pub use error::{Error, Result};
pub use joke::Joke;
pub use process::{JokeScraper, RunStats};
pub use sink::{JsonLayout, JsonSink, Sink};

pub const DEFAULT_BASE_URL: &str = "https://bash.im";
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// The "at" connector between a quote's date and its time of day.
pub const DATE_SEPARATOR: &str = " в ";
/// There shouldn't be more than 50 quotes per page.
const QUOTES_PER_PAGE: usize = 50;
