use std::fmt::Display;
use std::sync::Arc;

use chrono::Local;
use reqwest::Client;
use tokio::task::JoinSet;
use tracing::{info, info_span, Instrument, Span};

use crate::batch::batches;
use crate::parse::parse_html;
use crate::request::{build_client, page_url, request_page_html};
use crate::{info_time, Joke, Result, Sink, DEFAULT_BASE_URL, QUOTES_PER_PAGE};

/// Totals of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub batches: usize,
    pub pages: usize,
    pub jokes: usize,
}

/// Fetches the listing pages, extracts their jokes and hands them to the [`Sink`] batch by batch.
#[derive(Debug)]
pub struct JokeScraper {
    pages: Vec<String>,
    sink: Sink,
    client: Client,
    base_url: String,
    concurrency: usize,
    span: Span,
}

impl JokeScraper {
    /// `pages` are the page numbers (or any other page identifiers) to scrape, in order.
    pub fn new<I>(pages: I, sink: Sink) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        Ok(Self {
            pages: pages.into_iter().map(|p| p.to_string()).collect(),
            sink,
            client: build_client()?,
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: 1,
            span: info_span!("jokes"),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Every event of the scraper is recorded inside `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Number of pages of a batch requested at the same time. `1` (the default) fetches them one by one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn into_sink(self) -> Sink {
        self.sink
    }

    /// Scrapes all the pages given at construction, persisting every `batch_size` pages.
    pub async fn parse(&mut self, batch_size: usize) -> Result<RunStats> {
        let pages = self.pages.clone();
        self.parse_batch(pages, batch_size).await
    }

    /// Scrapes `page_ids` in batches of `batch_size` pages.
    /// Every batch is persisted as one unit before the next one is requested.
    pub async fn parse_batch<I>(&mut self, page_ids: I, batch_size: usize) -> Result<RunStats>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let span = self.span.clone();
        self.run_batches(page_ids, batch_size).instrument(span).await
    }

    async fn run_batches<I>(&mut self, page_ids: I, batch_size: usize) -> Result<RunStats>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let start_time = Local::now();
        let base_url = self.base_url.clone();
        let urls = page_ids.into_iter().map(|id| page_url(&base_url, id));

        let mut stats = RunStats::default();
        for (batch_idx, urls_batch) in batches(urls, batch_size)?.enumerate() {
            let start_batch_time = Local::now();
            info_time!("Requesting batch {} ({} pages)", batch_idx, urls_batch.len());

            let jokes = self.parse_pages(&urls_batch).await?;
            self.sink.persist(&jokes, batch_idx).await?;

            stats.batches += 1;
            stats.pages += urls_batch.len();
            stats.jokes += jokes.len();
            info_time!(
                start_batch_time,
                "Processed batch {}: {} jokes",
                batch_idx,
                jokes.len()
            );
        }

        info_time!(
            start_time,
            "Finished {} batches, {} pages, {} jokes",
            stats.batches,
            stats.pages,
            stats.jokes
        );
        Ok(stats)
    }

    /// Parses every page and concatenates their jokes in page order.
    pub async fn parse_pages(&self, urls: &[String]) -> Result<Vec<Joke>> {
        let mut jokes = Vec::with_capacity(urls.len() * QUOTES_PER_PAGE);
        if self.concurrency <= 1 {
            for url in urls {
                jokes.extend(self.parse_page(url).await?);
            }
            return Ok(jokes);
        }

        for chunk in urls.chunks(self.concurrency) {
            let mut task_set = JoinSet::new();
            for (idx, url) in chunk.iter().enumerate() {
                task_set.spawn({
                    // Client uses Arc so we can clone cheaply
                    let client = self.client.clone();
                    let url = url.clone();
                    async move { (idx, fetch_and_parse(&client, &url).await) }
                        .instrument(Span::current())
                });
            }

            // Tasks finish in any order, put the pages back in request order.
            let mut pages = Vec::with_capacity(chunk.len());
            while let Some(task) = task_set.join_next().await {
                let (idx, page) = task?;
                pages.push((idx, page?));
            }
            pages.sort_unstable_by_key(|(idx, _)| *idx);
            jokes.extend(pages.into_iter().flat_map(|(_, page)| page));
        }
        Ok(jokes)
    }

    /// Requests a single page and extracts its jokes.
    pub async fn parse_page(&self, url: &str) -> Result<Vec<Joke>> {
        fetch_and_parse(&self.client, url).await
    }
}

async fn fetch_and_parse(client: &Client, url: &str) -> Result<Vec<Joke>> {
    let html = request_page_html(client, url).await?;
    let jokes = parse_html(html, Arc::from(url)).await?;
    info!("jokes len {} on {}", jokes.len(), url);
    Ok(jokes)
}
