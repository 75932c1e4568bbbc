use std::fmt::Display;

use reqwest::Client;

use crate::Result;

/// Builds the listing url of a single page: `<base_url>/index/<page>`.
pub fn page_url(base_url: &str, page: impl Display) -> String {
    format!("{}/index/{}", base_url.trim_end_matches('/'), page)
}

/// Builds the listing urls of all the `pages`, keeping their order.
pub fn make_urls<I>(pages: I, base_url: &str) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Display,
{
    pages
        .into_iter()
        .map(|page| page_url(base_url, page))
        .collect()
}

/// Builds the client used for all page requests.
pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Requests a page and returns a `Result<String>` containing the HTML.
/// A non-success status code is returned as an error.
pub(crate) async fn request_page_html(client: &Client, url: &str) -> Result<String> {
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_BASE_URL;

    #[test]
    fn urls_keep_page_order() {
        let urls = make_urls([2222, 5], DEFAULT_BASE_URL);
        assert_eq!(
            urls,
            vec!["https://bash.im/index/2222", "https://bash.im/index/5"]
        );
    }

    #[test]
    fn string_pages_and_trailing_slash() {
        let urls = make_urls(["7", "abc"], "http://127.0.0.1:3000/");
        assert_eq!(
            urls,
            vec![
                "http://127.0.0.1:3000/index/7",
                "http://127.0.0.1:3000/index/abc"
            ]
        );
    }

    #[test]
    fn no_pages_no_urls() {
        assert!(make_urls(Vec::<u32>::new(), DEFAULT_BASE_URL).is_empty());
    }
}
