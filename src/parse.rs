use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::{Error, Joke, Result, DATE_SEPARATOR, QUOTES_PER_PAGE};

/// Parses the page on the blocking pool and extracts its quotes.
pub(crate) async fn parse_html(html: String, url: Arc<str>) -> Result<Vec<Joke>> {
    let jokes = spawn_blocking(move || extract_jokes(&html, &url)).await??;
    Ok(jokes)
}

/// Extracts every `article.quote` block of the page, in page order.
/// `url` is only used to point at the page in errors.
///
/// A quote missing any of its parts fails the whole page.
pub fn extract_jokes(html: &str, url: &str) -> Result<Vec<Joke>> {
    let doc = Html::parse_document(html);

    // Create selectors.
    let quote_selector = create_selector("article.quote")?;
    let total_selector = create_selector("div.quote__total")?;
    let body_selector = create_selector("div.quote__body")?;
    let date_selector = create_selector("div.quote__header_date")?;

    let mut jokes = Vec::with_capacity(QUOTES_PER_PAGE);
    for quote in doc.select(&quote_selector) {
        let likes = child_text(quote, &total_selector, url, "quote__total")?;
        let text = child_text(quote, &body_selector, url, "quote__body")?
            .trim()
            .to_string();
        let id = quote
            .value()
            .attr("data-quote")
            .ok_or_else(|| missing(url, "data-quote"))?
            .to_string();
        let date = child_text(quote, &date_selector, url, "quote__header_date")?;

        jokes.push(Joke {
            text,
            id,
            likes,
            date: truncate_date(&date).to_string(),
        });
    }
    Ok(jokes)
}

/// Keeps only the date of a quote header, dropping the time after the separator.
/// ```
/// assert_eq!(jokescrap::parse::truncate_date("27 января 2015 в 12:47"), "27 января 2015");
/// ```
pub fn truncate_date(header: &str) -> &str {
    let header = header.trim();
    header
        .split_once(DATE_SEPARATOR)
        .map_or(header, |(date, _)| date)
}

fn child_text(
    quote: ElementRef,
    selector: &Selector,
    url: &str,
    field: &'static str,
) -> Result<String> {
    quote
        .select(selector)
        .next()
        .map(|el| el.text().collect())
        .ok_or_else(|| missing(url, field))
}

fn missing(url: &str, field: &'static str) -> Error {
    Error::MissingField {
        url: url.to_string(),
        field,
    }
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseSelector(sel_str.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://bash.im/index/2222";

    fn quote(id: &str, likes: &str, date: &str, body: &str) -> String {
        format!(
            r#"<article class="quote" data-quote="{id}">
                <div class="quote__frame">
                  <header class="quote__header">
                    <a class="quote__header_permalink" href="/quote/{id}">#{id}</a>
                    <div class="quote__header_date">
                      {date}
                    </div>
                  </header>
                  <div class="quote__body">
                    {body}
                  </div>
                  <footer class="quote__footer">
                    <div class="quote__total" data-vote-counter>{likes}</div>
                  </footer>
                </div>
              </article>"#
        )
    }

    fn page(quotes: &[String]) -> String {
        format!(
            r#"<!DOCTYPE html><html><head><title>Цитатник</title></head>
            <body><main><section class="quotes">{}</section>
            <nav class="pager"><div class="quote__total">not a quote</div></nav>
            </main></body></html>"#,
            quotes.concat()
        )
    }

    #[test]
    fn extracts_all_quotes_in_order() {
        let html = page(&[
            quote("101", "17", "27 января 2015 в 12:47", "первая"),
            quote("102", "-3", "28 января 2015 в 09:01", "вторая<br>строка"),
            quote("103", "0", "1 февраля 2015", "третья"),
        ]);

        let jokes = extract_jokes(&html, URL).unwrap();

        assert_eq!(jokes.len(), 3);
        assert_eq!(
            jokes.iter().map(|j| j.id.as_str()).collect::<Vec<_>>(),
            ["101", "102", "103"]
        );
        assert!(jokes.iter().all(|j| !j.text.is_empty()
            && !j.id.is_empty()
            && !j.likes.is_empty()
            && !j.date.is_empty()));
        assert_eq!(
            jokes[0],
            Joke {
                text: "первая".into(),
                id: "101".into(),
                likes: "17".into(),
                date: "27 января 2015".into(),
            }
        );
        assert_eq!(jokes[1].text, "втораястрока");
        assert_eq!(jokes[2].date, "1 февраля 2015");
    }

    #[test]
    fn page_without_quotes_is_empty() {
        let jokes = extract_jokes(&page(&[]), URL).unwrap();
        assert!(jokes.is_empty());
    }

    #[test]
    fn missing_body_fails_the_page() {
        let broken = r#"<article class="quote" data-quote="9">
            <div class="quote__header_date">1 мая 2016 в 10:00</div>
            <div class="quote__total">4</div>
          </article>"#;
        let html = page(&[quote("8", "1", "1 мая 2016", "ok"), broken.to_string()]);

        let err = extract_jokes(&html, URL).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField { field: "quote__body", ref url } if url == URL
        ));
    }

    #[test]
    fn missing_id_fails_the_page() {
        let html = page(&[quote("8", "1", "1 мая 2016", "ok").replace(r#" data-quote="8""#, "")]);
        let err = extract_jokes(&html, URL).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "data-quote", .. }));
    }

    #[test]
    fn date_is_cut_at_the_first_separator() {
        assert_eq!(truncate_date("  27 января 2015 в 12:47 \n"), "27 января 2015");
        assert_eq!(truncate_date("вчера в 10:00 в пятницу"), "вчера");
        assert_eq!(truncate_date("27 января 2015"), "27 января 2015");
    }

    #[tokio::test]
    async fn parses_on_the_blocking_pool() {
        let html = page(&[quote("1", "5", "2 марта 2017 в 08:00", "a")]);
        let jokes = parse_html(html, Arc::from(URL)).await.unwrap();
        assert_eq!(jokes.len(), 1);
        assert_eq!(jokes[0].date, "2 марта 2017");
    }
}
