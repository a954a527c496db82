use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::warn;
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_RETRIES: u32 = 3;

// The league site serves an error page to clients it takes for bots, so the
// shared client announces itself as an ordinary desktop browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("lt-LT,lt;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

pub fn fetch_with_retry(client: &Client, url: &str) -> Result<String> {
    fetch_with_retry_attempts(client, url, DEFAULT_RETRIES)
}

/// GET `url`, treating a timeout, transport error or non-2xx status as one
/// failed attempt. Attempts are spaced by a linear backoff of 1s times the
/// attempt number. Exhaustion is an error the caller is expected to treat as
/// "skip this page", not as fatal to the run.
pub fn fetch_with_retry_attempts(client: &Client, url: &str, retries: u32) -> Result<String> {
    let retries = retries.max(1);
    let mut last_error = anyhow!("no attempt made");

    for attempt in 1..=retries {
        match try_fetch(client, url) {
            Ok(body) => return Ok(body),
            Err(err) => {
                warn!("fetch attempt {attempt}/{retries} failed for {url}: {err:#}");
                last_error = err;
                if attempt < retries {
                    thread::sleep(Duration::from_secs(u64::from(attempt)));
                }
            }
        }
    }

    Err(last_error.context(format!("giving up on {url} after {retries} attempts")))
}

fn try_fetch(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("http {status}"));
    }
    resp.text().context("failed reading body")
}
