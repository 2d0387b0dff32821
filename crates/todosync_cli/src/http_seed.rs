//! Seed source backed by a blocking HTTP GET.

use log::info;
use std::time::Duration;
use todosync_core::seed::{parse_seed_json, SeedResult};
use todosync_core::{SeedError, SeedSource, SeedTodo};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpSeedSource {
    url: String,
    limit: usize,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>, limit: usize) -> Self {
        Self {
            url: url.into(),
            limit,
        }
    }
}

impl SeedSource for HttpSeedSource {
    fn fetch(&self) -> SeedResult<Vec<SeedTodo>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport_error)?;
        let response = client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(transport_error)?;
        info!(
            "event=seed_fetch module=cli status=ok http_status={}",
            response.status().as_u16()
        );
        let body = response.text().map_err(transport_error)?;
        parse_seed_json(&body, self.limit)
    }
}

fn transport_error(err: reqwest::Error) -> SeedError {
    SeedError::Transport(err.to_string())
}
