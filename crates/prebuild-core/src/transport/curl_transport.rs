//! Single-stream HTTP GET over libcurl.

use std::io::Write;
use std::time::Duration;

use super::{Transport, TransportError};
use crate::config::HttpConfig;

#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    http: HttpConfig,
}

impl CurlTransport {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.http.max_redirections)?;
        easy.useragent(&self.http.user_agent)?;
        // Error statuses must not deliver their body into the sink.
        easy.fail_on_error(true)?;
        easy.connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))?;
        easy.low_speed_limit(self.http.low_speed_limit_bytes)?;
        easy.low_speed_time(Duration::from_secs(self.http.low_speed_time_secs))?;
        if self.http.timeout_secs > 0 {
            easy.timeout(Duration::from_secs(self.http.timeout_secs))?;
        }
        Ok(())
    }
}

impl Transport for CurlTransport {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError> {
        let curl_err = |source: curl::Error| TransportError::Curl {
            url: url.to_string(),
            source,
        };

        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url).map_err(curl_err)?;

        let mut written = 0u64;
        let mut sink_error = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match sink.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        sink_error = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(curl_err)?;
            transfer.perform()
        };

        if let Some(source) = sink_error {
            return Err(TransportError::Sink {
                url: url.to_string(),
                source,
            });
        }

        let status = easy.response_code().map_err(curl_err)?;
        match performed {
            Err(_) if status >= 400 => Err(TransportError::Status {
                url: url.to_string(),
                status,
            }),
            Err(source) => Err(curl_err(source)),
            Ok(()) if !(200..300).contains(&status) => Err(TransportError::Status {
                url: url.to_string(),
                status,
            }),
            Ok(()) => {
                tracing::debug!(url, status, bytes = written, "GET complete");
                Ok(written)
            }
        }
    }
}
