use crate::TelemetryError;

/// Client address reported when the caller has nothing better to hand over.
pub const DEFAULT_CLIENT_IP: &str = "127.0.1.1";

/// Client for the remote logging API.
///
/// Expects the API surface:
/// - `GET  /health` — must answer `200` with body `OK`
/// - `POST /log`    — form fields `eventid, content, ip, src_port, dst_port`
/// - `POST /info` | `/warn` | `/error` — form fields
///   `message, method, ip, src_port, dst_port`
///
/// Construction probes the health endpoint and refuses to build a client
/// against anything that does not answer correctly. Every post is a single
/// attempt; a non-200 answer is surfaced with the response body.
#[derive(Debug)]
pub struct LogClient {
    url: String,
    dst_port: u16,
    agent: ureq::Agent,
}

impl LogClient {
    /// Probe `<url>/health` and build a client for the endpoint.
    /// `dst_port` is the port of the service being logged for.
    pub fn connect(url: &str, dst_port: u16) -> Result<Self, TelemetryError> {
        let url = url.trim_end_matches('/').to_owned();
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        let health_url = format!("{url}/health");
        let resp = agent.get(&health_url).call().map_err(|e| TelemetryError::Health {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        let status = resp.status().as_u16();
        let body = resp
            .into_body()
            .read_to_string()
            .map_err(|e| TelemetryError::Health {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        if status != 200 || body != "OK" {
            return Err(TelemetryError::Health {
                url,
                reason: format!("HTTP {status} with body {body:?}"),
            });
        }

        Ok(Self {
            url,
            dst_port,
            agent,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Free-form structured event log, posted to `/log`.
    pub fn log(
        &self,
        event_id: &str,
        content: &serde_json::Value,
        ip: &str,
        src_port: u16,
    ) -> Result<(), TelemetryError> {
        let url = format!("{}/log", self.url);
        let content = content.to_string();
        let src_port = src_port.to_string();
        let dst_port = self.dst_port.to_string();
        self.post_form(
            &url,
            [
                ("eventid", event_id),
                ("content", &content),
                ("ip", ip),
                ("src_port", &src_port),
                ("dst_port", &dst_port),
            ],
        )
    }

    pub fn info(&self, message: &str, method: &str, ip: &str, src_port: u16) -> Result<(), TelemetryError> {
        self.send_message("info", message, method, ip, src_port)
    }

    pub fn warn(&self, message: &str, method: &str, ip: &str, src_port: u16) -> Result<(), TelemetryError> {
        self.send_message("warn", message, method, ip, src_port)
    }

    pub fn error(&self, message: &str, method: &str, ip: &str, src_port: u16) -> Result<(), TelemetryError> {
        self.send_message("error", message, method, ip, src_port)
    }

    fn send_message(
        &self,
        level: &str,
        message: &str,
        method: &str,
        ip: &str,
        src_port: u16,
    ) -> Result<(), TelemetryError> {
        let url = format!("{}/{level}", self.url);
        let src_port = src_port.to_string();
        let dst_port = self.dst_port.to_string();
        self.post_form(
            &url,
            [
                ("message", message),
                ("method", method),
                ("ip", ip),
                ("src_port", &src_port),
                ("dst_port", &dst_port),
            ],
        )
    }

    fn post_form(&self, url: &str, fields: [(&str, &str); 5]) -> Result<(), TelemetryError> {
        tracing::debug!("POST {url}");
        let resp = self
            .agent
            .post(url)
            .send_form(fields)
            .map_err(|e| TelemetryError::Http(e.to_string()))?;
        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.into_body().read_to_string().unwrap_or_default();
            return Err(TelemetryError::Remote { status, body });
        }
        Ok(())
    }
}
