use crate::logger::{LogClient, DEFAULT_CLIENT_IP};
use std::time::Duration;

/// Address returned when every candidate endpoint fails.
pub const LOOPBACK_ADDRESS: &str = "127.0.0.1";

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Ask each candidate endpoint for this host's externally visible address.
///
/// Endpoints are tried in order with a five-second timeout each; the first
/// successful response body wins and is returned verbatim. A failed attempt
/// is reported as a warning through `logger` when one is supplied, then the
/// walk moves on. With every candidate exhausted the loopback address comes
/// back instead.
pub fn discover_own_address(candidates: &[String], logger: Option<&LogClient>) -> String {
    let agent = ureq::Agent::config_builder()
        .timeout_global(Some(ATTEMPT_TIMEOUT))
        .build()
        .new_agent();

    for url in candidates {
        match probe(&agent, url) {
            Ok(address) => return address,
            Err(reason) => {
                tracing::warn!("address endpoint {url} failed: {reason}");
                if let Some(client) = logger {
                    let message = format!("could not reach endpoint {url}: {reason}");
                    if let Err(err) =
                        client.warn(&message, "discover_own_address", DEFAULT_CLIENT_IP, 0)
                    {
                        tracing::warn!("could not forward discovery warning: {err}");
                    }
                }
            }
        }
    }
    LOOPBACK_ADDRESS.to_owned()
}

fn probe(agent: &ureq::Agent, url: &str) -> Result<String, String> {
    let resp = agent.get(url).call().map_err(|e| e.to_string())?;
    resp.into_body().read_to_string().map_err(|e| e.to_string())
}
