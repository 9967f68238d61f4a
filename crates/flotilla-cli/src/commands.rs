use flotilla_compose::{parse_topology_file, Manifest};
use flotilla_telemetry::{discover_own_address, LogClient, DEFAULT_CLIENT_IP};
use std::path::Path;
use std::process::ExitCode;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_TOPOLOGY_ERROR: u8 = 2;

fn load_manifest(topology: &Path) -> Result<Manifest, ExitCode> {
    parse_topology_file(topology)
        .and_then(flotilla_compose::TopologyV1::into_manifest)
        .map_err(|err| {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_TOPOLOGY_ERROR)
        })
}

pub fn render(topology: &Path, output: Option<&Path>) -> ExitCode {
    let mut manifest = match load_manifest(topology) {
        Ok(manifest) => manifest,
        Err(code) => return code,
    };

    if let Some(path) = output {
        if let Err(err) = manifest.write_to_file(path) {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
        return ExitCode::SUCCESS;
    }
    println!("{}", manifest.render().join("\n"));
    ExitCode::SUCCESS
}

pub fn fetch(topology: &Path, dest: &str, log_url: Option<&str>) -> ExitCode {
    let manifest = match load_manifest(topology) {
        Ok(manifest) => manifest,
        Err(code) => return code,
    };

    let logger = match log_url {
        Some(url) => match LogClient::connect(url, 0) {
            Ok(client) => Some(client),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::from(EXIT_FAILURE);
            }
        },
        None => None,
    };

    let reports = manifest.fetch_all_repos(dest);
    let mut failed = 0usize;
    for report in &reports {
        match &report.result {
            Ok(()) => {
                println!("fetched {} -> {}", report.service, report.dest.display());
                forward_outcome(logger.as_ref(), &report.service, None);
            }
            Err(err) => {
                failed += 1;
                eprintln!("failed  {}: {err}", report.service);
                forward_outcome(logger.as_ref(), &report.service, Some(&err.to_string()));
            }
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} fetches failed", reports.len());
        return ExitCode::from(EXIT_FAILURE);
    }
    ExitCode::SUCCESS
}

fn forward_outcome(logger: Option<&LogClient>, service: &str, failure: Option<&str>) {
    let Some(client) = logger else { return };
    let sent = match failure {
        None => client.info(&format!("fetched repository for {service}"), "fetch", DEFAULT_CLIENT_IP, 0),
        Some(err) => client.error(
            &format!("repository fetch for {service} failed: {err}"),
            "fetch",
            DEFAULT_CLIENT_IP,
            0,
        ),
    };
    if let Err(err) = sent {
        tracing::warn!("could not forward fetch outcome for {service}: {err}");
    }
}

pub fn discover_ip(endpoints: &[String]) -> ExitCode {
    let address = discover_own_address(endpoints, None);
    println!("{address}");
    ExitCode::SUCCESS
}
