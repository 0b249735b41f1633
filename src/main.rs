// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! secure-requests CLI
//!
//! Fetch a URL through the verified transport, or manage the local CA bundle.
//! Options not given on the command line come from `SECURE_REQUESTS_*`
//! environment variables.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use secure_requests::{
    init_logging, CertificateFetcher, ChecksumExpectation, ReqwestTransport, SecureConfig,
    SecureRequests, TlsContext,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "fetch" => fetch_url(&args[2..]).await,
        "cert" => fetch_certificate(&args[2..]).await,
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("secure-requests {}", secure_requests::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"secure-requests - HTTP client with a verified CA bundle

USAGE:
    secure-requests <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>     Request a URL and print the response
        --method <M>        GET, POST, PUT, DELETE or PATCH (default GET)
        --unsafe            Disable certificate verification
        --write <FILE>      Write the response body to FILE
    cert            Download the CA bundle
        --force             Replace an existing bundle
        --checksum <HEX>    Expected SHA-256 of the bundle
        --fetch-checksum    Verify against the published checksum file
        --path <P>          Bundle location
        --url <U>           Bundle source
    help            Show this help message
    version         Show version information

EXAMPLES:
    secure-requests fetch https://example.com
    secure-requests fetch https://example.com/api --method POST --write out.json
    secure-requests cert --force --fetch-checksum
"#
    );
}

/// Value following `flag`, if present
fn option<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => match args.get(i + 1) {
            Some(value) if !value.starts_with("--") => Ok(Some(value.as_str())),
            _ => bail!("{} needs a value", flag),
        },
        None => Ok(None),
    }
}

fn flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn load_config() -> Result<SecureConfig> {
    let config = SecureConfig::from_env().context("reading SECURE_REQUESTS_* variables")?;
    init_logging(&config).context("initializing logging")?;
    Ok(config)
}

async fn fetch_url(args: &[String]) -> Result<()> {
    let Some(url) = args.first().filter(|a| !a.starts_with("--")) else {
        bail!("Usage: secure-requests fetch <url> [--method M] [--unsafe] [--write FILE]");
    };
    let method = option(args, "--method")?.unwrap_or("GET");
    let write = option(args, "--write")?.map(PathBuf::from);

    let mut config = load_config()?;
    if flag(args, "--unsafe") {
        config = config.unsafe_mode(true);
    }

    let client = SecureRequests::new(config)
        .await
        .context("building client")?;
    let response = client.request(method, url, None, None).await?;

    println!("Status: {} {}", response.status_code(), response.reason());
    println!("URL: {}", response.url_str());
    println!("TLS: {}", client.tls_context().label());
    println!("Size: {} bytes", response.body_len());
    println!("Time: {}ms", response.response_time_ms);

    match write {
        Some(path) => {
            fs::write(&path, &response.body)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Saved to {}", path.display());
        }
        None => println!("\n{}", response.text_lossy()),
    }
    Ok(())
}

async fn fetch_certificate(args: &[String]) -> Result<()> {
    let mut config = load_config()?;
    if let Some(url) = option(args, "--url")? {
        config = config.certificate_url(url);
    }
    if let Some(path) = option(args, "--path")? {
        config = config.certificate_path(path);
    }

    let expectation = match (option(args, "--checksum")?, flag(args, "--fetch-checksum")) {
        (Some(_), true) => bail!("--checksum and --fetch-checksum are mutually exclusive"),
        (Some(digest), false) => ChecksumExpectation::Explicit(digest.to_string()),
        (None, true) => ChecksumExpectation::FetchFromSource,
        (None, false) => config.checksum_expectation(),
    };
    config.validate()?;

    let tls = TlsContext::from_config(&config, None)?;
    let transport = ReqwestTransport::new(&tls, config.request_timeout())?;
    let bundle = CertificateFetcher::new(Arc::new(transport))
        .checksum_suffix(config.checksum_suffix.clone())
        .redact_url(config.redact_certificate_url)
        .fetch(
            &config.certificate_url,
            &config.certificate_path,
            flag(args, "--force"),
            &expectation,
        )
        .await?;

    let status = bundle.status();
    println!("Bundle: {}", bundle.path.display());
    println!("Source: {:?}", bundle.source);
    println!("Present: {}", status.present);
    println!("Verified: {}", status.verified);
    if let Some(sha256) = &bundle.sha256 {
        println!("SHA-256: {}", sha256);
    }
    Ok(())
}
