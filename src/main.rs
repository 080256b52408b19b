// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! requests CLI
//!
//! Send one request from the command line using the library's argument
//! model.

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use requests::{Arg, Auth, Data, Files, Header, Params, Session, SessionConfig};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("requests=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("requests {}", requests::VERSION);
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let (dispatch, rest) = match Dispatch::parse(&args[1], &args[2..]) {
        Some(parsed) => parsed,
        None if args[1] == "send" => {
            eprintln!("Usage: requests send <method> <url> [OPTIONS]");
            return ExitCode::from(1);
        }
        None => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
            return ExitCode::from(1);
        }
    };

    let invocation = match Invocation::parse(rest) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(1);
        }
    };

    match run(dispatch, invocation).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Request failed: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"requests - send HTTP requests from the command line

USAGE:
    requests <COMMAND> <url> [OPTIONS]

COMMANDS:
    get <url>               Send a GET request
    post <url>              Send a POST request
    json <url>              Send a POST request with a JSON content type
    send <method> <url>     Send a request with any method
    help                    Show this help message
    version                 Show version information

OPTIONS:
    -H <name:value>         Add a header
    -p <key=value>          Add a query parameter
    -d <key=value>          Add a form field
    -f <field=path>         Upload a file
    -u <user:pass>          Basic auth credentials
    --body <text>           Send a raw body
    --timeout <secs>        Overall request timeout
    --proxy <url>           Route through a proxy
    -o <file>               Save the response body to a file
    --debug                 Dump request and response headers

EXAMPLES:
    requests get "http://httpbin.org/get?x=1" -p y=2
    requests post http://httpbin.org/post -d name=a -f upload=/tmp/f.txt
    requests json http://httpbin.org/post --body '{{"name": "lzh"}}'
    requests send PUT http://httpbin.org/put -u user:pass
"#
    );
}

/// How the request goes out
#[derive(Debug, PartialEq)]
enum Dispatch {
    /// `Session::send` with this method
    Method(String),
    /// `Session::post_json`
    PostJson,
}

impl Dispatch {
    /// Split a command and its arguments into the dispatch and the rest
    fn parse<'a>(command: &str, rest: &'a [String]) -> Option<(Self, &'a [String])> {
        match command {
            "get" => Some((Dispatch::Method("GET".to_string()), rest)),
            "post" => Some((Dispatch::Method("POST".to_string()), rest)),
            "json" => Some((Dispatch::PostJson, rest)),
            "send" => rest
                .split_first()
                .map(|(method, rest)| (Dispatch::Method(method.clone()), rest)),
            _ => None,
        }
    }
}

/// Parsed command line after the method
#[derive(Debug, Default)]
struct Invocation {
    url: String,
    args: Vec<Arg>,
    timeout: Option<u64>,
    proxy: Option<String>,
    output: Option<String>,
    debug: bool,
}

impl Invocation {
    fn parse(raw: &[String]) -> anyhow::Result<Self> {
        let mut iter = raw.iter();
        let url = iter.next().ok_or_else(|| anyhow!("Missing <url>"))?.clone();
        let mut invocation = Invocation {
            url,
            ..Default::default()
        };

        while let Some(flag) = iter.next() {
            if flag == "--debug" {
                invocation.debug = true;
                continue;
            }
            let value = iter
                .next()
                .with_context(|| format!("Missing value for {}", flag))?;
            let arg = match flag.as_str() {
                "-H" => {
                    let (k, v) = split_pair(value, ':')?;
                    Arg::from(Header::from([(k, v)]))
                }
                "-p" => {
                    let (k, v) = split_pair(value, '=')?;
                    Arg::from(Params::from([(k, v)]))
                }
                "-d" => {
                    let (k, v) = split_pair(value, '=')?;
                    Arg::from(Data::from([(k, v)]))
                }
                "-f" => {
                    let (k, v) = split_pair(value, '=')?;
                    Arg::from(Files::from([(k, v)]))
                }
                "-u" => {
                    let parts: Vec<&str> = value.splitn(2, ':').collect();
                    Arg::from(Auth::from_parts(&parts)?)
                }
                "--body" => Arg::from(value.as_str()),
                "--timeout" => {
                    invocation.timeout = Some(value.parse().context("Invalid --timeout")?);
                    continue;
                }
                "--proxy" => {
                    invocation.proxy = Some(value.clone());
                    continue;
                }
                "-o" => {
                    invocation.output = Some(value.clone());
                    continue;
                }
                other => bail!("Unknown option: {}", other),
            };
            invocation.args.push(arg);
        }

        Ok(invocation)
    }
}

fn split_pair(value: &str, sep: char) -> anyhow::Result<(&str, &str)> {
    value
        .split_once(sep)
        .map(|(k, v)| (k.trim(), v.trim()))
        .ok_or_else(|| anyhow!("Expected key{}value, got '{}'", sep, value))
}

/// Returns whether the response status was a success
async fn run(dispatch: Dispatch, invocation: Invocation) -> anyhow::Result<bool> {
    let mut config = SessionConfig::new().debug(invocation.debug);
    if let Some(secs) = invocation.timeout {
        config = config.timeout(std::time::Duration::from_secs(secs));
    }
    if let Some(proxy) = invocation.proxy {
        config = config.proxy(proxy);
    }
    let mut session = Session::with_config(config)?;

    let mut resp = match dispatch {
        Dispatch::PostJson => session.post_json(&invocation.url, invocation.args).await?,
        Dispatch::Method(method) => {
            session
                .send(&method, &invocation.url, invocation.args)
                .await?
        }
    };

    eprintln!(
        "{} {} ({} ms)",
        resp.status_code(),
        resp.url(),
        resp.elapsed().as_millis()
    );

    match invocation.output {
        Some(path) => {
            resp.save_to_file(&path)
                .await
                .with_context(|| format!("Saving body to {}", path))?;
            eprintln!("Saved {} bytes to {}", resp.len().unwrap_or(0), path);
        }
        None => println!("{}", resp.text().await?),
    }

    Ok(resp.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_invocation() {
        let inv = Invocation::parse(&strings(&[
            "http://example.test",
            "-H",
            "accept: text/plain",
            "-p",
            "y=2",
            "-u",
            "user:pa:ss",
            "--debug",
            "-o",
            "out.bin",
        ]))
        .unwrap();

        assert_eq!(inv.url, "http://example.test");
        assert_eq!(inv.args.len(), 3);
        assert!(inv.debug);
        assert_eq!(inv.output.as_deref(), Some("out.bin"));
        match &inv.args[2] {
            Arg::Auth(auth) => assert_eq!(auth.password, "pa:ss"),
            other => panic!("unexpected {}", other.kind()),
        }
    }

    #[test]
    fn test_dispatch_parse() {
        let rest = strings(&["JSON", "http://x", "--debug"]);
        let (dispatch, tail) = Dispatch::parse("send", &rest).unwrap();
        assert_eq!(dispatch, Dispatch::Method("JSON".to_string()));
        assert_eq!(tail, &rest[1..]);

        let (dispatch, tail) = Dispatch::parse("json", &rest[1..]).unwrap();
        assert_eq!(dispatch, Dispatch::PostJson);
        assert_eq!(tail.len(), 2);

        assert!(Dispatch::parse("send", &[]).is_none());
        assert!(Dispatch::parse("fetch", &rest).is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Invocation::parse(&[]).is_err());
        assert!(Invocation::parse(&strings(&["http://x", "-p"])).is_err());
        assert!(Invocation::parse(&strings(&["http://x", "-p", "novalue"])).is_err());
        assert!(Invocation::parse(&strings(&["http://x", "-u", "nocolon"])).is_err());
        assert!(Invocation::parse(&strings(&["http://x", "--what", "1"])).is_err());
    }
}
