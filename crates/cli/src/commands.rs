use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use demolink_protocol::{MatchRequest, sharecode};
use demolink_runtime::extract;
use serde_json::{Value, json};

use crate::cli::{Cli, Command};

/// Runs the selected subcommand, returning the process exit code.
///
/// `extract` exits 2 when no URL was found, so scripts can distinguish
/// "payload had no URL" from hard failures without parsing output.
pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Command::Decode { share_code } => {
            let request = sharecode::decode(&share_code)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&request)?);
            } else {
                println!("match_id:   {}", request.match_id);
                println!("outcome_id: {}", request.outcome_id);
                println!("token:      {}", request.token);
            }
            Ok(0)
        }
        Command::Encode { match_id, outcome_id, token } => {
            let code = sharecode::encode(&MatchRequest { match_id, outcome_id, token })?;
            if cli.json {
                println!("{}", json!({ "share_code": code }));
            } else {
                println!("{code}");
            }
            Ok(0)
        }
        Command::Extract { payload, share_code, match_id, token } => {
            let (match_id, token) = match (share_code, match_id, token) {
                (Some(code), _, _) => {
                    let request = sharecode::decode(&code)?;
                    (request.match_id, request.token)
                }
                (None, Some(match_id), Some(token)) => (match_id, token),
                _ => bail!("pass either --share-code or both --match-id and --token"),
            };

            let payload = read_payload(&payload)?;
            match extract(&payload, match_id, token) {
                Some(url) => {
                    if cli.json {
                        println!("{}", json!({ "demo_url": url }));
                    } else {
                        println!("{url}");
                    }
                    Ok(0)
                }
                None => {
                    if cli.json {
                        println!("{}", json!({ "demo_url": Value::Null }));
                    } else {
                        eprintln!("no demo url found in payload");
                    }
                    Ok(2)
                }
            }
        }
    }
}

fn read_payload(path: &Path) -> anyhow::Result<Value> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading payload from {}", path.display()))?
    };
    serde_json::from_str(&raw).context("payload is not valid JSON")
}
