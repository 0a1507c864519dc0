use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use calcwalk::decode;
use calcwalk::env::Environment;
use calcwalk::interpreter::Evaluator;
use calcwalk::io::{InputSource, OutputSink};
use calcwalk::node::Node;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let mut seeds: Vec<(String, i64)> = Vec::new();
    let mut quiet = false;
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--var" | "-v" => {
                let binding = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("Missing NAME=VALUE after {arg}"))?;
                let (name, value) = binding
                    .split_once('=')
                    .ok_or_else(|| anyhow::anyhow!("Expected NAME=VALUE, got '{binding}'"))?;
                let value: i64 = value
                    .parse()
                    .with_context(|| format!("Parsing seed value for '{name}'"))?;
                seeds.push((name.to_string(), value));
            }
            "--quiet" | "-q" => quiet = true,
            _ => {
                input_path = Some(arg);
                if args.next().is_some() {
                    bail!("Only one program file is supported");
                }
                break;
            }
        }
    }

    let source = if let Some(path) = input_path {
        fs::read_to_string(&path).with_context(|| format!("Reading {path}"))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    };

    let node: Node = serde_json::from_str(&source).context("Loading program")?;
    let program = decode::program(&node).context("Decoding program")?;

    let env: Environment = seeds.into_iter().collect();
    let mut input = InputSource::stdin();
    let mut output = if quiet {
        OutputSink::silent()
    } else {
        OutputSink::stdout()
    };
    let mut evaluator = Evaluator::new(&mut input, &mut output);
    let final_env = evaluator.run(&program, env).context("Executing program")?;

    let mut bindings: Vec<String> = final_env
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    bindings.sort();
    debug!(bindings = bindings.join(" "), "final environment");

    Ok(())
}
