//! dbx-jobs CLI
//!
//! Entry point for the `dbx-jobs` command-line tool.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use dbx_jobs::models::MultitaskSubmission;
use dbx_jobs::payload::load_payload;
use dbx_jobs::{
    install_interrupt_handler, ClientConfig, InvocationContext, JobError, JobResult, JobsClient,
    LifecycleMonitor, RunNow, SubmitMultitaskRun, SubmitRun,
};
use dbx_protocol::RunId;
use dbx_schema::{decode_into_with, DecodeOptions, Value};
use serde_json::{json, Map};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dbx-jobs")]
#[command(about = "Submit and monitor remote jobs", version)]
struct Cli {
    /// Path to config file (TOML)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Workspace host (overrides DATABRICKS_HOST)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Personal access token (overrides DATABRICKS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Seconds between status polls
    #[arg(long, global = true)]
    poll_interval: Option<f64>,

    /// Attempts per API call, the first included
    #[arg(long, global = true)]
    retry_limit: Option<i64>,

    /// Seconds between attempts
    #[arg(long, global = true)]
    retry_delay: Option<f64>,

    /// Stable id of this invocation (default: random)
    #[arg(long, global = true)]
    invocation_id: Option<String>,

    /// Flow run name used in default run names
    #[arg(long, global = true)]
    flow_run_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a one-time single-task run and wait for it
    Submit {
        /// Payload file (JSON or TOML)
        #[arg(long, short = 'p')]
        payload: PathBuf,

        /// Run name (overrides the payload's)
        #[arg(long)]
        run_name: Option<String>,

        /// Cluster to run on (overrides the payload's)
        #[arg(long)]
        existing_cluster_id: Option<String>,

        /// Run timeout in seconds (overrides the payload's)
        #[arg(long)]
        timeout_seconds: Option<i64>,
    },

    /// Trigger an existing job and wait for it
    RunNow {
        /// Job to run
        #[arg(long)]
        job_id: Option<i64>,

        /// Base payload file (JSON or TOML)
        #[arg(long, short = 'p')]
        payload: Option<PathBuf>,

        /// Notebook parameter as key=value, merged into the payload's
        #[arg(long = "notebook-param", value_parser = parse_key_value)]
        notebook_params: Vec<(String, String)>,

        /// Python parameters, comma-separated
        #[arg(long, value_delimiter = ',')]
        python_params: Option<Vec<String>>,

        /// JAR parameters, comma-separated
        #[arg(long, value_delimiter = ',')]
        jar_params: Option<Vec<String>>,

        /// spark-submit parameters, comma-separated
        #[arg(long, value_delimiter = ',')]
        spark_submit_params: Option<Vec<String>>,
    },

    /// Submit a one-time multi-task run and wait for it
    SubmitMultitask {
        /// Payload file (JSON or TOML) with `tasks` and optional settings
        #[arg(long, short = 'p')]
        payload: PathBuf,
    },

    /// Print a run's current state
    Status {
        /// Run to query
        run_id: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Decode a multi-task payload and print the typed result
    Decode {
        /// Payload file (JSON or TOML)
        #[arg(long, short = 'p')]
        payload: PathBuf,

        /// Accept records that omit required fields
        #[arg(long)]
        lenient: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> JobResult<()> {
    let ctx = InvocationContext {
        invocation_id: cli.invocation_id.clone(),
        flow_run_name: cli.flow_run_name.clone(),
    };

    match &cli.command {
        Commands::Decode { payload, lenient } => run_decode(payload, *lenient),
        Commands::Status { run_id, json } => {
            let config = load_config(&cli)?;
            run_status(&JobsClient::from_config(&config)?, &RunId::new(run_id.as_str()), *json)
        }
        Commands::Submit {
            payload,
            run_name,
            existing_cluster_id,
            timeout_seconds,
        } => {
            let task = SubmitRun {
                run_name: run_name.clone(),
                existing_cluster_id: existing_cluster_id.clone(),
                timeout_seconds: *timeout_seconds,
                ..SubmitRun::new(load_payload(payload)?)
            };
            let (client, monitor) = session(&cli)?;
            let run_id = task.run(&client, &monitor)?;
            println!("{}", run_id);
            Ok(())
        }
        Commands::RunNow {
            job_id,
            payload,
            notebook_params,
            python_params,
            jar_params,
            spark_submit_params,
        } => {
            let json = payload.as_deref().map(load_payload).transpose()?;
            let notebook_params = (!notebook_params.is_empty()).then(|| {
                notebook_params
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                    .collect::<BTreeMap<_, _>>()
            });
            let (client, monitor) = session(&cli)?;
            let task = RunNow {
                json,
                job_id: *job_id,
                notebook_params,
                python_params: python_params.clone(),
                jar_params: jar_params.clone(),
                spark_submit_params: spark_submit_params.clone(),
                ..Default::default()
            };
            let run_id = task.run(&client, &monitor)?;
            println!("{}", run_id);
            Ok(())
        }
        Commands::SubmitMultitask { payload } => {
            let task = SubmitMultitaskRun::from_value(&load_payload(payload)?)?;
            let ctx = if ctx.invocation_id.is_none() {
                InvocationContext {
                    flow_run_name: ctx.flow_run_name,
                    ..InvocationContext::generate()
                }
            } else {
                ctx
            };
            let (client, monitor) = session(&cli)?;
            let run_id = task.run(&client, &monitor, &ctx)?;
            println!("{}", run_id);
            Ok(())
        }
    }
}

fn run_decode(payload: &Path, lenient: bool) -> JobResult<()> {
    let options = if lenient {
        DecodeOptions::lenient()
    } else {
        DecodeOptions::default()
    };
    let submission: MultitaskSubmission = decode_into_with(&load_payload(payload)?, options)?;
    let rendered = serde_json::to_string_pretty(&submission)
        .map_err(|e| JobError::Protocol(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

fn run_status(client: &JobsClient, run_id: &RunId, json: bool) -> JobResult<()> {
    let run = client.get_run(run_id)?;
    let run_page_url = run
        .run_page_url
        .clone()
        .unwrap_or_else(|| client.get_run_page_url(run_id));

    if json {
        let rendered = serde_json::to_string_pretty(&run)
            .map_err(|e| JobError::Protocol(e.to_string()))?;
        println!("{}", rendered);
    } else {
        println!("Run {}: {}", run_id, run.state);
        println!("{}", run_page_url);
    }
    Ok(())
}

/// Client plus a monitor that stops on SIGINT/SIGTERM.
fn session(cli: &Cli) -> JobResult<(JobsClient, LifecycleMonitor)> {
    let config = load_config(cli)?;
    let monitor = LifecycleMonitor::new(config.poll_interval);
    let client = JobsClient::from_config(&config)?.with_cancel_token(monitor.cancel_token().clone());
    if let Err(e) = install_interrupt_handler(monitor.cancel_token().clone()) {
        warn!("Cannot install interrupt handler: {}", e);
    }
    Ok((client, monitor))
}

fn load_config(cli: &Cli) -> JobResult<ClientConfig> {
    Ok(ClientConfig::load(cli.config.as_deref(), Some(cli_layer(cli)))?)
}

/// Configuration layer built from CLI flags.
fn cli_layer(cli: &Cli) -> serde_json::Value {
    let mut layer = Map::new();

    let mut connection = Map::new();
    if let Some(host) = &cli.host {
        connection.insert("host".to_string(), json!(host));
    }
    if let Some(token) = &cli.token {
        connection.insert("token".to_string(), json!(token));
    }
    if !connection.is_empty() {
        layer.insert("connection".to_string(), serde_json::Value::Object(connection));
    }

    if let Some(seconds) = cli.poll_interval {
        layer.insert("polling_period_seconds".to_string(), json!(seconds));
    }
    if let Some(limit) = cli.retry_limit {
        layer.insert("retry_limit".to_string(), json!(limit));
    }
    if let Some(seconds) = cli.retry_delay {
        layer.insert("retry_delay_seconds".to_string(), json!(seconds));
    }

    serde_json::Value::Object(layer)
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", s))
}
