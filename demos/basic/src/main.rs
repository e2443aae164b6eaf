/**
 * Minimal command-line harness for the Metrika SDK.
 *
 * Sends one hit for a made-up inbound request, e.g.:
 *
 *   cargo run -p metrika_demo -- --counter 123456 hit --title "Main page"
 *   cargo run -p metrika_demo -- --counter 123456 goal back
 *   cargo run -p metrika_demo -- --counter 123456 download /file.zip
 *   cargo run -p metrika_demo -- --config metrika.json params '{"level1":{"level2":1}}'
 *
 * Set `RUST_LOG=metrika_core=debug` to watch the request go out.
 */
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "metrika-demo", about = "Send a server-side hit to Yandex.Metrika")]
struct Cli {
    /// Counter id.
    #[arg(long, env = "METRIKA_COUNTER_ID")]
    counter: Option<String>,

    /// JSON file with client options; `--counter` overrides its counter id.
    #[arg(long, env = "METRIKA_CONFIG")]
    config: Option<PathBuf>,

    /// Counter class.
    #[arg(long, default_value_t = 0)]
    class: u32,

    /// Host of the simulated inbound request.
    #[arg(long, default_value = "example.ru")]
    host: String,

    /// Path and query of the simulated inbound request.
    #[arg(long, default_value = "/")]
    path: String,

    /// Treat the inbound request as HTTPS.
    #[arg(long)]
    https: bool,

    #[arg(long, default_value = "")]
    referrer: String,

    #[arg(long, default_value = "")]
    ip: String,

    #[arg(long, default_value = "")]
    user_agent: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Page view.
    Hit {
        #[arg(long)]
        url: Option<String>,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long)]
        noindex: bool,
    },
    /// Goal reached.
    Goal { target: Option<String> },
    /// Outbound link click.
    Link {
        url: String,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// File download.
    Download {
        url: String,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Visit parameters as JSON.
    Params { json: String },
    /// Not-a-bounce marker.
    NotBounce,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let client = metrika::Client::new(load_options(&cli)?).context("invalid client options")?;

    let ctx = metrika::RequestContext::new(&cli.host)
        .secure(cli.https)
        .request_uri(&cli.path)
        .referrer(&cli.referrer)
        .real_ip(&cli.ip)
        .user_agent(&cli.user_agent);

    let sent = match cli.command {
        Command::Hit {
            url,
            title,
            noindex,
        } => {
            let mut hit = metrika::PageHit::new().title(title);
            hit.url = url;
            if noindex {
                hit = hit.index_directive("noindex");
            }
            client.page_hit(&ctx, hit)
        }
        Command::Goal { target } => client.reach_goal(&ctx, target.as_deref().unwrap_or(""), None),
        Command::Link { url, title } => client.external_link(&ctx, &url, &title),
        Command::Download { url, title } => client.file_download(&ctx, &url, &title),
        Command::Params { json } => {
            let data = serde_json::from_str(&json).context("params must be valid JSON")?;
            client.report_params(&ctx, data)
        }
        Command::NotBounce => client.not_bounce(&ctx),
    };

    if !sent {
        bail!("hit was not sent (see log output)");
    }

    println!("[demo] hit sent for counter {}", client.counter_id());
    Ok(())
}

fn load_options(cli: &Cli) -> Result<metrika::Options> {
    let mut options = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<metrika::Options>(&raw)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => metrika::Options::default(),
    };

    if let Some(counter) = &cli.counter {
        options.counter_id = counter.clone();
    }
    if cli.class != 0 {
        options.counter_class = cli.class;
    }

    Ok(options)
}
