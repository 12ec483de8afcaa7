//! `ordr`: terminal front end for the order board.
//!
//! The rendered board goes to stdout; logs go to stderr.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ordr_board::{
    render::RenderOptions, BoardController, Field, HttpOrdersApi, SubmitOutcome, SubmitRefusal,
};
use ordr_config::ClientConfig;
use tracing::info;

#[derive(Parser)]
#[command(name = "ordr")]
#[command(about = "Order tracking board", long_about = None)]
struct Cli {
    /// Gateway base URL. Falls back to ORDR_API_URL, then http://localhost:4000.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Also print the list sorted by ascending due date.
    #[arg(long, global = true, default_value_t = false)]
    by_due_date: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and show all orders
    List,

    /// Create an order, then show the refreshed list
    Add(AddArgs),
}

#[derive(Args)]
struct AddArgs {
    #[arg(long, default_value = "")]
    order_number: String,

    #[arg(long, default_value = "")]
    product: String,

    /// Sent as typed; the store decides how to interpret it.
    #[arg(long, default_value = "")]
    quantity: String,

    /// Calendar date, e.g. 2024-01-31.
    #[arg(long, default_value = "")]
    due_date: String,

    /// Set a form field by its input name, e.g. `--set quantity=5`.
    /// Applied after the dedicated flags; repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    set: Vec<(Field, String)>,
}

fn parse_assignment(raw: &str) -> Result<(Field, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = name.trim().parse::<Field>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    ordr_config::load_dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = match cli.api_url {
        Some(url) => ClientConfig::with_api_url(url),
        None => ClientConfig::from_env(),
    };
    info!(api_url = %config.api_url, "using gateway");

    let ctl = BoardController::new(HttpOrdersApi::new(&config));
    let opts = RenderOptions {
        by_due_date: cli.by_due_date,
    };

    ctl.mount().await;

    let mut refused = false;
    if let Commands::Add(add) = cli.cmd {
        for (field, value) in [
            (Field::OrderNumber, add.order_number),
            (Field::Product, add.product),
            (Field::Quantity, add.quantity),
            (Field::DueDate, add.due_date),
        ]
        .into_iter()
        .chain(add.set)
        {
            ctl.set_field(field, value).await;
        }

        match ctl.submit().await {
            SubmitOutcome::Created(Some(order)) => info!(id = %order.id, "order created"),
            SubmitOutcome::Created(None) => info!("order created"),
            SubmitOutcome::Failed(_) => {}
            SubmitOutcome::Refused(SubmitRefusal::Incomplete(missing)) => {
                let names: Vec<&str> = missing.iter().map(Field::label).collect();
                eprintln!("missing required fields: {}", names.join(", "));
                refused = true;
            }
            // The board already shows the mount error.
            SubmitOutcome::Refused(SubmitRefusal::NotReady) => refused = true,
        }
    }

    print!("{}", ctl.render_text(opts).await);

    let failed = ctl.snapshot().await.error().is_some();
    Ok(if failed || refused {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
