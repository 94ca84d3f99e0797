use clap::{Args, Parser, Subcommand};
use reqwest::Client;
use std::error::Error;

#[derive(Parser)]
#[command(name = "brd-dash-cli")]
#[command(about = "BRD dashboard CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "BRD_DASH_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average days per status transition
    Transitions(DashboardArgs),

    /// Assistant prefill trend
    #[command(name = "ai-prefill")]
    AiPrefill(DashboardArgs),

    /// Weekly upload grid
    Uploads(DashboardArgs),

    /// Counts by status and industry vertical
    Overview(DashboardArgs),

    /// Check server health
    Health,
}

#[derive(Args)]
struct DashboardArgs {
    /// Caller identity sent as x-user-id
    #[arg(short, long, env = "BRD_DASH_USER")]
    user: String,

    /// me or team
    #[arg(short, long)]
    scope: Option<String>,

    /// open or all
    #[arg(short, long)]
    brd_scope: Option<String>,

    /// month, quarter or year
    #[arg(short, long)]
    period: Option<String>,
}

impl DashboardArgs {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(scope) = &self.scope {
            query.push(("scope", scope.clone()));
        }
        if let Some(brd_scope) = &self.brd_scope {
            query.push(("brdScope", brd_scope.clone()));
        }
        if let Some(period) = &self.period {
            query.push(("period", period.clone()));
        }
        query
    }
}

async fn fetch_dashboard(
    client: &Client,
    endpoint: &str,
    family: &str,
    args: &DashboardArgs,
) -> Result<serde_json::Value, Box<dyn Error>> {
    let response = client
        .get(format!("{}/v1/dashboard/{}", endpoint, family))
        .header("x-user-id", &args.user)
        .query(&args.query())
        .send()
        .await?;

    Ok(response.json().await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = Client::new();

    let body = match &cli.command {
        Commands::Transitions(args) => {
            fetch_dashboard(&client, &cli.endpoint, "transitions", args).await?
        }
        Commands::AiPrefill(args) => {
            fetch_dashboard(&client, &cli.endpoint, "ai-prefill", args).await?
        }
        Commands::Uploads(args) => fetch_dashboard(&client, &cli.endpoint, "uploads", args).await?,
        Commands::Overview(args) => {
            fetch_dashboard(&client, &cli.endpoint, "overview", args).await?
        }
        Commands::Health => {
            let response = client
                .get(format!("{}/health", cli.endpoint))
                .send()
                .await?;

            response.json().await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
