use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::info;
use teamcity_queue::{ClientConfig, QueuedBuild, TeamCityClient, TriggerBuildRequestBuilder};

/// Put builds in a TeamCity queue and follow them.
///
/// Connection settings come from the environment (or a `.env` file):
/// TEAMCITY_URL, TEAMCITY_TOKEN or TEAMCITY_USERNAME/TEAMCITY_PASSWORD,
/// TEAMCITY_TIMEOUT_SECS.
#[derive(Parser, Debug)]
#[command(name = "teamcity-queue", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trigger a build of the given build configuration
    Trigger {
        /// Build configuration ID, e.g. Project_Build
        build_type_id: String,

        /// Branch to build instead of the default one
        #[arg(long)]
        branch: Option<String>,

        /// Build parameter as NAME=VALUE (repeatable)
        #[arg(short = 'p', long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Show the state of a queued build
    Status {
        /// Queued build ID
        build_id: String,
    },
    /// Check that the server answers
    Health,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

fn print_build(build: &QueuedBuild) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(build)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    info!("Using TeamCity at {}", config.base_url);

    let client = TeamCityClient::from_config(&config)?;

    match cli.command {
        Command::Trigger {
            build_type_id,
            branch,
            properties,
        } => {
            let mut builder = TriggerBuildRequestBuilder::new(build_type_id);
            if let Some(branch) = branch {
                builder = builder.branch(branch);
            }
            for (name, value) in properties {
                builder = builder.property(name, value);
            }

            let queued = client.build_queue().trigger_build(&builder.build()).await?;
            print_build(&queued)?;
        }
        Command::Status { build_id } => {
            let queued = client.build_queue().get_queued_build(&build_id).await?;
            print_build(&queued)?;
        }
        Command::Health => {
            if client.health_check().await? {
                println!("OK");
            } else {
                return Err("server did not answer with a success status".into());
            }
        }
    }

    Ok(())
}
