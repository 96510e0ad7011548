use std::env;
use teamcity_queue::{Credentials, TeamCityClient, TriggerBuildRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_url = env::var("TEAMCITY_URL").unwrap_or_else(|_| "http://127.0.0.1:8111".to_string());
    let build_type = env::var("TEAMCITY_BUILD_TYPE").unwrap_or_else(|_| "Sandbox_Build".to_string());

    let credentials = match env::var("TEAMCITY_TOKEN") {
        Ok(token) => {
            println!("🔐 Using access token authentication");
            Credentials::token(token)
        }
        Err(_) => {
            println!("⚠ No token provided (set TEAMCITY_TOKEN), falling back to guest access");
            Credentials::Guest
        }
    };

    let client = TeamCityClient::new(&api_url, credentials)?;

    match client
        .build_queue()
        .trigger_build(&TriggerBuildRequest::new(build_type, None))
        .await
    {
        Ok(queued) => println!("✓ Queued build {} ({})", queued.id, queued.state),
        Err(e) => {
            eprintln!("✗ Error: {}", e);
            if e.is_auth_error() {
                eprintln!("\nTip: Make sure TEAMCITY_TOKEN is set correctly");
            }
            return Err(e.into());
        }
    }

    Ok(())
}
