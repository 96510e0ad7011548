use teamcity_queue::{Credentials, TeamCityClient, TriggerBuildRequestBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Guest access against a local server (adjust URL as needed)
    let client = TeamCityClient::new("http://127.0.0.1:8111", Credentials::Guest)?;

    match client.health_check().await {
        Ok(true) => println!("✓ Server is healthy"),
        Ok(false) => println!("⚠ Server returned non-success status"),
        Err(e) => println!("✗ Health check failed: {}", e),
    }

    let request = TriggerBuildRequestBuilder::new("Sandbox_Build")
        .branch("main")
        .property("env.GREETING", "hello")
        .build();

    println!("\n🚀 Triggering {}...\n", request.build_type_id);

    let queued = client.build_queue().trigger_build(&request).await?;
    println!("✓ Queued build {} ({})", queued.id, queued.state);
    if !queued.web_url.is_empty() {
        println!("  {}", queued.web_url);
    }

    let latest = client.build_queue().get_queued_build(&queued.get_id()).await?;
    println!("  State: {}", latest.state);
    if !latest.wait_reason.is_empty() {
        println!("  Waiting: {}", latest.wait_reason);
    }

    Ok(())
}
