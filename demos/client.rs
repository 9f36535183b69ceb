use hyscores_client::{Client, ClientConfig};

#[tokio::main]
async fn main() -> hyscores_client::Result<()> {
    tracing_subscriber::fmt().init();

    // While a HyScores service is running locally...
    let config = ClientConfig::builder("http://127.0.0.1:5000/", "hyscores")
        .timeout_secs(10)
        .user_agent(concat!("hyscores-client/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let mut client = Client::new(config)?;

    // Accounts are per-service; registering twice simply returns `false`.
    let registered = client.register("sadam", "hunter2").await?;
    println!("freshly registered: {registered}");

    client.login("sadam", "hunter2").await?;

    client.post_score("sadam", 36).await?;

    // Scores come back in the service's own shape.
    for score in client.get_scores().await? {
        println!("{score}");
    }

    let score = client.get_score("sadam").await?;
    println!("sadam: {score:?}");

    client.logout()?;
    client.close();

    Ok(())
}
