use garmin_connect_client::{
    Credentials, GarminClient, config::Config, http_client::ReqwestGarminClient,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;
    let client = ReqwestGarminClient::from_config(&cfg)?;

    let (Ok(email), Ok(password)) = (
        std::env::var("GARMIN_EMAIL"),
        std::env::var("GARMIN_PASSWORD"),
    ) else {
        eprintln!("set GARMIN_EMAIL and GARMIN_PASSWORD to run this example");
        return Ok(());
    };

    let limit = std::env::var("GARMIN_LIMIT")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(5);

    client
        .authenticate(&Credentials::new(email, password))
        .await
        .map_err(|e| format!("login failed: {}", e))?;

    let activities = client
        .list_activities(limit)
        .await
        .map_err(|e| format!("failed to fetch activities: {}", e))?;

    if activities.is_empty() {
        println!("No activities returned");
        return Ok(());
    }

    println!("Recent activities (limit {}):", limit);
    for a in activities {
        let name = a
            .fields()
            .get("activityName")
            .and_then(|v| v.as_str())
            .unwrap_or("(no name)");
        println!("- {} - {}", a.id(), name);
    }

    Ok(())
}
