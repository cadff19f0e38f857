use minos::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let environment = Environment::from_env();
    init_telemetry(&TelemetryConfig::for_environment(environment.name()))?;

    let mut app = minos_helloworld::app(env!("CARGO_MANIFEST_DIR"), AppOptions::default());
    app.initialize()?;
    app.listen().await?;
    Ok(())
}
