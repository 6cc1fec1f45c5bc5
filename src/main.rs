use flappy::{app::App, config::GameConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Flappy");
    App::run(GameConfig::from_env())?;
    Ok(())
}
