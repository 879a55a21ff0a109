use coverage::{App, CONFIG};

fn main() -> Result<(), String> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let app = App::new(&CONFIG).map_err(|e| e.to_string())?;
    app.run().map_err(|e| e.to_string())?;

    Ok(())
}
