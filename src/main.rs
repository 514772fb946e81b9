use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
    {
        eprintln!("Failed to initialize logger: {err}");
        return ExitCode::FAILURE;
    }

    let args: Vec<String> = std::env::args().collect();
    match papertrack::run::run(args, None).await {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
