use clap::Parser;
use dc_matrix_calculator::{app, ui_cli::Cli};
use tracing_subscriber::EnvFilter;

/// 프로그램의 엔트리 포인트. 로그를 초기화한 뒤 하위 명령을 실행한다.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    app::run(cli)?;
    Ok(())
}
