use anyhow::Result;

use rusty_trends::config::AnalysisConfig;
use rusty_trends::pipeline;
use rusty_trends::plot::bitmap::BitmapRenderer;

fn main() -> Result<()> {
    env_logger::init();

    let config = AnalysisConfig::from_env()?;
    let mut renderer = BitmapRenderer::from_config(&config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pipeline::run(&config, &mut renderer, &mut out)?;
    Ok(())
}
