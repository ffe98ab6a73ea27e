//! `oled-fontgen` entry point.

use clap::Parser;
use oled_fontgen::{Args, run};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();
    run(&args)?;
    Ok(())
}
