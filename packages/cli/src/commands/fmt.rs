use super::{emit, read_grid, render, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FmtArgs {
    /// Grid file to format
    pub file: PathBuf,

    /// Indent the output
    #[arg(short, long)]
    pub pretty: bool,

    /// Rewrite the file in place
    #[arg(short, long)]
    pub write: bool,
}

pub fn fmt(args: FmtArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let grid = read_grid(&path)?;
    let text = render(&grid, args.pretty || config.pretty);
    emit(&text, args.write.then_some(path.as_path()))
}
