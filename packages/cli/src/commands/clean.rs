use super::{emit, read_grid, render, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Grid file to normalize
    pub file: PathBuf,

    /// Rewrite the file in place
    #[arg(short, long)]
    pub write: bool,
}

pub fn clean(args: CleanArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let mut grid = read_grid(&path)?;

    let root = grid.root();
    grid.clean_grid(root)?;

    emit(&render(&grid, config.pretty), args.write.then_some(path.as_path()))
}
