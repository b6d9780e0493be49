use super::{emit, read_grid, render, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct IdsArgs {
    /// Grid file to fill with ids
    pub file: PathBuf,

    /// Rewrite the file in place
    #[arg(short, long)]
    pub write: bool,
}

pub fn ids(args: IdsArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let mut grid = read_grid(&path)?;

    let assigned = grid.set_ids(grid.root());
    eprintln!("  {} Assigned {} ids", "✓".green(), assigned);

    emit(&render(&grid, config.pretty), args.write.then_some(path.as_path()))
}
