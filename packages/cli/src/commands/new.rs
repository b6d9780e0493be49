use super::{emit, render, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use dashgrid_editor::Grid;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Grid name, also the seed of generated ids
    pub name: String,

    /// Space between cells in pixels (overrides config)
    #[arg(short, long)]
    pub space: Option<u32>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let grid = Grid::create(&args.name, Some(args.space.unwrap_or(config.default_space)));
    let output = args.output.map(|path| resolve(cwd, &path));
    emit(&render(&grid, config.pretty), output.as_deref())
}
