use super::{emit, read_grid, render, resolve};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use dashgrid_editor::Grid;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ToJsonArgs {
    /// Grid file to convert
    pub file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FromJsonArgs {
    /// JSON file holding the object form of a grid
    pub file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Indent the output
    #[arg(short, long)]
    pub pretty: bool,
}

pub fn to_json(args: ToJsonArgs, cwd: &str) -> Result<()> {
    let grid = read_grid(&resolve(cwd, &args.file))?;
    let json = serde_json::to_string_pretty(&grid.to_object())?;
    let output = args.output.map(|path| resolve(cwd, &path));
    emit(&json, output.as_deref())
}

pub fn from_json(args: FromJsonArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let object: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let grid = Grid::from_object(&object)?;
    let output = args.output.map(|path| resolve(cwd, &path));
    emit(&render(&grid, args.pretty || config.pretty), output.as_deref())
}
