use super::{emit, read_grid, render, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::{ArgGroup, Args};
use dashgrid_editor::PlaceholderOptions;
use std::path::PathBuf;

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["enter", "exit", "refresh"])
))]
pub struct DesignArgs {
    /// Grid file to edit
    pub file: PathBuf,

    /// Add the placeholder overlay
    #[arg(long)]
    pub enter: bool,

    /// Remove the placeholder overlay
    #[arg(long)]
    pub exit: bool,

    /// Rebuild the overlay after edits
    #[arg(long)]
    pub refresh: bool,

    /// Keep modules as leaves instead of turning them into grids
    #[arg(long)]
    pub flat: bool,

    /// Rewrite the file in place
    #[arg(short, long)]
    pub write: bool,
}

pub fn design(args: DesignArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let mut grid = read_grid(&path)?;

    let options = if args.flat {
        PlaceholderOptions { modules_into_grids: false }
    } else {
        config.placeholder_options()
    };

    let root = grid.root();
    if args.enter {
        grid.add_placeholders_with(root, options)?;
    } else if args.exit {
        grid.remove_placeholders(root)?;
    } else {
        grid.clean_placeholders_with(root, options)?;
    }

    emit(&render(&grid, config.pretty), args.write.then_some(path.as_path()))
}
