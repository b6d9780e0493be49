use super::{parse_failure, render, resolve};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dashgrid_editor::{EditorError, GridDocument, Mutation};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Grid file to edit
    pub file: PathBuf,

    /// JSON array of mutations
    pub mutations: PathBuf,

    /// Save the document in place
    #[arg(short, long)]
    pub write: bool,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);

    let mut doc = match GridDocument::load(path.clone()) {
        Ok(doc) => doc,
        Err(EditorError::Parse(err)) => {
            let source = fs::read_to_string(&path)?;
            return Err(parse_failure(&path, &source, &err));
        }
        Err(err) => return Err(err.into()),
    };

    let mutations_path = resolve(cwd, &args.mutations);
    let content = fs::read_to_string(&mutations_path)
        .with_context(|| format!("Cannot read {}", mutations_path.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a list of mutations", mutations_path.display()))?;

    for (index, mutation) in mutations.into_iter().enumerate() {
        let result = doc
            .apply(mutation)
            .with_context(|| format!("Mutation #{} failed", index + 1))?;
        match result.created {
            Some(id) => eprintln!("  {} v{} created {}", "✓".green(), result.version, id),
            None => eprintln!("  {} v{}", "✓".green(), result.version),
        }
    }

    if args.write {
        if doc.is_dirty() {
            doc.save()?;
            eprintln!("  {} Saved {}", "✓".green(), path.display());
        }
    } else {
        println!("{}", render(doc.grid(), config.pretty));
    }

    Ok(())
}
