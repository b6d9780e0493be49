pub mod apply;
pub mod clean;
pub mod convert;
pub mod design;
pub mod fmt;
pub mod ids;
pub mod new;

pub use apply::{apply, ApplyArgs};
pub use clean::{clean, CleanArgs};
pub use convert::{from_json, to_json, FromJsonArgs, ToJsonArgs};
pub use design::{design, DesignArgs};
pub use fmt::{fmt, FmtArgs};
pub use ids::{ids, IdsArgs};
pub use new::{new, NewArgs};

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use dashgrid_editor::Grid;
use dashgrid_markup::{format_parse_error, parse, ParseError};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a user-supplied path against the working directory
pub(crate) fn resolve(cwd: &str, path: &Path) -> PathBuf {
    PathBuf::from(cwd).join(path)
}

/// Read and parse a grid file
pub(crate) fn read_grid(path: &Path) -> Result<Grid> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let tree = parse(&source).map_err(|err| parse_failure(path, &source, &err))?;
    Ok(Grid::from_tree(tree)?)
}

/// Parse error rendered against its source
pub(crate) fn parse_failure(path: &Path, source: &str, err: &ParseError) -> anyhow::Error {
    let filename = path.display().to_string();
    anyhow!("{}: {}\n{}", filename, err, format_parse_error(source, &filename, err))
}

pub(crate) fn render(grid: &Grid, pretty: bool) -> String {
    if pretty {
        grid.to_pretty_text("  ")
    } else {
        grid.to_text()
    }
}

/// Write `text` to `target`, or print it when there is none
pub(crate) fn emit(text: &str, target: Option<&Path>) -> Result<()> {
    match target {
        Some(path) => {
            fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Cannot write {}", path.display()))?;
            eprintln!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        (dir, cwd)
    }

    fn create(cwd: &str, name: &str) -> PathBuf {
        let output = PathBuf::from(format!("{}.grid", name));
        new(
            NewArgs {
                name: name.to_string(),
                space: None,
                output: Some(output.clone()),
            },
            cwd,
        )
        .unwrap();
        resolve(cwd, &output)
    }

    #[test]
    fn test_new_writes_base_grid() {
        let (_dir, cwd) = workspace();
        let path = create(&cwd, "foo");
        assert_eq!(
            fs::read_to_string(path).unwrap().trim_end(),
            r#"<grid name="foo" space="5px" type="mainGrid"><content/></grid>"#
        );
    }

    #[test]
    fn test_new_uses_configured_space() {
        let (dir, cwd) = workspace();
        fs::write(
            dir.path().join(crate::config::DEFAULT_CONFIG_NAME),
            r#"{ "defaultSpace": 12 }"#,
        )
        .unwrap();
        let path = create(&cwd, "foo");
        let grid = read_grid(&path).unwrap();
        assert!(grid.to_text().contains(r#"space="12px""#));
    }

    #[test]
    fn test_read_grid_reports_parse_errors() {
        let (dir, _cwd) = workspace();
        let path = dir.path().join("broken.grid");
        fs::write(&path, "<grid><content></grid>").unwrap();
        let err = read_grid(&path).unwrap_err().to_string();
        assert!(err.contains("broken.grid"));
    }

    #[test]
    fn test_read_grid_rejects_non_main_root() {
        let (dir, _cwd) = workspace();
        let path = dir.path().join("cell.grid");
        fs::write(&path, r#"<grid type="grid"><content/></grid>"#).unwrap();
        let err = read_grid(&path).unwrap_err().to_string();
        assert!(err.contains("Should be <mainGrid>"));
    }

    #[test]
    fn test_design_round_trip_in_place() {
        let (dir, cwd) = workspace();
        let path = dir.path().join("layout.grid");
        let original = r#"<grid name="layout" space="5px" type="mainGrid"><content><row><cell type="module"><content path="a"/></cell></row></content></grid>"#;
        fs::write(&path, original).unwrap();

        let run = |enter: bool, exit: bool| {
            design(
                DesignArgs {
                    file: PathBuf::from("layout.grid"),
                    enter,
                    exit,
                    refresh: false,
                    flat: false,
                    write: true,
                },
                &cwd,
            )
            .unwrap();
        };

        run(true, false);
        let with_placeholders = fs::read_to_string(&path).unwrap();
        assert!(with_placeholders.contains(r#"hasPlaceholders="true""#));
        assert!(with_placeholders.contains(r#"type="placeholder""#));

        run(false, true);
        assert_eq!(fs::read_to_string(&path).unwrap().trim_end(), original);
    }

    #[test]
    fn test_ids_and_clean_in_place() {
        let (dir, cwd) = workspace();
        let path = dir.path().join("layout.grid");
        fs::write(
            &path,
            r#"<grid name="layout" space="5px" type="mainGrid"><content><row><cell type="module"/></row><row/></content></grid>"#,
        )
        .unwrap();

        clean(
            CleanArgs {
                file: PathBuf::from("layout.grid"),
                write: true,
            },
            &cwd,
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap().trim_end(),
            r#"<grid name="layout" space="5px" type="mainGrid"><content/></grid>"#
        );

        ids(
            IdsArgs {
                file: PathBuf::from("layout.grid"),
                write: true,
            },
            &cwd,
        )
        .unwrap();
        let grid = read_grid(&path).unwrap();
        assert!(grid.id_of(grid.root()).is_some());
    }

    #[test]
    fn test_json_conversions() {
        let (dir, cwd) = workspace();
        fs::write(
            dir.path().join("layout.json"),
            r#"{ "_name": "layout", "_space": "5px", "_type": "mainGrid", "content": { "row": [ { "cell": [ { "_type": "module", "content": { "_path": "a" } } ] } ] } }"#,
        )
        .unwrap();

        from_json(
            FromJsonArgs {
                file: PathBuf::from("layout.json"),
                output: Some(PathBuf::from("layout.grid")),
                pretty: false,
            },
            &cwd,
        )
        .unwrap();
        let grid = read_grid(&dir.path().join("layout.grid")).unwrap();
        assert_eq!(
            grid.to_text(),
            r#"<grid name="layout" space="5px" type="mainGrid"><content><row><cell type="module"><content path="a"/></cell></row></content></grid>"#
        );

        to_json(
            ToJsonArgs {
                file: PathBuf::from("layout.grid"),
                output: Some(PathBuf::from("back.json")),
            },
            &cwd,
        )
        .unwrap();
        let back: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("back.json")).unwrap())
                .unwrap();
        assert_eq!(back, grid.to_object());
    }

    #[test]
    fn test_apply_mutations_and_save() {
        let (dir, cwd) = workspace();
        let path = create(&cwd, "layout");
        let grid = {
            let mut grid = read_grid(&path).unwrap();
            grid.set_ids(grid.root());
            grid
        };
        fs::write(&path, grid.to_text()).unwrap();
        let root_id = grid.id_of(grid.root()).unwrap();

        fs::write(
            dir.path().join("edits.json"),
            format!(r#"[{{ "AddRow": {{ "node_id": "{}", "before_row_id": null }} }}]"#, root_id),
        )
        .unwrap();

        apply(
            ApplyArgs {
                file: PathBuf::from("layout.grid"),
                mutations: PathBuf::from("edits.json"),
                write: true,
            },
            &cwd,
        )
        .unwrap();

        let saved = read_grid(&path).unwrap();
        assert_eq!(saved.rows_of(saved.root()).len(), 1);
    }
}
