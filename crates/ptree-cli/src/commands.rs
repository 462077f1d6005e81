use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use serde_json::{json, Value as Json};

use ptree_merge::{MergeConfig, MergeIds, MergeReport, MergeWarning};
use ptree_sdk::{EventFilter, FnNotifier, Level, PlotEvent, PlotTree};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, cli.format),
        Command::Schema(args) => cmd_schema(args, cli.format),
        Command::Ids(args) => cmd_ids(args, cli.format),
    }
}

/// Everything one `merge` run produced.
#[derive(Debug, Serialize)]
pub struct MergeOutcome {
    pub updates: usize,
    pub events: Vec<PlotEvent>,
    pub warnings: Vec<MergeWarning>,
    pub tree: Json,
}

/// Read a file holding one update object or an array of them.
pub fn load_updates(path: &Path) -> anyhow::Result<Vec<Json>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let json: Json = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    match json {
        Json::Object(_) => Ok(vec![json]),
        Json::Array(items) => {
            if let Some(pos) = items.iter().position(|item| !item.is_object()) {
                bail!("{}: element {pos} is not an object", path.display());
            }
            Ok(items)
        }
        _ => bail!("{}: expected an object or an array of objects", path.display()),
    }
}

pub fn run_merge(args: &MergeArgs) -> anyhow::Result<MergeOutcome> {
    let config = match &args.config {
        Some(path) => MergeConfig::load(path)?,
        None => MergeConfig::default(),
    };
    let mut tree = PlotTree::with_config(config)?;
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    tree.register(
        EventFilter::all(),
        Box::new(FnNotifier(move |event: &PlotEvent| {
            sink.borrow_mut().push(event.clone())
        })),
    );

    let mut report = MergeReport::default();
    let mut updates = 0;
    for path in &args.files {
        for update in load_updates(path)? {
            let merged = tree
                .merge_json(&update, args.hold, args.label.as_deref())
                .with_context(|| format!("merging update {} of {}", updates + 1, path.display()))?;
            report.absorb(merged);
            updates += 1;
        }
    }

    let events = events.borrow().clone();
    Ok(MergeOutcome {
        updates,
        events,
        warnings: report.warnings,
        tree: tree.dump_json(),
    })
}

fn cmd_merge(args: MergeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = run_merge(&args)?;
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "{} Merged {} update(s) from {} file(s)",
        "✓".green().bold(),
        outcome.updates.to_string().bold(),
        args.files.len()
    );
    for event in &outcome.events {
        println!("  {} {}", "event:".cyan(), event);
    }
    for warning in &outcome.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    println!("{}", serde_json::to_string_pretty(&outcome.tree)?);
    Ok(())
}

fn cmd_schema(args: SchemaArgs, format: OutputFormat) -> anyhow::Result<()> {
    let tree = PlotTree::new();
    let schema = tree.engine().schema();

    if let Some(key) = args.key {
        let level = tree.level_of(&key)?;
        match format {
            OutputFormat::Json => println!("{}", json!({ "key": key, "level": level })),
            OutputFormat::Text => println!("{} → {}", key.bold(), level.to_string().cyan()),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let levels: serde_json::Map<String, Json> = Level::ALL
                .iter()
                .map(|level| (level.to_string(), json!(schema.keys_for(*level))))
                .collect();
            println!("{}", serde_json::to_string_pretty(&levels)?);
        }
        OutputFormat::Text => {
            for level in Level::ALL {
                let keys = schema.keys_for(level);
                println!("{} ({} keys)", level.to_string().cyan().bold(), keys.len());
                println!("  {}", keys.join(", "));
            }
        }
    }
    Ok(())
}

fn cmd_ids(args: IdsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ids = MergeIds::parse(&args.id);
    let show = |id: u32| {
        if id == 0 {
            "append".to_string()
        } else {
            id.to_string()
        }
    };
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "plot": ids.plot, "subplot": ids.subplot, "series": ids.series })
        ),
        OutputFormat::Text => {
            println!("{} {}", "id:".bold(), args.id.yellow());
            println!("  plot:    {}", show(ids.plot));
            println!("  subplot: {}", show(ids.subplot));
            println!("  series:  {}", show(ids.series));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn merge_args(files: Vec<PathBuf>) -> MergeArgs {
        MergeArgs {
            files,
            hold: false,
            label: None,
            config: None,
        }
    }

    #[test]
    fn load_accepts_object_and_array() {
        let dir = tempfile::tempdir().unwrap();
        let single = write_file(&dir, "one.json", r#"{"kind": "line"}"#);
        let many = write_file(&dir, "many.json", r#"[{"kind": "line"}, {"title": "t"}]"#);
        assert_eq!(load_updates(&single).unwrap().len(), 1);
        assert_eq!(load_updates(&many).unwrap().len(), 2);
    }

    #[test]
    fn load_rejects_other_documents() {
        let dir = tempfile::tempdir().unwrap();
        let scalar = write_file(&dir, "scalar.json", "42");
        let mixed = write_file(&dir, "mixed.json", r#"[{"kind": "line"}, 3]"#);
        assert!(load_updates(&scalar).is_err());
        let err = load_updates(&mixed).unwrap_err();
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn merge_appends_one_plot_per_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "updates.json",
            r#"[{"kind": "line", "x": [1, 2]}, {"kind": "scatter", "colour": "red"}]"#,
        );
        let outcome = run_merge(&merge_args(vec![path])).unwrap();
        assert_eq!(outcome.updates, 2);
        assert_eq!(outcome.tree["plots"].as_array().map(Vec::len), Some(2));
        assert_eq!(outcome.warnings.len(), 1);
        let merge_ends = outcome
            .events
            .iter()
            .filter(|e| matches!(e, PlotEvent::MergeEnd { .. }))
            .count();
        assert_eq!(merge_ends, 2);
    }

    #[test]
    fn merge_reads_the_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_file(&dir, "ptree.toml", "append_plots = false\n");
        let path = write_file(&dir, "updates.json", r#"[{"kind": "line"}, {"title": "t"}]"#);
        let mut args = merge_args(vec![path]);
        args.config = Some(config);
        args.hold = true;
        let outcome = run_merge(&args).unwrap();
        let plots = outcome.tree["plots"].as_array().unwrap();
        assert_eq!(plots.len(), 1);
        assert_eq!(plots[0]["subplots"][0]["kind"], json!("line"));
        assert_eq!(plots[0]["subplots"][0]["title"], json!("t"));
    }

    #[test]
    fn merge_reports_the_failing_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.json", r#"{"series": [[1, 2]]}"#);
        let err = run_merge(&merge_args(vec![path])).unwrap_err();
        assert!(format!("{err:#}").contains("update 1"));
    }
}
