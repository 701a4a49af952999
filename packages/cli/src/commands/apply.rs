use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagebuilder_connections::{EventPayload, FilterAction};
use pagebuilder_editor::{Command, EditSession};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// JSON array of steps to run against the document
    pub script: PathBuf,

    /// Document to edit (overrides config)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Where to write the result (defaults to the edited document)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Run the script without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// One entry of an apply script
///
/// ```json
/// [
///   { "command": "deleteElement", "pageId": "page-1", "elementId": "e1" },
///   { "history": "undo" },
///   { "action": "setFilter", "name": "color", "value": "white" },
///   { "publish": { "source": "e2", "payload": { "type": "navigate", "target": "/cart" } } }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Command(Command),
    History { history: HistoryStep },
    Filter(FilterAction),
    Publish { publish: PublishStep },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryStep {
    Undo,
    Redo,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublishStep {
    pub source: String,
    pub payload: EventPayload,
}

/// What a script run did
#[derive(Debug, Default, PartialEq)]
pub struct ApplySummary {
    pub changed: usize,
    pub unchanged: usize,
    pub history_moves: usize,
    pub filter_actions: usize,
    pub edges_reached: usize,
}

pub fn apply(args: ApplyArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let document_path = args
        .document
        .map(|p| cwd.join(p))
        .unwrap_or_else(|| config.document_path(cwd));
    let script_path = cwd.join(&args.script);

    let document = super::read_document(&document_path)?;
    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read script {}", script_path.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid script {}", script_path.display()))?;

    println!(
        "{} {} steps on {}",
        "🔧 Applying".bright_blue().bold(),
        steps.len(),
        document.name.bold()
    );

    let mut session = EditSession::with_config("cli", document, config.editor.clone());
    let summary = run_script(&mut session, steps)?;

    println!("  {} {} edits applied", "✓".green(), summary.changed);
    if summary.unchanged > 0 {
        println!("  {} {} edits changed nothing", "·".dimmed(), summary.unchanged);
    }
    if summary.history_moves > 0 {
        println!("  {} {} undo/redo steps", "✓".green(), summary.history_moves);
    }
    if summary.filter_actions > 0 || summary.edges_reached > 0 {
        println!(
            "  {} {} filter actions, {} connections reached",
            "✓".green(),
            summary.filter_actions,
            summary.edges_reached
        );
    }
    for (name, value) in session.filters().as_map() {
        println!("    {} = {}", name, value.values().join(", "));
    }

    if args.dry_run {
        println!();
        println!("{}", "Dry run, nothing written".yellow());
        return Ok(());
    }

    let out = args.out.map(|p| cwd.join(p)).unwrap_or(document_path);
    super::write_document(&out, session.document())?;

    println!();
    println!("{} {}", "✅ Wrote".green().bold(), out.display());
    Ok(())
}

/// Run `steps` in order; the first failing command aborts the run
pub fn run_script(session: &mut EditSession, steps: Vec<Step>) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    for (index, step) in steps.into_iter().enumerate() {
        match step {
            Step::Command(command) => {
                let label = command.label();
                let outcome = session
                    .dispatch(command)
                    .with_context(|| format!("Step {}: {} failed", index + 1, label))?;
                if outcome.changed {
                    summary.changed += 1;
                } else {
                    summary.unchanged += 1;
                }
            }
            Step::History { history } => {
                let moved = match history {
                    HistoryStep::Undo => session.undo(),
                    HistoryStep::Redo => session.redo(),
                };
                if moved {
                    summary.history_moves += 1;
                } else {
                    tracing::warn!(step = index + 1, ?history, "nothing to {:?}", history);
                }
            }
            Step::Filter(action) => {
                session.bus_mut().filters_mut().apply(action);
                summary.filter_actions += 1;
            }
            Step::Publish { publish } => {
                let report = session.publish(&publish.source, publish.payload);
                summary.edges_reached += report.edges;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::starter_document;
    use pagebuilder_document::ElementType;
    use serde_json::json;

    fn session() -> EditSession {
        let config = Config::default();
        let document = starter_document("Doors", &config).unwrap();
        EditSession::with_config("test", document, config.editor)
    }

    fn element_of(session: &EditSession, kind: ElementType) -> String {
        session
            .document()
            .first_page()
            .elements
            .iter()
            .find(|node| *node.kind() == kind)
            .map(|node| node.id().to_string())
            .unwrap()
    }

    #[test]
    fn test_steps_parse_by_shape() {
        let steps: Vec<Step> = serde_json::from_value(json!([
            { "command": "addPage", "name": "Second" },
            { "history": "undo" },
            { "action": "clearFilter", "name": "color" },
            { "publish": { "source": "e1", "payload": { "type": "navigate", "target": "/cart" } } }
        ]))
        .unwrap();

        assert_eq!(
            steps[0],
            Step::Command(Command::AddPage {
                name: Some("Second".to_string())
            })
        );
        assert_eq!(
            steps[1],
            Step::History {
                history: HistoryStep::Undo
            }
        );
        assert_eq!(
            steps[2],
            Step::Filter(FilterAction::ClearFilter {
                name: "color".to_string()
            })
        );
        assert!(matches!(steps[3], Step::Publish { .. }));
    }

    #[test]
    fn test_delete_then_undo_restores_element() {
        let mut session = session();
        let page_id = session.document().first_page().id.clone();
        let heading = element_of(&session, ElementType::Heading);
        let before = session.document().element_count();

        let summary = run_script(
            &mut session,
            vec![
                Step::Command(Command::DeleteElement {
                    page_id,
                    element_id: heading,
                }),
                Step::Command(Command::DeleteConnection {
                    connection_id: "ghost".to_string(),
                }),
                Step::History {
                    history: HistoryStep::Undo,
                },
            ],
        )
        .unwrap();

        assert_eq!(summary.changed, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.history_moves, 1);
        assert_eq!(session.document().element_count(), before);
    }

    #[test]
    fn test_publish_updates_filters_through_connection() {
        let mut session = session();
        let filter = element_of(&session, ElementType::PropertyFilter);

        let summary = run_script(
            &mut session,
            vec![Step::Publish {
                publish: PublishStep {
                    source: filter,
                    payload: EventPayload::filter("color", "white"),
                },
            }],
        )
        .unwrap();

        assert_eq!(summary.edges_reached, 1);
        assert_eq!(session.filters().get("color").map(|v| v.values()), Some(vec!["white"]));
    }

    #[test]
    fn test_failing_command_names_step() {
        let mut session = session();
        let page_id = session.document().first_page().id.clone();
        let heading = element_of(&session, ElementType::Heading);

        let err = run_script(
            &mut session,
            vec![Step::Command(Command::MoveElement {
                page_id,
                element_id: heading.clone(),
                new_parent_id: Some(heading),
                index: 0,
            })],
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("Step 1: Move element failed"));
    }

    #[test]
    fn test_apply_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let document = starter_document("Doors", &config).unwrap();
        super::super::write_document(&config.document_path(dir.path()), &document).unwrap();
        std::fs::write(
            dir.path().join("script.json"),
            r#"[{ "command": "addPage", "name": "Second" }]"#,
        )
        .unwrap();

        apply(
            ApplyArgs {
                script: PathBuf::from("script.json"),
                document: None,
                out: Some(PathBuf::from("out.json")),
                dry_run: false,
            },
            dir.path(),
        )
        .unwrap();

        let written = super::super::read_document(&dir.path().join("out.json")).unwrap();
        assert_eq!(written.pages.len(), 2);
        let original = super::super::read_document(&config.document_path(dir.path())).unwrap();
        assert_eq!(original.pages.len(), 1);
    }
}
