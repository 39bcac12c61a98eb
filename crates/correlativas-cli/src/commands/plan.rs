use clap::Subcommand;
use correlativas_core::{
    CascadeEngine, CascadeReport, Config, CourseId, CourseNode, CourseState, MissingPrerequisites,
    PlanDocument, PlanStats, SessionError, SimulationSession, TapOutcome,
};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Show every course with its computed state
    Show {
        /// Plan document (JSON)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Progress statistics
    Stats {
        /// Plan document (JSON)
        file: PathBuf,
        /// Break down by academic year
        #[arg(long)]
        by_level: bool,
    },
    /// Explain which prerequisites a course is missing
    Missing {
        /// Plan document (JSON)
        file: PathBuf,
        /// Course id
        course: String,
    },
    /// Set a course state (approved, regularized, available)
    Set {
        /// Plan document (JSON)
        file: PathBuf,
        /// Course id
        course: String,
        /// New state
        state: CourseState,
        /// Save the change back to the plan document
        #[arg(long)]
        write: bool,
    },
    /// Advance a course to its next state (available -> regularized -> approved -> available)
    Tap {
        /// Plan document (JSON)
        file: PathBuf,
        /// Course id
        course: String,
        /// Save the change back to the plan document
        #[arg(long)]
        write: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        PlanAction::Show { file, json } => {
            let (_, session) = open(&file, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(session.nodes())?);
            } else {
                print_plan(session.nodes(), &config);
            }
        }
        PlanAction::Stats { file, by_level } => {
            let (_, session) = open(&file, &config)?;
            if by_level {
                let levels = PlanStats::by_level(session.nodes());
                println!("{}", serde_json::to_string_pretty(&levels)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&session.stats())?);
            }
        }
        PlanAction::Missing { file, course } => {
            let (_, session) = open(&file, &config)?;
            let id = CourseId::from(course);
            let missing = session.missing_for(&id)?;
            if let Some(node) = session.node(&id) {
                print_missing(node, &missing);
            }
        }
        PlanAction::Set {
            file,
            course,
            state,
            write,
        } => {
            let (mut doc, mut session) = open(&file, &config)?;
            let id = CourseId::from(course);
            let from = session.node(&id).map(|n| n.state);
            let report = match session.set_state(&id, state) {
                Ok(report) => report,
                Err(SessionError::CourseBlocked { id, missing }) => {
                    if let Some(node) = session.node(&id) {
                        print_missing(node, &missing);
                    }
                    return Err(SessionError::CourseBlocked { id, missing }.into());
                }
                Err(e) => return Err(e.into()),
            };
            if let Some(from) = from {
                print_change(&session, &id, from, state, &report);
            }
            if write {
                persist(&mut doc, &session, &file)?;
            }
        }
        PlanAction::Tap {
            file,
            course,
            write,
        } => {
            let (mut doc, mut session) = open(&file, &config)?;
            let id = CourseId::from(course);
            match session.tap(&id)? {
                TapOutcome::Changed { from, to, report } => {
                    print_change(&session, &id, from, to, &report);
                    if write {
                        persist(&mut doc, &session, &file)?;
                    }
                }
                TapOutcome::Blocked(missing) => {
                    if let Some(node) = session.node(&id) {
                        print_missing(node, &missing);
                    }
                }
            }
        }
    }
    Ok(())
}

fn open(
    file: &Path,
    config: &Config,
) -> Result<(PlanDocument, SimulationSession), Box<dyn std::error::Error>> {
    let doc = PlanDocument::load(file)?;
    let nodes = doc.nodes()?;
    tracing::debug!(file = %file.display(), courses = nodes.len(), "plan loaded");
    let engine = CascadeEngine::with_config(config.cascade_config());
    Ok((doc, SimulationSession::new(engine, nodes)))
}

fn persist(
    doc: &mut PlanDocument,
    session: &SimulationSession,
    file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let changes = session.pending_changes();
    for change in &changes {
        doc.record_state(&change.course_id, change.state);
    }
    doc.save(file)?;
    eprintln!("Saved {} change(s) to {}", changes.len(), file.display());
    Ok(())
}

fn label(node: &CourseNode) -> String {
    format!("{} {}", node.id, node.name)
}

fn print_plan(nodes: &[CourseNode], config: &Config) {
    let mut sorted: Vec<&CourseNode> = nodes.iter().collect();
    if config.display.group_by_level {
        sorted.sort_by_key(|n| (n.level, n.sequence_number));
    }

    let mut current_level = None;
    for node in sorted {
        if config.display.group_by_level && current_level != Some(node.level) {
            current_level = Some(node.level);
            println!("Level {}", node.level);
        }
        let number = if config.display.show_sequence_numbers {
            format!("[{:>2}] ", node.sequence_number)
        } else {
            String::new()
        };
        println!("  {number}{:<44} {}", label(node), node.state);
    }

    let stats = PlanStats::from_nodes(nodes);
    println!(
        "\n{}% complete: {} approved, {} regularized, {} available, {} blocked",
        stats.completion_percent, stats.approved, stats.regularized, stats.available, stats.blocked
    );
}

fn print_missing(node: &CourseNode, missing: &MissingPrerequisites) {
    if missing.is_empty() {
        println!("{} has all prerequisites met ({})", label(node), node.state);
        return;
    }
    println!("{} is missing {} prerequisite(s):", label(node), missing.len());
    for prereq in &missing.regularized_needed {
        println!("  needs regularized: {} ({})", label(prereq), prereq.state);
    }
    for prereq in &missing.approved_needed {
        println!("  needs approved:    {} ({})", label(prereq), prereq.state);
    }
    for id in &missing.unresolved {
        println!("  not in plan:       {id}");
    }
}

fn print_change(
    session: &SimulationSession,
    id: &CourseId,
    from: CourseState,
    to: CourseState,
    report: &CascadeReport,
) {
    let name = session.node(id).map(label).unwrap_or_else(|| id.to_string());
    println!("{name}: {from} -> {to}");
    for changed in report.changed.iter().filter(|c| *c != id) {
        if let Some(node) = session.node(changed) {
            println!("  {} is now {}", label(node), node.state);
        }
    }
}
