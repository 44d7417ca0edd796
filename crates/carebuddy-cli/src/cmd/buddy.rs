use crate::cmd::{block_on, Session};
use crate::output::{print_fields, print_json, print_table};
use anyhow::Context;
use carebuddy_core::roster::RosterSnapshot;
use carebuddy_core::types::BuddyDetail;
use carebuddy_core::{Console, Route, UploadFile, ValidationError};
use clap::Subcommand;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum BuddySubcommand {
    /// List the doctor's buddies
    List {
        /// Only show buddies whose name contains this text (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one buddy's contact details, analytics, and documents
    Show {
        /// Buddy identifier
        id: String,
    },

    /// Create a buddy from training documents
    Create {
        /// Display name for the new buddy
        #[arg(long)]
        name: String,
        /// Training document to upload (repeatable)
        #[arg(long = "doc", value_name = "PATH")]
        docs: Vec<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(session: &Session, subcmd: BuddySubcommand) -> anyhow::Result<()> {
    match subcmd {
        BuddySubcommand::List { search } => list(session, search.as_deref().unwrap_or("")),
        BuddySubcommand::Show { id } => show(session, &id),
        BuddySubcommand::Create { name, docs } => create(session, name, &docs),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(session: &Session, query: &str) -> anyhow::Result<()> {
    let config = session.config()?;
    let console = Console::new(session.client(&config));

    block_on(console.roster().refresh())?;
    let snapshot = console.roster().snapshot();
    let matches = snapshot.filter(query);

    if session.json {
        let value = serde_json::json!({
            "query": query,
            "buddies": matches,
        });
        return print_json(&value);
    }

    if matches.is_empty() {
        println!("{}", RosterSnapshot::empty_message(query));
        return Ok(());
    }

    let rows = matches
        .iter()
        .map(|b| vec![b.id.clone(), b.name.clone()])
        .collect();
    print_table(&["ID", "NAME"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(session: &Session, id: &str) -> anyhow::Result<()> {
    let config = session.config()?;
    let console = Console::new(session.client(&config));
    let view = console.detail_view();

    block_on(view.load(id))?;
    let detail = view.detail();

    if session.json {
        let value = serde_json::json!({
            "id": id,
            "detail": detail,
            "contact_handle": view.contact_handle(),
            "connect_command": view.connect_command(),
        });
        return print_json(&value);
    }

    match detail {
        Some(detail) => print_detail(&detail),
        None => println!("Buddy '{id}' is not available."),
    }
    Ok(())
}

fn print_detail(detail: &BuddyDetail) {
    let stats = &detail.stats;
    let created = detail
        .creation_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    println!("{}", detail.name);
    println!();
    print_fields(&[
        ("ID", detail.id.clone()),
        ("Created", created),
        ("Contact", detail.contact_handle()),
        ("Connect", format!("send \"{}\"", detail.connect_command())),
        ("Questions", stats.total_questions.to_string()),
        ("Patients", stats.active_patients.to_string()),
        ("Response rate", stats.response_rate_label()),
        ("Rating", stats.average_rating_label()),
    ]);
    println!();

    if detail.documents.is_empty() {
        println!("Documents: (none)");
        return;
    }
    let rows = detail
        .documents
        .iter()
        .map(|d| {
            vec![
                d.id.clone(),
                d.name.clone(),
                d.uploaded_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print_table(&["DOC", "NAME", "UPLOADED"], rows);
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

fn create(session: &Session, name: String, docs: &[PathBuf]) -> anyhow::Result<()> {
    // A blank name is rejected before any document is read from disk.
    if name.trim().is_empty() {
        anyhow::bail!("{}", ValidationError::NameRequired);
    }

    let config = session.config()?;
    let console = Console::with_config(session.client(&config), &config);

    let creation = console.creation();
    creation.set_name(name);
    for path in docs {
        let file = UploadFile::from_path(path)
            .with_context(|| format!("cannot read document {}", path.display()))?;
        creation.add_file(file);
    }

    let mut routes: Vec<Route> = Vec::new();
    let created = block_on(console.create_buddy(&mut |route: Route| routes.push(route)))?;
    let id = match created {
        Ok(Some(id)) => id,
        Ok(None) => anyhow::bail!("a buddy is already being created"),
        Err(e) => anyhow::bail!("{e}"),
    };
    let route = routes.pop().unwrap_or_else(|| Route::Buddy(id.clone()));

    if session.json {
        let value = serde_json::json!({
            "id": id,
            "route": route.path(),
            "roster_size": console.roster().buddies().len(),
        });
        return print_json(&value);
    }

    println!("Created buddy '{id}'.");
    println!("Open: {route}");
    Ok(())
}
