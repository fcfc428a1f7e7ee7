use shortcut_review::database::db::{init_database, load_review_items};
use shortcut_review::{ReviewService, load_config};
use std::path::PathBuf;

const SAMPLE_CATALOG: [&str; 6] = [
    "vscode.save",
    "vscode.copy",
    "vscode.paste",
    "vscode.command-palette",
    "vscode.quick-open",
    "vscode.toggle-terminal",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shortcut_review.json"));
    let config = load_config(&config_path)?;

    let conn = init_database(&config.database_path)?;
    let items = load_review_items(&conn)?;

    let mut service = ReviewService::from_config(&config).with_persistence(conn);
    service.restore(items);

    let created = service.initialize_system(&SAMPLE_CATALOG)?;
    if created > 0 {
        println!("Added {} shortcuts to the review schedule", created);
    }

    let stats = service.get_statistics();
    println!(
        "{} shortcuts tracked, {} due, average ease {:.2}, mastery {:.0}%",
        stats.total_shortcuts, stats.due_shortcuts, stats.average_ease_factor, stats.mastery_level
    );

    let session = service.create_review_session(service.default_session_config());
    if session.is_empty() {
        println!("Nothing to review right now.");
    } else {
        println!("Next session ({} shortcuts):", session.len());
        for id in session.items() {
            println!("  - {}", id);
        }
    }

    Ok(())
}
