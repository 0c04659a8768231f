use clap::Subcommand;

use wakequest_core::{PlayerStore, SqlitePlayerStore};

use super::{open_db, print_json};

#[derive(Subcommand)]
pub enum PlayerAction {
    /// Print progression state as JSON
    Show,
}

pub fn run(action: PlayerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db()?;

    match action {
        PlayerAction::Show => {
            let player = SqlitePlayerStore::new(db).get()?;
            print_json(&player)?;
        }
    }

    Ok(())
}
