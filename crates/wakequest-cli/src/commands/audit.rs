use super::{now_local, open_db, print_json, reconciler};

/// Startup reconciliation: repair the schedule map against what is actually
/// installed, cancelling orphans and re-arming enabled alarms.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db()?;
    let event = reconciler(&db).audit(now_local())?;
    print_json(&event)?;
    Ok(())
}
