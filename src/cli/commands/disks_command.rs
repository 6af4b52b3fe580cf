//! Disks command feature.
//!
//! This module owns and handles the "tidyup disks" command behavior.

use crate::disk_usage;
use crate::output;

pub(crate) fn handle_disks(json: bool) -> anyhow::Result<()> {
    let disks = disk_usage::all_disks();

    if json {
        println!("{}", output::disks_json(&disks)?);
    } else if disks.is_empty() {
        println!("No mounted volumes found");
    } else {
        output::print_disks(&disks);
    }
    Ok(())
}
