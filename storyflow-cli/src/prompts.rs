use anyhow::Result;
use inquire::{Confirm, Select};
use std::fmt;
use uuid::Uuid;

use storyflow_core::RequirementRecord;

/// Entry in the record picker
struct RecordChoice {
    position: usize,
    id: Uuid,
    title: String,
    classification: String,
}

impl fmt::Display for RecordChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}. {} [{}]",
            self.position, self.title, self.classification
        )
    }
}

/// Prompts the user to pick a requirement from the list
pub fn select_record(records: &[RequirementRecord], message: &str) -> Result<Uuid> {
    if records.is_empty() {
        anyhow::bail!("No requirements stored yet. Import a sheet first.");
    }

    let options: Vec<RecordChoice> = records
        .iter()
        .enumerate()
        .map(|(idx, r)| RecordChoice {
            position: idx + 1,
            id: r.id,
            title: r.title_en.clone(),
            classification: r.classification.clone(),
        })
        .collect();

    let choice = Select::new(message, options).with_page_size(15).prompt()?;
    Ok(choice.id)
}

/// Asks before deleting a single requirement
pub fn confirm_delete() -> Result<bool> {
    Ok(
        Confirm::new("Are you sure you want to delete this requirement?")
            .with_default(false)
            .prompt()?,
    )
}

/// Asks before deleting everything
pub fn confirm_purge(count: usize) -> Result<bool> {
    Ok(Confirm::new(&format!(
        "Delete all {} requirement(s) and the saved snapshot? This cannot be undone.",
        count
    ))
    .with_default(false)
    .prompt()?)
}
