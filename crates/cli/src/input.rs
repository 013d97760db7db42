//! Reading change events from files or stdin

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use contactsync_domain::{ChangeEvent, ContactableEntity};

/// `-` reads stdin
pub const STDIN: &str = "-";

/// What the `run` command was asked to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunInput {
    /// A full JSON change event
    Event(ChangeEvent),
    /// A legacy trigger code with the entity snapshot
    Code { code: String, entity: ContactableEntity },
}

pub fn read_source(source: &str) -> Result<String> {
    if source == STDIN {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("failed to read stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(Path::new(source))
        .with_context(|| format!("failed to read input file {source}"))
}

pub fn parse_event(contents: &str) -> Result<ChangeEvent> {
    serde_json::from_str(contents).context("input is not a valid change event")
}

pub fn parse_entity(contents: &str) -> Result<ContactableEntity> {
    serde_json::from_str(contents).context("input is not a valid entity snapshot")
}
