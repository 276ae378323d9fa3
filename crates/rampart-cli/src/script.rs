//! Scripted player intents.
//!
//! A script is a JSON list of intents keyed by the battlefield tick at which
//! they apply:
//!
//! ```json
//! [
//!   { "tick": 0,  "intent": { "primary_select": 1 } },
//!   { "tick": 0,  "intent": { "primary_select": 2 } },
//!   { "tick": 90, "intent": { "request_upgrade": 1 } },
//!   { "tick": 95, "intent": "clear_selection" }
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use rampart_core::game::Intent;
use serde::Deserialize;

/// One intent and the tick it applies at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScriptedIntent {
    /// Battlefield tick at which the intent is applied (before that tick's
    /// update runs).
    pub tick: u64,
    /// The intent itself.
    pub intent: Intent,
}

/// Intents in tick order, consumed as the match advances.
#[derive(Debug, Clone, Default)]
pub struct Script {
    entries: Vec<ScriptedIntent>,
    cursor: usize,
}

impl Script {
    /// Parses a script. Entries with the same tick keep their file order.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut entries: Vec<ScriptedIntent> =
            serde_json::from_str(json).context("script is not a list of { tick, intent }")?;
        entries.sort_by_key(|entry| entry.tick);
        Ok(Self { entries, cursor: 0 })
    }

    /// Reads and parses a script file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("invalid script {}", path.display()))
    }

    /// Returns every not yet consumed intent due at or before `tick`.
    pub fn due(&mut self, tick: u64) -> &[ScriptedIntent] {
        let start = self.cursor;
        while self
            .entries
            .get(self.cursor)
            .is_some_and(|entry| entry.tick <= tick)
        {
            self.cursor += 1;
        }
        &self.entries[start..self.cursor]
    }

    /// Intents not yet applied.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::ids::BuildingId;

    #[test]
    fn parses_every_intent_form() {
        let script = Script::from_json_str(
            r#"[
                { "tick": 5, "intent": { "request_upgrade": 1 } },
                { "tick": 0, "intent": { "primary_select": 2 } },
                { "tick": 5, "intent": "clear_selection" }
            ]"#,
        )
        .unwrap();

        assert_eq!(script.remaining(), 3);
        assert_eq!(
            script.entries[0].intent,
            Intent::PrimarySelect(BuildingId::new(2))
        );
        assert_eq!(
            script.entries[1].intent,
            Intent::RequestUpgrade(BuildingId::new(1))
        );
        assert_eq!(script.entries[2].intent, Intent::ClearSelection);
    }

    #[test]
    fn due_consumes_in_order() {
        let mut script = Script::from_json_str(
            r#"[
                { "tick": 0, "intent": { "primary_select": 0 } },
                { "tick": 3, "intent": { "primary_select": 1 } },
                { "tick": 3, "intent": "clear_selection" }
            ]"#,
        )
        .unwrap();

        assert_eq!(script.due(0).len(), 1);
        assert!(script.due(2).is_empty());
        let late = script.due(10);
        assert_eq!(late.len(), 2);
        assert_eq!(late[1].intent, Intent::ClearSelection);
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn bundled_files_load() {
        let script = Script::from_json_str(include_str!("../../../scenarios/opening.json")).unwrap();
        assert!(script.remaining() > 0);

        let scenario = rampart_core::ScenarioConfig::from_json_str(include_str!(
            "../../../scenarios/skirmish.json"
        ))
        .unwrap();
        assert_eq!(scenario, rampart_core::ScenarioConfig::default());
    }

    #[test]
    fn rejects_malformed_scripts() {
        assert!(Script::from_json_str(r#"{ "tick": 0 }"#).is_err());
        assert!(Script::from_json_str(r#"[{ "tick": 0, "intent": "explode" }]"#).is_err());
    }
}
