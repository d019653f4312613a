use std::{collections::HashMap, path::Path, sync::Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::{ActionError, Result},
    step::ActionStep,
};

// WAIT source values carry minutes.
const WAIT_UNIT_SECS: u64 = 60;

/// Immutable mapping from action name to its decoded, ordered step list.
///
/// Reloading builds a whole new table; chains started before the reload
/// keep executing against the [`Arc`] snapshot they captured at start, so
/// a reload never disturbs work already in flight.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    actions: HashMap<String, Arc<Vec<ActionStep>>>,
}

impl ActionTable {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&raw)?;
        info!(path = %path.display(), actions = table.len(), "action table loaded");
        Ok(table)
    }

    /// Decode the top-level JSON object.
    ///
    /// Individual step records decode to [`ActionStep::Malformed`] instead
    /// of failing, so step indices keep matching the source file; an action
    /// whose value is not an array is skipped. Only unparseable JSON or a
    /// non-object root is an error.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let Some(obj) = value.as_object() else {
            return Err(ActionError::InvalidRoot);
        };

        let mut actions = HashMap::new();
        for (name, steps_value) in obj {
            let Some(records) = steps_value.as_array() else {
                warn!(action = %name, "action value is not an array; skipped");
                continue;
            };
            let steps: Vec<ActionStep> = records.iter().map(decode_step).collect();
            debug!(action = %name, steps = steps.len(), "action decoded");
            actions.insert(name.clone(), Arc::new(steps));
        }
        Ok(Self { actions })
    }

    /// Snapshot of the named step list. The returned `Arc` is the captured
    /// copy a running chain keeps across reloads.
    pub fn get(&self, name: &str) -> Option<Arc<Vec<ActionStep>>> {
        self.actions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn decode_step(record: &Value) -> ActionStep {
    let Some(map) = record.as_object() else {
        return ActionStep::Malformed(record.to_string());
    };
    if map.len() != 1 {
        return ActionStep::Malformed(record.to_string());
    }
    let Some((op, value)) = map.iter().next() else {
        return ActionStep::Malformed(record.to_string());
    };
    let text = match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    };

    match op.trim().to_ascii_uppercase().as_str() {
        "PLAY" => ActionStep::Play(text),
        "PLAY-RANDOM" => {
            if text.contains('|') {
                let choices: Vec<String> = text
                    .split('|')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                if choices.is_empty() {
                    ActionStep::Malformed(record.to_string())
                } else {
                    ActionStep::PlayRandomFromChoices(choices)
                }
            } else {
                ActionStep::PlayRandomFromRange(text)
            }
        }
        "WAIT" => ActionStep::Wait(parse_first_uint(&text) * WAIT_UNIT_SECS),
        "TOAST-MESSAGE" => ActionStep::Toast(text),
        _ => ActionStep::Malformed(op.clone()),
    }
}

/// First contiguous digit run in `raw`, or 0 when there is none.
fn parse_first_uint(raw: &str) -> u64 {
    raw.chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_step_kinds_in_order() {
        let table = ActionTable::from_json_str(
            r#"{
                "ACT_MORNING": [
                    {"PLAY": "hello.mp4"},
                    {"WAIT": "2"},
                    {"PLAY-RANDOM": "clip_[1..5].mp4"},
                    {"TOAST-MESSAGE": "Good morning"}
                ]
            }"#,
        )
        .unwrap();

        let steps = table.get("ACT_MORNING").unwrap();
        assert_eq!(
            *steps,
            vec![
                ActionStep::Play("hello.mp4".into()),
                ActionStep::Wait(120),
                ActionStep::PlayRandomFromRange("clip_[1..5].mp4".into()),
                ActionStep::Toast("Good morning".into()),
            ]
        );
    }

    #[test]
    fn op_keys_are_case_insensitive() {
        let table = ActionTable::from_json_str(
            r#"{"A": [{"play": "x.mp4"}, {" Wait ": "1m"}, {"toast-message": "hi"}]}"#,
        )
        .unwrap();
        let steps = table.get("A").unwrap();
        assert_eq!(steps[0], ActionStep::Play("x.mp4".into()));
        assert_eq!(steps[1], ActionStep::Wait(60));
        assert_eq!(steps[2], ActionStep::Toast("hi".into()));
    }

    #[test]
    fn wait_value_extracts_first_number() {
        let table = ActionTable::from_json_str(
            r#"{"A": [{"WAIT": "wait 3 please"}, {"WAIT": "none"}, {"WAIT": 5}]}"#,
        )
        .unwrap();
        let steps = table.get("A").unwrap();
        assert_eq!(steps[0], ActionStep::Wait(180));
        assert_eq!(steps[1], ActionStep::Wait(0));
        assert_eq!(steps[2], ActionStep::Wait(300));
    }

    #[test]
    fn pipe_separated_play_random_becomes_choices() {
        let table = ActionTable::from_json_str(
            r#"{"A": [{"PLAY-RANDOM": "a.mp4 | b.mp4|c.mp4"}]}"#,
        )
        .unwrap();
        let steps = table.get("A").unwrap();
        assert_eq!(
            steps[0],
            ActionStep::PlayRandomFromChoices(vec![
                "a.mp4".into(),
                "b.mp4".into(),
                "c.mp4".into()
            ])
        );
    }

    #[test]
    fn unknown_and_malformed_records_kept_in_place() {
        let table = ActionTable::from_json_str(
            r#"{"A": [{"FROB": "x"}, {"PLAY": "a.mp4", "WAIT": "1"}, "naked", {"PLAY": "b.mp4"}]}"#,
        )
        .unwrap();
        let steps = table.get("A").unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(steps[0], ActionStep::Malformed(_)));
        assert!(matches!(steps[1], ActionStep::Malformed(_)));
        assert!(matches!(steps[2], ActionStep::Malformed(_)));
        assert_eq!(steps[3], ActionStep::Play("b.mp4".into()));
    }

    #[test]
    fn non_array_action_is_skipped() {
        let table =
            ActionTable::from_json_str(r#"{"A": "not steps", "B": [{"PLAY": "b.mp4"}]}"#).unwrap();
        assert!(table.get("A").is_none());
        assert!(table.get("B").is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert!(matches!(
            ActionTable::from_json_str(r#"[1, 2, 3]"#),
            Err(ActionError::InvalidRoot)
        ));
        assert!(ActionTable::from_json_str("not json").is_err());
    }
}
