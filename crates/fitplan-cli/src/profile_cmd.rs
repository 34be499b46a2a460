//! `fitplan validate-profile` command: check profile form input.

use anyhow::{Result, bail};

use fitplan_core::{ProfileDraft, ProfileValidation, validate_profile};

/// Validate `draft`, print a per-field report, and fail if any field is invalid.
pub fn run_validate_profile(draft: &ProfileDraft) -> Result<()> {
    let validation = validate_profile(draft);
    print!("{}", render_report(draft, &validation));

    if !validation.is_valid() {
        bail!("profile has {} invalid field(s)", validation.errors.len());
    }
    Ok(())
}

fn render_report(draft: &ProfileDraft, validation: &ProfileValidation) -> String {
    use fitplan_core::ProfileField::{Age, Goal, Height, Name, Weight};

    let rows = [
        (Name, draft.name.as_str()),
        (Age, draft.age.as_str()),
        (Weight, draft.weight.as_str()),
        (Height, draft.height.as_str()),
        (Goal, draft.goal.as_str()),
    ];

    let mut out = String::new();
    for (field, value) in rows {
        let line = match validation.error(field) {
            Some(message) => format!("  [FAIL] {field:<7} {value:?}: {message}\n"),
            None if field == Goal => match value.parse::<fitplan_core::Goal>() {
                Ok(goal) => format!("  [ OK ] {field:<7} {value:?} ({})\n", goal.label()),
                Err(_) => format!("  [ OK ] {field:<7} {value:?}\n"),
            },
            None => format!("  [ OK ] {field:<7} {value:?}\n"),
        };
        out.push_str(&line);
    }
    if validation.is_valid() {
        out.push_str("Profile is valid.\n");
    }
    out
}
