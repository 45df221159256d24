//! Form section - the new-item request form.

use procure_core::DraftField;

use super::html_escape;
use crate::form::{FormPhase, FormState, CONFIRMATION_MESSAGE};

pub const NO_CATEGORIES: &str = "No categories available";
pub const NO_LOCATIONS: &str = "No locations available";

/// Render the form from its current state.
pub fn render_item_form(state: &FormState) -> String {
    let busy = matches!(
        state.phase,
        FormPhase::LoadingReferenceData | FormPhase::Submitting
    );

    let fields: String = DraftField::ALL
        .iter()
        .map(|field| render_field(state, *field))
        .collect();

    let confirmation = if state.confirmation_visible() {
        format!(
            r#"
    <div class="premium-message show" role="status">{}</div>"#,
            CONFIRMATION_MESSAGE
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="form-page-container" data-section="item-form" data-phase="{}">
    <h1>New Item Form</h1>
    <form method="POST" action="/new-item">
{}
    <button type="submit"{}>Submit</button>{}
    </form>
</div>"#,
        phase_name(state.phase),
        fields,
        if busy { " disabled" } else { "" },
        confirmation
    )
}

fn phase_name(phase: FormPhase) -> &'static str {
    match phase {
        FormPhase::Idle => "idle",
        FormPhase::LoadingReferenceData => "loading",
        FormPhase::Ready => "ready",
        FormPhase::Submitting => "submitting",
    }
}

fn render_field(state: &FormState, field: DraftField) -> String {
    let control = match field {
        DraftField::Category => render_select(
            field,
            "Select Category",
            state
                .categories
                .iter()
                .map(|c| (c.id.as_str(), c.name.as_str())),
            state.selected_category(),
            NO_CATEGORIES,
        ),
        DraftField::Location => render_select(
            field,
            "Select Location",
            state.locations.iter().map(|l| (l.as_str(), l.as_str())),
            state.selected_location(),
            NO_LOCATIONS,
        ),
        _ => render_input(field, &state.draft.get(field)),
    };

    let marker = if field.is_required() {
        r#"<span class="asterisk">*</span>"#
    } else {
        ""
    };

    format!(
        r#"        <label>
            <span>{}:{}</span>
            {}
        </label>
"#,
        field.label(),
        marker,
        control
    )
}

fn render_input(field: DraftField, value: &str) -> String {
    let kind = match field {
        DraftField::ProductUrl => "url",
        DraftField::Quantity => "number",
        DraftField::Timeline => "date",
        _ => "text",
    };
    let extra = match field {
        DraftField::ProductUrl => r#" placeholder="Website URL (Optional)" class="optional""#,
        DraftField::Quantity => r#" min="1""#,
        _ => "",
    };

    format!(
        r#"<input type="{}" name="{}" value="{}"{}{}>"#,
        kind,
        field.as_str(),
        html_escape(value),
        extra,
        if field.is_required() { " required" } else { "" }
    )
}

fn render_select<'a>(
    field: DraftField,
    prompt: &str,
    options: impl Iterator<Item = (&'a str, &'a str)>,
    selected: &str,
    empty_text: &str,
) -> String {
    let mut html = format!(
        r#"<select name="{}" required>
                <option value="">{}</option>"#,
        field.as_str(),
        prompt
    );

    let mut any = false;
    for (value, label) in options {
        any = true;
        html.push_str(&format!(
            r#"
                <option value="{}"{}>{}</option>"#,
            html_escape(value),
            if value == selected { " selected" } else { "" },
            html_escape(label)
        ));
    }
    if !any {
        html.push_str(&format!(
            r#"
                <option value="" disabled>{}</option>"#,
            empty_text
        ));
    }

    html.push_str("\n            </select>");
    html
}
