//! HTML pages. Plain string building; every piece of dynamic text goes
//! through [`escape`].

use axum::response::Html;
use shared::{
    domain::{InputKind, QuestionDefinition, SessionState},
    protocol::{Step, StepView},
};

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:3rem auto;padding:0 1rem}\
.progress{color:#666}.disclaimer{font-size:.9rem;color:#555}\
input[type=text],input[type=email],input[type=tel],input[type=url]{width:100%;padding:.5rem}\
.actions{display:flex;gap:1rem;margin-top:1rem}";

pub(crate) fn landing_page() -> Html<String> {
    layout(
        "Application",
        "<h1>Apply to the bootcamp</h1>\
         <p>Answer a few short questions, one at a time. You can go back and change an answer before you finish.</p>\
         <p><a href=\"/start\">Start application</a></p>",
    )
}

pub(crate) fn success_page() -> Html<String> {
    layout(
        "Application submitted",
        "<h1>Thank you!</h1><p>Your application has been submitted.</p>",
    )
}

pub(crate) fn step_page(view: &StepView) -> Html<String> {
    match &view.step {
        Step::Question(question) => question_page(question, &view.session, view.total_questions),
        Step::Complete => success_page(),
    }
}

pub(crate) fn question_page(
    question: &QuestionDefinition,
    session: &SessionState,
    total: usize,
) -> Html<String> {
    let id = question.id.0;
    let previous = session.answer_for(question.id);

    let disclaimer = question
        .disclaimer
        .as_deref()
        .map(|text| format!("<p class=\"disclaimer\">{}</p>", escape(text)))
        .unwrap_or_default();

    let input = match question.input_kind {
        InputKind::Checkbox => {
            let checked = if previous.is_some_and(|value| !value.is_empty()) {
                " checked"
            } else {
                ""
            };
            format!(
                "<input type=\"checkbox\" id=\"answer\" name=\"answer\" value=\"on\" required{checked}>"
            )
        }
        kind => format!(
            "<input type=\"{}\" id=\"answer\" name=\"answer\" placeholder=\"{}\" value=\"{}\">",
            kind.as_str(),
            escape(question.placeholder.as_deref().unwrap_or_default()),
            escape(previous.unwrap_or_default())
        ),
    };

    let label = if id as usize >= total { "Submit" } else { "Next" };
    let back = if id > 1 {
        format!(
            "<form method=\"post\" action=\"/back\">\
             <input type=\"hidden\" name=\"question_id\" value=\"{id}\">\
             <button type=\"submit\">Back</button></form>"
        )
    } else {
        String::new()
    };

    let body = format!(
        "<p class=\"progress\">Question {id} of {total}</p>\
         <form method=\"post\" action=\"/submit\">\
         <input type=\"hidden\" name=\"question_id\" value=\"{id}\">\
         <label for=\"answer\">{prompt}</label>{disclaimer}{input}\
         <div class=\"actions\"><button type=\"submit\">{label}</button></div></form>{back}",
        prompt = escape(&question.prompt)
    );

    layout(&format!("Question {id}"), &body)
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        escape(title)
    ))
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
