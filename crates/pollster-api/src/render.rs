//! Plain-HTML page rendering. Every interpolated string goes through
//! [`escape`].

use pollster_db::models::{ChoiceRow, QuestionRow};

pub fn index(questions: &[QuestionRow]) -> String {
    let body = if questions.is_empty() {
        "<h1>Latest polls</h1>\n<p>No polls are available.</p>\n".to_string()
    } else {
        let items: String = questions
            .iter()
            .map(|q| {
                format!(
                    "  <li><a href=\"/{}/\">{}</a></li>\n",
                    q.id,
                    escape(&q.question_text)
                )
            })
            .collect();
        format!("<h1>Latest polls</h1>\n<ul>\n{items}</ul>\n")
    };

    page("Latest polls", &body)
}

pub fn detail(
    question: &QuestionRow,
    choices: &[ChoiceRow],
    error_message: Option<&str>,
) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(&question.question_text));

    if let Some(message) = error_message {
        body.push_str(&format!("<p><strong>{}</strong></p>\n", escape(message)));
    }

    body.push_str(&format!(
        "<form action=\"/{}/vote/\" method=\"post\">\n",
        question.id
    ));
    for choice in choices {
        body.push_str(&format!(
            "  <input type=\"radio\" name=\"choice\" id=\"choice{id}\" value=\"{id}\">\n  <label for=\"choice{id}\">{text}</label><br>\n",
            id = choice.id,
            text = escape(&choice.choice_text),
        ));
    }
    body.push_str("  <input type=\"submit\" value=\"Vote\">\n</form>\n");

    page(&question.question_text, &body)
}

pub fn results(question: &QuestionRow, choices: &[ChoiceRow]) -> String {
    let mut body = format!("<h1>{}</h1>\n<ul>\n", escape(&question.question_text));

    for choice in choices {
        let plural = if choice.votes == 1 { "" } else { "s" };
        body.push_str(&format!(
            "  <li>{} -- {} vote{}</li>\n",
            escape(&choice.choice_text),
            choice.votes,
            plural,
        ));
    }
    body.push_str(&format!(
        "</ul>\n<a href=\"/{}/\">Vote again?</a>\n",
        question.id
    ));

    page(&question.question_text, &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

fn escape(text: &str) -> String {
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
