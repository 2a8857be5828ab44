use regex::{NoExpand, RegexBuilder};

use crate::modules::recipient::RecipientRecord;

/// Substitutes `{{key}}` placeholders in `template` with the record's field
/// values. Matching against the key is case-insensitive; keys are taken in
/// the record's insertion order, so a fixed record always renders the same
/// output. Tokens that name no field in the record are left in place —
/// partial personalization must not blank out template text.
pub fn render(template: &str, record: &RecipientRecord) -> String {
    let mut output = template.to_string();
    for (key, value) in record.iter() {
        let pattern = format!("\\{{\\{{{}\\}}\\}}", regex::escape(key));
        let token = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .expect("escaped placeholder token is a valid pattern");
        output = token.replace_all(&output, NoExpand(value)).into_owned();
    }
    output
}

/// Converts substituted body text into HTML: escape, then turn newlines into
/// `<br>` so the plain-text line structure survives in the HTML envelope.
pub fn body_to_html(body: &str) -> String {
    html_escape::encode_text(body)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}
