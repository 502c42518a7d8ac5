//! Augmented prompt assembly.

/// Instructions prepended to every augmented prompt.
pub const PREAMBLE: &[&str] = &[
    "Always reply in the same language as the *PROMPT*.",
    "If it doesn't make sense, say that you couldn't do it.",
    "If the prompt is inappropriate, say that you can't respond to it.",
    "If it is outside the context, say that you don't have enough information to respond to it.",
    "Don't mention that you extracted from a document, just say the response.",
];

/// Joins the preamble, the retrieved document and the user prompt with single
/// spaces. Neither the document nor the prompt is altered.
///
/// # Example
/// ```
/// # use contextor::prompt::build_augmented_prompt;
/// let p = build_augmented_prompt("The sky is blue.", "What color is the sky?");
/// assert!(p.contains("Using this data: The sky is blue. . Respond to this *PROMPT*: What color is the sky?"));
/// ```
pub fn build_augmented_prompt(document: &str, prompt: &str) -> String {
    let preamble = PREAMBLE.join(" ");
    [
        preamble.as_str(),
        "Using this data:",
        document,
        ". Respond to this *PROMPT*:",
        prompt,
    ]
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_comes_first_and_prompt_last() {
        let p = build_augmented_prompt("doc", "question?");
        assert!(p.starts_with("Always reply in the same language as the *PROMPT*. If it"));
        assert!(p.ends_with(". Respond to this *PROMPT*: question?"));
    }

    #[test]
    fn document_is_embedded_verbatim() {
        let doc = "Line one.\n  Line two with *stars* and {braces}.";
        let p = build_augmented_prompt(doc, "q");
        assert!(p.contains(&format!("Using this data: {doc} . Respond")));
    }
}
