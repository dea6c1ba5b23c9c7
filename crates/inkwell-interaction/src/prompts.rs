//! Prompt text for the three gateway operations.

use inkwell_core::conversation::FileAttachment;

pub const WRITER_SYSTEM_INSTRUCTION: &str = "You are a world-class editor and writing partner. \
Your goal is to help the user write clear, compelling, and high-quality content. \
You can draft new content, rewrite existing text, and provide proactive feedback. \
Adopt a supportive, professional, and slightly creative tone. \
When asked to rewrite, maintain the user's voice unless asked to change it.";

pub const REWRITE_SYSTEM_INSTRUCTION: &str =
    "You are a precise text editor. Output only the replacement text.";

/// Builds the ordered text blocks of a chat draft: files, then the document,
/// then the prompt.
pub fn draft_blocks(prompt: &str, context: Option<&str>, files: &[FileAttachment]) -> Vec<String> {
    let mut blocks = Vec::with_capacity(files.len() + 3);

    if !files.is_empty() {
        blocks.push("Here are the attached reference files:\n".to_string());
        for file in files {
            blocks.push(format!("--- FILE: {} ---\n{}\n---\n", file.name, file.content));
        }
    }

    if let Some(context) = context.filter(|c| !c.is_empty()) {
        blocks.push(format!("--- CURRENT DOCUMENT CONTEXT ---\n{context}\n---\n"));
    }

    blocks.push(prompt.to_string());
    blocks
}

pub fn rewrite_prompt(selection: &str, instruction: &str, context: &str, context_chars: usize) -> String {
    format!(
        "I need you to rewrite the following text selection based on my instruction.\n\n\
         CONTEXT (Surrounding text):\n\"...{}...\"\n\n\
         SELECTION TO REWRITE:\n\"{selection}\"\n\n\
         INSTRUCTION:\n{instruction}\n\n\
         Return ONLY the rewritten text. Do not add quotes or explanations.",
        tail_chars(context, context_chars)
    )
}

pub fn review_prompt(paragraph: &str) -> String {
    format!(
        "Analyze the following paragraph for improvements in clarity, tone, or grammar.\n\
         If it is already good, return hasSuggestion: false.\n\
         If it can be significantly improved, return hasSuggestion: true with a brief \
         explanation and a rewritten version.\n\n\
         TEXT:\n\"{paragraph}\""
    )
}

/// Returns the last `n` chars of `text`.
pub fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((at, _)) => &text[at..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_blocks_order_files_document_prompt() {
        let files = vec![
            FileAttachment::new("a.md", "text/markdown", "alpha"),
            FileAttachment::new("b.txt", "text/plain", "beta"),
        ];
        let blocks = draft_blocks("Write an intro", Some("My draft"), &files);
        assert_eq!(
            blocks,
            vec![
                "Here are the attached reference files:\n".to_string(),
                "--- FILE: a.md ---\nalpha\n---\n".to_string(),
                "--- FILE: b.txt ---\nbeta\n---\n".to_string(),
                "--- CURRENT DOCUMENT CONTEXT ---\nMy draft\n---\n".to_string(),
                "Write an intro".to_string(),
            ]
        );
    }

    #[test]
    fn test_draft_blocks_skip_empty_context_and_files() {
        assert_eq!(draft_blocks("Hi", Some(""), &[]), vec!["Hi".to_string()]);
        assert_eq!(draft_blocks("Hi", None, &[]), vec!["Hi".to_string()]);
    }

    #[test]
    fn test_tail_chars() {
        assert_eq!(tail_chars("hello", 3), "llo");
        assert_eq!(tail_chars("hello", 10), "hello");
        assert_eq!(tail_chars("héllo", 4), "éllo");
        assert_eq!(tail_chars("hello", 0), "");
    }

    #[test]
    fn test_rewrite_prompt_truncates_context() {
        let context = format!("{}END", "x".repeat(1000));
        let prompt = rewrite_prompt("world", "Make it formal", &context, 500);
        assert!(prompt.contains("SELECTION TO REWRITE:\n\"world\""));
        assert!(prompt.contains("INSTRUCTION:\nMake it formal"));
        assert!(prompt.contains("END...\""));
        assert!(!prompt.contains(&"x".repeat(498)));
    }

    #[test]
    fn test_review_prompt_quotes_paragraph() {
        let prompt = review_prompt("Some paragraph.");
        assert!(prompt.ends_with("TEXT:\n\"Some paragraph.\""));
        assert!(prompt.contains("hasSuggestion: false"));
    }
}
