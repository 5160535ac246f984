//! Prompt assembly for grounded answers.

use lectern_core::Result;
use lectern_store::ScoredSegment;

use crate::types::ContextEntry;

/// Turn retrieved hits into prompt context, preserving retrieval order.
pub fn build_context(hits: &[ScoredSegment]) -> Vec<ContextEntry> {
    hits.iter().map(ContextEntry::from).collect()
}

/// Render the full prompt for `question` over `context`.
///
/// Context is serialised as a JSON array of `{text, page_no, filename}`.
pub fn render_prompt(context: &[ContextEntry], question: &str) -> Result<String> {
    let context = serde_json::to_string_pretty(context)?;
    Ok(format!(
        r#"You are a helpful study assistant answering a student's questions about PDF documents they uploaded.

The excerpts below are a JSON array. Each entry holds:
- text: content extracted from the PDF
- page_no: the 1-based page it came from
- filename: the PDF it belongs to

Excerpts:
{context}

Question:
{question}

Instructions:
- Answer primarily from the text fields of the excerpts. Cite the single most relevant entry you used through its filename and page_no.
- Rewrite technical or unclear content in simple, accessible, student-friendly language.
- You may use Markdown formatting (headings, bullet points, code blocks, tables) to make the answer easier to read.
- You may infer or summarize the answer from the excerpts when the wording is not an exact match, as long as the excerpts support it.
- Do not say that you don't know unless the question is entirely unrelated to the excerpts.
- Reply with a JSON object holding exactly these fields:
  - answer: your clear, Markdown-formatted answer
  - filename: the filename of the most relevant entry you used
  - page_no: the page_no of that entry

Respond ONLY with a valid JSON object. Do not include any explanation or extra text outside it."#
    ))
}
