/*!
 * Token-budget chunking of the selected text.
 *
 * Tokens are whitespace-delimited. A token containing `?` or ending with `:`
 * marks a question or heading and always opens a new chunk.
 */

/// Whether a token opens a new chunk regardless of the budget
pub fn is_hard_break(token: &str) -> bool {
    token.contains('?') || token.ends_with(':')
}

/// Split text into chunks of at most `token_limit` tokens.
///
/// A single chunk never exceeds the limit; a limit of zero is treated as one.
pub fn chunk_tokens(text: &str, token_limit: usize) -> Vec<String> {
    let limit = token_limit.max(1);
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        if !current.is_empty() && (is_hard_break(token) || current.len() + 1 > limit) {
            chunks.push(current.join(" "));
            current.clear();
        }
        current.push(token);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}
