// src/shell/tokenize.rs

/// Maximum number of tokens taken from one input line; the rest is ignored.
pub const MAX_TOKENS: usize = 16;

/// Split an input line into whitespace-separated tokens.
///
/// A token starting with `"` runs to the next `"` (or the end of the line)
/// and may contain whitespace; the quotes are stripped.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while tokens.len() < MAX_TOKENS {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                token.push(c);
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                token.push(c);
            }
        }
        tokens.push(token);
    }

    tokens
}
