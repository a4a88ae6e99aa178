//! Static pre-filter for action source files.
//!
//! The source is never executed here. A lexical pass drops comments and
//! string literals and joins bracketed continuations into logical lines. A
//! file passes when a decorator written as a call (`@name(...)`,
//! `@pkg.name(...)`) sits on a `def`, `async def` or `class`.
//!
//! This over-approximates: any call-shaped decorator counts, whatever its
//! name.

/// Whether `source` may define at least one tagged action.
pub fn is_action_file(source: &str) -> bool {
    let mut pending_call_decorator = false;

    for line in logical_lines(source) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(expr) = line.strip_prefix('@') {
            // stacked decorators: one call-shaped decorator is enough
            pending_call_decorator |= is_call_decorator(expr);
            continue;
        }

        if pending_call_decorator && starts_definition(line) {
            return true;
        }
        pending_call_decorator = false;
    }

    false
}

fn is_call_decorator(expr: &str) -> bool {
    // grouping parentheses, as in `@(action(name="x"))`
    let mut expr = expr.trim_start();
    while let Some(inner) = expr.strip_prefix('(') {
        expr = inner.trim_start();
    }
    let name_len = expr
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '.'))
        .map_or(expr.len(), |(i, _)| i);
    let (name, rest) = expr.split_at(name_len);

    !name.is_empty()
        && name
            .split('.')
            .all(|part| part.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_'))
        && rest.trim_start().starts_with('(')
}

fn starts_definition(line: &str) -> bool {
    let mut words = line.split_whitespace();
    match words.next() {
        Some("def" | "class") => true,
        Some("async") => words.next() == Some("def"),
        _ => false,
    }
}

/// Split into logical lines with comments removed and every string literal
/// replaced by `""`.
fn logical_lines(source: &str) -> Vec<String> {
    let chars: Vec<char> = source.chars().collect();
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '\'' | '"' => {
                i = skip_string(&chars, i);
                current.push_str("\"\"");
                continue;
            }
            '\\' if chars.get(i + 1) == Some(&'\n') => {
                current.push(' ');
                i += 2;
                continue;
            }
            c @ ('(' | '[' | '{') => {
                depth += 1;
                current.push(c);
            }
            c @ (')' | ']' | '}') => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '\n' if depth == 0 => lines.push(std::mem::take(&mut current)),
            '\n' => current.push(' '),
            c => current.push(c),
        }
        i += 1;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Index just past the literal opening at `start`.
fn skip_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let triple = chars.get(start + 1) == Some(&quote) && chars.get(start + 2) == Some(&quote);
    let mut i = start + if triple { 3 } else { 1 };

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote && !triple => return i + 1,
            c if c == quote
                && chars.get(i + 1) == Some(&quote)
                && chars.get(i + 2) == Some(&quote) =>
            {
                return i + 3;
            }
            // unterminated single-line literal ends with the line
            '\n' if !triple => return i,
            _ => i += 1,
        }
    }
    chars.len()
}
