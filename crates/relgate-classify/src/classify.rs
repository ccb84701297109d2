use relgate_core::{ChangeDescriptor, ChangeType};

const BREAKING_MARKERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Classifies one commit message into a [`ChangeDescriptor`].
///
/// The header (first line) is matched against `<type>[(scope)][!]: <summary>`.
/// A trailing `!` before the colon or a `BREAKING CHANGE:` footer in the body
/// marks the descriptor as breaking. Headers that do not fit the grammar
/// classify as [`ChangeType::Other`] with the whole header as summary and no
/// breaking flag. Classification is total: every input yields a descriptor.
#[must_use]
pub fn classify(id: impl Into<String>, message: &str) -> ChangeDescriptor {
    let (header, body) = split_message(message);

    let Some(parsed) = parse_header(header) else {
        return ChangeDescriptor::new(id, ChangeType::Other, header.trim());
    };

    let breaking = parsed.bang || has_breaking_marker(body);

    let mut descriptor =
        ChangeDescriptor::new(id, parsed.kind, parsed.summary).with_breaking(breaking);
    if let Some(scope) = parsed.scope {
        descriptor = descriptor.with_scope(scope);
    }
    descriptor
}

struct ParsedHeader<'a> {
    kind: ChangeType,
    scope: Option<&'a str>,
    summary: &'a str,
    bang: bool,
}

fn split_message(message: &str) -> (&str, &str) {
    match message.split_once('\n') {
        Some((header, body)) => (header.trim_end_matches('\r'), body),
        None => (message, ""),
    }
}

fn parse_header(header: &str) -> Option<ParsedHeader<'_>> {
    let (prefix, summary) = header.split_once(':')?;

    let summary = summary.trim();
    if summary.is_empty() {
        return None;
    }

    let (prefix, bang) = match prefix.strip_suffix('!') {
        Some(stripped) => (stripped, true),
        None => (prefix, false),
    };

    let (token, scope) = match prefix.split_once('(') {
        Some((token, rest)) => {
            let scope = rest.strip_suffix(')')?;
            (token, if scope.is_empty() { None } else { Some(scope) })
        }
        None => (prefix, None),
    };

    if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ParsedHeader {
        kind: type_for_token(token),
        scope,
        summary,
        bang,
    })
}

fn type_for_token(token: &str) -> ChangeType {
    match token.to_ascii_lowercase().as_str() {
        "feat" | "feature" => ChangeType::Feature,
        "fix" => ChangeType::Fix,
        "chore" => ChangeType::Chore,
        "doc" | "docs" => ChangeType::Docs,
        _ => ChangeType::Other,
    }
}

fn has_breaking_marker(body: &str) -> bool {
    body.lines()
        .any(|line| BREAKING_MARKERS.iter().any(|m| line.trim_start().starts_with(m)))
}
