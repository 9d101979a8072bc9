// Name-case helpers shared by the option parser and the help renderer.

/// Converts an identifier-case key to its dash-case flag spelling.
///
/// Splits before every ASCII upper-case letter, lower-cases each piece and
/// joins the pieces with `-`, so `requiredPropertiesOnly` becomes
/// `required-properties-only`.
pub fn to_dash_case(identifier: &str) -> String {
    to_dash_case_split_on(identifier, |c| c.is_ascii_uppercase())
}

/// Like [`to_dash_case`], but splits before every character accepted by
/// `split_before`.
pub fn to_dash_case_split_on<F>(identifier: &str, split_before: F) -> String
where
    F: Fn(char) -> bool,
{
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in identifier.chars() {
        if split_before(c) && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() || pieces.is_empty() {
        pieces.push(current);
    }

    pieces
        .iter()
        .map(|piece| piece.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Converts a dash-case flag name back to its identifier-case key.
///
/// The first segment is lower-cased, every following segment gets its first
/// character upper-cased, and the segments are concatenated.
pub fn to_identifier_case(token: &str, split_on: &str) -> String {
    let mut identifier = String::with_capacity(token.len());

    for (i, segment) in token.split(split_on).enumerate() {
        if i == 0 {
            identifier.push_str(&segment.to_lowercase());
            continue;
        }

        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            identifier.extend(first.to_uppercase());
            identifier.push_str(chars.as_str());
        }
    }

    identifier
}
