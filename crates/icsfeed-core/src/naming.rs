//! Calendar display-name derivation.

/// Prefix of every derived calendar name.
pub const CALENDAR_NAME_PREFIX: &str = "Events for ";

/// Returns the display name for a calendar built from `feed_ids`.
///
/// An override is used verbatim. Otherwise the identifiers are joined with
/// spaces, split back into space-separated tokens, and each token is
/// title-cased with [`title_case_token`]. Underscores are not word
/// boundaries, so `TEAM_A` becomes `Team_a`.
pub fn derive_calendar_name<S: AsRef<str>>(feed_ids: &[S], name_override: Option<&str>) -> String {
    if let Some(name) = name_override {
        return name.to_string();
    }

    let joined = feed_ids
        .iter()
        .map(|id| id.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");

    let titled = joined
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(title_case_token)
        .collect::<Vec<_>>()
        .join(" ");

    format!("{CALENDAR_NAME_PREFIX}{titled}")
}

/// Uppercases the first character of `token` and lowercases the rest.
pub fn title_case_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
