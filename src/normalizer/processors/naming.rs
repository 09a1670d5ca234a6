/// Converts a camelCase or PascalCase name to snake_case.
///
/// Acronym runs stay together (`gameID` → `game_id`, `HTTPStatus` → `http_status`),
/// and existing underscores or non-alphanumeric separators are left alone.
///
/// # Examples
/// ```
/// use cbbd_normalizer::normalizer::processors::naming::camel_to_snake;
///
/// assert_eq!(camel_to_snake("firstPlaceVotes"), "first_place_votes");
/// assert_eq!(camel_to_snake("homeTeam.name"), "home_team.name");
/// ```
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
