//! Query-string helpers.

/// Split a comma-separated query value into trimmed, non-empty items.
///
/// `None`, an empty string and a string of only commas all yield an empty list.
pub fn parse_comma_separated_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims() {
        assert_eq!(
            parse_comma_separated_list(Some("internal medicine, ENT ,,")),
            vec!["internal medicine".to_string(), "ENT".to_string()]
        );
    }

    #[test]
    fn empty_inputs_give_empty_lists() {
        assert!(parse_comma_separated_list(None).is_empty());
        assert!(parse_comma_separated_list(Some("")).is_empty());
        assert!(parse_comma_separated_list(Some(" , ")).is_empty());
    }
}
