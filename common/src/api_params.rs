//! Translation of a [`ProjectQuery`] into the remote API's list parameters.

use chrono::{Months, NaiveDate};

use crate::query::{ParamValue, ProjectQuery};

/// Months without an update after which a project counts as stale.
pub const STALE_MONTHS: u32 = 6;

/// Frontend key → API parameter name.  Keys not listed are not sent.
const API_NAMES: &[(&str, &str)] = &[
    ("basedOnMyInterests", "basedOnMyInterests"),
    ("campaign", "campaign"),
    ("createdByMe", "createdByMe"),
    ("createdFrom", "createdFrom"),
    ("difficulty", "difficulty"),
    ("downloadAsCSV", "downloadAsCSV"),
    ("exactTypes", "mappingTypesExact"),
    ("favoritedByMe", "favoritedByMe"),
    ("interests", "interests"),
    ("location", "country"),
    ("managedByMe", "managedByMe"),
    ("mappedByMe", "mappedByMe"),
    ("omitMapResults", "omitMapResults"),
    ("orderBy", "orderBy"),
    ("orderByType", "orderByType"),
    ("organisation", "organisationName"),
    ("page", "page"),
    ("partnerId", "partnerId"),
    ("partnershipFrom", "partnershipFrom"),
    ("partnershipTo", "partnershipTo"),
    ("status", "projectStatuses"),
    ("text", "textSearch"),
    ("types", "mappingTypes"),
];

fn api_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Bool(b) => b.to_string(),
        other => other.encode(),
    }
}

/// Query parameters for `GET /projects/`.
///
/// `action` comes from the user's preferences and wins over an `action` key
/// in the query.  `stale=1` becomes a `lastUpdatedTo` cutoff relative to
/// `today`.
pub fn list_params(query: &ProjectQuery, action: Option<&str>, today: NaiveDate) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = API_NAMES
        .iter()
        .filter_map(|(key, api_name)| {
            query
                .get(key)
                .map(|value| (api_name.to_string(), api_value(value)))
        })
        .collect();

    if query.get_bool("stale") == Some(true) {
        if let Some(cutoff) = today.checked_sub_months(Months::new(STALE_MONTHS)) {
            params.push(("lastUpdatedTo".into(), cutoff.format("%Y-%m-%d").to_string()));
        }
    }

    match action.or_else(|| query.get_str("action")) {
        Some(action) if !action.is_empty() && action != "any" => {
            params.push(("action".into(), action.to_string()));
        }
        _ => {}
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 31).unwrap()
    }

    fn get<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_keys_are_renamed() {
        let query = ProjectQuery::parse(
            "text=roads&status=ARCHIVED&types=ROADS,WATERWAYS&organisation=HOT&managedByMe=1&utm=x",
        );
        let params = list_params(&query, None, today());
        assert_eq!(get(&params, "textSearch"), Some("roads"));
        assert_eq!(get(&params, "projectStatuses"), Some("ARCHIVED"));
        assert_eq!(get(&params, "mappingTypes"), Some("ROADS,WATERWAYS"));
        assert_eq!(get(&params, "organisationName"), Some("HOT"));
        assert_eq!(get(&params, "managedByMe"), Some("true"));
        assert_eq!(get(&params, "utm"), None);
        assert_eq!(get(&params, "action"), None);
    }

    #[test]
    fn test_stale_becomes_cutoff_date() {
        let query = ProjectQuery::parse("stale=1");
        let params = list_params(&query, None, today());
        assert_eq!(get(&params, "lastUpdatedTo"), Some("2024-02-29"));
        assert_eq!(get(&params, "stale"), None);
    }

    #[test]
    fn test_action_preference_wins() {
        let query = ProjectQuery::parse("action=map");
        assert_eq!(get(&list_params(&query, Some("validate"), today()), "action"), Some("validate"));
        assert_eq!(get(&list_params(&query, None, today()), "action"), Some("map"));
        assert_eq!(get(&list_params(&ProjectQuery::default(), Some("any"), today()), "action"), None);
    }
}
