//! # Search/filter state binder
//!
//! Two-way binding between a text filter and one URL query parameter.
//!
//! - The **value** is what the input shows. It changes on every keystroke.
//! - The **committed** value is what the URL says. It only changes when the
//!   router reports a new URL, and it is the key collection loads are driven
//!   by, so one committed change means one refetch.
//!
//! Editing never pushes history: the caller replaces the current URL with the
//! query [`QueryBinding::edit`] returns. A blank value clears the parameter.

use crate::sync::Phase;

/// Read `param` from a query string (with or without the leading `?`).
pub fn read_param(query: &str, param: &str) -> Option<String> {
    let query = query.trim_start_matches('?');
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()?
        .into_iter()
        .find(|(name, _)| name == param)
        .map(|(_, value)| value)
}

/// Set (or with `None`, remove) `param` in a query string, keeping every
/// other parameter in order. Returns the query without a leading `?`.
pub fn write_param(query: &str, param: &str, value: Option<&str>) -> String {
    let query = query.trim_start_matches('?');
    let mut pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query).unwrap_or_default();

    match (pairs.iter().position(|(name, _)| name == param), value) {
        (Some(pos), Some(value)) => pairs[pos].1 = value.to_string(),
        (None, Some(value)) => pairs.push((param.to_string(), value.to_string())),
        (Some(_), None) => pairs.retain(|(name, _)| name != param),
        (None, None) => {}
    }

    serde_urlencoded::to_string(&pairs).unwrap_or_default()
}

/// A load [`QueryBinding::refetch`] asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Refetch {
    /// The API filter, `None` when the parameter is blank.
    pub search: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryBinding {
    param: String,
    value: String,
    committed: String,
}

impl QueryBinding {
    pub fn new(param: &str) -> Self {
        Self {
            param: param.to_string(),
            value: String::new(),
            committed: String::new(),
        }
    }

    /// Initialise from the URL on mount.
    pub fn from_query(param: &str, query: &str) -> Self {
        let committed = read_param(query, param).unwrap_or_default();
        Self {
            param: param.to_string(),
            value: committed.clone(),
            committed,
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// What the input shows.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// What the URL says.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// The committed value as an API filter, `None` when blank.
    pub fn search(&self) -> Option<&str> {
        Some(self.committed.as_str()).filter(|v| !v.trim().is_empty())
    }

    /// Record a keystroke. Returns the parameter value the URL should be
    /// replaced with, `None` meaning "remove the parameter".
    pub fn edit(&mut self, input: &str) -> Option<String> {
        self.value = input.to_string();
        Some(input.to_string()).filter(|v| !v.trim().is_empty())
    }

    /// [`edit`](Self::edit), rendered into `current_query` with the other
    /// parameters kept.
    pub fn edit_query(&mut self, input: &str, current_query: &str) -> String {
        let next = self.edit(input);
        write_param(current_query, &self.param, next.as_deref())
    }

    /// The router reported a (possibly) new parameter value. Returns `true`
    /// when the committed value changed and a refetch is due; the input is
    /// re-synchronised in that case.
    pub fn sync(&mut self, url_value: Option<&str>) -> bool {
        let url_value = url_value.unwrap_or_default();
        if url_value == self.committed {
            return false;
        }
        self.committed = url_value.to_string();
        self.value = url_value.to_string();
        true
    }

    /// [`sync`](Self::sync) for a view whose collection is keyed by this
    /// parameter. Asks for a load when the committed value changed, and for
    /// the first load of a collection that has never loaded.
    pub fn refetch(&mut self, url_value: Option<&str>, phase: Phase) -> Option<Refetch> {
        let changed = self.sync(url_value);
        (changed || phase == Phase::Uninitialized).then(|| Refetch {
            search: self.search().map(str::to_string),
        })
    }

    pub fn sync_from_url(&mut self, query: &str) -> bool {
        let value = read_param(query, &self.param);
        self.sync(value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("?search=rust", Some("rust"))]
    #[case("search=rust+dev&page=2", Some("rust dev"))]
    #[case("page=2&search=a%26b", Some("a&b"))]
    #[case("page=2", None)]
    #[case("", None)]
    fn test_read_param(#[case] query: &str, #[case] expected: Option<&str>) {
        assert_eq!(read_param(query, "search").as_deref(), expected);
    }

    #[rstest]
    #[case("", Some("rust"), "search=rust")]
    #[case("?page=2", Some("go lang"), "page=2&search=go+lang")]
    #[case("search=old&page=2", Some("new"), "search=new&page=2")]
    #[case("search=old&page=2", None, "page=2")]
    #[case("page=2", None, "page=2")]
    fn test_write_param(#[case] query: &str, #[case] value: Option<&str>, #[case] expected: &str) {
        assert_eq!(write_param(query, "search", value), expected);
    }

    #[test]
    fn test_mount_reads_url() {
        let binding = QueryBinding::from_query("search", "?search=designer");
        assert_eq!(binding.value(), "designer");
        assert_eq!(binding.committed(), "designer");
        assert_eq!(binding.search(), Some("designer"));
    }

    #[test]
    fn test_blank_edit_clears_parameter() {
        let mut binding = QueryBinding::from_query("search", "search=rust&page=3");
        assert_eq!(binding.edit_query("   ", "search=rust&page=3"), "page=3");
        assert_eq!(binding.value(), "   ");
        assert!(binding.sync(None));
        assert_eq!(binding.search(), None);
    }

    #[test]
    fn test_each_commit_is_one_refetch() {
        let mut binding = QueryBinding::new("search");
        let mut refetches = Vec::new();

        for typed in ["r", "ru", "rus", "rust"] {
            let next = binding.edit(typed);
            if binding.sync(next.as_deref()) {
                refetches.push(binding.committed().to_string());
            }
            // The router re-renders with the same URL; nothing new to fetch.
            assert!(!binding.sync(next.as_deref()));
        }

        assert_eq!(refetches, ["r", "ru", "rus", "rust"]);
        assert_eq!(binding.search(), Some("rust"));
    }

    #[test]
    fn test_external_navigation_resyncs_input() {
        let mut binding = QueryBinding::from_query("search", "search=rust");
        binding.edit("rus");
        assert!(binding.sync_from_url("?search=python"));
        assert_eq!(binding.value(), "python");
        assert_eq!(binding.committed(), "python");
        assert!(!binding.sync_from_url("search=python"));
    }

    #[test]
    fn test_refetch_once_per_committed_value() {
        let mut binding = QueryBinding::new("search");

        assert_eq!(
            binding.refetch(Some(""), Phase::Uninitialized),
            Some(Refetch { search: None })
        );
        assert_eq!(binding.refetch(Some(""), Phase::Ready), None);
        assert_eq!(
            binding.refetch(Some("rust"), Phase::Ready),
            Some(Refetch {
                search: Some("rust".to_string())
            })
        );
        assert_eq!(binding.refetch(Some("rust"), Phase::Loading), None);
        assert_eq!(
            binding.refetch(None, Phase::Ready),
            Some(Refetch { search: None })
        );
    }
}
