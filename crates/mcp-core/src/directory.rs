//! The list of tools exposed by one server, with search.

use crate::messages::{McpClientInfo, ToolInfo};

/// Message shown when a server reports no tools at all.
pub const NO_TOOLS_AVAILABLE: &str = "No tools available";

/// Message shown when tools exist but none match the search.
pub const NO_SEARCH_RESULTS: &str = "No search results";

/// Tools of a single server, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolDirectory {
    server: String,
    tools: Vec<ToolInfo>,
}

impl ToolDirectory {
    pub fn new(server: impl Into<String>, tools: Vec<ToolInfo>) -> Self {
        Self {
            server: server.into(),
            tools,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn tools(&self) -> &[ToolInfo] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up a tool by exact name.
    pub fn find(&self, name: &str) -> Option<&ToolInfo> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Tools matching `query`, see [`filter_tools`].
    pub fn filter(&self, query: &str) -> Vec<&ToolInfo> {
        filter_tools(&self.tools, query)
    }

    /// Message for an empty filtered list, or `None` if `query` matches something.
    pub fn empty_state(&self, query: &str) -> Option<&'static str> {
        if self.tools.is_empty() {
            Some(NO_TOOLS_AVAILABLE)
        } else if self.filter(query).is_empty() {
            Some(NO_SEARCH_RESULTS)
        } else {
            None
        }
    }
}

impl From<McpClientInfo> for ToolDirectory {
    fn from(client: McpClientInfo) -> Self {
        Self::new(client.name, client.tool_info)
    }
}

/// Case-insensitive substring search over tool name and description.
///
/// The query is trimmed first; an empty query returns every tool. Source
/// order is preserved.
pub fn filter_tools<'a>(tools: &'a [ToolInfo], query: &str) -> Vec<&'a ToolInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tools.iter().collect();
    }
    tools
        .iter()
        .filter(|tool| {
            tool.name.to_lowercase().contains(&needle)
                || tool.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ToolInfo> {
        vec![
            ToolInfo::new("read_file", "Read the contents of a file"),
            ToolInfo::new("write_file", "Write content to disk"),
            ToolInfo::new("search", "Full-text SEARCH over the index"),
            ToolInfo::new("ping", ""),
        ]
    }

    fn names<'a>(tools: &[&'a ToolInfo]) -> Vec<&'a str> {
        tools.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let tools = sample();
        let filtered = filter_tools(&tools, "");
        assert_eq!(filtered.len(), tools.len());
        assert!(filtered.iter().zip(&tools).all(|(a, b)| *a == b));

        assert_eq!(filter_tools(&tools, "   ").len(), tools.len());
    }

    #[test]
    fn test_matches_name_or_description_case_insensitively() {
        let tools = sample();
        assert_eq!(names(&filter_tools(&tools, "FILE")), vec!["read_file", "write_file"]);
        assert_eq!(names(&filter_tools(&tools, "disk")), vec!["write_file"]);
        assert_eq!(names(&filter_tools(&tools, "search")), vec!["search"]);
    }

    #[test]
    fn test_query_is_trimmed() {
        let tools = sample();
        assert_eq!(names(&filter_tools(&tools, "  ping \n")), vec!["ping"]);
    }

    #[test]
    fn test_results_are_subset_containing_query() {
        let tools = sample();
        for query in ["e", "RE", "x", "the", "_"] {
            let needle = query.to_lowercase();
            for tool in filter_tools(&tools, query) {
                assert!(tools.contains(tool));
                assert!(
                    tool.name.to_lowercase().contains(&needle)
                        || tool.description.to_lowercase().contains(&needle)
                );
            }
        }
    }

    #[test]
    fn test_empty_state_messages() {
        let empty = ToolDirectory::new("srv", vec![]);
        assert_eq!(empty.empty_state(""), Some(NO_TOOLS_AVAILABLE));
        assert_eq!(empty.empty_state("x"), Some(NO_TOOLS_AVAILABLE));

        let directory = ToolDirectory::new("srv", sample());
        assert_eq!(directory.empty_state("nothing-matches"), Some(NO_SEARCH_RESULTS));
        assert_eq!(directory.empty_state("ping"), None);
    }

    #[test]
    fn test_find_by_name() {
        let directory = ToolDirectory::new("srv", sample());
        assert!(directory.find("search").is_some());
        assert!(directory.find("Search").is_none());
    }
}
