// gittools Tool Catalog
// Fixed builtin tools merged with the user's custom tools. A tool's position in
// the merged list is its index everywhere else in the crate.

use crate::types::errors::ToolError;
use crate::types::tool::{Tool, OWNER_PLACEHOLDER, REPO_PLACEHOLDER};

struct BuiltinTool {
    id: &'static str,
    name: &'static str,
    url: &'static str,
    description: &'static str,
}

const BUILTIN_TOOLS: [BuiltinTool; 5] = [
    BuiltinTool {
        id: "github-dev",
        name: "GitHub.dev",
        url: "https://github.dev/{owner}/{repo}",
        description: "Official online VS Code editor for GitHub",
    },
    BuiltinTool {
        id: "github1s",
        name: "GitHub1s",
        url: "https://github1s.com/{owner}/{repo}",
        description: "Browse the repository code in a VS Code interface",
    },
    BuiltinTool {
        id: "gitmcp",
        name: "GitMCP",
        url: "https://gitmcp.io/{owner}/{repo}",
        description: "MCP server giving AI assistants access to project docs and code",
    },
    BuiltinTool {
        id: "active-forks",
        name: "Active Forks",
        url: "https://github.com/{owner}/{repo}/forks?include=active&page=1&period=&sort_by=last_updated",
        description: "List forks with recent activity",
    },
    BuiltinTool {
        id: "sourcegraph",
        name: "Sourcegraph",
        url: "https://sourcegraph.com/github.com/{owner}/{repo}",
        description: "Cross-repository code search and navigation",
    },
];

/// Number of builtin tools; they occupy indices `0..builtin_count()`.
pub const fn builtin_count() -> usize {
    BUILTIN_TOOLS.len()
}

/// The builtin tools in their fixed order.
pub fn builtin_tools() -> Vec<Tool> {
    BUILTIN_TOOLS
        .iter()
        .map(|b| Tool {
            id: Some(b.id.to_string()),
            name: b.name.to_string(),
            url: b.url.to_string(),
            description: b.description.to_string(),
        })
        .collect()
}

/// Builtins followed by `custom_tools` in the caller's order.
pub fn resolve_catalog(custom_tools: &[Tool]) -> Vec<Tool> {
    let mut catalog = builtin_tools();
    catalog.extend_from_slice(custom_tools);
    catalog
}

/// Whether `index` addresses a custom tool in a catalog with `custom_len` custom entries.
pub fn is_custom_index(index: usize, custom_len: usize) -> bool {
    index >= builtin_count() && index < builtin_count() + custom_len
}

/// Validates and normalises a user-entered tool.
///
/// All fields are trimmed. Name and URL must be non-empty and the URL must
/// contain both `{owner}` and `{repo}`. URL syntax is not checked.
pub fn validate_custom_tool(name: &str, url: &str, description: &str) -> Result<Tool, ToolError> {
    let name = name.trim();
    let url = url.trim();

    if name.is_empty() {
        return Err(ToolError::EmptyName);
    }
    if url.is_empty() {
        return Err(ToolError::EmptyUrl);
    }
    if !url.contains(OWNER_PLACEHOLDER) {
        return Err(ToolError::MissingPlaceholder(OWNER_PLACEHOLDER));
    }
    if !url.contains(REPO_PLACEHOLDER) {
        return Err(ToolError::MissingPlaceholder(REPO_PLACEHOLDER));
    }

    Ok(Tool::new(name, url, description.trim()))
}
