use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::tool::Tool;

/// A fixed mapping from tool names to tools.
///
/// Names are matched case-insensitively. The catalog can't be modified once
/// built.
#[derive(Default)]
pub struct ToolCatalog {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolCatalog {
    /// Builds a catalog from the given tools.
    ///
    /// When two tools share a name, the latter one wins.
    pub fn with_tools(tools: Vec<Box<dyn Tool>>) -> Self {
        let mut tool_map = BTreeMap::new();
        for tool in tools {
            let name = normalize(tool.name());
            if tool_map.contains_key(&name) {
                warn!("tool registered twice: {name}");
            }
            tool_map.insert(name, tool);
        }
        Self { tools: tool_map }
    }

    /// Looks up a tool by name, ignoring case and surrounding whitespace.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(&normalize(name)).map(|tool| tool.as_ref())
    }

    /// Returns the registered tool names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Renders the tools as the "available actions" section of the system
    /// prompt, one example usage per tool.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (name, tool) in &self.tools {
            if !out.is_empty() {
                out.push('\n');
            }
            // Writing to a `String` never fails.
            let _ = writeln!(out, "{name}:");
            let _ = writeln!(out, "e.g. {name}: {}", tool.example());
            let _ = writeln!(out, "{}", tool.description().trim());
        }
        out
    }
}

#[inline]
fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{Error, ToolResult};

    struct EchoTool;

    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns the argument unchanged"
        }

        fn example(&self) -> &str {
            "hello"
        }

        fn execute(&self, argument: &str) -> ToolResult {
            Ok(argument.to_owned())
        }
    }

    struct FailTool;

    impl Tool for FailTool {
        fn name(&self) -> &str {
            "always_fail"
        }

        fn description(&self) -> &str {
            "\nNever succeeds\n"
        }

        fn example(&self) -> &str {
            "anything"
        }

        fn execute(&self, _argument: &str) -> ToolResult {
            Err(Error::execution_error().with_reason("nope"))
        }
    }

    fn catalog() -> ToolCatalog {
        ToolCatalog::with_tools(vec![Box::new(EchoTool), Box::new(FailTool)])
    }

    #[test]
    fn test_lookup_ignores_case() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 2);
        let tool = catalog.get("ECHO").unwrap();
        assert_eq!(tool.execute("hi").unwrap(), "hi");
        assert!(catalog.get(" Echo ").is_some());
        assert!(catalog.get("read_file").is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        let catalog = catalog();
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["always_fail", "echo"]);
    }

    #[test]
    fn test_describe() {
        let catalog = catalog();
        assert_eq!(
            catalog.describe(),
            "always_fail:\ne.g. always_fail: anything\nNever succeeds\n\n\
             echo:\ne.g. echo: hello\nReturns the argument unchanged\n"
        );
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = ToolCatalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.describe(), "");
    }
}
