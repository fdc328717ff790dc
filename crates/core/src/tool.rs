//! Tool call supports.

mod catalog;
mod error;

pub use catalog::ToolCatalog;
pub use error::{Error, ErrorKind};

/// The result of a tool call.
pub type ToolResult = Result<String, Error>;

/// A deterministic function the model can request by name.
///
/// Implementations of this trait should be stateless. The model supplies the
/// argument as free text (the remainder of the `Action:` line), so parsing
/// and validating it is up to the tool.
pub trait Tool: Send + Sync + 'static {
    /// Returns the name of the tool, made of lowercase letters and
    /// underscores.
    fn name(&self) -> &str;

    /// Returns the description of the tool.
    fn description(&self) -> &str;

    /// Returns a sample argument, shown to the model as an example usage.
    fn example(&self) -> &str;

    /// Executes the tool with the given raw argument.
    fn execute(&self, argument: &str) -> ToolResult;
}
