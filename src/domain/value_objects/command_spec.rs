//! Concrete external invocations

use std::fmt;

/// A concrete external invocation: program name plus argument vector.
///
/// This is the boundary between "what the user asked for" (a logical
/// action) and "what external tool actually runs".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name, resolved on the executing environment's search path
    pub program: String,
    /// Argument vector passed to the program
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_program_and_args() {
        let spec = CommandSpec::new("npm", ["run", "build"]);
        assert_eq!(spec.to_string(), "npm run build");

        let bare = CommandSpec::new("cargo", Vec::<String>::new());
        assert_eq!(bare.to_string(), "cargo");
    }
}
