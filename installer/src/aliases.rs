//! The canonical binary name and its git subcommand aliases.
//!
//! Git runs `git-<name>` executables found on `PATH` as `git <name>`, so each
//! alias is a symlink to the canonical binary, which dispatches on `argv[0]`.

/// The name the verified binary is installed under.
pub const CANONICAL_NAME: &str = "gitflow-toolkit";

/// One alias symlink installed next to the canonical binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    name: &'static str,
    description: &'static str,
}

impl Alias {
    const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }

    /// The symlink filename, e.g. `git-ci`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The git subcommand this alias provides, e.g. `ci` for `git ci`.
    #[must_use]
    pub fn subcommand(&self) -> &'static str {
        self.name.strip_prefix("git-").unwrap_or(self.name)
    }

    /// A one-line summary shown in the post-install message.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

/// Every alias, in installation order.
pub const ALIASES: [Alias; 11] = [
    Alias::new("git-ci", "interactive commit"),
    Alias::new("git-ps", "push the current branch"),
    Alias::new("git-feat", "create a feat branch"),
    Alias::new("git-fix", "create a fix branch"),
    Alias::new("git-docs", "create a docs branch"),
    Alias::new("git-style", "create a style branch"),
    Alias::new("git-refactor", "create a refactor branch"),
    Alias::new("git-test", "create a test branch"),
    Alias::new("git-chore", "create a chore branch"),
    Alias::new("git-perf", "create a perf branch"),
    Alias::new("git-hotfix", "create a hotfix branch"),
];
