use serde::{Deserialize, Serialize};
use std::fmt;

/// Project identity quadruple reported by the core.
///
/// The same identity appears in `Project: 2677 (Run 10, Clone 29, Gen 28)`
/// log lines and in the `P2677R10C29G28` tag of the unit-info side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub project: u32,
    pub run: u32,
    pub clone: u32,
    pub generation: u32,
}

impl ProjectInfo {
    pub fn new(project: u32, run: u32, clone: u32, generation: u32) -> Self {
        Self {
            project,
            run,
            clone,
            generation,
        }
    }
}

impl fmt::Display for ProjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Run {}, Clone {}, Gen {})",
            self.project, self.run, self.clone, self.generation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_log_banner_shape() {
        let p = ProjectInfo::new(2677, 10, 29, 28);
        assert_eq!(p.to_string(), "2677 (Run 10, Clone 29, Gen 28)");
    }
}
