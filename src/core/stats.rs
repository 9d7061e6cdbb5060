use similar::{ChangeTag, TextDiff};

/// Line-level change counts between the repository copy and the target copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Lines present in the target copy only
    pub added: usize,
    /// Lines present in the repository copy only
    pub removed: usize,
}

impl LineStats {
    pub fn between(repo_content: &str, target_content: &str) -> Self {
        let diff = TextDiff::from_lines(repo_content, target_content);
        let mut stats = LineStats::default();

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => stats.added += 1,
                ChangeTag::Delete => stats.removed += 1,
                ChangeTag::Equal => {}
            }
        }

        stats
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_counts_both_sides() {
        let stats = LineStats::between("a\nb\nc\n", "a\nB\nc\nd\n");
        assert_eq!(stats.added, 2);
        assert_eq!(stats.removed, 1);
    }

    #[test]
    fn test_identical_content_is_empty() {
        assert!(LineStats::between("x\ny\n", "x\ny\n").is_empty());
    }

    #[test]
    fn test_against_empty_file() {
        let stats = LineStats::between("", "one\ntwo\n");
        assert_eq!(stats, LineStats { added: 2, removed: 0 });
    }
}
