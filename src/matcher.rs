//! One-to-one matching between an old and a new set of trackables.
//!
//! Matching is scoped by `rule_key` and runs six criteria in strict priority
//! order. Each pass only considers items not claimed by an earlier pass, so a
//! strong match (server issue key) can never be stolen by a weaker one
//! (line hash alone). The matcher is a pure function over index arenas; it
//! never mutates or clones its inputs.

use crate::models::Trackable;
use std::collections::HashMap;

/// A single comparison rule. Listed in [`MatchCriterion::ALL`] from strongest
/// to weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCriterion {
    /// Equal non-null server issue key.
    ServerIssueKey,
    /// Equal non-null line and equal non-null text range hash.
    LineAndTextRangeHash,
    /// Equal non-null line and equal non-null line hash.
    LineAndLineHash,
    /// Equal non-null line and equal message.
    LineAndMessage,
    /// Equal non-null text range hash, line ignored (moved blocks).
    TextRangeHash,
    /// Equal non-null line hash, line ignored (moved lines).
    LineHash,
}

impl MatchCriterion {
    /// Priority order of the passes.
    pub const ALL: [MatchCriterion; 6] = [
        MatchCriterion::ServerIssueKey,
        MatchCriterion::LineAndTextRangeHash,
        MatchCriterion::LineAndLineHash,
        MatchCriterion::LineAndMessage,
        MatchCriterion::TextRangeHash,
        MatchCriterion::LineHash,
    ];

    /// Whether `old` and `new` satisfy this criterion. Null (absent) fields
    /// never match anything.
    pub fn accepts<C>(&self, old: &Trackable<C>, new: &Trackable<C>) -> bool {
        match self {
            MatchCriterion::ServerIssueKey => {
                both_equal(old.server_issue_key.as_ref(), new.server_issue_key.as_ref())
            }
            MatchCriterion::LineAndTextRangeHash => {
                both_equal(old.line, new.line)
                    && both_equal(old.text_range_hash, new.text_range_hash)
            }
            MatchCriterion::LineAndLineHash => {
                both_equal(old.line, new.line) && both_equal(old.line_hash, new.line_hash)
            }
            MatchCriterion::LineAndMessage => {
                both_equal(old.line, new.line) && old.message == new.message
            }
            MatchCriterion::TextRangeHash => {
                both_equal(old.text_range_hash, new.text_range_hash)
            }
            MatchCriterion::LineHash => both_equal(old.line_hash, new.line_hash),
        }
    }
}

fn both_equal<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[derive(Debug, Default)]
/// Outcome of a matching run. All values are indices into the input slices.
pub struct Matching {
    /// `(old_index, new_index)` pairs, one-to-one.
    pub pairs: Vec<(usize, usize)>,
    /// Old-side indices no pass claimed, in insertion order.
    pub unmatched_old: Vec<usize>,
    /// New-side indices no pass claimed, in insertion order.
    pub unmatched_new: Vec<usize>,
}

impl Matching {
    /// Lookup table from new-side index to its matched old-side index.
    pub fn old_for_new(&self) -> HashMap<usize, usize> {
        self.pairs.iter().map(|&(o, n)| (n, o)).collect()
    }
}

/// Match `old` against `new`, scoped by rule key, trying each criterion of
/// [`MatchCriterion::ALL`] in order.
///
/// Within a pass, old items are visited in insertion order and each claims the
/// first still-unmatched new item satisfying the criterion. That earliest-
/// encounter tie-break keeps the result deterministic when several candidates
/// qualify at once.
pub fn match_trackables<C>(old: &[Trackable<C>], new: &[Trackable<C>]) -> Matching {
    // Partition both sides by rule key; trackables with different rule keys
    // are never candidates for each other.
    let mut groups: HashMap<&str, (Vec<usize>, Vec<usize>)> = HashMap::new();
    for (i, t) in old.iter().enumerate() {
        groups.entry(t.rule_key.as_str()).or_default().0.push(i);
    }
    for (i, t) in new.iter().enumerate() {
        groups.entry(t.rule_key.as_str()).or_default().1.push(i);
    }

    let mut old_taken = vec![false; old.len()];
    let mut new_taken = vec![false; new.len()];
    let mut pairs = Vec::new();

    for (old_idxs, new_idxs) in groups.values() {
        if old_idxs.is_empty() || new_idxs.is_empty() {
            continue;
        }
        for criterion in MatchCriterion::ALL {
            for &oi in old_idxs {
                if old_taken[oi] {
                    continue;
                }
                for &ni in new_idxs {
                    if new_taken[ni] {
                        continue;
                    }
                    if criterion.accepts(&old[oi], &new[ni]) {
                        old_taken[oi] = true;
                        new_taken[ni] = true;
                        pairs.push((oi, ni));
                        break;
                    }
                }
            }
        }
    }

    let unmatched_old = (0..old.len()).filter(|&i| !old_taken[i]).collect();
    let unmatched_new = (0..new.len()).filter(|&i| !new_taken[i]).collect();
    Matching {
        pairs,
        unmatched_old,
        unmatched_new,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(rule_key: &str) -> Trackable<()> {
        Trackable::new((), rule_key, "MAJOR", "BUG", "")
    }

    #[test]
    fn test_different_rule_keys_never_match() {
        let old = vec![t("rk1").with_line(7).with_line_hash(13)];
        let new = vec![t("rk2").with_line(7).with_line_hash(13)];
        let m = match_trackables(&old, &new);
        assert!(m.pairs.is_empty());
        assert_eq!(m.unmatched_old, vec![0]);
        assert_eq!(m.unmatched_new, vec![0]);
    }

    #[test]
    fn test_server_issue_key_wins_over_position() {
        // old[0] sits on the same line as new[1], but new[0] carries its
        // server key; the key pass runs first and claims the pair.
        let old = vec![t("rk").with_line(5).with_server_issue_key("KEY")];
        let new = vec![
            t("rk").with_line(90).with_server_issue_key("KEY"),
            t("rk").with_line(5),
        ];
        let m = match_trackables(&old, &new);
        assert_eq!(m.pairs, vec![(0, 0)]);
        assert_eq!(m.unmatched_new, vec![1]);
    }

    #[test]
    fn test_line_and_text_range_hash_beats_line_hash_alone() {
        let old = vec![t("rk").with_line(3).with_text_range_hash(40).with_line_hash(8)];
        let new = vec![
            t("rk").with_line(70).with_line_hash(8),
            t("rk").with_line(3).with_text_range_hash(40),
        ];
        let m = match_trackables(&old, &new);
        assert_eq!(m.pairs, vec![(0, 1)]);
        assert_eq!(m.unmatched_new, vec![0]);
    }

    #[test]
    fn test_text_range_hash_matches_across_moved_lines() {
        let old = vec![t("rk").with_line(10).with_text_range_hash(99)];
        let new = vec![t("rk").with_line(7).with_text_range_hash(99)];
        let m = match_trackables(&old, &new);
        assert_eq!(m.pairs, vec![(0, 0)]);
        assert!(m.unmatched_old.is_empty() && m.unmatched_new.is_empty());
    }

    #[test]
    fn test_line_and_message_requires_both_equal() {
        let old = vec![t("rk").with_line(4)];
        let same_line_other_message = {
            let mut x = t("rk").with_line(4);
            x.message = "other".into();
            x
        };
        let m = match_trackables(&old, &[same_line_other_message]);
        // both messages empty would match; here only the line agrees
        assert!(m.pairs.is_empty());

        let same = t("rk").with_line(4);
        let m = match_trackables(&old, &[same]);
        assert_eq!(m.pairs, vec![(0, 0)]);
    }

    #[test]
    fn test_absent_fields_never_match() {
        // no line, no hashes, no key, differing messages: nothing to compare on
        let mut old_item = t("rk");
        old_item.message = "a".into();
        let mut new_item = t("rk");
        new_item.message = "b".into();
        let m = match_trackables(&[old_item], &[new_item]);
        assert!(m.pairs.is_empty());
    }

    #[test]
    fn test_matching_is_one_to_one() {
        // two old items with the same line hash, one new candidate
        let old = vec![
            t("rk").with_line(1).with_line_hash(5),
            t("rk").with_line(2).with_line_hash(5),
        ];
        let new = vec![t("rk").with_line(9).with_line_hash(5)];
        let m = match_trackables(&old, &new);
        assert_eq!(m.pairs.len(), 1);
        assert_eq!(m.unmatched_old.len(), 1);
        assert!(m.unmatched_new.is_empty());
    }

    #[test]
    fn test_tie_break_is_earliest_encounter() {
        // both new items satisfy line-hash against both old items; pairing
        // follows insertion order on both sides
        let old = vec![
            t("rk").with_line(1).with_line_hash(5),
            t("rk").with_line(2).with_line_hash(5),
        ];
        let new = vec![
            t("rk").with_line(11).with_line_hash(5),
            t("rk").with_line(12).with_line_hash(5),
        ];
        let m = match_trackables(&old, &new);
        assert_eq!(m.pairs, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_old_for_new_inverts_pairs() {
        let old = vec![t("rk").with_line(1).with_line_hash(5)];
        let new = vec![t("rk").with_line(2), t("rk").with_line(3).with_line_hash(5)];
        let m = match_trackables(&old, &new);
        let by_new = m.old_for_new();
        assert_eq!(by_new.get(&1), Some(&0));
        assert_eq!(by_new.get(&0), None);
    }
}
