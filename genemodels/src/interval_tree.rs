//! A static, centered interval tree over closed `[start, end]` ranges
//! carrying opaque `u32` ids.
//!
//! Generalizes the shape of `gtars_overlaprs::AIList`/`Bits` (build-once,
//! query-many structures implementing `find`/`find_iter` over a concrete
//! interval type) to a classic centered interval tree, which is what the
//! `find_nearest` query and the closed-interval containment query need.

use genemodels_core::{GeneModelsError, Interval};

/// One node of the tree: a pivot coordinate, the intervals that straddle it
/// (stored both ascending-by-start and descending-by-end), and two child
/// subtrees.
#[derive(Debug)]
struct Node {
    center: i64,
    asc: Vec<Interval>,
    desc: Vec<Interval>,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

/// An immutable interval tree. Construction is `O(n log n)`; queries are
/// `O(log n + k)` on non-pathological inputs.
#[derive(Debug, Default)]
pub struct IntervalTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl IntervalTree {
    /// Builds a tree from `intervals`. Rejects any interval with
    /// `start > end` with `InvalidInterval`.
    pub fn build(intervals: Vec<Interval>) -> Result<Self, GeneModelsError> {
        for iv in &intervals {
            if iv.start > iv.end {
                return Err(GeneModelsError::InvalidInterval {
                    id: iv.id,
                    start: iv.start,
                    end: iv.end,
                });
            }
        }
        let len = intervals.len();
        Ok(IntervalTree {
            root: Self::build_node(intervals),
            len,
        })
    }

    fn build_node(intervals: Vec<Interval>) -> Option<Box<Node>> {
        if intervals.is_empty() {
            return None;
        }

        // Median of endpoint coordinates of the current partition; ties
        // resolve to the smallest coordinate by construction (sorted
        // ascending, lower-middle index).
        let mut coords: Vec<i64> = Vec::with_capacity(intervals.len() * 2);
        for iv in &intervals {
            coords.push(iv.start);
            coords.push(iv.end);
        }
        coords.sort_unstable();
        let center = coords[coords.len() / 2];

        let mut straddlers = Vec::new();
        let mut left = Vec::new();
        let mut right = Vec::new();
        for iv in intervals {
            if iv.start <= center && iv.end >= center {
                straddlers.push(iv);
            } else if iv.end < center {
                left.push(iv);
            } else {
                right.push(iv);
            }
        }

        let mut asc = straddlers.clone();
        asc.sort_by_key(|iv| iv.start);
        let mut desc = straddlers;
        desc.sort_by_key(|iv| std::cmp::Reverse(iv.end));

        Some(Box::new(Node {
            center,
            asc,
            desc,
            left: Self::build_node(left),
            right: Self::build_node(right),
        }))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every id whose interval `[s, e]` satisfies `e >= qs && s <= qe`.
    /// `qs > qe` returns an empty set (not an error).
    pub fn find_overlapping(&self, qs: i64, qe: i64) -> Vec<u32> {
        let mut out = Vec::new();
        if qs > qe {
            return out;
        }
        Self::overlap_rec(self.root.as_deref(), qs, qe, &mut out);
        out
    }

    fn overlap_rec(node: Option<&Node>, qs: i64, qe: i64, out: &mut Vec<u32>) {
        let Some(node) = node else { return };
        let c = node.center;

        // Straddlers all contain `c`. When `qs <= c`, `end >= c >= qs` holds
        // for every straddler, so the overlap test reduces to `start <= qe`
        // and the ascending-by-start list lets us stop at the first
        // interval past `qe`. When `qs > c`, `start <= c < qs <= qe` holds
        // instead, so the test reduces to `end >= qs` and we scan the
        // descending-by-end list, stopping once `end < qs`.
        if qs <= c {
            for iv in &node.asc {
                if iv.start > qe {
                    break;
                }
                out.push(iv.id);
            }
        } else {
            for iv in &node.desc {
                if iv.end < qs {
                    break;
                }
                out.push(iv.id);
            }
        }

        if qs <= c {
            Self::overlap_rec(node.left.as_deref(), qs, qe, out);
        }
        if qe >= c {
            Self::overlap_rec(node.right.as_deref(), qs, qe, out);
        }
    }

    /// Every id whose interval `[s, e]` satisfies `s >= qs && e <= qe`.
    /// `qs > qe` returns an empty set (not an error).
    pub fn find_contained(&self, qs: i64, qe: i64) -> Vec<u32> {
        let mut out = Vec::new();
        if qs > qe {
            return out;
        }
        Self::contained_rec(self.root.as_deref(), qs, qe, &mut out);
        out
    }

    fn contained_rec(node: Option<&Node>, qs: i64, qe: i64, out: &mut Vec<u32>) {
        let Some(node) = node else { return };
        let c = node.center;

        // Same descent predicate as `find_overlapping`; the ascending list
        // still lets us stop once `start > qe` (containment requires
        // `start <= end <= qe`), we just additionally require `start >= qs`.
        for iv in &node.asc {
            if iv.start > qe {
                break;
            }
            if iv.start >= qs && iv.end <= qe {
                out.push(iv.id);
            }
        }

        if qs <= c {
            Self::contained_rec(node.left.as_deref(), qs, qe, out);
        }
        if qe >= c {
            Self::contained_rec(node.right.as_deref(), qs, qe, out);
        }
    }

    /// All ids tied for the minimum distance to `p`, where
    /// `dist([s,e], p) = max(0, s-p, p-e)`.
    pub fn find_nearest(&self, p: i64) -> Vec<u32> {
        let mut best = NearestState {
            min_dist: i64::MAX,
            ids: Vec::new(),
        };
        Self::nearest_rec(self.root.as_deref(), p, &mut best);
        best.ids
    }

    fn nearest_rec(node: Option<&Node>, p: i64, state: &mut NearestState) {
        let Some(node) = node else { return };
        let c = node.center;

        for iv in &node.asc {
            let d = iv.distance(p);
            match d.cmp(&state.min_dist) {
                std::cmp::Ordering::Less => {
                    state.min_dist = d;
                    state.ids.clear();
                    state.ids.push(iv.id);
                }
                std::cmp::Ordering::Equal => state.ids.push(iv.id),
                std::cmp::Ordering::Greater => {}
            }
        }

        // Left subtree: every interval has end <= c - 1, so distance to p is
        // at least max(0, p - (c - 1)). Right subtree: every interval has
        // start >= c + 1, so distance to p is at least max(0, (c + 1) - p).
        let left_bound = (p - (c - 1)).max(0);
        let right_bound = ((c + 1) - p).max(0);

        // Visit the side nearer to `p` first so `min_dist` tightens sooner.
        if p <= c {
            if left_bound <= state.min_dist {
                Self::nearest_rec(node.left.as_deref(), p, state);
            }
            if right_bound <= state.min_dist {
                Self::nearest_rec(node.right.as_deref(), p, state);
            }
        } else {
            if right_bound <= state.min_dist {
                Self::nearest_rec(node.right.as_deref(), p, state);
            }
            if left_bound <= state.min_dist {
                Self::nearest_rec(node.left.as_deref(), p, state);
            }
        }
    }
}

struct NearestState {
    min_dist: i64,
    ids: Vec<u32>,
}
