//! Single-source longest-path search over a [`super::Span`] sequence:
//! the Reading Grid's analogue of the reference workspace's N-best
//! Viterbi pass, specialized to the one-best case the grid needs after
//! every mutation.

use tracing::{debug, debug_span};

use super::{Span, MAX_SPAN};

/// One Node chosen onto the best path, already resolved to its active
/// value and score (override or highest-ranked unigram).
#[derive(Debug, Clone)]
pub struct WalkedNode {
    pub reading: String,
    pub span_length: usize,
    pub value: String,
    pub score: f64,
}

/// The outcome of a [`super::ReadingGrid::walk`]: the best-path Nodes in
/// position order, plus the search statistics the original engine logs.
#[derive(Debug, Clone)]
pub struct WalkResult {
    pub nodes: Vec<WalkedNode>,
    pub vertices_visited: u64,
    pub edges_relaxed: u64,
    pub elapsed_micros: u64,
}

/// Runs the walk over `spans` (one per reading position, `spans.len() == n`).
pub(super) fn walk(spans: &[Span], n: usize) -> WalkResult {
    let _span = debug_span!("grid_walk", n).entered();
    let started = std::time::Instant::now();

    if n == 0 {
        return WalkResult {
            nodes: Vec::new(),
            vertices_visited: 0,
            edges_relaxed: 0,
            elapsed_micros: started.elapsed().as_micros() as u64,
        };
    }

    // dist[p] = best total score reachable from position p to n.
    // choice[p] = span length of the edge realizing that best score.
    let mut dist = vec![f64::NEG_INFINITY; n + 1];
    let mut choice: Vec<Option<usize>> = vec![None; n + 1];
    dist[n] = 0.0;

    let mut vertices_visited = 0u64;
    let mut edges_relaxed = 0u64;

    for p in (0..n).rev() {
        vertices_visited += 1;
        // (total_score, span_length, insertion_seq) of the current best edge.
        let mut best: Option<(f64, usize, u64)> = None;

        for length in 1..=MAX_SPAN {
            if p + length > n {
                continue;
            }
            let Some(node) = spans[p].get(length) else {
                continue;
            };
            edges_relaxed += 1;
            if dist[p + length] == f64::NEG_INFINITY {
                continue;
            }
            let total = node.active_score() + dist[p + length];
            let is_better = match best {
                None => true,
                Some((best_total, best_len, best_seq)) => {
                    if total > best_total {
                        true
                    } else if total < best_total {
                        false
                    } else if length != best_len {
                        length > best_len
                    } else {
                        node.seq < best_seq
                    }
                }
            };
            if is_better {
                best = Some((total, length, node.seq));
            }
        }

        match best {
            Some((total, length, _)) => {
                dist[p] = total;
                choice[p] = Some(length);
            }
            None => {
                dist[p] = f64::NEG_INFINITY;
                choice[p] = None;
            }
        }
    }

    let mut nodes = Vec::new();
    let mut p = 0;
    while p < n {
        let Some(length) = choice[p] else {
            // Every position the grid accepted a reading at is guaranteed
            // at least a length-1 edge (insert_reading requires the LM to
            // know the single reading); a gap here means the caller is
            // walking a grid whose invariants were violated elsewhere.
            break;
        };
        let node = spans[p].get(length).expect("choice always names a live node");
        nodes.push(WalkedNode {
            reading: node.reading().to_string(),
            span_length: length,
            value: node.active_value().to_string(),
            score: node.active_score(),
        });
        p += length;
    }

    debug!(
        node_count = nodes.len(),
        vertices_visited, edges_relaxed, "walked grid"
    );

    WalkResult {
        nodes,
        vertices_visited,
        edges_relaxed,
        elapsed_micros: started.elapsed().as_micros() as u64,
    }
}
