use log::{debug, warn};
use rayon::prelude::*;

use crate::network::NetworkPort;
use crate::transition::candidate::Candidate;
use crate::transition::costing::{EmissionStrategy, TransitionContext, TransitionStrategy};
use crate::transition::error::MatchError;
use crate::transition::hooks::{Hooks, Progress};
use crate::transition::solver::Solver;
use crate::transition::trip::{MatchedCandidate, MatchedPath};
use crate::transition::Transition;

/// One slot of the dynamic-programming table: the best cumulative
/// log-probability of any chain ending at this candidate, and the
/// previous-layer node that achieves it.
#[derive(Clone, Copy, Debug)]
struct Cell {
    score: f64,
    back: Option<usize>,
}

/// Log-space Viterbi decoding over the candidate trellis.
///
/// Maintains the full score table (one [`Cell`] per candidate per step),
/// so the result is the globally optimal chain, not a greedy
/// best-carry-forward approximation. Scores are sums of log
/// probabilities with `-inf` as the "no path" sentinel, which keeps long
/// trajectories clear of underflow.
///
/// Determinism: previous candidates are always folded in enumeration
/// order with strict-improvement comparison, so the first-seen candidate
/// wins any tie, and repeated decodes of identical input yield identical
/// output.
#[derive(Debug, Default)]
pub struct ViterbiSolver;

impl ViterbiSolver {
    /// Divides each score by the slice's sum, so the fan-out sums to 1.
    ///
    /// A zero sum leaves the scores untouched (all remain 0) rather than
    /// dividing by zero; the step's reset policy handles the rest.
    fn normalize(scores: &mut [f64]) {
        let sum = scores.iter().sum::<f64>();

        if sum == 0.0 {
            debug!("zero-sum fan-out, normalization skipped");
            return;
        }

        scores.iter_mut().for_each(|score| *score /= sum);
    }

    /// Index of the highest-scoring cell, first-seen on ties.
    fn argmax(cells: &[Cell]) -> usize {
        let mut best = 0;
        for (index, cell) in cells.iter().enumerate() {
            if cell.score > cells[best].score {
                best = index;
            }
        }

        best
    }

    /// Raw transition scores fanning out of one previous candidate to
    /// every candidate of the current layer, normalized per component
    /// and combined by product. `None` when the previous candidate
    /// cannot be part of any chain.
    fn fan_out<N, E, T>(
        transition: &Transition<'_, N, E, T>,
        step: usize,
        source: &Candidate,
        layer: &[Candidate],
    ) -> Result<Vec<f64>, MatchError>
    where
        N: NetworkPort,
        E: EmissionStrategy,
        T: TransitionStrategy,
    {
        let observations = transition.trajectory().observations();

        let mut routing = Vec::with_capacity(layer.len());
        let mut heading = Vec::with_capacity(layer.len());

        for target in layer {
            let context = TransitionContext {
                source,
                target,
                previous_observation: &observations[step - 1],
                current_observation: &observations[step],
                network: transition.network(),
            };

            let plausibility = transition
                .heuristics()
                .routing(&context)
                .map_err(|source| MatchError::Network {
                    index: step,
                    source,
                })?;

            routing.push(plausibility);
            heading.push(transition.heuristics().heading(&context));
        }

        // Each component normalizes across the fan-out independently.
        Self::normalize(&mut routing);
        Self::normalize(&mut heading);

        Ok(routing
            .into_iter()
            .zip(heading)
            .map(|(route, head)| route * head)
            .collect())
    }
}

impl Solver for ViterbiSolver {
    fn solve<N, E, T>(
        &self,
        transition: &Transition<'_, N, E, T>,
        hooks: Hooks<'_>,
    ) -> Result<MatchedPath, MatchError>
    where
        N: NetworkPort,
        E: EmissionStrategy,
        T: TransitionStrategy,
    {
        let candidates = transition.candidates();
        let depth = candidates.depth();

        let mut table: Vec<Vec<Cell>> = Vec::with_capacity(depth);
        let mut resets = Vec::new();

        for step in 0..depth {
            if hooks.is_cancelled() {
                return Err(MatchError::Cancelled { step });
            }

            let layer = candidates.layer(step);

            let cells = if step == 0 {
                // The chain anchors on emission alone.
                layer
                    .iter()
                    .map(|candidate| Cell {
                        score: candidate.log_emission,
                        back: None,
                    })
                    .collect::<Vec<_>>()
            } else {
                let previous = candidates.layer(step - 1);
                let settled = &table[step - 1];

                // All-pairs raw scoring, parallel per previous candidate.
                // Everything below the barrier is sequential: scores at
                // this step finalize only after every pair is in.
                let fanouts = previous
                    .par_iter()
                    .zip(settled.par_iter())
                    .map(|(source, cell)| {
                        if !cell.score.is_finite() {
                            return Ok(None);
                        }

                        Self::fan_out(transition, step, source, layer).map(Some)
                    })
                    .collect::<Result<Vec<Option<Vec<f64>>>, MatchError>>()?;

                let mut cells = vec![
                    Cell {
                        score: f64::NEG_INFINITY,
                        back: None,
                    };
                    layer.len()
                ];

                for (source, fan) in fanouts.iter().enumerate() {
                    let Some(fan) = fan else { continue };

                    for (node, combined) in fan.iter().enumerate() {
                        let score =
                            settled[source].score + combined.ln() + layer[node].log_emission;

                        // Strict improvement only: first-seen wins ties.
                        if score > cells[node].score {
                            cells[node] = Cell {
                                score,
                                back: Some(source),
                            };
                        }
                    }
                }

                // Degenerate step: every pair score vanished. Re-anchor
                // on emission alone rather than collapsing the chain,
                // keeping the strongest settled candidate behind us.
                if cells.iter().all(|cell| !cell.score.is_finite()) {
                    warn!("step {step}: all transition scores vanished, re-anchoring");
                    resets.push(step);

                    let anchor = Self::argmax(settled);
                    cells = layer
                        .iter()
                        .map(|candidate| Cell {
                            score: candidate.log_emission,
                            back: Some(anchor),
                        })
                        .collect();
                }

                cells
            };

            table.push(cells);
            hooks.report(Progress {
                step,
                total: depth,
            });
        }

        // Backtrace from the globally best final candidate.
        let Some(last) = table.last() else {
            return Err(MatchError::EmptyTrajectory);
        };

        let mut chain = vec![0usize; depth];
        chain[depth - 1] = Self::argmax(last);

        for step in (1..depth).rev() {
            chain[step - 1] = table[step][chain[step]]
                .back
                .expect("every settled cell above step 0 records a back-pointer");
        }

        let entries = chain
            .iter()
            .enumerate()
            .map(|(step, &node)| MatchedCandidate {
                candidate: candidates.layer(step)[node],
                log_probability: table[step][node].score,
            })
            .collect::<Vec<_>>();

        Ok(MatchedPath::new(entries, resets))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalized_fanout_sums_to_one() {
        let mut scores = vec![0.2, 0.5, 0.8, 0.1];
        ViterbiSolver::normalize(&mut scores);

        assert_relative_eq!(scores.iter().sum::<f64>(), 1.0, max_relative = 1e-12);
        // Relative ordering is preserved.
        assert!(scores[2] > scores[1] && scores[1] > scores[0] && scores[0] > scores[3]);
    }

    #[test]
    fn zero_sum_fanout_is_left_untouched() {
        let mut scores = vec![0.0, 0.0, 0.0];
        ViterbiSolver::normalize(&mut scores);

        assert_eq!(scores, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn argmax_prefers_the_first_seen_on_ties() {
        let cells = vec![
            Cell {
                score: -3.0,
                back: None,
            },
            Cell {
                score: -1.0,
                back: None,
            },
            Cell {
                score: -1.0,
                back: None,
            },
        ];

        assert_eq!(ViterbiSolver::argmax(&cells), 1);
    }

    #[test]
    fn argmax_skips_unreachable_cells() {
        let cells = vec![
            Cell {
                score: f64::NEG_INFINITY,
                back: None,
            },
            Cell {
                score: -10.0,
                back: Some(0),
            },
        ];

        assert_eq!(ViterbiSolver::argmax(&cells), 1);
    }
}
