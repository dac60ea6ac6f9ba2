//! Node sweeps over node-major field buffers.
//!
//! Distribution buffers hold `q` populations per node, node after node.
//! A sweep hands each node its own slices and macroscopic state and runs a
//! per-node kernel on them. Kernels only touch their own node, so the
//! parallel sweep (feature `parallel`) produces the same result as the
//! serial one.

use crate::error::LbmError;
use crate::solver::MacroscopicState;
use crate::types::{NodeContext, NodeIndex};

/// Node-major buffers of one sweep.
pub struct NodeFields<'a> {
    /// Populations per node
    pub q: usize,
    /// Pre-collision populations, read-only
    pub f: &'a [f64],
    /// Staging populations, written by the kernel
    pub f_stage: &'a mut [f64],
    /// Macroscopic state per node
    pub states: &'a mut [MacroscopicState],
    /// Context per node
    pub nodes: &'a [NodeContext],
}

impl<'a> NodeFields<'a> {
    /// Bundle the buffers, checking that they describe the same nodes.
    pub fn new(
        q: usize,
        f: &'a [f64],
        f_stage: &'a mut [f64],
        states: &'a mut [MacroscopicState],
        nodes: &'a [NodeContext],
    ) -> Result<Self, LbmError> {
        let n = nodes.len();
        if q == 0 || f.len() != n * q || f_stage.len() != n * q || states.len() != n {
            return Err(LbmError::configuration(format!(
                "{n} nodes of {q} populations do not match buffers of {}, {} and {} states",
                f.len(),
                f_stage.len(),
                states.len()
            )));
        }
        Ok(Self {
            q,
            f,
            f_stage,
            states,
            nodes,
        })
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// What a sweep visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Nodes visited
    pub nodes: usize,
    /// Of which immersed solid
    pub solid: usize,
}

impl SweepSummary {
    fn of(nodes: &[NodeContext]) -> Self {
        Self {
            nodes: nodes.len(),
            solid: nodes.iter().filter(|n| n.class.is_solid()).count(),
        }
    }
}

/// Run `kernel` on every node in order.
///
/// The kernel receives the node index, its context, its populations, its
/// staging slice, and its macroscopic state. The first error stops the sweep.
pub fn sweep<K>(fields: NodeFields<'_>, kernel: K) -> Result<SweepSummary, LbmError>
where
    K: Fn(NodeIndex, &NodeContext, &[f64], &mut [f64], &mut MacroscopicState) -> Result<(), LbmError>,
{
    let q = fields.q;
    for (n, ((f, stage), (state, ctx))) in fields
        .f
        .chunks_exact(q)
        .zip(fields.f_stage.chunks_exact_mut(q))
        .zip(fields.states.iter_mut().zip(fields.nodes))
        .enumerate()
    {
        kernel(NodeIndex::new(n), ctx, f, stage, state)?;
    }

    let summary = SweepSummary::of(fields.nodes);
    log::trace!(
        "serial sweep over {} nodes ({} solid)",
        summary.nodes,
        summary.solid
    );
    Ok(summary)
}

/// Parallel version of [`sweep`] using Rayon.
///
/// Nodes are processed in any order; when several nodes fail, which error
/// is returned is unspecified.
#[cfg(feature = "parallel")]
pub fn sweep_parallel<K>(fields: NodeFields<'_>, kernel: K) -> Result<SweepSummary, LbmError>
where
    K: Fn(NodeIndex, &NodeContext, &[f64], &mut [f64], &mut MacroscopicState) -> Result<(), LbmError>
        + Sync,
{
    use rayon::prelude::*;

    let q = fields.q;
    let f = fields.f;
    let nodes = fields.nodes;

    fields
        .f_stage
        .par_chunks_mut(q)
        .zip(fields.states.par_iter_mut())
        .enumerate()
        .try_for_each(|(n, (stage, state))| {
            kernel(
                NodeIndex::new(n),
                &nodes[n],
                &f[n * q..(n + 1) * q],
                stage,
                state,
            )
        })?;

    let summary = SweepSummary::of(nodes);
    log::trace!(
        "parallel sweep over {} nodes ({} solid)",
        summary.nodes,
        summary.solid
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeClass, NodeCoords};

    fn nodes(n: usize) -> Vec<NodeContext> {
        (0..n)
            .map(|i| {
                let class = if i % 4 == 0 {
                    NodeClass::ImmersedSolid
                } else {
                    NodeClass::Fluid
                };
                NodeContext::new(NodeCoords::planar(i as i64, 0), class, 1.0)
            })
            .collect()
    }

    fn double_kernel(
        _: NodeIndex,
        ctx: &NodeContext,
        f: &[f64],
        stage: &mut [f64],
        state: &mut MacroscopicState,
    ) -> Result<(), LbmError> {
        if ctx.class.is_solid() {
            return Ok(());
        }
        for (s, v) in stage.iter_mut().zip(f) {
            *s = 2.0 * v;
        }
        state.rho = f.iter().sum();
        Ok(())
    }

    #[test]
    fn test_buffer_mismatch_rejected() {
        let ctx = nodes(3);
        let f = vec![0.0; 27];
        let mut stage = vec![0.0; 26];
        let mut states = vec![MacroscopicState::default(); 3];
        assert!(NodeFields::new(9, &f, &mut stage, &mut states, &ctx).is_err());
    }

    #[test]
    fn test_serial_sweep_visits_every_node() {
        let ctx = nodes(8);
        let f: Vec<f64> = (0..8 * 9).map(|i| i as f64).collect();
        let mut stage = vec![-1.0; 8 * 9];
        let mut states = vec![MacroscopicState::default(); 8];

        let fields = NodeFields::new(9, &f, &mut stage, &mut states, &ctx).unwrap();
        let summary = sweep(fields, double_kernel).unwrap();
        assert_eq!(summary, SweepSummary { nodes: 8, solid: 2 });

        for n in 0..8 {
            let expected = if n % 4 == 0 { -1.0 } else { 2.0 * (n * 9) as f64 };
            assert_eq!(stage[n * 9], expected);
        }
        assert_eq!(states[0], MacroscopicState::default());
        assert_eq!(states[1].rho, (9..18).sum::<i32>() as f64);
    }

    #[test]
    fn test_error_stops_sweep() {
        let ctx = nodes(4);
        let f = vec![1.0; 4 * 9];
        let mut stage = vec![0.0; 4 * 9];
        let mut states = vec![MacroscopicState::default(); 4];
        let fields = NodeFields::new(9, &f, &mut stage, &mut states, &ctx).unwrap();
        let result = sweep(fields, |n, _, _, _, _| {
            if n.get() == 2 {
                Err(LbmError::configuration("node 2"))
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err(LbmError::configuration("node 2")));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_sweep_matches_serial() {
        let ctx = nodes(64);
        let f: Vec<f64> = (0..64 * 9).map(|i| (i as f64).sin()).collect();

        let mut stage_s = vec![0.5; 64 * 9];
        let mut states_s = vec![MacroscopicState::default(); 64];
        let fields = NodeFields::new(9, &f, &mut stage_s, &mut states_s, &ctx).unwrap();
        sweep(fields, double_kernel).unwrap();

        let mut stage_p = vec![0.5; 64 * 9];
        let mut states_p = vec![MacroscopicState::default(); 64];
        let fields = NodeFields::new(9, &f, &mut stage_p, &mut states_p, &ctx).unwrap();
        sweep_parallel(fields, double_kernel).unwrap();

        assert_eq!(stage_s, stage_p);
        assert_eq!(states_s, states_p);
    }
}
