//! Force-driven channel flow with a minimal driver.
//!
//! A periodic 2D channel between two rows of immersed solid nodes, driven by
//! a uniform body force. The test drives the kernels through the pipeline
//! sweep and does its own streaming with halfway bounce-back, the way an
//! external mesh engine would.

use lbm_kernels::equations::equilibrium_all;
use lbm_kernels::solver::NodeFields;
use lbm_kernels::{
    BodyForce, EquilibriumOrder, MacroscopicState, Mrt, NodeClass, NodeContext, NodeCoords,
    NodePipeline, PipelineBuilder, StandardCollision, StandardForcing, VelocityIndex, VelocitySet,
};

const NX: usize = 4;
const NY: usize = 12;
const STEPS: usize = 1500;
const FORCE: f64 = 1e-6;

struct Channel {
    pipeline: NodePipeline,
    nodes: Vec<NodeContext>,
    f: Vec<f64>,
    f_stage: Vec<f64>,
    states: Vec<MacroscopicState>,
}

impl Channel {
    fn new(collision: StandardCollision) -> Self {
        let pipeline = PipelineBuilder::new()
            .with_lattice(VelocitySet::d2q9())
            .with_collision(collision)
            .with_forcing(StandardForcing::exact_difference())
            .build()
            .unwrap();

        let nodes: Vec<NodeContext> = (0..NX * NY)
            .map(|n| {
                let (x, y) = (n % NX, n / NX);
                let class = if y == 0 || y == NY - 1 {
                    NodeClass::ImmersedSolid
                } else {
                    NodeClass::Fluid
                };
                pipeline.context(NodeCoords::planar(x as i64, y as i64), class)
            })
            .collect();

        let set = pipeline.velocity_set();
        let mut f = vec![0.0; NX * NY * 9];
        for node in f.chunks_exact_mut(9) {
            equilibrium_all(set, 1.0, &[0.0, 0.0], 1.0, EquilibriumOrder::Second, node);
        }

        Self {
            f_stage: vec![0.0; f.len()],
            states: vec![MacroscopicState::default(); NX * NY],
            pipeline,
            nodes,
            f,
        }
    }

    fn step(&mut self) {
        let fields = NodeFields::new(
            9,
            &self.f,
            &mut self.f_stage,
            &mut self.states,
            &self.nodes,
        )
        .unwrap();
        self.pipeline
            .sweep(fields, &[BodyForce::along(0, FORCE)])
            .unwrap();
        self.stream();
    }

    fn stream(&mut self) {
        let set = self.pipeline.velocity_set();
        for n in 0..NX * NY {
            if self.nodes[n].class.is_solid() {
                continue;
            }
            let (x, y) = (n % NX, n / NX);
            for i in VelocityIndex::iter(9) {
                let e = set.lattice_vector(i);
                let tx = (x as i32 + e[0]).rem_euclid(NX as i32) as usize;
                let ty = (y as i32 + e[1]) as usize;
                let target = ty * NX + tx;
                let value = self.f_stage[n * 9 + i.get()];
                if self.nodes[target].class.is_solid() {
                    self.f[n * 9 + set.opposite(i).get()] = value;
                } else {
                    self.f[target * 9 + i.get()] = value;
                }
            }
        }
    }

    fn fluid_mass(&self) -> f64 {
        self.f
            .chunks_exact(9)
            .zip(&self.nodes)
            .filter(|(_, ctx)| !ctx.class.is_solid())
            .map(|(pops, _)| pops.iter().sum::<f64>())
            .sum()
    }

    fn profile(&self) -> Vec<f64> {
        (1..NY - 1).map(|y| self.states[y * NX].u[0]).collect()
    }
}

fn run(collision: StandardCollision) -> (Channel, f64) {
    let mut channel = Channel::new(collision);
    let mass = channel.fluid_mass();
    for _ in 0..STEPS {
        channel.step();
    }
    (channel, mass)
}

fn check_channel(channel: &Channel, initial_mass: f64) {
    let mass = channel.fluid_mass();
    assert!(
        ((mass - initial_mass) / initial_mass).abs() < 1e-12,
        "mass drifted from {initial_mass} to {mass}"
    );

    let profile = channel.profile();
    let n = profile.len();
    for (k, u) in profile.iter().enumerate() {
        assert!(*u > 0.0, "u({k}) = {u}");
        let mirror = profile[n - 1 - k];
        assert!((u - mirror).abs() <= 1e-9 * u.abs(), "asymmetric at {k}: {u} vs {mirror}");
    }
    // Flow is fastest in the middle of the channel.
    assert!(profile[n / 2] > profile[0]);
    assert!(profile[n / 2 - 1] > profile[1]);

    // Rows are identical along the periodic direction.
    for y in 1..NY - 1 {
        for x in 1..NX {
            let a = channel.states[y * NX].u[0];
            let b = channel.states[y * NX + x].u[0];
            assert!((a - b).abs() <= 1e-12 * a.abs());
        }
    }
}

#[test]
fn test_bgk_channel() {
    let (channel, mass) = run(StandardCollision::bgk(0.8));
    check_channel(&channel, mass);
}

#[test]
fn test_mrt_channel() {
    let set = VelocitySet::d2q9();
    let (channel, mass) = run(Mrt::from_tau(&set, 0.8, 1.0).unwrap().into());
    check_channel(&channel, mass);
}
