//! Destruction cascade example
//!
//! Builds a small binary system, then feeds the engine a sequence of
//! integrator steps in which a ringed giant plunges into the primary and the
//! primary itself is lost. Prints the hierarchy after every tick.
//!
//! Run with: cargo run --package orbital-hierarchy --example destruction_cascade

use nalgebra::{Point3, Vector3};
use orbital_hierarchy::{
    AU_M, BodyKind, BodyMap, CelestialBody, DestructionEvent, EngineConfig, HierarchyEngine,
    SimulationStepResult, Survivor,
};

const EARTH_MASS: f64 = 5.972e24;

fn body(id: &str, kind: BodyKind, mass_kg: f64, x_au: f64) -> CelestialBody {
    CelestialBody::new(id, kind, mass_kg, 1.0e6)
        .with_physics(Point3::new(x_au * AU_M, 0.0, 0.0), Vector3::zeros())
}

fn print_hierarchy(engine: &HierarchyEngine) {
    for body in engine.bodies().iter() {
        let parent = body
            .current_parent_id
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or("-");
        println!(
            "  {:<12} {:<14} {:<12} parent: {}",
            body.id.as_str(),
            body.kind.to_string(),
            format!("{:?}", body.status),
            parent
        );
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let bodies: BodyMap = [
        body("alpha", BodyKind::Star, 2.0e30, 0.0).as_main_star(),
        body("beta", BodyKind::Star, 1.5e30, 20.0).with_parent("alpha"),
        body("terra", BodyKind::Planet, EARTH_MASS, 1.0).with_parent("alpha"),
        body("kronos", BodyKind::GasGiant, 5.68e26, 5.0).with_parent("alpha"),
        body("kronos-rings", BodyKind::RingSystem, 1.5e19, 5.0).with_parent("kronos"),
        body("rhea", BodyKind::Moon, 2.3e21, 5.0035).with_parent("kronos"),
        body("titan", BodyKind::Moon, 1.35e23, 5.008).with_parent("kronos"),
    ]
    .into_iter()
    .collect();

    let config = EngineConfig::default().with_periodic_interval(1);
    let mut engine = HierarchyEngine::new(bodies, config);

    println!("Initial hierarchy:");
    print_hierarchy(&engine);

    let steps = [
        ("kronos", Survivor::Body("alpha".into())),
        ("alpha", Survivor::MutualDestruction),
    ];

    for (id, survivor) in steps {
        let mut result = SimulationStepResult::default();
        result.destroyed_ids.insert(id.into());
        result
            .destruction_events
            .push(DestructionEvent::new(id, survivor));

        let report = engine.step(&result);

        println!("\nTick {}: {} lost", report.tick, id);
        for transition in &report.transitions {
            println!("  {} -> {:?}", transition.id, transition.status);
        }
        if report.anchor_lost {
            println!("  system anchor lost");
        }
        print_hierarchy(&engine);
        println!("  violations: {}", report.violations.len());
    }
}
