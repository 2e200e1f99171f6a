pub mod animation;
pub mod builder;
pub mod bulb;
pub mod constraint;
pub mod curves;
pub mod error;
pub mod jellyfish;
pub mod ring;
pub mod settings;
pub mod solvers;
pub mod spine;
pub mod tail;
pub mod topology;
/// The `jelly_core` crate builds and animates a soft-body jellyfish mesh.
/// Generation is a one-shot pass that lays out particles, index buffers and the
/// constraint graph; animation is a per-frame retarget of ring constraint ranges
/// followed by one tick of a particle solver.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `ConstraintSolver` (the particle
///   engine contract).
/// - **Generation**: `curves` and `topology` primitives feed the `spine`, `bulb` and `tail`
///   builders through a shared `GenerationContext`.
/// - **Constraints**: `Constraint` sum type plus the `ConstraintRegistry` arena.
/// - **Animation**: `PhaseState` and ring retargeting in `animation`.
/// - **Solvers**: `VerletSystem`, a reference Verlet engine with iterative relaxation.
/// - **Jellyfish**: assembly, pre-roll and the zero-copy `BufferView` for renderers.
pub mod traits;
