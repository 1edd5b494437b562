use approx::assert_relative_eq;
use lumin_physics::*;

const DT: f32 = 1.0 / 60.0;

fn ball(world: &mut PhysicsWorld, position: Vec2, fixed: bool) -> BodyHandle {
    let mut builder = RigidBody::builder(Shape::circle(0.5).unwrap()).position(position);
    if fixed {
        builder = builder.fixed();
    }
    world.add_body(builder.build().unwrap())
}

fn anchor_distance(world: &PhysicsWorld, joint: ConstraintHandle) -> f32 {
    let constraint = world.constraint(joint).unwrap();
    let a = world.body(constraint.body_a).unwrap();
    let b = world.body(constraint.body_b).unwrap();
    let (anchor_a, anchor_b) = constraint.world_anchors(a, b);
    anchor_a.distance(anchor_b)
}

#[test]
fn stretched_joint_converges_to_rest_length() {
    let mut world = PhysicsWorld::new(WorldConfig::zero_gravity());
    let a = ball(&mut world, Vec2::ZERO, false);
    let b = ball(&mut world, Vec2::new(3.0, 0.0), false);
    let joint = world
        .add_constraint(Constraint::new(a, b, 2.0, ConstraintParams::default()).unwrap())
        .unwrap();

    for _ in 0..200 {
        world.step(DT);
    }
    assert_relative_eq!(anchor_distance(&world, joint), 2.0, epsilon = 1e-3);

    // No drift once settled.
    for _ in 0..100 {
        world.step(DT);
    }
    assert_relative_eq!(anchor_distance(&world, joint), 2.0, epsilon = 1e-3);

    // Equal masses pull symmetrically, so the midpoint stays put.
    let midpoint = (world.body(a).unwrap().position() + world.body(b).unwrap().position()) / 2.0;
    assert_relative_eq!(midpoint.x, 1.5, epsilon = 1e-3);
}

#[test]
fn pendulum_swings_at_fixed_length() {
    let mut world = PhysicsWorld::default();
    let pivot = ball(&mut world, Vec2::ZERO, true);
    let bob = ball(&mut world, Vec2::new(3.0, 0.0), false);
    let joint = world
        .add_constraint(Constraint::new(pivot, bob, 3.0, ConstraintParams::default()).unwrap())
        .unwrap();

    let mut lowest = 0.0_f32;
    for _ in 0..300 {
        world.step(DT);
        lowest = lowest.min(world.body(bob).unwrap().position().y);
        assert!(
            (anchor_distance(&world, joint) - 3.0).abs() < 0.06,
            "pendulum stretched to {}",
            anchor_distance(&world, joint)
        );
    }
    assert!(lowest < -2.5, "bob should swing down, lowest y = {lowest}");
    assert_eq!(world.body(pivot).unwrap().position(), Vec2::ZERO);
}

#[test]
fn offset_anchors_follow_body_rotation() {
    let mut world = PhysicsWorld::new(WorldConfig::zero_gravity());
    let a = world.add_body(
        RigidBody::builder(Shape::rectangle(2.0, 0.5).unwrap())
            .fixed()
            .angle(std::f32::consts::FRAC_PI_2)
            .build()
            .unwrap(),
    );
    let b = ball(&mut world, Vec2::new(0.0, 4.0), false);
    let params = ConstraintParams::default().with_anchors(Vec2::new(2.0, 0.0), Vec2::ZERO);
    let joint = world
        .add_constraint(Constraint::new(a, b, 0.0, params).unwrap())
        .unwrap();

    for _ in 0..200 {
        world.step(DT);
    }

    // Local (2, 0) rotated by 90 degrees sits at (0, 2), clear of the bar.
    let body = world.body(b).unwrap();
    assert_relative_eq!(body.position().x, 0.0, epsilon = 1e-3);
    assert_relative_eq!(body.position().y, 2.0, epsilon = 1e-3);
    assert!(world.constraint(joint).unwrap().is_weld());
}

#[test]
fn softer_joint_converges_more_slowly() {
    fn error_after(stiffness: f32, steps: usize) -> f32 {
        let mut world = PhysicsWorld::new(WorldConfig::zero_gravity());
        let a = ball(&mut world, Vec2::ZERO, true);
        let b = ball(&mut world, Vec2::new(4.0, 0.0), false);
        let params = ConstraintParams::default().with_stiffness(stiffness);
        let joint = world
            .add_constraint(Constraint::new(a, b, 2.0, params).unwrap())
            .unwrap();
        for _ in 0..steps {
            world.step(DT);
        }
        (anchor_distance(&world, joint) - 2.0).abs()
    }

    assert!(error_after(0.25, 10) > error_after(1.0, 10));
}

#[test]
fn constraint_validation() {
    let mut world = PhysicsWorld::default();
    let a = ball(&mut world, Vec2::ZERO, false);
    let b = ball(&mut world, Vec2::new(2.0, 0.0), false);

    assert_eq!(
        Constraint::new(a, b, -0.5, ConstraintParams::default()),
        Err(PhysicsError::InvalidLength(-0.5))
    );

    let joint = world
        .add_constraint(Constraint::new(a, b, 1.0, ConstraintParams::default()).unwrap())
        .unwrap();
    assert_eq!(world.constraint_count(), 1);
    assert!(world.remove_constraint(joint).is_ok());
    assert_eq!(
        world.remove_constraint(joint),
        Err(PhysicsError::UnknownConstraint(joint))
    );
}
