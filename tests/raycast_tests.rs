use approx::assert_relative_eq;
use lumin_physics::*;

fn fixed(world: &mut PhysicsWorld, shape: Shape, position: Vec2) -> BodyHandle {
    world.add_body(
        RigidBody::builder(shape)
            .fixed()
            .position(position)
            .build()
            .unwrap(),
    )
}

#[test]
fn point_query_is_exact_at_circle_boundary() {
    let mut world = PhysicsWorld::default();
    let radius = 1.0;
    let eps = 1e-3;
    let circle = fixed(&mut world, Shape::circle(radius).unwrap(), Vec2::ZERO);

    assert_eq!(world.test_point(Vec2::new(radius - eps, 0.0)), vec![circle]);
    assert!(world.test_point(Vec2::new(radius + eps, 0.0)).is_empty());
}

#[test]
fn point_query_respects_polygon_rotation() {
    let mut world = PhysicsWorld::default();
    let bar = fixed(
        &mut world,
        Shape::rectangle(4.0, 0.5).unwrap(),
        Vec2::new(1.0, 1.0),
    );

    assert_eq!(world.test_point(Vec2::new(2.5, 1.0)), vec![bar]);
    world
        .body_mut(bar)
        .unwrap()
        .set_angle(std::f32::consts::FRAC_PI_2);
    assert!(world.test_point(Vec2::new(2.5, 1.0)).is_empty());
    assert_eq!(world.test_point(Vec2::new(1.0, 2.5)), vec![bar]);
}

#[test]
fn point_query_returns_every_overlapping_body() {
    let mut world = PhysicsWorld::default();
    let a = fixed(&mut world, Shape::circle(1.0).unwrap(), Vec2::ZERO);
    let b = fixed(&mut world, Shape::rectangle(1.0, 1.0).unwrap(), Vec2::new(0.5, 0.0));
    fixed(&mut world, Shape::circle(1.0).unwrap(), Vec2::new(5.0, 0.0));

    assert_eq!(world.test_point(Vec2::new(0.6, 0.1)), vec![a, b]);
}

#[test]
fn ray_reports_nearest_body() {
    let mut world = PhysicsWorld::default();
    let far = fixed(&mut world, Shape::circle(1.0).unwrap(), Vec2::new(10.0, 0.0));
    let near = fixed(&mut world, Shape::circle(1.0).unwrap(), Vec2::new(5.0, 0.0));
    let block = fixed(
        &mut world,
        Shape::rectangle(2.0, 2.0).unwrap(),
        Vec2::new(7.5, 0.0),
    );

    let ray = Ray::new(Vec2::ZERO, Vec2::new(2.0, 0.0)).unwrap();
    let hit = world.test_ray(&ray).expect("ray should hit");
    assert_eq!(hit.body, near);
    assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-4);
    assert_relative_eq!(hit.point.x, 4.0, epsilon = 1e-4);
    assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-4);

    let all: Vec<BodyHandle> = world.test_ray_all(&ray).iter().map(|h| h.body).collect();
    assert_eq!(all, vec![near, block, far]);
}

#[test]
fn ray_misses_and_range_limits() {
    let mut world = PhysicsWorld::default();
    fixed(&mut world, Shape::circle(1.0).unwrap(), Vec2::new(5.0, 0.0));

    let upward = Ray::new(Vec2::ZERO, Vec2::Y).unwrap();
    assert!(world.test_ray(&upward).is_none());

    let backward = Ray::new(Vec2::ZERO, -Vec2::X).unwrap();
    assert!(world.test_ray(&backward).is_none());

    let short = Ray::new(Vec2::ZERO, Vec2::X).unwrap().with_max_distance(3.5);
    assert!(world.test_ray(&short).is_none());
    assert!(world.test_ray(&short.with_max_distance(4.5)).is_some());
}

#[test]
fn ray_hits_rotated_polygon_face() {
    let mut world = PhysicsWorld::default();
    let diamond = world.add_body(
        RigidBody::builder(Shape::rectangle(2.0, 2.0).unwrap())
            .fixed()
            .position(Vec2::new(0.0, 5.0))
            .angle(std::f32::consts::FRAC_PI_4)
            .build()
            .unwrap(),
    );

    // Just right of the bottom corner the ray meets the lower-right face.
    let ray = Ray::new(Vec2::new(0.3, 0.0), Vec2::Y).unwrap();
    let hit = world.test_ray(&ray).unwrap();
    assert_eq!(hit.body, diamond);
    assert_relative_eq!(hit.distance, 5.0 - 2f32.sqrt() + 0.3, epsilon = 1e-4);
    assert_relative_eq!(hit.normal.x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-4);
    assert_relative_eq!(hit.normal.y, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-4);
}

#[test]
fn degenerate_ray_is_rejected() {
    assert_eq!(
        Ray::new(Vec2::ZERO, Vec2::ZERO),
        Err(PhysicsError::DegenerateRay)
    );
}
