use lumin_physics::*;

fn main() -> Result<()> {
    let mut world = PhysicsWorld::new(WorldConfig::zero_gravity());

    let ball = world.add_body(
        RigidBody::builder(Shape::circle(1.0)?)
            .position(Vec2::new(5.0, 0.0))
            .build()?,
    );
    let crate_box = world.add_body(
        RigidBody::builder(Shape::rectangle(2.0, 2.0)?)
            .fixed()
            .position(Vec2::new(10.0, 0.5))
            .angle(0.3)
            .build()?,
    );
    println!("ball = {ball}, crate = {crate_box}");

    let ray = Ray::new(Vec2::ZERO, Vec2::X)?;
    for hit in world.test_ray_all(&ray) {
        println!(
            "hit {} at {:.3} (point {:?}, normal {:?})",
            hit.body, hit.distance, hit.point, hit.normal
        );
    }

    let short = ray.with_max_distance(6.0);
    match world.test_ray(&short) {
        Some(hit) => println!("nearest within 6: {} at {:.3}", hit.body, hit.distance),
        None => println!("nothing within 6"),
    }

    for point in [Vec2::new(5.2, 0.3), Vec2::new(10.0, 0.5), Vec2::new(7.5, 0.0)] {
        println!("bodies under {point:?}: {:?}", world.test_point(point));
    }
    Ok(())
}
