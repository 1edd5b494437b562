use lumin_physics::*;

fn main() -> Result<()> {
    let mut world = PhysicsWorld::default();

    let pivot = world.add_body(
        RigidBody::builder(Shape::circle(0.1)?)
            .fixed()
            .position(Vec2::new(0.0, 5.0))
            .build()?,
    );

    // A three-link chain hanging off the pivot, released horizontally.
    let mut previous = pivot;
    let mut links = Vec::new();
    for i in 1..=3 {
        let link = world.add_body(
            RigidBody::builder(Shape::circle(0.25)?)
                .position(Vec2::new(i as f32 * 1.5, 5.0))
                .build()?,
        );
        world.add_constraint(Constraint::new(
            previous,
            link,
            1.5,
            ConstraintParams::default(),
        )?)?;
        links.push(link);
        previous = link;
    }

    let dt = 1.0 / 120.0;
    for step in 0..=600 {
        if step % 60 == 0 {
            let tip = world.try_body(previous)?.position();
            let stretch: f32 = world
                .constraints()
                .filter_map(|(_, joint)| {
                    let a = world.body(joint.body_a)?;
                    let b = world.body(joint.body_b)?;
                    Some(joint.error(a, b).abs())
                })
                .sum();
            println!(
                "t = {:.2}s tip = ({:6.2}, {:6.2}) total stretch = {stretch:.4}",
                step as f32 * dt,
                tip.x,
                tip.y
            );
        }
        world.step(dt);
    }

    println!("{} links, {} joints", links.len(), world.constraint_count());
    Ok(())
}
