use lumin_physics::*;

fn main() -> Result<()> {
    let mut engine = PhysicsEngine::new(WorldConfig::default(), 1.0 / 60.0);

    engine.add_body(
        RigidBody::builder(Shape::rectangle(20.0, 1.0)?)
            .fixed()
            .position(Vec2::new(0.0, -0.5))
            .build()?,
    );

    let mut boxes = Vec::new();
    for i in 0..5 {
        let handle = engine.add_body(
            RigidBody::builder(Shape::rectangle(1.0, 1.0)?)
                .position(Vec2::new(0.05 * i as f32, 0.6 + i as f32 * 1.2))
                .build()?,
        );
        boxes.push(handle);
    }
    engine.add_body(
        RigidBody::builder(Shape::circle(0.4)?)
            .position(Vec2::new(3.0, 4.0))
            .linear_velocity(Vec2::new(-2.0, 0.0))
            .material(Material::rubber())
            .build()?,
    );

    // Feed irregular frame times; the engine consumes them in fixed steps.
    let frames = [0.016, 0.017, 0.033, 0.016, 0.008];
    for frame in 0..240 {
        let alpha = engine.advance(frames[frame % frames.len()]);
        if frame % 60 == 0 {
            let top = engine.world().body(boxes[4]).map(|b| b.interpolated_pose(alpha));
            println!(
                "frame {frame:3}: {} contacts, top box at {:?}",
                engine.world().manifolds().len(),
                top.map(|pose| pose.position)
            );
        }
    }

    for (i, handle) in boxes.iter().enumerate() {
        let body = engine.world().try_body(*handle)?;
        println!(
            "box {i}: y = {:.3}, angle = {:.3}",
            body.position().y,
            body.angle()
        );
    }
    Ok(())
}
