use boing::{Node, NodeId, PointStimulus, Spring, Vec2, WorldConfig, ForceConstraint};

fn calm() -> WorldConfig<f64> {
    WorldConfig::new().with_gravity(0.0).with_air_friction(0.0)
}

#[test]
fn free_fall_gravity() {
    let config: WorldConfig<f64> = WorldConfig::new().with_gravity(1.0).with_air_friction(0.0);
    let mut node = Node::new(Vec2::new(400.0, 100.0), &config);
    let dt = 0.1;
    for _ in 0..10 {
        node.integrate(dt, &config);
    }
    // Semi-implicit Euler: y_n = y_0 + g * dt^2 * n(n + 1) / 2
    let expected_y = 100.0 + 1.0 * dt * dt * 55.0;
    assert!((node.pos.y - expected_y).abs() < 1e-9, "pos.y = {}, expected ~ {}", node.pos.y, expected_y);
    assert!((node.vel.y - 1.0).abs() < 1e-9);
    assert_eq!(node.pos.x, 400.0);
}

#[test]
fn negative_gravity_rises() {
    let config = calm();
    let mut node = Node::new(Vec2::new(400.0, 300.0), &config).with_gravity(-0.5);
    node.integrate(1.0, &config);
    assert!(node.pos.y < 300.0);
}

#[test]
fn air_drag_decays_velocity() {
    let config = calm().with_air_friction(0.5);
    let mut node = Node::new(Vec2::new(100.0, 100.0), &config).with_velocity(Vec2::new(10.0, 0.0));
    node.integrate(1.0, &config);
    let expected = 10.0 * (-0.5f64).exp();
    assert!((node.vel.x - expected).abs() < 1e-12);
    assert!((node.pos.x - (100.0 + expected)).abs() < 1e-12);
}

#[test]
fn apply_force_scales_by_dt_over_mass() {
    let config = calm();
    let mut node = Node::new(Vec2::new(100.0, 100.0), &config).with_mass(4.0);
    node.apply_force(Vec2::new(8.0, -2.0), 0.5);
    assert_eq!(node.vel, Vec2::new(1.0, -0.25));
}

#[test]
fn static_node_ignores_forces_integration_and_springs() {
    let config: WorldConfig<f64> = WorldConfig::new();
    let mut nodes = vec![
        Node::fixed(Vec2::new(100.0, 100.0), &config),
        Node::new(Vec2::new(500.0, 100.0), &config),
    ];
    let mut spring = Spring::new(NodeId(0), NodeId(1), 1.0, 0.01, 3.0);

    for _ in 0..10 {
        nodes[0].apply_force(Vec2::new(1e9, -1e9), 1.0);
        spring.update(&mut nodes, 0.1);
        nodes[0].integrate(0.1, &config);
        nodes[1].integrate(0.1, &config);
    }

    assert_eq!(nodes[0].pos, Vec2::new(100.0, 100.0));
    assert_eq!(nodes[0].vel, Vec2::zero());
    assert!(nodes[1].pos.x < 500.0, "free end should be pulled in");
}

#[test]
fn static_node_teleports_when_dragged() {
    let config = calm();
    let mut node = Node::fixed(Vec2::new(100.0, 100.0), &config);

    node.apply_external_point_force(PointStimulus::pressed_at(Vec2::new(103.0, 102.0)), 0.1, 1.0);
    assert!(node.is_dragging());
    assert_eq!(node.pos, Vec2::new(103.0, 102.0));

    // Latched: follows the point even far outside its radius.
    node.apply_external_point_force(PointStimulus::pressed_at(Vec2::new(300.0, 50.0)), 0.1, 1.0);
    assert_eq!(node.pos, Vec2::new(300.0, 50.0));

    node.apply_external_point_force(PointStimulus::released(), 0.1, 1.0);
    assert!(!node.is_dragging());
    assert_eq!(node.pos, Vec2::new(300.0, 50.0));
    assert_eq!(node.vel, Vec2::zero());
}

#[test]
fn dynamic_drag_zeroes_velocity_and_pulls() {
    let config = calm();
    let mut node = Node::new(Vec2::new(100.0, 100.0), &config)
        .with_mass(2.0)
        .with_velocity(Vec2::new(5.0, 5.0));

    node.apply_external_point_force(PointStimulus::pressed_at(Vec2::new(103.0, 100.0)), 1.0, 1.0);
    assert!(node.is_dragging());
    // (target - pos) * strength * mass * dt / mass
    assert_eq!(node.vel, Vec2::new(3.0, 0.0));
    assert_eq!(node.pos, Vec2::new(100.0, 100.0));
}

#[test]
fn press_outside_radius_does_not_grab() {
    let config = calm();
    let mut node = Node::new(Vec2::new(100.0, 100.0), &config).with_velocity(Vec2::new(1.0, 0.0));
    node.apply_external_point_force(PointStimulus::pressed_at(Vec2::new(150.0, 100.0)), 1.0, 1.0);
    assert!(!node.is_dragging());
    assert_eq!(node.vel, Vec2::new(1.0, 0.0));
}

#[test]
fn non_draggable_node_never_grabbed() {
    let config = calm();
    let mut node = Node::fixed(Vec2::new(100.0, 100.0), &config).with_draggable(false);
    node.apply_external_point_force(PointStimulus::pressed_at(Vec2::new(100.0, 100.0)), 1.0, 1.0);
    assert!(!node.is_dragging());
    assert_eq!(node.pos, Vec2::new(100.0, 100.0));
}

#[test]
fn disabling_drag_releases_grab() {
    let config = calm();
    let mut node = Node::new(Vec2::new(100.0, 100.0), &config);
    node.apply_external_point_force(PointStimulus::pressed_at(Vec2::new(102.0, 100.0)), 0.1, 1.0);
    assert!(node.is_dragging());

    node.set_draggable(false);
    assert!(!node.is_dragging());
    node.apply_external_point_force(PointStimulus::pressed_at(Vec2::new(102.0, 100.0)), 0.1, 1.0);
    assert!(!node.is_dragging());
}

#[test]
fn floor_bounce_restores_containment() {
    let config = calm();
    let mut node = Node::new(Vec2::new(400.0, 597.0), &config)
        .with_radius(6.0)
        .with_elasticity(0.5)
        .with_friction(0.0)
        .with_velocity(Vec2::new(2.0, 10.0));

    node.integrate(1.0, &config);

    assert_eq!(node.pos.y + node.radius, 600.0);
    assert_eq!(node.find_collisions(&config.bounds).count(), 0);
    assert_eq!(node.vel, Vec2::new(2.0, -5.0));
}

#[test]
fn wall_friction_decays_tangential_velocity() {
    let config = calm();
    let mut node = Node::new(Vec2::new(400.0, 597.0), &config)
        .with_radius(6.0)
        .with_elasticity(0.0)
        .with_friction(0.4)
        .with_velocity(Vec2::new(10.0, 1.0));

    node.integrate(1.0, &config);

    assert!((node.vel.x - 10.0 * (-0.4f64).exp()).abs() < 1e-12);
    assert_eq!(node.vel.y, 0.0);
}

#[test]
fn falling_node_never_sinks_below_floor() {
    let config: WorldConfig<f64> = WorldConfig::new().with_gravity(2.0);
    let mut node = Node::new(Vec2::new(400.0, 300.0), &config);
    let mut previous_depth = 0.0;
    for _ in 0..500 {
        node.integrate(0.25, &config);
        let depth = (node.pos.y + node.radius - config.bounds.height).max(0.0);
        assert!(depth <= previous_depth + 1e-9, "depth grew to {}", depth);
        previous_depth = depth;
    }
    assert!(node.pos.y + node.radius <= config.bounds.height + 1e-9);
}

#[test]
fn corner_contacts_resolved_independently() {
    let config = calm();
    let mut node = Node::new(Vec2::new(3.0, 3.0), &config)
        .with_radius(5.0)
        .with_elasticity(1.0)
        .with_friction(0.0)
        .with_velocity(Vec2::new(-1.0, -1.0));

    node.integrate(1.0, &config);

    assert_eq!(node.pos, Vec2::new(5.0, 5.0));
    assert_eq!(node.vel, Vec2::new(1.0, 1.0));
}
