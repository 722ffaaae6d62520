use boing::{ForceConstraint, Node, NodeId, Outcome, Spring, SpringDefaults, Vec2, WorldConfig};

fn calm() -> WorldConfig<f64> {
    WorldConfig::new().with_gravity(0.0).with_air_friction(0.0)
}

fn pair(a: Vec2<f64>, b: Vec2<f64>) -> Vec<Node<f64>> {
    let config = calm();
    vec![Node::new(a, &config), Node::new(b, &config)]
}

fn relative_speed(nodes: &[Node<f64>]) -> f64 {
    let axis = (nodes[1].pos - nodes[0].pos).normalize();
    (nodes[1].vel - nodes[0].vel).dot(axis)
}

#[test]
fn stretched_spring_pulls_endpoints_together() {
    let mut nodes = pair(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
    let mut spring = Spring::new(NodeId(0), NodeId(1), 1.0, 15.0, 0.0);

    let outcome = spring.update(&mut nodes, 1.0);

    assert_eq!(outcome, Outcome::Applied(Vec2::new(-135.0, 0.0)));
    assert!(nodes[0].vel.x > 0.0);
    assert!(nodes[1].vel.x < 0.0);
    assert_eq!(nodes[0].vel.x, -nodes[1].vel.x);
    assert_eq!(nodes[0].vel.x, 135.0);
}

#[test]
fn compressed_spring_pushes_endpoints_apart() {
    let mut nodes = pair(Vec2::new(0.0, 0.0), Vec2::new(0.0, 2.0));
    let mut spring = Spring::new(NodeId(0), NodeId(1), 4.0, 1.0, 0.0);
    spring.update(&mut nodes, 1.0);
    assert!(nodes[0].vel.y < 0.0);
    assert!(nodes[1].vel.y > 0.0);
}

#[test]
fn forces_are_equal_and_opposite() {
    let config = calm();
    let mut nodes = vec![
        Node::new(Vec2::new(12.0, 40.0), &config).with_velocity(Vec2::new(0.3, -1.2)),
        Node::new(Vec2::new(31.0, 17.0), &config).with_velocity(Vec2::new(-2.0, 0.7)),
    ];
    let mut spring = Spring::new(NodeId(0), NodeId(1), 7.5, 0.8, 1.5);

    for _ in 0..20 {
        let before = (nodes[0].vel, nodes[1].vel);
        spring.update(&mut nodes, 0.05);
        let dv1 = nodes[0].vel - before.0;
        let dv2 = nodes[1].vel - before.1;
        assert!((dv1 + dv2).length() < 1e-12, "dv1 = {:?}, dv2 = {:?}", dv1, dv2);
    }
}

#[test]
fn unequal_masses_conserve_momentum() {
    let config = calm();
    let mut nodes = vec![
        Node::new(Vec2::new(100.0, 100.0), &config).with_mass(3.0),
        Node::new(Vec2::new(140.0, 130.0), &config).with_mass(0.5).with_velocity(Vec2::new(1.0, 1.0)),
    ];
    let momentum = |n: &[Node<f64>]| n[0].vel.scale(n[0].mass) + n[1].vel.scale(n[1].mass);
    let before = momentum(&nodes);
    let mut spring = Spring::new(NodeId(0), NodeId(1), 20.0, 2.0, 1.0);
    spring.update(&mut nodes, 0.1);
    assert!((momentum(&nodes) - before).length() < 1e-12);
}

#[test]
fn damping_shrinks_relative_velocity_each_update() {
    let config = calm();
    let mut nodes = vec![
        Node::new(Vec2::new(100.0, 100.0), &config).with_velocity(Vec2::new(-1.0, 0.0)),
        Node::new(Vec2::new(110.0, 100.0), &config).with_velocity(Vec2::new(1.0, 0.0)),
    ];
    // Pure damper: no elastic term.
    let mut spring = Spring::new(NodeId(0), NodeId(1), 10.0, 0.0, 0.5);
    let dt = 0.1;
    // The velocity change goes through `apply_force`, which scales by dt again.
    let factor = 1.0 - (1.0 - (-0.5f64 * dt).exp()) * dt;

    let mut previous = relative_speed(&nodes);
    for _ in 0..20 {
        spring.update(&mut nodes, dt);
        let current = relative_speed(&nodes);
        assert!(current.abs() <= previous.abs());
        assert!((current - previous * factor).abs() < 1e-12);
        previous = current;
    }
}

#[test]
fn static_endpoint_takes_no_share_of_damping() {
    let config = calm();
    let mut nodes = vec![
        Node::fixed(Vec2::new(100.0, 100.0), &config),
        Node::new(Vec2::new(110.0, 100.0), &config).with_velocity(Vec2::new(1.0, 0.0)),
    ];
    let mut spring = Spring::new(NodeId(0), NodeId(1), 10.0, 0.0, core::f64::consts::LN_2);

    spring.update(&mut nodes, 1.0);

    assert!((nodes[1].vel.x - 0.5).abs() < 1e-12);
    assert_eq!(nodes[0].vel, Vec2::zero());
}

#[test]
fn oscillation_dies_out() {
    let config = calm();
    let mut nodes = pair(Vec2::new(300.0, 300.0), Vec2::new(320.0, 300.0));
    let mut spring = Spring::new(NodeId(0), NodeId(1), 10.0, 0.5, 5.0);

    for _ in 0..1000 {
        spring.update(&mut nodes, 0.1);
        for node in nodes.iter_mut() {
            node.integrate(0.1, &config);
        }
    }

    let length = nodes[0].pos.distance(nodes[1].pos);
    assert!((length - 10.0).abs() < 0.01, "length = {}", length);
    assert!(relative_speed(&nodes).abs() < 0.01);
}

#[test]
fn both_static_endpoints_skip_update() {
    let config = calm();
    let mut nodes = vec![
        Node::fixed(Vec2::new(0.0, 0.0), &config),
        Node::fixed(Vec2::new(50.0, 0.0), &config),
    ];
    let mut spring = Spring::new(NodeId(0), NodeId(1), 1.0, 1.0, 1.0).with_max_force(0.5);
    assert_eq!(spring.update(&mut nodes, 1.0), Outcome::Inactive);
    assert!(!spring.is_broken());
}

#[test]
fn overloaded_spring_breaks_without_transmitting_force() {
    let mut nodes = pair(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
    let mut spring = Spring::new(NodeId(0), NodeId(1), 1.0, 1.0, 0.0).with_max_force(5.0);

    assert_eq!(spring.update(&mut nodes, 1.0), Outcome::Broke(9.0));
    assert!(spring.is_broken());
    assert!(!spring.is_active());
    assert_eq!(nodes[0].vel, Vec2::zero());
    assert_eq!(nodes[1].vel, Vec2::zero());
}

#[test]
fn broken_spring_stays_broken() {
    let mut nodes = pair(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
    let mut spring = Spring::new(NodeId(0), NodeId(1), 1.0, 1.0, 0.0).with_max_force(5.0);
    spring.update(&mut nodes, 1.0);

    // Even back inside the threshold nothing is applied again.
    nodes[1].pos = Vec2::new(2.0, 0.0);
    for _ in 0..10 {
        assert_eq!(spring.update(&mut nodes, 1.0), Outcome::Inactive);
        assert!(spring.is_broken());
    }
    assert_eq!(nodes[0].vel, Vec2::zero());
    assert_eq!(nodes[1].vel, Vec2::zero());
}

#[test]
fn breakable_spring_below_threshold_behaves_like_plain_spring() {
    let mut plain_nodes = pair(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
    let mut breakable_nodes = plain_nodes.clone();
    let mut plain = Spring::new(NodeId(0), NodeId(1), 1.0, 1.0, 0.0);
    let mut breakable = Spring::new(NodeId(0), NodeId(1), 1.0, 1.0, 0.0).with_max_force(25.0);

    plain.update(&mut plain_nodes, 0.5);
    breakable.update(&mut breakable_nodes, 0.5);

    assert_eq!(plain_nodes[1].vel, breakable_nodes[1].vel);
    assert!(!breakable.is_broken());
    assert!((breakable.stress().unwrap() - 3.0 / 25.0).abs() < 1e-12);
}

#[test]
fn breakable_uses_configured_threshold() {
    let defaults: SpringDefaults<f64> = SpringDefaults::default();
    let spring = Spring::breakable(NodeId(0), NodeId(1), 1.0, &defaults);
    assert_eq!(spring.limit().map(|l| l.max_force), Some(25.0));
    assert_eq!(spring.stiffness, 1.0);
    assert_eq!(spring.damping, 2.0);
}
