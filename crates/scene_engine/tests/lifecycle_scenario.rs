mod common;

use std::time::Duration;

use common::{event_log, events_for, Recorded, Recorder, Watcher};
use scene_engine::modules::{ShakeConfig, ShakeModule, SpriteModule, TransformModule};
use scene_engine::scene::{
    EmptyNode, Module, ModuleContext, PropertyMap, PropertyValue, SceneError, SceneGraph,
    SceneManager,
};
use scene_engine::foundation::math::Vec2;

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn end_to_end_scenario() {
    let log = event_log();
    let mut scene = SceneManager::new();
    assert_eq!(scene.root_count(), 0);

    let a = scene.add_root(Recorded::new("a", &log), Some("A")).unwrap();
    let b = scene.graph_mut().add_child(a, EmptyNode, None).unwrap();
    assert_eq!(scene.root_count(), 1);
    assert_eq!(scene.graph().children(a).unwrap().len(), 1);
    assert_eq!(scene.graph().name(b).unwrap(), "Node");

    let b2 = scene.graph_mut().add_child(a, EmptyNode, None).unwrap();
    scene.graph_mut().add_module(b2, Recorder::new("b2", &log)).unwrap();
    assert_eq!(scene.graph().name(b2).unwrap(), "Node (2)");
    assert_eq!(scene.graph().children(a).unwrap().len(), 2);
    assert_eq!(scene.graph().siblings(b).unwrap().len(), 2);

    scene.graph_mut().set_enabled(a, false).unwrap();
    for node in [a, b, b2] {
        let owner = scene.graph().node(node).unwrap();
        assert!(!owner.is_enabled());
        for (module, lifecycle) in owner.modules() {
            assert!(!lifecycle.is_enabled(), "{module} on {} still enabled", owner.name());
        }
    }

    scene.graph_mut().destroy(b).unwrap();
    assert_eq!(scene.graph().children(a).unwrap().len(), 1);
    assert!(scene.graph().is_destroyed(b));
    assert!(matches!(scene.graph().node(b), Err(SceneError::InvalidState(_))));

    let copy = scene.graph_mut().clone_node(a, None).unwrap();
    let graph = scene.graph_mut();
    assert_ne!(copy, a);
    assert_eq!(graph.root_count(), 2);

    let original_children = graph.children(a).unwrap().to_vec();
    let copied_children = graph.children(copy).unwrap().to_vec();
    assert_eq!(copied_children.len(), 1);
    assert_ne!(copied_children[0], original_children[0]);

    graph.transform_mut(copy).unwrap().position = Vec2::new(9.0, 9.0);
    assert_eq!(graph.transform(a).unwrap().position, Vec2::zeros());
    graph.module_mut::<Recorder>(copy).unwrap().unwrap().tag = "changed".to_string();
    assert_eq!(graph.module::<Recorder>(a).unwrap().unwrap().tag, "a");
}

#[test]
fn spawn_fires_create_enable_visible() {
    let log = event_log();
    let mut graph = SceneGraph::new();

    let root = graph.add_root(Recorded::new("root", &log), None).unwrap();

    assert_eq!(graph.name(root).unwrap(), "Recorded");
    assert_eq!(events_for(&log, "root"), ["create", "enable", "visible"]);
    assert!(graph.has_module::<TransformModule>(root).unwrap());
}

#[test]
fn phases_reach_every_node_before_the_next_phase() {
    let log = event_log();
    let mut scene = SceneManager::new();
    let a = scene.add_root(Recorded::new("a", &log), None).unwrap();
    scene.graph_mut().add_child(a, Recorded::new("b", &log), None).unwrap();
    scene.add_root(Recorded::new("c", &log), None).unwrap();
    log.borrow_mut().clear();

    scene.update(FRAME).unwrap();
    scene.draw().unwrap();

    let expected: Vec<String> = [
        "pre_update", "update", "post_update", "pre_draw", "draw", "post_draw",
    ]
    .iter()
    .flat_map(|hook| ["a", "b", "c"].map(|tag| format!("{tag}:{hook}")))
    .collect();
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn hidden_nodes_update_but_do_not_draw() {
    let log = event_log();
    let mut scene = SceneManager::new();
    let root = scene.add_root(Recorded::new("r", &log), None).unwrap();
    scene.graph_mut().set_visible(root, false).unwrap();
    log.borrow_mut().clear();

    scene.update(FRAME).unwrap();
    scene.draw().unwrap();

    assert_eq!(events_for(&log, "r"), ["pre_update", "update", "post_update"]);
}

#[test]
fn disabled_nodes_receive_nothing() {
    let log = event_log();
    let mut scene = SceneManager::new();
    let root = scene.add_root(Recorded::new("r", &log), None).unwrap();
    scene.graph_mut().add_child(root, Recorded::new("child", &log), None).unwrap();
    scene.graph_mut().set_enabled(root, false).unwrap();
    assert_eq!(events_for(&log, "child"), ["create", "enable", "visible", "disable"]);
    log.borrow_mut().clear();

    scene.update(FRAME).unwrap();
    scene.draw().unwrap();
    assert!(log.borrow().is_empty());

    scene.graph_mut().set_enabled(root, true).unwrap();
    assert_eq!(events_for(&log, "r"), ["enable"]);
    assert_eq!(events_for(&log, "child"), ["enable"]);
}

#[test]
fn remove_child_tears_down_subtree_first() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let root = graph.add_root(EmptyNode, None).unwrap();
    let child = graph.add_child(root, Recorded::new("child", &log), Some("Child")).unwrap();
    let grandchild = graph.add_child(child, Recorded::new("grand", &log), None).unwrap();
    log.borrow_mut().clear();

    let removed = graph.remove_child(root, child).unwrap();

    assert_eq!(removed, child);
    assert_eq!(
        *log.borrow(),
        [
            "child:invisible",
            "child:disable",
            "grand:invisible",
            "grand:disable",
            "grand:destroy",
            "child:destroy",
        ]
    );
    assert!(graph.is_destroyed(child));
    assert!(graph.is_destroyed(grandchild));
    assert!(graph.children(root).unwrap().is_empty());
    assert_eq!(graph.node_count(), 1);
}

#[test]
fn remove_child_by_name() {
    let mut graph = SceneGraph::new();
    let root = graph.add_root(EmptyNode, None).unwrap();
    let child = graph.add_child(root, EmptyNode, Some("Turret")).unwrap();

    assert_eq!(graph.remove_child_named(root, "Turret").unwrap(), child);
    assert!(matches!(
        graph.remove_child_named(root, "Turret"),
        Err(SceneError::NotFound(_))
    ));
}

#[test]
fn structural_errors() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let root = graph.add_root(EmptyNode, Some("Root")).unwrap();
    let other = graph.add_root(EmptyNode, Some("Other")).unwrap();
    let child = graph.add_child(root, EmptyNode, Some("Child")).unwrap();

    assert_eq!(
        graph.add_child(root, EmptyNode, Some("Child")),
        Err(SceneError::DuplicateName("Child".to_string()))
    );
    assert_eq!(
        graph.add_root(EmptyNode, Some("Root")),
        Err(SceneError::DuplicateName("Root".to_string()))
    );
    assert!(matches!(
        graph.remove_child(other, child),
        Err(SceneError::NotFound(_))
    ));

    graph.add_module(child, Recorder::new("x", &log)).unwrap();
    assert!(matches!(
        graph.add_module(child, Recorder::new("y", &log)),
        Err(SceneError::DuplicateModule(_))
    ));
    assert!(matches!(
        graph.remove_module::<Watcher>(child),
        Err(SceneError::NotFound(_))
    ));
    assert!(graph.module::<Watcher>(child).unwrap().is_none());

    graph.destroy(root).unwrap();
    graph.destroy(root).unwrap();
    assert!(matches!(
        graph.add_child(root, EmptyNode, None),
        Err(SceneError::InvalidState(_))
    ));
    assert!(matches!(
        graph.add_module(child, Watcher::new("z", &log)),
        Err(SceneError::InvalidState(_))
    ));
    assert_eq!(graph.roots(), &[other]);
}

#[test]
fn rename_checks_siblings() {
    let mut graph = SceneGraph::new();
    let root = graph.add_root(EmptyNode, None).unwrap();
    let left = graph.add_child(root, EmptyNode, Some("Left")).unwrap();
    graph.add_child(root, EmptyNode, Some("Right")).unwrap();

    assert_eq!(
        graph.set_name(left, "Right"),
        Err(SceneError::DuplicateName("Right".to_string()))
    );
    graph.set_name(left, "Left").unwrap();
    graph.set_name(left, "Port").unwrap();
    assert_eq!(graph.find_child(root, "Port").unwrap(), Some(left));
    assert_eq!(graph.find_child(root, "Left").unwrap(), None);
}

#[test]
fn typed_child_lookup() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let root = graph.add_root(EmptyNode, None).unwrap();
    let recorded = graph.add_child(root, Recorded::new("r", &log), Some("Probe")).unwrap();

    assert_eq!(graph.find_child_of::<Recorded>(root, "Probe").unwrap(), Some(recorded));
    assert_eq!(graph.find_child_of::<EmptyNode>(root, "Probe").unwrap(), None);
    assert_eq!(graph.find_child_of_kind(root, "Probe", "Recorded").unwrap(), Some(recorded));
}

#[test]
fn module_added_to_disabled_node_is_only_created() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let node = graph.add_root(EmptyNode, None).unwrap();
    graph.set_enabled(node, false).unwrap();

    graph.add_module(node, Watcher::new("w", &log)).unwrap();
    assert_eq!(events_for(&log, "w"), ["create", "visible"]);

    graph.set_enabled(node, true).unwrap();
    assert_eq!(events_for(&log, "w"), ["create", "visible", "enable"]);
}

#[test]
fn remove_module_disables_then_destroys() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let node = graph.add_root(EmptyNode, None).unwrap();
    graph.add_module(node, Watcher::new("w", &log)).unwrap();
    log.borrow_mut().clear();

    graph.remove_module::<Watcher>(node).unwrap();

    assert_eq!(events_for(&log, "w"), ["disable", "destroy"]);
    assert!(!graph.has_module::<Watcher>(node).unwrap());
}

#[test]
fn single_module_can_be_disabled() {
    let log = event_log();
    let mut scene = SceneManager::new();
    let node = scene.add_root(Recorded::new("r", &log), None).unwrap();
    scene.graph_mut().set_module_enabled::<Recorder>(node, false).unwrap();
    log.borrow_mut().clear();

    scene.update(FRAME).unwrap();

    assert!(log.borrow().is_empty());
    assert!(scene.graph().is_enabled(node).unwrap());
}

#[test]
fn clone_builds_then_activates() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let root = graph.add_root(Recorded::new("orig", &log), Some("Ship")).unwrap();
    graph.add_child(root, Recorded::new("gun", &log), Some("Gun")).unwrap();
    log.borrow_mut().clear();

    let copy = graph.clone_node(root, None).unwrap();

    assert_eq!(graph.name(copy).unwrap(), "Ship (Clone)");
    assert_eq!(
        *log.borrow(),
        [
            "orig':create",
            "orig':enable",
            "orig':visible",
            "gun':create",
            "gun':enable",
            "gun':visible",
        ]
    );
    let original = graph.module::<Recorder>(root).unwrap().unwrap();
    assert_eq!(*original.clones.borrow(), 1);

    let copied_gun = graph.find_child(copy, "Gun").unwrap().unwrap();
    assert_eq!(graph.node(copied_gun).unwrap().kind(), "Recorded");
}

#[test]
fn disabled_clone_stays_disabled() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let root = graph.add_root(Recorded::new("orig", &log), None).unwrap();
    graph.set_enabled(root, false).unwrap();
    log.borrow_mut().clear();

    let copy = graph.clone_node(root, None).unwrap();

    assert_eq!(events_for(&log, "orig'"), ["create", "visible"]);
    assert!(!graph.is_enabled(copy).unwrap());
}

#[derive(Clone, Default)]
struct Spawner {
    spawned: bool,
}

impl Module for Spawner {
    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn on_update(&mut self, ctx: &mut ModuleContext<'_>) {
        if !self.spawned {
            self.spawned = true;
            let node = ctx.node();
            ctx.commands().add_child(node, EmptyNode, Some("Spawned".to_string()));
        }
    }
}

#[derive(Clone, Default)]
struct SelfDestruct;

impl Module for SelfDestruct {
    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn on_post_update(&mut self, ctx: &mut ModuleContext<'_>) {
        let node = ctx.node();
        ctx.commands().destroy(node);
    }
}

#[test]
fn structural_changes_from_hooks_are_deferred() {
    let mut scene = SceneManager::new();
    let spawner = scene.add_root(EmptyNode, Some("Spawner")).unwrap();
    scene.graph_mut().add_module(spawner, Spawner::default()).unwrap();
    let doomed = scene.add_root(EmptyNode, Some("Doomed")).unwrap();
    scene.graph_mut().add_module(doomed, SelfDestruct).unwrap();

    scene.update(FRAME).unwrap();

    let graph = scene.graph();
    assert!(graph.find_child(spawner, "Spawned").unwrap().is_some());
    assert!(graph.is_destroyed(doomed));
    assert_eq!(graph.root_count(), 1);
    assert_eq!(graph.commands_applied(), 2);

    scene.update(FRAME).unwrap();
    assert_eq!(scene.graph().children(spawner).unwrap().len(), 1);
}

#[derive(Clone, Default)]
struct Clock {
    frame: u64,
    delta: Duration,
    elapsed: Duration,
}

impl Module for Clock {
    fn clone_module(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn on_update(&mut self, ctx: &mut ModuleContext<'_>) {
        let time = ctx.time();
        self.frame = time.frame();
        self.delta = time.delta();
        self.elapsed = time.elapsed();
    }
}

#[test]
fn frame_clock_is_visible_from_hooks() {
    let mut scene = SceneManager::new();
    let node = scene.add_root(EmptyNode, None).unwrap();
    scene.graph_mut().add_module(node, Clock::default()).unwrap();

    scene.update(Duration::from_millis(10)).unwrap();
    scene.update(Duration::from_millis(20)).unwrap();

    let clock = scene.graph().module::<Clock>(node).unwrap().unwrap();
    assert_eq!(clock.frame, 2);
    assert_eq!(clock.delta, Duration::from_millis(20));
    assert_eq!(clock.elapsed, Duration::from_millis(30));
}

#[test]
fn initial_properties() {
    let mut graph = SceneGraph::new();
    let node = graph.add_root(EmptyNode, None).unwrap();

    let mut properties = PropertyMap::new();
    properties.insert("layer".to_string(), PropertyValue::Int(4));
    properties.insert("tint".to_string(), PropertyValue::Color([1, 2, 3, 4]));
    graph.add_module_with(node, SpriteModule::new(""), &properties).unwrap();

    let sprite = graph.module::<SpriteModule>(node).unwrap().unwrap();
    assert_eq!(sprite.layer(), 4);
    assert_eq!(sprite.tint(), [1, 2, 3, 4]);
}

#[test]
fn initial_property_errors() {
    let mut graph = SceneGraph::new();
    let node = graph.add_root(EmptyNode, None).unwrap();
    let attempt = |name: &str, value: PropertyValue| {
        let mut properties = PropertyMap::new();
        properties.insert(name.to_string(), value);
        properties
    };

    assert_eq!(
        graph.add_module_with(node, SpriteModule::new(""), &attempt("size", PropertyValue::Vec2([1.0, 1.0]))),
        Err(SceneError::ReadOnlyProperty("size".to_string()))
    );
    assert!(matches!(
        graph.add_module_with(node, SpriteModule::new(""), &attempt("layer", PropertyValue::Text("top".into()))),
        Err(SceneError::InvalidValue { .. })
    ));
    assert!(matches!(
        graph.add_module_with(node, SpriteModule::new(""), &attempt("opacity", PropertyValue::Float(0.5))),
        Err(SceneError::NotFound(_))
    ));
    assert!(!graph.has_module::<SpriteModule>(node).unwrap());
}

#[test]
fn configured_modules_are_validated() {
    let mut graph = SceneGraph::new();
    let node = graph.add_root(EmptyNode, None).unwrap();

    let bad = ShakeConfig { frequency: -1.0, ..ShakeConfig::default() };
    assert!(matches!(
        graph.add_configured(node, bad),
        Err(SceneError::InvalidValue { .. })
    ));
    assert!(!graph.has_module::<ShakeModule>(node).unwrap());

    graph.add_configured(node, ShakeConfig::default()).unwrap();
    assert!(graph.has_module::<ShakeModule>(node).unwrap());
}

#[test]
fn hierarchy_dump() {
    let mut graph = SceneGraph::new();
    let world = graph.add_root(EmptyNode, Some("World")).unwrap();
    let ship = graph.add_child(world, EmptyNode, Some("Ship")).unwrap();
    graph.add_module(ship, ShakeModule::default()).unwrap();
    graph.add_child(ship, EmptyNode, Some("Gun")).unwrap();
    graph.add_root(EmptyNode, Some("Hud")).unwrap();

    assert_eq!(
        graph.hierarchy_string(),
        "'World'\n——→'Ship' (ShakeModule)\n————→'Gun'\n'Hud'\n"
    );
    assert_eq!(
        graph.node_hierarchy_string(ship).unwrap(),
        "'Ship' (ShakeModule)\n——→'Gun'"
    );
}

#[test]
fn teardown_disables_modules_enabled_on_a_disabled_node() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let node = graph.add_root(EmptyNode, None).unwrap();
    graph.add_module(node, Watcher::new("w", &log)).unwrap();
    graph.set_enabled(node, false).unwrap();
    graph.set_module_enabled::<Watcher>(node, true).unwrap();
    log.borrow_mut().clear();

    graph.destroy(node).unwrap();

    assert_eq!(events_for(&log, "w"), ["invisible", "disable", "destroy"]);
}

#[test]
fn teardown_destroys_siblings_in_order() {
    let log = event_log();
    let mut graph = SceneGraph::new();
    let root = graph.add_root(Recorded::new("root", &log), None).unwrap();
    let first = graph.add_child(root, Recorded::new("c1", &log), Some("C1")).unwrap();
    graph.add_child(first, Recorded::new("g1", &log), None).unwrap();
    graph.add_child(root, Recorded::new("c2", &log), Some("C2")).unwrap();
    log.borrow_mut().clear();

    graph.destroy(root).unwrap();

    let destroyed: Vec<String> = log
        .borrow()
        .iter()
        .filter(|entry| entry.ends_with(":destroy"))
        .cloned()
        .collect();
    assert_eq!(destroyed, ["g1:destroy", "c1:destroy", "c2:destroy", "root:destroy"]);
}
