//! Shared helpers for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use scene_engine::foundation::collections::NodeId;
use scene_engine::scene::{Module, ModuleContext, Prefab, SceneGraph, SceneResult};

/// Ordered log of `tag:hook` entries shared between modules
pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Entries of `log` that start with `tag:`
pub fn events_for(log: &EventLog, tag: &str) -> Vec<String> {
    let prefix = format!("{tag}:");
    log.borrow()
        .iter()
        .filter(|entry| entry.starts_with(&prefix))
        .map(|entry| entry[prefix.len()..].to_string())
        .collect()
}

macro_rules! recording_module {
    ($name:ident) => {
        /// Module that appends every hook it receives to an [`EventLog`]
        #[derive(Clone)]
        pub struct $name {
            pub tag: String,
            pub log: EventLog,
            pub clones: Rc<RefCell<u32>>,
        }

        impl $name {
            pub fn new(tag: &str, log: &EventLog) -> Self {
                Self {
                    tag: tag.to_string(),
                    log: Rc::clone(log),
                    clones: Rc::new(RefCell::new(0)),
                }
            }

            fn record(&self, hook: &str) {
                self.log.borrow_mut().push(format!("{}:{}", self.tag, hook));
            }
        }

        impl Module for $name {
            fn clone_module(&self) -> Box<dyn Module> {
                Box::new(self.clone())
            }

            fn on_clone(&self, clone: &mut dyn Module) {
                *self.clones.borrow_mut() += 1;
                if let Some(clone) = clone.downcast_mut::<Self>() {
                    clone.tag = format!("{}'", self.tag);
                    clone.clones = Rc::new(RefCell::new(0));
                }
            }

            fn on_create(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("create");
            }
            fn on_destroy(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("destroy");
            }
            fn on_enable(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("enable");
            }
            fn on_disable(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("disable");
            }
            fn on_pre_update(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("pre_update");
            }
            fn on_update(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("update");
            }
            fn on_post_update(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("post_update");
            }
            fn on_pre_draw(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("pre_draw");
            }
            fn on_draw(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("draw");
            }
            fn on_post_draw(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("post_draw");
            }
            fn on_visible(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("visible");
            }
            fn on_invisible(&mut self, _ctx: &mut ModuleContext<'_>) {
                self.record("invisible");
            }
        }
    };
}

recording_module!(Recorder);
recording_module!(Watcher);

/// Prefab carrying a [`Recorder`] tagged with the node's role
pub struct Recorded {
    pub tag: &'static str,
    pub log: EventLog,
}

impl Recorded {
    pub fn new(tag: &'static str, log: &EventLog) -> Self {
        Self { tag, log: Rc::clone(log) }
    }
}

impl Prefab for Recorded {
    const KIND: &'static str = "Recorded";

    fn populate(self, graph: &mut SceneGraph, node: NodeId) -> SceneResult<()> {
        graph.add_module(node, Recorder::new(self.tag, &self.log))
    }
}
