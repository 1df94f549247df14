//! Module trait: polymorphic behavior attached to nodes
//!
//! A node carries at most one module per concrete type. The scene graph
//! drives every module through its lifecycle by calling the hook methods
//! below; all of them default to no-ops.

use std::any::{Any, TypeId};

use super::properties::{find_property, PropertyDescriptor, PropertyValue};
use super::{Hook, ModuleContext, SceneError, SceneResult};

/// Upcast helper so trait objects can be downcast to their concrete type
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior unit attached to a node
///
/// ```
/// use scene_engine::scene::{Module, ModuleContext};
///
/// #[derive(Clone, Default)]
/// struct Counter {
///     ticks: u32,
/// }
///
/// impl Module for Counter {
///     fn clone_module(&self) -> Box<dyn Module> {
///         Box::new(self.clone())
///     }
///
///     fn on_update(&mut self, _ctx: &mut ModuleContext<'_>) {
///         self.ticks += 1;
///     }
/// }
/// ```
pub trait Module: AsAny + 'static {
    /// Display name of the module type
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Produce an independent copy for a cloned node
    fn clone_module(&self) -> Box<dyn Module>;

    /// Called on the original after `clone_module`, with the fresh copy
    ///
    /// Override to deep-copy state that a plain clone would share.
    fn on_clone(&self, _clone: &mut dyn Module) {}

    /// Properties this module exposes by name
    fn properties(&self) -> &'static [PropertyDescriptor] {
        &[]
    }

    /// Read a property
    fn get_property(&self, _name: &str) -> Option<PropertyValue> {
        None
    }

    /// Write a property
    ///
    /// Only called for names listed as writable in [`Module::properties`].
    fn set_property(&mut self, name: &str, _value: PropertyValue) -> SceneResult<()> {
        Err(SceneError::NotFound(format!("property '{name}'")))
    }

    /// Fired once when the module is attached
    fn on_create(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Fired once when the module or its node is destroyed
    fn on_destroy(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Fired when the module becomes enabled
    fn on_enable(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Fired when the module becomes disabled
    fn on_disable(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// First update phase
    fn on_pre_update(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Main update phase
    fn on_update(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Last update phase
    fn on_post_update(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// First draw phase
    fn on_pre_draw(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Main draw phase
    fn on_draw(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Last draw phase
    fn on_post_draw(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Fired when the module becomes visible
    fn on_visible(&mut self, _ctx: &mut ModuleContext<'_>) {}
    /// Fired when the module becomes hidden
    fn on_invisible(&mut self, _ctx: &mut ModuleContext<'_>) {}
}

impl dyn Module {
    /// Downcast to a concrete module type
    pub fn downcast_ref<M: Module>(&self) -> Option<&M> {
        <dyn Module as AsAny>::as_any(self).downcast_ref::<M>()
    }

    /// Mutably downcast to a concrete module type
    pub fn downcast_mut<M: Module>(&mut self) -> Option<&mut M> {
        <dyn Module as AsAny>::as_any_mut(self).downcast_mut::<M>()
    }

    /// Check the concrete type
    pub fn is<M: Module>(&self) -> bool {
        module_type_id(self) == TypeId::of::<M>()
    }

    /// Write a property after checking it against [`Module::properties`]
    pub fn apply_property(&mut self, name: &str, value: PropertyValue) -> SceneResult<()> {
        match find_property(self.properties(), name) {
            None => Err(SceneError::NotFound(format!(
                "property '{name}' on {}",
                self.type_name()
            ))),
            Some(descriptor) if !descriptor.is_writable() => {
                Err(SceneError::ReadOnlyProperty(name.to_string()))
            }
            Some(_) => self.set_property(name, value),
        }
    }

    pub(crate) fn invoke(&mut self, hook: Hook, ctx: &mut ModuleContext<'_>) {
        match hook {
            Hook::Create => self.on_create(ctx),
            Hook::Destroy => self.on_destroy(ctx),
            Hook::Enable => self.on_enable(ctx),
            Hook::Disable => self.on_disable(ctx),
            Hook::PreUpdate => self.on_pre_update(ctx),
            Hook::Update => self.on_update(ctx),
            Hook::PostUpdate => self.on_post_update(ctx),
            Hook::PreDraw => self.on_pre_draw(ctx),
            Hook::Draw => self.on_draw(ctx),
            Hook::PostDraw => self.on_post_draw(ctx),
            Hook::Visible => self.on_visible(ctx),
            Hook::Invisible => self.on_invisible(ctx),
        }
    }
}

/// Concrete type id behind a module trait object
pub(crate) fn module_type_id(module: &dyn Module) -> TypeId {
    <dyn Module as AsAny>::as_any(module).type_id()
}

/// Strip the module path from a type name
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Typed construction parameters for a module
///
/// `build` validates the values; bad input fails with
/// [`SceneError::InvalidValue`].
pub trait ModuleConfig {
    /// Module produced by this configuration
    type Module: Module;

    /// Validate and build the module
    fn build(self) -> SceneResult<Self::Module>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::properties::PropertyDescriptor;

    #[derive(Clone, Default)]
    struct Label {
        text: String,
    }

    impl Module for Label {
        fn clone_module(&self) -> Box<dyn Module> {
            Box::new(self.clone())
        }

        fn properties(&self) -> &'static [PropertyDescriptor] {
            const PROPERTIES: &[PropertyDescriptor] = &[
                PropertyDescriptor::read_write("text"),
                PropertyDescriptor::read_only("length"),
            ];
            PROPERTIES
        }

        fn get_property(&self, name: &str) -> Option<PropertyValue> {
            match name {
                "text" => Some(self.text.clone().into()),
                "length" => Some(PropertyValue::Int(self.text.len() as i64)),
                _ => None,
            }
        }

        fn set_property(&mut self, name: &str, value: PropertyValue) -> SceneResult<()> {
            match name {
                "text" => self.text = value.as_text(name)?.to_string(),
                _ => return Err(SceneError::NotFound(name.to_string())),
            }
            Ok(())
        }
    }

    #[test]
    fn test_downcast_through_box() {
        let module: Box<dyn Module> = Box::new(Label::default());
        assert!(module.is::<Label>());
        assert!(module.downcast_ref::<Label>().is_some());
        assert_eq!(module.type_name(), "Label");
    }

    #[test]
    fn test_apply_property_checks_access() {
        let mut module: Box<dyn Module> = Box::new(Label::default());

        module.apply_property("text", "hello".into()).unwrap();
        assert_eq!(module.get_property("length"), Some(PropertyValue::Int(5)));

        assert_eq!(
            module.apply_property("length", PropertyValue::Int(1)),
            Err(SceneError::ReadOnlyProperty("length".to_string()))
        );
        assert!(matches!(
            module.apply_property("color", PropertyValue::Bool(true)),
            Err(SceneError::NotFound(_))
        ));
        assert!(matches!(
            module.apply_property("text", PropertyValue::Bool(true)),
            Err(SceneError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("a::b::Sprite"), "Sprite");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
