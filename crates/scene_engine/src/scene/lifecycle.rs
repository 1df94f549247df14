//! Lifecycle state machine shared by nodes and modules
//!
//! Two orthogonal axes (enabled/disabled and visible/hidden) sit between
//! creation and the terminal destroyed state:
//!
//! ```text
//! Uninitialized → Created → {Enabled | Disabled} × {Visible | Hidden} → Destroyed
//! ```
//!
//! Every transition method reports whether the matching hook should fire.

use bitflags::bitflags;

use super::{SceneError, SceneResult};

bitflags! {
    /// Raw lifecycle flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LifecycleFlags: u8 {
        /// The create hook has fired
        const INITIALIZED = 1 << 0;
        /// Update hooks are delivered
        const ENABLED = 1 << 1;
        /// Draw hooks are delivered (together with ENABLED)
        const VISIBLE = 1 << 2;
        /// Terminal state
        const DESTROYED = 1 << 3;
    }
}

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not created yet
    Uninitialized,
    /// Created, with the current position on both axes
    Created {
        /// Update hooks are delivered
        enabled: bool,
        /// Draw hooks are delivered when also enabled
        visible: bool,
    },
    /// Destroyed, no further transitions allowed
    Destroyed,
}

/// Lifecycle points a module can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Fired once, before anything else
    Create,
    /// Fired once, last
    Destroy,
    /// Transition to enabled
    Enable,
    /// Transition to disabled
    Disable,
    /// First update phase
    PreUpdate,
    /// Main update phase
    Update,
    /// Last update phase
    PostUpdate,
    /// First draw phase
    PreDraw,
    /// Main draw phase
    Draw,
    /// Last draw phase
    PostDraw,
    /// Transition to visible
    Visible,
    /// Transition to hidden
    Invisible,
}

impl Hook {
    /// The update phases in the order they run each frame
    pub const UPDATE_PHASES: [Self; 3] = [Self::PreUpdate, Self::Update, Self::PostUpdate];

    /// The draw phases in the order they run each frame
    pub const DRAW_PHASES: [Self; 3] = [Self::PreDraw, Self::Draw, Self::PostDraw];

    /// Check if this is one of the update phases
    pub fn is_update(self) -> bool {
        matches!(self, Self::PreUpdate | Self::Update | Self::PostUpdate)
    }

    /// Check if this is one of the draw phases
    pub fn is_draw(self) -> bool {
        matches!(self, Self::PreDraw | Self::Draw | Self::PostDraw)
    }

    /// Hook method name, for logging
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "on_create",
            Self::Destroy => "on_destroy",
            Self::Enable => "on_enable",
            Self::Disable => "on_disable",
            Self::PreUpdate => "on_pre_update",
            Self::Update => "on_update",
            Self::PostUpdate => "on_post_update",
            Self::PreDraw => "on_pre_draw",
            Self::Draw => "on_draw",
            Self::PostDraw => "on_post_draw",
            Self::Visible => "on_visible",
            Self::Invisible => "on_invisible",
        }
    }
}

/// Lifecycle of one node or module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lifecycle {
    flags: LifecycleFlags,
}

impl Lifecycle {
    /// Fresh, uninitialized lifecycle
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the enabled/visible axes of `other` without the created or destroyed marks
    ///
    /// Used when cloning, before any hook has fired on the copy.
    pub fn inherit(other: &Self) -> Self {
        Self {
            flags: other.flags & (LifecycleFlags::ENABLED | LifecycleFlags::VISIBLE),
        }
    }

    /// Raw flags
    pub fn flags(&self) -> LifecycleFlags {
        self.flags
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        if self.is_destroyed() {
            LifecycleState::Destroyed
        } else if self.is_initialized() {
            LifecycleState::Created {
                enabled: self.is_enabled(),
                visible: self.is_visible(),
            }
        } else {
            LifecycleState::Uninitialized
        }
    }

    /// Check if the create hook has fired
    pub fn is_initialized(&self) -> bool {
        self.flags.contains(LifecycleFlags::INITIALIZED)
    }

    /// Check if update hooks are delivered
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(LifecycleFlags::ENABLED)
    }

    /// Check if the visible axis is set
    pub fn is_visible(&self) -> bool {
        self.flags.contains(LifecycleFlags::VISIBLE)
    }

    /// Check if the object is destroyed
    pub fn is_destroyed(&self) -> bool {
        self.flags.contains(LifecycleFlags::DESTROYED)
    }

    /// Mark as created; `true` the first time only
    pub fn create(&mut self) -> SceneResult<bool> {
        self.ensure_alive("create")?;
        if self.is_initialized() {
            return Ok(false);
        }
        self.flags.insert(LifecycleFlags::INITIALIZED);
        Ok(true)
    }

    /// Enable; `true` on a transition or when `force` is set
    pub fn enable(&mut self, force: bool) -> SceneResult<bool> {
        self.ensure_created("enable")?;
        Ok(self.raise(LifecycleFlags::ENABLED, force))
    }

    /// Disable; `true` on a transition
    pub fn disable(&mut self) -> SceneResult<bool> {
        self.ensure_created("disable")?;
        Ok(self.lower(LifecycleFlags::ENABLED))
    }

    /// Show; `true` on a transition or when `force` is set
    pub fn show(&mut self, force: bool) -> SceneResult<bool> {
        self.ensure_created("show")?;
        Ok(self.raise(LifecycleFlags::VISIBLE, force))
    }

    /// Hide; `true` on a transition
    pub fn hide(&mut self) -> SceneResult<bool> {
        self.ensure_created("hide")?;
        Ok(self.lower(LifecycleFlags::VISIBLE))
    }

    /// Enter the terminal state; `true` the first time only
    pub fn destroy(&mut self) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.flags = LifecycleFlags::DESTROYED;
        true
    }

    /// Check if `hook` may be delivered in the current state
    ///
    /// Update phases need the enabled axis; draw phases need both axes.
    pub fn accepts(&self, hook: Hook) -> bool {
        if !self.is_initialized() || self.is_destroyed() {
            return false;
        }
        if hook.is_draw() {
            self.is_enabled() && self.is_visible()
        } else if hook.is_update() {
            self.is_enabled()
        } else {
            true
        }
    }

    fn raise(&mut self, flag: LifecycleFlags, force: bool) -> bool {
        let changed = !self.flags.contains(flag);
        self.flags.insert(flag);
        changed || force
    }

    fn lower(&mut self, flag: LifecycleFlags) -> bool {
        let changed = self.flags.contains(flag);
        self.flags.remove(flag);
        changed
    }

    fn ensure_alive(&self, action: &str) -> SceneResult<()> {
        if self.is_destroyed() {
            return Err(SceneError::InvalidState(format!("cannot {action} after destroy")));
        }
        Ok(())
    }

    fn ensure_created(&self, action: &str) -> SceneResult<()> {
        self.ensure_alive(action)?;
        if !self.is_initialized() {
            return Err(SceneError::InvalidState(format!("cannot {action} before create")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created() -> Lifecycle {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.create().unwrap());
        lifecycle
    }

    #[test]
    fn test_create_fires_once() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);
        assert!(lifecycle.create().unwrap());
        assert!(!lifecycle.create().unwrap());
        assert_eq!(
            lifecycle.state(),
            LifecycleState::Created { enabled: false, visible: false }
        );
    }

    #[test]
    fn test_enable_is_idempotent_unless_forced() {
        let mut lifecycle = created();
        assert!(lifecycle.enable(false).unwrap());
        assert!(!lifecycle.enable(false).unwrap());
        assert!(lifecycle.enable(true).unwrap());
        assert!(lifecycle.disable().unwrap());
        assert!(!lifecycle.disable().unwrap());
    }

    #[test]
    fn test_axes_are_independent() {
        let mut lifecycle = created();
        lifecycle.show(false).unwrap();
        assert!(lifecycle.is_visible());
        assert!(!lifecycle.is_enabled());

        lifecycle.enable(false).unwrap();
        lifecycle.hide().unwrap();
        assert!(lifecycle.is_enabled());
        assert!(!lifecycle.is_visible());
    }

    #[test]
    fn test_hook_gating() {
        let mut lifecycle = created();
        assert!(!lifecycle.accepts(Hook::Update));

        lifecycle.enable(false).unwrap();
        assert!(lifecycle.accepts(Hook::Update));
        assert!(!lifecycle.accepts(Hook::Draw));

        lifecycle.show(false).unwrap();
        assert!(lifecycle.accepts(Hook::PostDraw));
    }

    #[test]
    fn test_destroyed_is_terminal() {
        let mut lifecycle = created();
        lifecycle.enable(false).unwrap();

        assert!(lifecycle.destroy());
        assert!(!lifecycle.destroy());
        assert_eq!(lifecycle.state(), LifecycleState::Destroyed);
        assert!(!lifecycle.accepts(Hook::Update));
        assert!(matches!(lifecycle.enable(false), Err(SceneError::InvalidState(_))));
        assert!(matches!(lifecycle.create(), Err(SceneError::InvalidState(_))));
    }

    #[test]
    fn test_enable_before_create_fails() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.enable(false).is_err());
    }

    #[test]
    fn test_inherit_copies_axes_only() {
        let mut original = created();
        original.enable(false).unwrap();

        let copy = Lifecycle::inherit(&original);
        assert!(copy.is_enabled());
        assert!(!copy.is_visible());
        assert!(!copy.is_initialized());
    }
}
