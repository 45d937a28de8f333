//! Simulated compositor window space.
//!
//! `Space` owns the window table and drives the [`EffectsHandler`] the way a
//! compositor would: every operation first updates window state, recomputes
//! visibility, and only then emits the matching signal synchronously.
//!
//! Visibility is derived from the other properties:
//!
//! ```text
//! visible = !minimized && (desktops is empty || desktops contains current)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::effects_handler::{DesktopChange, EffectsHandler};
use super::window::{DesktopId, DesktopSet, Window, WindowId, WindowProps};

// ============================================================================
// Errors
// ============================================================================

/// Errors returned by [`Space`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpaceError {
    /// No window with the given ID exists.
    #[error("window {0} not found")]
    WindowNotFound(WindowId),

    /// A window with the given ID already exists.
    #[error("window {0} already exists")]
    DuplicateWindow(WindowId),
}

/// Result type alias for space operations.
pub type SpaceResult<T> = Result<T, SpaceError>;

// ============================================================================
// New Window Description
// ============================================================================

/// Description of a window to be mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWindow {
    /// Identity of the new window.
    pub id: WindowId,
    /// Display caption.
    pub caption: String,
    /// Whether the client is already unresponsive when mapped.
    pub unresponsive: bool,
    /// Whether the window starts minimized.
    pub minimized: bool,
    /// Desktops the window occupies (empty = all).
    pub desktops: DesktopSet,
}

impl NewWindow {
    /// Describes a responsive, non-minimized window on all desktops.
    #[must_use]
    pub fn new(id: u64, caption: impl Into<String>) -> Self {
        Self {
            id: WindowId(id),
            caption: caption.into(),
            unresponsive: false,
            minimized: false,
            desktops: DesktopSet::new(),
        }
    }

    /// Marks the window as unresponsive at map time.
    #[must_use]
    pub const fn unresponsive(mut self, unresponsive: bool) -> Self {
        self.unresponsive = unresponsive;
        self
    }

    /// Marks the window as minimized at map time.
    #[must_use]
    pub const fn minimized(mut self, minimized: bool) -> Self {
        self.minimized = minimized;
        self
    }

    /// Places the window on the given desktops.
    #[must_use]
    pub fn on_desktops(mut self, desktops: impl IntoIterator<Item = DesktopId>) -> Self {
        self.desktops = desktops.into_iter().collect();
        self
    }
}

// ============================================================================
// Space
// ============================================================================

/// Window table plus the effects handler it drives.
#[derive(Debug)]
pub struct Space {
    handler: Arc<EffectsHandler>,
    windows: HashMap<WindowId, Window>,
}

impl Default for Space {
    fn default() -> Self { Self::new() }
}

impl Space {
    /// Creates an empty space on desktop 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handler: Arc::new(EffectsHandler::new()),
            windows: HashMap::new(),
        }
    }

    /// Creates an empty space whose current desktop is `desktop`.
    #[must_use]
    pub fn with_desktop(desktop: DesktopId) -> Self {
        let space = Self::new();
        space.handler.set_current_desktop(desktop);
        space
    }

    /// Returns the effects handler effects should subscribe to.
    #[must_use]
    pub fn effects(&self) -> &Arc<EffectsHandler> { &self.handler }

    /// Returns a mapped window by ID.
    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<&Window> { self.windows.get(&id) }

    /// Returns the number of mapped windows.
    #[must_use]
    pub fn len(&self) -> usize { self.windows.len() }

    /// Returns whether no window is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.windows.is_empty() }

    /// Returns the current virtual desktop.
    #[must_use]
    pub fn current_desktop(&self) -> DesktopId { self.handler.current_desktop() }

    /// Maps a new window on top of the stacking order and emits `windowAdded`.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::DuplicateWindow`] if the ID is already mapped.
    pub fn add_window(&mut self, new: NewWindow) -> SpaceResult<Window> {
        if self.windows.contains_key(&new.id) {
            return Err(SpaceError::DuplicateWindow(new.id));
        }

        let props = WindowProps {
            caption: new.caption,
            unresponsive: new.unresponsive,
            minimized: new.minimized,
            visible: false,
            desktops: new.desktops,
        };
        let window = Window::new(new.id, props);
        self.refresh_visibility(&window);

        self.windows.insert(new.id, window.clone());
        self.handler.push_front(window.clone());

        tracing::debug!(window = %new.id, caption = %window.caption(), "window added");
        self.handler.window_added().emit(&window);
        Ok(window)
    }

    /// Emits `windowClosed` and then unmaps the window.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::WindowNotFound`] if the ID is not mapped.
    pub fn close_window(&mut self, id: WindowId) -> SpaceResult<()> {
        let window = self.windows.remove(&id).ok_or(SpaceError::WindowNotFound(id))?;

        tracing::debug!(window = %id, "window closed");
        self.handler.window_closed().emit(&window);
        self.handler.remove(id);
        Ok(())
    }

    /// Updates the responsiveness of a window.
    ///
    /// Emits `windowUnresponsiveChanged` only when the value actually changes.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::WindowNotFound`] if the ID is not mapped.
    pub fn set_unresponsive(&self, id: WindowId, unresponsive: bool) -> SpaceResult<()> {
        let window = self.get(id)?;
        let changed = window.update(|props| {
            std::mem::replace(&mut props.unresponsive, unresponsive) != unresponsive
        });

        if changed {
            tracing::debug!(window = %id, unresponsive, "responsiveness changed");
            window.signals().unresponsive_changed.emit(window);
        }
        Ok(())
    }

    /// Minimizes a window and emits `windowMinimized`.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::WindowNotFound`] if the ID is not mapped.
    pub fn minimize(&self, id: WindowId) -> SpaceResult<()> { self.set_minimized(id, true) }

    /// Restores a minimized window and emits `windowUnminimized`.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::WindowNotFound`] if the ID is not mapped.
    pub fn unminimize(&self, id: WindowId) -> SpaceResult<()> { self.set_minimized(id, false) }

    /// Moves a window to a new set of desktops and emits `windowDesktopsChanged`.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::WindowNotFound`] if the ID is not mapped.
    pub fn set_window_desktops(
        &self,
        id: WindowId,
        desktops: impl IntoIterator<Item = DesktopId>,
    ) -> SpaceResult<()> {
        let window = self.get(id)?;
        let desktops: DesktopSet = desktops.into_iter().collect();
        window.update(|props| props.desktops = desktops);
        self.refresh_visibility(window);

        tracing::debug!(window = %id, desktops = ?window.desktops(), "window desktops changed");
        window.signals().desktops_changed.emit(window);
        Ok(())
    }

    /// Switches the current virtual desktop and emits `desktopChanged`.
    ///
    /// Switching to the already-current desktop is a no-op.
    pub fn switch_desktop(&self, desktop: DesktopId) {
        let old = self.handler.set_current_desktop(desktop);
        if old == desktop {
            return;
        }

        for window in self.windows.values() {
            self.refresh_visibility(window);
        }

        tracing::debug!(%old, new = %desktop, "desktop switched");
        self.handler.desktop_changed().emit(&DesktopChange { old, new: desktop });
    }

    /// Raises a window to the top of the stacking order.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::WindowNotFound`] if the ID is not mapped.
    pub fn raise_window(&self, id: WindowId) -> SpaceResult<()> {
        let window = self.get(id)?;
        self.handler.push_front(window.clone());
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn get(&self, id: WindowId) -> SpaceResult<&Window> {
        self.windows.get(&id).ok_or(SpaceError::WindowNotFound(id))
    }

    fn set_minimized(&self, id: WindowId, minimized: bool) -> SpaceResult<()> {
        let window = self.get(id)?;
        let changed =
            window.update(|props| std::mem::replace(&mut props.minimized, minimized) != minimized);
        if !changed {
            return Ok(());
        }
        self.refresh_visibility(window);

        tracing::debug!(window = %id, minimized, "minimized state changed");
        let signal = if minimized {
            &window.signals().minimized
        } else {
            &window.signals().unminimized
        };
        signal.emit(window);
        Ok(())
    }

    fn refresh_visibility(&self, window: &Window) {
        let current = self.handler.current_desktop();
        window.update(|props| props.visible = !props.minimized && props.is_on_desktop(current));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_add_window_emits_and_stacks_on_top() {
        let mut space = Space::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = space.effects().window_added().connect(move |window| {
            sink.lock().push(window.caption());
        });

        space.add_window(NewWindow::new(1, "first")).unwrap();
        space.add_window(NewWindow::new(2, "second")).unwrap();

        assert_eq!(*seen.lock(), vec!["first", "second"]);
        assert_eq!(space.effects().stacking_order()[0].caption(), "second");
        assert_eq!(space.len(), 2);
    }

    #[test]
    fn test_add_duplicate_window_fails() {
        let mut space = Space::new();
        space.add_window(NewWindow::new(1, "first")).unwrap();
        let err = space.add_window(NewWindow::new(1, "again")).unwrap_err();
        assert_eq!(err, SpaceError::DuplicateWindow(WindowId(1)));
    }

    #[test]
    fn test_window_is_stacked_when_added_signal_fires() {
        let mut space = Space::new();
        let handler = Arc::clone(space.effects());
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&counts);
        let _sub = space.effects().window_added().connect(move |_| {
            sink.lock().push(handler.window_count());
        });

        space.add_window(NewWindow::new(1, "first")).unwrap();

        assert_eq!(*counts.lock(), vec![1]);
    }

    #[test]
    fn test_close_window_emits_before_unstacking() {
        let mut space = Space::new();
        space.add_window(NewWindow::new(1, "first")).unwrap();
        let handler = Arc::clone(space.effects());
        let stacked_on_close = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&stacked_on_close);
        let _sub = space.effects().window_closed().connect(move |_| {
            counter.store(handler.window_count(), Ordering::SeqCst);
        });

        space.close_window(WindowId(1)).unwrap();

        assert_eq!(stacked_on_close.load(Ordering::SeqCst), 1);
        assert_eq!(space.effects().window_count(), 0);
        assert!(space.is_empty());
        assert_eq!(
            space.close_window(WindowId(1)),
            Err(SpaceError::WindowNotFound(WindowId(1)))
        );
    }

    #[test]
    fn test_set_unresponsive_only_emits_on_change() {
        let mut space = Space::new();
        let window = space.add_window(NewWindow::new(1, "app")).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = window.signals().unresponsive_changed.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        space.set_unresponsive(WindowId(1), true).unwrap();
        space.set_unresponsive(WindowId(1), true).unwrap();
        space.set_unresponsive(WindowId(1), false).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!window.is_unresponsive());
    }

    #[test]
    fn test_minimize_hides_and_unminimize_shows() {
        let mut space = Space::new();
        let window = space.add_window(NewWindow::new(1, "app")).unwrap();

        space.minimize(WindowId(1)).unwrap();
        assert!(window.is_minimized());
        assert!(!window.is_visible());

        space.unminimize(WindowId(1)).unwrap();
        assert!(!window.is_minimized());
        assert!(window.is_visible());
    }

    #[test]
    fn test_visibility_follows_current_desktop() {
        let mut space = Space::new();
        let window =
            space.add_window(NewWindow::new(1, "app").on_desktops([DesktopId(2)])).unwrap();
        assert!(!window.is_visible());

        space.switch_desktop(DesktopId(2));
        assert!(window.is_visible());

        space.set_window_desktops(WindowId(1), [DesktopId(3)]).unwrap();
        assert!(!window.is_visible());

        space.set_window_desktops(WindowId(1), Vec::<DesktopId>::new()).unwrap();
        assert!(window.is_visible());
    }

    #[test]
    fn test_switch_to_same_desktop_is_silent() {
        let space = Space::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = space.effects().desktop_changed().connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        space.switch_desktop(DesktopId(1));
        space.switch_desktop(DesktopId(2));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_raise_window_reorders_stack() {
        let mut space = Space::new();
        space.add_window(NewWindow::new(1, "first")).unwrap();
        space.add_window(NewWindow::new(2, "second")).unwrap();

        space.raise_window(WindowId(1)).unwrap();

        assert_eq!(space.effects().stacking_order()[0].id(), WindowId(1));
        assert!(space.raise_window(WindowId(9)).is_err());
    }
}
