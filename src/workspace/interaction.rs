//! Pointer, keyboard and popup interactions routed through the workspace

use super::{Component, ComponentId, Workspace};
use crate::input::focus::FocusOwner;
use crate::input::keys::{handle_articulation_key, handle_grid_key, KeyEvent, KeyOutcome};
use crate::input::popover::TuningPopover;
use crate::input::resize::{ResizeDrag, ResizeGeometry};
use crate::models::{EditorError, EditorResult, TuningChange};

impl Workspace {
    pub fn focus_holder(&self) -> Option<FocusOwner> {
        self.focus.holder()
    }

    fn blur(&mut self, owner: FocusOwner) {
        match owner {
            FocusOwner::Grid(id) => {
                if let Ok(stave) = self.stave_mut(id) {
                    stave.grid_mut().blur();
                }
            }
            FocusOwner::Articulation(id) => {
                if let Some(articulation) = self
                    .stave_mut(id)
                    .ok()
                    .and_then(|stave| stave.articulation_mut())
                {
                    articulation.blur();
                }
            }
            FocusOwner::Popup(_) => self.popover = None,
            FocusOwner::TextBlock(_) => {}
        }
    }

    fn take_focus(&mut self, owner: FocusOwner) {
        let (_, displaced) = self.focus.acquire(owner);
        if let Some(previous) = displaced {
            self.blur(previous);
        }
    }

    /// Pointer-down on a grid cell
    pub fn click_cell(&mut self, id: ComponentId, x: usize, y: usize) -> EditorResult<()> {
        self.stave_mut(id)?.grid_mut().click(x, y)?;
        self.take_focus(FocusOwner::Grid(id));
        Ok(())
    }

    /// Pointer-down on an articulation cell
    pub fn click_articulation(&mut self, id: ComponentId, x: usize) -> EditorResult<()> {
        self.stave_mut(id)?
            .articulation_mut()
            .ok_or(EditorError::UnknownComponent(id))?
            .click(x)?;
        self.take_focus(FocusOwner::Articulation(id));
        Ok(())
    }

    pub fn focus_text_block(&mut self, id: ComponentId) -> EditorResult<()> {
        self.text_block_mut(id)?;
        self.take_focus(FocusOwner::TextBlock(id));
        Ok(())
    }

    /// Pointer-down outside every focusable element
    pub fn release_focus(&mut self) {
        if let Some(owner) = self.focus.release_all() {
            self.blur(owner);
        }
    }

    /// Route a key press to whatever holds focus
    pub fn key_down(&mut self, event: KeyEvent) -> EditorResult<KeyOutcome> {
        let outcome = match self.focus.holder() {
            Some(FocusOwner::Grid(id)) => handle_grid_key(self.stave_mut(id)?.grid_mut(), event)?,
            Some(FocusOwner::Articulation(id)) => {
                let articulation = self
                    .stave_mut(id)?
                    .articulation_mut()
                    .ok_or(EditorError::UnknownComponent(id))?;
                handle_articulation_key(articulation, event)?
            }
            // Text blocks and the popup edit natively in the host
            Some(FocusOwner::TextBlock(_)) | Some(FocusOwner::Popup(_)) | None => {
                KeyOutcome::default()
            }
        };

        if outcome.release_focus {
            self.release_focus();
        }
        Ok(outcome)
    }

    pub fn set_text(&mut self, id: ComponentId, markup: &str) -> EditorResult<()> {
        self.text_block_mut(id)?.set_text(markup);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Resize drag
    // ------------------------------------------------------------------

    pub fn begin_resize(&mut self, id: ComponentId, geometry: ResizeGeometry) -> EditorResult<()> {
        let columns = self.stave(id)?.columns();
        let drag = ResizeDrag::begin(id, columns, geometry, self.config.max_length)?;
        log::debug!("resize drag started on {} at {} columns", id, columns);
        self.resize = Some(drag);
        Ok(())
    }

    /// Apply the column count under the pointer; `None` if nothing changed
    /// or no drag is in progress
    pub fn drag_resize(&mut self, pointer_x: f64) -> EditorResult<Option<usize>> {
        let Some(drag) = self.resize.as_mut() else {
            return Ok(None);
        };
        let stave = drag.stave();
        match drag.update(pointer_x) {
            Some(columns) => {
                self.stave_mut(stave)?.resize(columns)?;
                Ok(Some(columns))
            }
            None => Ok(None),
        }
    }

    /// Finish the drag, returning the final column count
    pub fn end_resize(&mut self) -> Option<usize> {
        self.resize.take().map(|drag| drag.current())
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Set a stave length directly (length input field)
    pub fn resize_stave(&mut self, id: ComponentId, columns: usize) -> EditorResult<bool> {
        self.stave_mut(id)?.resize(columns)
    }

    // ------------------------------------------------------------------
    // Tuning popup
    // ------------------------------------------------------------------

    pub fn open_tuning_popover(&mut self, id: ComponentId) -> EditorResult<&TuningPopover> {
        let tuning = self.stave(id)?.tuning().clone();
        let owner = FocusOwner::Popup(id);
        let (lease, displaced) = self.focus.acquire(owner);
        if let Some(previous) = displaced {
            self.blur(previous);
        }
        Ok(&*self.popover.insert(TuningPopover::open(id, &tuning, lease)))
    }

    pub fn popover(&self) -> Option<&TuningPopover> {
        self.popover.as_ref()
    }

    /// Commit popup input to its stave
    ///
    /// On failure the popup stays open with the error attached and the
    /// stave keeps its tuning.
    pub fn submit_tuning(&mut self, input: &str) -> EditorResult<TuningChange> {
        let Some(popover) = self.popover.as_mut() else {
            return Err(EditorError::InvalidTuning("no tuning popup is open".into()));
        };
        popover.set_draft(input);
        let id = popover.stave();

        let result = match self.get_mut(id) {
            Some(Component::Stave(stave)) => stave.set_tuning_str(input),
            _ => Err(EditorError::UnknownComponent(id)),
        };

        match result {
            Ok(change) => {
                if let Some(popover) = self.popover.take() {
                    self.focus.release(popover.lease());
                }
                Ok(change)
            }
            Err(err) => {
                log::warn!("tuning rejected for {}: {}", id, err);
                if let Some(popover) = self.popover.as_mut() {
                    popover.reject(err.clone());
                }
                Err(err)
            }
        }
    }

    pub fn cancel_tuning(&mut self) {
        if let Some(popover) = self.popover.take() {
            self.focus.release(popover.lease());
        }
    }
}
