//! Workspace: the ordered list of editor components
//!
//! Every component (stave, text block, notation legend) lives in one
//! vertical list and is addressed by an opaque `ComponentId`. The workspace
//! also owns the focus register and the transient pointer/popup sessions
//! (see `interaction`).

mod interaction;

use serde::{Deserialize, Serialize};

use crate::input::focus::FocusRegister;
use crate::input::popover::TuningPopover;
use crate::input::resize::ResizeDrag;
use crate::models::{
    CellSource, EditorConfig, EditorError, EditorResult, NotationLegend, Stave, TextBlock,
};
use crate::parse::import::ProjectItem;
use crate::renderers::text::export_text;

/// Handle of one component in the workspace
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ComponentId(pub u32);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Stave,
    Text,
    Legend,
}

/// Contract every workspace component fulfils
pub trait WorkspaceMember {
    fn kind(&self) -> ComponentKind;

    /// Plain-text rendering used by the export serializer
    fn serialize(&self) -> String;

    /// Independent deep copy, or `None` if the component cannot be duplicated
    fn duplicate(&self) -> Option<Self>
    where
        Self: Sized;
}

impl WorkspaceMember for Stave {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Stave
    }

    fn serialize(&self) -> String {
        Stave::serialize(self)
    }

    fn duplicate(&self) -> Option<Self> {
        Some(Stave::duplicate(self))
    }
}

impl WorkspaceMember for TextBlock {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Text
    }

    fn serialize(&self) -> String {
        TextBlock::serialize(self)
    }

    fn duplicate(&self) -> Option<Self> {
        Some(TextBlock::duplicate(self))
    }
}

impl WorkspaceMember for NotationLegend {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Legend
    }

    fn serialize(&self) -> String {
        NotationLegend::serialize(self)
    }

    fn duplicate(&self) -> Option<Self> {
        Some(NotationLegend::duplicate(self))
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Component {
    Stave(Stave),
    Text(TextBlock),
    Legend(NotationLegend),
}

impl WorkspaceMember for Component {
    fn kind(&self) -> ComponentKind {
        match self {
            Component::Stave(stave) => stave.kind(),
            Component::Text(text) => text.kind(),
            Component::Legend(legend) => legend.kind(),
        }
    }

    fn serialize(&self) -> String {
        match self {
            Component::Stave(stave) => WorkspaceMember::serialize(stave),
            Component::Text(text) => WorkspaceMember::serialize(text),
            Component::Legend(legend) => WorkspaceMember::serialize(legend),
        }
    }

    fn duplicate(&self) -> Option<Self> {
        match self {
            Component::Stave(stave) => WorkspaceMember::duplicate(stave).map(Component::Stave),
            Component::Text(text) => WorkspaceMember::duplicate(text).map(Component::Text),
            Component::Legend(legend) => {
                WorkspaceMember::duplicate(legend).map(Component::Legend)
            }
        }
    }
}

impl Component {
    pub fn from_item(item: &ProjectItem) -> EditorResult<Self> {
        Ok(match item {
            ProjectItem::Stave(init) => Component::Stave(Stave::from_init(init.clone())?),
            ProjectItem::Text(init) => Component::Text(TextBlock::from_init(init)),
        })
    }

    pub fn as_stave(&self) -> Option<&Stave> {
        match self {
            Component::Stave(stave) => Some(stave),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
struct Entry {
    id: ComponentId,
    component: Component,
}

#[derive(Debug)]
pub struct Workspace {
    entries: Vec<Entry>,
    next_id: u32,
    config: EditorConfig,
    focus: FocusRegister,
    resize: Option<ResizeDrag>,
    popover: Option<TuningPopover>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Workspace {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            config,
            focus: FocusRegister::new(),
            resize: None,
            popover: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<ComponentId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.entries.iter().map(|entry| (entry.id, &entry.component))
    }

    pub fn position(&self, id: ComponentId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    fn index_of(&self, id: ComponentId) -> EditorResult<usize> {
        self.position(id).ok_or(EditorError::UnknownComponent(id))
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.position(id).map(|i| &self.entries[i].component)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        let index = self.position(id)?;
        Some(&mut self.entries[index].component)
    }

    pub fn stave(&self, id: ComponentId) -> EditorResult<&Stave> {
        match self.get(id) {
            Some(Component::Stave(stave)) => Ok(stave),
            _ => Err(EditorError::UnknownComponent(id)),
        }
    }

    pub fn stave_mut(&mut self, id: ComponentId) -> EditorResult<&mut Stave> {
        match self.get_mut(id) {
            Some(Component::Stave(stave)) => Ok(stave),
            _ => Err(EditorError::UnknownComponent(id)),
        }
    }

    pub fn text_block_mut(&mut self, id: ComponentId) -> EditorResult<&mut TextBlock> {
        match self.get_mut(id) {
            Some(Component::Text(text)) => Ok(text),
            _ => Err(EditorError::UnknownComponent(id)),
        }
    }

    pub fn legend_mut(&mut self, id: ComponentId) -> EditorResult<&mut NotationLegend> {
        match self.get_mut(id) {
            Some(Component::Legend(legend)) => Ok(legend),
            _ => Err(EditorError::UnknownComponent(id)),
        }
    }

    fn allocate_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a component at the end of the list
    pub fn push(&mut self, component: Component) -> ComponentId {
        let id = self.allocate_id();
        log::debug!("added {:?} component {}", component.kind(), id);
        self.entries.push(Entry { id, component });
        id
    }

    /// Append a stave built from the configured defaults
    pub fn add_stave(&mut self) -> EditorResult<ComponentId> {
        let tuning = self.config.tuning()?;
        let stave = Stave::new(tuning, self.config.default_length, CellSource::Empty)?;
        Ok(self.push(Component::Stave(stave)))
    }

    pub fn add_text_block(&mut self, markup: &str) -> ComponentId {
        self.push(Component::Text(TextBlock::from_rich_text(markup)))
    }

    pub fn add_legend(&mut self) -> ComponentId {
        self.push(Component::Legend(NotationLegend::default()))
    }

    /// Replace the whole workspace with imported items
    ///
    /// Every item is built before anything is replaced, so a failing item
    /// leaves the current contents untouched.
    pub fn load_project(&mut self, items: &[ProjectItem]) -> EditorResult<Vec<ComponentId>> {
        let components = items
            .iter()
            .map(Component::from_item)
            .collect::<EditorResult<Vec<_>>>()?;

        self.clear();
        let ids = components.into_iter().map(|c| self.push(c)).collect();
        log::info!("loaded project with {} components", self.entries.len());
        Ok(ids)
    }

    /// Drop every component and any session attached to them
    pub fn clear(&mut self) {
        self.focus.release_all();
        self.resize = None;
        self.popover = None;
        self.entries.clear();
    }

    /// Remove a component; focus and sessions held by it are released
    pub fn remove(&mut self, id: ComponentId) -> EditorResult<Component> {
        let index = self.index_of(id)?;
        self.focus.release_component(id);
        if self.resize.as_ref().is_some_and(|drag| drag.stave() == id) {
            self.resize = None;
        }
        if self.popover.as_ref().is_some_and(|popover| popover.stave() == id) {
            self.popover = None;
        }
        log::debug!("removed component {}", id);
        Ok(self.entries.remove(index).component)
    }

    /// Deep-copy a component and insert the copy right after it
    pub fn duplicate(&mut self, id: ComponentId) -> EditorResult<ComponentId> {
        let index = self.index_of(id)?;
        let copy = WorkspaceMember::duplicate(&self.entries[index].component)
            .ok_or(EditorError::UnknownComponent(id))?;
        let new_id = self.allocate_id();
        self.entries.insert(
            index + 1,
            Entry {
                id: new_id,
                component: copy,
            },
        );
        log::debug!("duplicated {} as {}", id, new_id);
        Ok(new_id)
    }

    /// Swap with the previous component; `false` when already first
    pub fn move_up(&mut self, id: ComponentId) -> EditorResult<bool> {
        let index = self.index_of(id)?;
        if index == 0 {
            return Ok(false);
        }
        self.entries.swap(index - 1, index);
        Ok(true)
    }

    /// Swap with the next component; `false` when already last
    pub fn move_down(&mut self, id: ComponentId) -> EditorResult<bool> {
        let index = self.index_of(id)?;
        if index + 1 >= self.entries.len() {
            return Ok(false);
        }
        self.entries.swap(index, index + 1);
        Ok(true)
    }

    /// Plain-text export of the whole workspace
    pub fn export_text(&self) -> String {
        export_text(self)
    }
}
