//! Step highlight and pin state shared by independent views.
//!
//! Every selection records the view that set it. A view may only clear a
//! selection it owns, so a list reacting to a map highlight (or the other
//! way round) cannot erase the state that triggered it.
//!
//! # Examples
//! ```
//! use waymark_core::{SelectionState, ViewId};
//!
//! let mut selection = SelectionState::default();
//! selection.set_hovered(2, ViewId::StepList);
//! selection.clear_hovered(ViewId::Map);
//! assert_eq!(selection.active().map(|step| step.index), Some(2));
//! ```

use serde::{Deserialize, Serialize};

/// A view surface able to highlight route steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    /// The turn-by-turn step list.
    StepList,
    /// The map.
    Map,
}

impl ViewId {
    /// Return the view name as a `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StepList => "step_list",
            Self::Map => "map",
        }
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "step_list" | "list" => Ok(Self::StepList),
            "map" => Ok(Self::Map),
            _ => Err(format!("unknown view '{s}'")),
        }
    }
}

/// A step index together with the view that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepSelection {
    /// Index into the route's step list.
    pub index: usize,
    /// View that set the selection.
    pub source: ViewId,
}

/// Hover and pin state for route steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SelectionState {
    hovered: Option<StepSelection>,
    pinned: Option<StepSelection>,
}

impl SelectionState {
    /// Currently hovered step.
    #[must_use]
    pub const fn hovered(&self) -> Option<StepSelection> {
        self.hovered
    }

    /// Currently pinned step.
    #[must_use]
    pub const fn pinned(&self) -> Option<StepSelection> {
        self.pinned
    }

    /// The step to highlight: the pin wins over the hover.
    #[must_use]
    pub fn active(&self) -> Option<StepSelection> {
        self.pinned.or(self.hovered)
    }

    /// Hover `index` on behalf of `source`.
    pub const fn set_hovered(&mut self, index: usize, source: ViewId) {
        self.hovered = Some(StepSelection { index, source });
    }

    /// Clear the hover if `source` owns it.
    pub fn clear_hovered(&mut self, source: ViewId) {
        clear_owned(&mut self.hovered, source);
    }

    /// Pin `index` on behalf of `source`, replacing any existing pin.
    pub const fn set_pinned(&mut self, index: usize, source: ViewId) {
        self.pinned = Some(StepSelection { index, source });
    }

    /// Clear the pin if `source` owns it.
    pub fn clear_pinned(&mut self, source: ViewId) {
        clear_owned(&mut self.pinned, source);
    }

    /// Toggle the pin on `index`.
    ///
    /// Toggling the pinned index clears the pin whichever view pinned it.
    pub fn toggle_pinned(&mut self, index: usize, source: ViewId) {
        if self.pinned.is_some_and(|pin| pin.index == index) {
            self.pinned = None;
        } else {
            self.set_pinned(index, source);
        }
    }

    /// Drop both selections.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clear_owned(slot: &mut Option<StepSelection>, source: ViewId) {
    if slot.is_some_and(|selection| selection.source == source) {
        *slot = None;
    }
}
