use egui::{Context, Id};

use crate::models::calendar_date::FocusTarget;
use crate::services::focus::FocusHost;

/// Widget id of a picker element. Stable across frames so focus requests
/// survive the grid being rebuilt.
pub fn target_id(base: Id, target: FocusTarget) -> Id {
    base.with(target)
}

/// [`FocusHost`] backed by egui's focus memory.
pub struct EguiFocus {
    ctx: Context,
    base: Id,
    targets: Vec<FocusTarget>,
}

impl EguiFocus {
    pub fn new(ctx: &Context, base: Id, targets: Vec<FocusTarget>) -> Self {
        Self {
            ctx: ctx.clone(),
            base,
            targets,
        }
    }

    fn target_for(&self, id: Id) -> Option<FocusTarget> {
        if id == target_id(self.base, FocusTarget::Toggle) {
            return Some(FocusTarget::Toggle);
        }
        self.targets
            .iter()
            .copied()
            .find(|target| target_id(self.base, *target) == id)
    }
}

impl FocusHost for EguiFocus {
    type Element = FocusTarget;

    fn list_focusable(&self) -> Vec<FocusTarget> {
        self.targets.clone()
    }

    fn active_element(&self) -> Option<FocusTarget> {
        let focused = self.ctx.memory(|mem| mem.focused())?;
        self.target_for(focused)
    }

    fn focus(&mut self, element: &FocusTarget) {
        let id = target_id(self.base, *element);
        self.ctx.memory_mut(|mem| mem.request_focus(id));
    }
}
