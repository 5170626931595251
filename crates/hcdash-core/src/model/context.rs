// ── Dialog context ──
//
// Everything a dialog needs to know about what opened it. Built by the UI
// from the selected row when the dialog opens, dropped when it closes.

/// Context attached to a dialog-open event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogContext {
    /// openHAB thing UID of the appliance.
    pub thing_id: String,
    /// Home Connect appliance id.
    pub ha_id: Option<String>,
    pub bridge_id: Option<String>,
    /// Backend action for the API action dialog.
    pub action: Option<String>,
    /// Dialog title override.
    pub title: Option<String>,
}

impl DialogContext {
    pub fn for_thing(thing_id: impl Into<String>) -> Self {
        Self {
            thing_id: thing_id.into(),
            ..Self::default()
        }
    }

    pub fn with_ha_id(mut self, ha_id: impl Into<String>) -> Self {
        self.ha_id = Some(ha_id.into());
        self
    }

    pub fn with_bridge_id(mut self, bridge_id: impl Into<String>) -> Self {
        self.bridge_id = Some(bridge_id.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
