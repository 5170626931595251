//! Screen implementations. Each screen is a top-level Component.

pub mod appliances;
pub mod requests;

use std::sync::Arc;

use hcdash_config::{BridgeEntry, Profile};
use hcdash_core::TrafficLog;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create the screen components in tab-bar order.
pub fn create_screens(
    profile: &Profile,
    traffic: Arc<TrafficLog>,
    bridges: Vec<BridgeEntry>,
) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Appliances,
            Box::new(appliances::AppliancesScreen::new(profile)),
        ),
        (
            ScreenId::Requests,
            Box::new(requests::RequestsScreen::new(traffic, bridges)),
        ),
    ]
}
