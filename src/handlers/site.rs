use crate::config::SiteInfo;
use crate::response::{ok, Reply};
use crate::state::AppState;
use axum::extract::State;

/// Company details shown in the header, footer and contacts page.
pub async fn site_info(State(state): State<AppState>) -> Reply<SiteInfo> {
    ok(state.settings.site.clone())
}
